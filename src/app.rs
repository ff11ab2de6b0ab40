// ═══════════════════════════════════════════════════════════════════════════════
// 📦 app.rs - Application Logic
// ═══════════════════════════════════════════════════════════════════════════════
// This module contains the main application logic and event handling.
// Features:
// - Tick: one reading → detection → controller → activity log
// - Keyboard input handling per screen
// - Admin login, password change, automation toggle
// - Log viewer, usage summary and export
// ═══════════════════════════════════════════════════════════════════════════════

use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing::{error, info};

use presence_tui::activity_log::{self, group_by_date, pick_export_destination};
use presence_tui::detectors::motion::motion_level;
use presence_tui::sources::SampleSource;
use presence_tui::{
    quick_detect, ActivityLog, AdminGate, AppConfig, ControllerEvent, DetectionSample, Error,
    LogEntry, LoginOutcome, Occupancy, PresenceController, Session, UsageSummary,
};

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Screens / الشاشات
// ═══════════════════════════════════════════════════════════════════════════════

/// Which screen is on top / الشاشة المعروضة
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    AdminLogin,
    ChangePassword,
    Dashboard,
    LogViewer,
    Summary,
}

impl Screen {
    /// Screens that type into the password buffer
    pub fn takes_text(self) -> bool {
        matches!(self, Screen::AdminLogin | Screen::ChangePassword)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Detection Feed / سجل الكشف المباشر
// ═══════════════════════════════════════════════════════════════════════════════

/// Rolling history for the live detection chart
/// تاريخ متحرك للرسم البياني المباشر
#[derive(Debug, Clone)]
pub struct FeedHistory {
    motion: VecDeque<f64>,
    faces: VecDeque<f64>,
    capacity: usize,
}

impl FeedHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            motion: VecDeque::with_capacity(capacity),
            faces: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// `motion` is the percentage of the motion threshold reached
    pub fn push(&mut self, motion: f64, face_present: bool) {
        if self.motion.len() == self.capacity {
            self.motion.pop_front();
            self.faces.pop_front();
        }
        self.motion.push_back(motion);
        self.faces.push_back(if face_present { 100.0 } else { 0.0 });
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn motion_points(&self) -> Vec<(f64, f64)> {
        to_points(&self.motion)
    }

    pub fn face_points(&self) -> Vec<(f64, f64)> {
        to_points(&self.faces)
    }
}

fn to_points(values: &VecDeque<f64>) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| (i as f64, v))
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Log Viewer State / حالة عارض السجل
// ═══════════════════════════════════════════════════════════════════════════════

/// One visible line of the log viewer
pub enum LogRow<'a> {
    Date {
        date: NaiveDate,
        count: usize,
        expanded: bool,
        selected: bool,
    },
    Entry(&'a LogEntry),
}

/// Log entries grouped by date, newest date first, collapsed by default
/// السجلات مجمعة حسب التاريخ، الأحدث أولاً
#[derive(Debug, Clone)]
pub struct LogView {
    entries: Vec<LogEntry>,
    dates: Vec<NaiveDate>,
    expanded: BTreeSet<NaiveDate>,
    selected: usize,
}

impl LogView {
    pub fn new(entries: Vec<LogEntry>) -> Self {
        let dates = group_by_date(&entries).into_keys().rev().collect();
        Self {
            entries,
            dates,
            expanded: BTreeSet::new(),
            selected: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.dates.get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.dates.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn toggle_selected(&mut self) {
        if let Some(date) = self.selected_date() {
            if !self.expanded.remove(&date) {
                self.expanded.insert(date);
            }
        }
    }

    /// Index of the selected date's header within `rows()`
    pub fn selected_row(&self) -> usize {
        self.rows()
            .iter()
            .position(|row| matches!(row, LogRow::Date { selected: true, .. }))
            .unwrap_or(0)
    }

    pub fn rows(&self) -> Vec<LogRow<'_>> {
        let grouped = group_by_date(&self.entries);
        let mut rows = Vec::new();

        for (i, date) in self.dates.iter().enumerate() {
            let day = grouped.get(date).map(Vec::as_slice).unwrap_or_default();
            let expanded = self.expanded.contains(date);
            rows.push(LogRow::Date {
                date: *date,
                count: day.len(),
                expanded,
                selected: i == self.selected,
            });
            if expanded {
                rows.extend(day.iter().map(|entry| LogRow::Entry(*entry)));
            }
        }

        rows
    }
}

/// What the summary screen shows / محتوى شاشة الملخص
#[derive(Debug, Clone)]
pub struct SummaryView {
    pub summary: UsageSummary,
    pub days: Vec<NaiveDate>,
    pub lines: Vec<String>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Application Structure / هيكل التطبيق
// ═══════════════════════════════════════════════════════════════════════════════

/// Main application structure
/// هيكل التطبيق الرئيسي
pub struct App {
    pub config: AppConfig,
    pub controller: PresenceController,
    pub session: Session,
    pub activity_log: ActivityLog,
    pub source: SampleSource,

    pub screen: Screen,
    /// Password being typed / كلمة المرور المكتوبة
    pub input: String,
    pub status_message: String,
    pub warning_message: Option<String>,

    pub feed: FeedHistory,
    pub last_sample: Option<DetectionSample>,
    pub log_view: Option<LogView>,
    pub summary_view: Option<SummaryView>,

    should_quit: bool,
}

impl App {
    /// Create a new application instance
    /// إنشاء مثيل تطبيق جديد
    pub fn new(config: AppConfig, source: SampleSource) -> Self {
        let controller = PresenceController::new(config.timing());
        let session = Session::new(AdminGate::new(config.admin.default_password.clone()));
        let activity_log = ActivityLog::new(
            config.storage.log_file.clone(),
            config.ui.live_log_rows,
        );
        let feed = FeedHistory::new(config.ui.feed_points);
        let status_message = format!("{} - press A for admin", source.label());

        Self {
            config,
            controller,
            session,
            activity_log,
            source,
            screen: Screen::Home,
            input: String::new(),
            status_message,
            warning_message: None,
            feed,
            last_sample: None,
            log_view: None,
            summary_view: None,
            should_quit: false,
        }
    }

    pub fn log_path(&self) -> PathBuf {
        self.activity_log.path().to_path_buf()
    }

    /// Clock used for admin actions: the replay's recorded time, else now
    fn clock(&self) -> NaiveDateTime {
        match (&self.source, self.last_sample) {
            (SampleSource::Replay(_), Some(sample)) => sample.timestamp,
            _ => Local::now().naive_local().trunc_subsecs(0),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // 🔹 Tick / دورة التحديث
    // ═══════════════════════════════════════════════════════════════════════════

    /// Pull one reading and feed it through detection and the controller.
    ///
    /// No reading this tick means no state change. Sample times are cut to
    /// whole seconds, the precision the activity log keeps.
    pub fn tick(&mut self, now: NaiveDateTime) {
        let Some(timed) = self.source.next_reading(now) else {
            return;
        };

        let thresholds = self.config.detection;
        let sample = quick_detect(&timed.reading, &thresholds, timed.at.trunc_subsecs(0));
        self.feed
            .push(motion_level(&timed.reading, &thresholds), sample.face_present);
        self.last_sample = Some(sample);

        if !self.session.automation_enabled() {
            return;
        }

        let outcome = self.controller.step(&sample);
        self.apply_events(&outcome.events);
        if outcome.status != Occupancy::Warning {
            self.warning_message = None;
        }
    }

    /// Log transitions and surface warnings
    /// تسجيل التحولات وعرض التحذيرات
    fn apply_events(&mut self, events: &[ControllerEvent]) {
        for event in events {
            if let ControllerEvent::WarningIssued { remaining, .. } = event {
                self.warning_message = Some(format!(
                    "⚠️ No detection. Turning off in {}s.",
                    remaining.num_seconds()
                ));
            }

            let Some(message) = event.log_message() else {
                continue;
            };
            if let Err(e) = self.activity_log.record(event.at(), message) {
                error!(error = %e, "failed to write activity log");
                self.status_message = format!("❌ Failed to write log: {}", e);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // 🔹 Event Handling / معالجة الأحداث
    // ═══════════════════════════════════════════════════════════════════════════

    /// Handle keyboard and other events
    /// معالجة لوحة المفاتيح والأحداث الأخرى
    ///
    /// Returns true if should quit / يرجع true إذا يجب الخروج
    pub fn handle_events(&mut self) -> Result<bool> {
        if event::poll(Duration::from_millis(self.config.ui.tick_ms))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }

        Ok(self.should_quit)
    }

    /// Handle a single key press
    /// معالجة ضغطة مفتاح واحدة
    pub fn handle_key(&mut self, key: KeyCode) {
        if self.screen.takes_text() {
            self.handle_text_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,

            // F / M - simulate face or motion / محاكاة وجه أو حركة
            KeyCode::Char('f') | KeyCode::Char('F') => self.press_manual(true),
            KeyCode::Char('m') | KeyCode::Char('M') => self.press_manual(false),

            // H - back home (logs out) / العودة للرئيسية
            KeyCode::Char('h') | KeyCode::Char('H') => self.go_home(),

            _ => match self.screen {
                Screen::Home => self.handle_home_key(key),
                Screen::Dashboard => self.handle_dashboard_key(key),
                Screen::LogViewer => self.handle_log_viewer_key(key),
                Screen::Summary => self.handle_summary_key(key),
                Screen::AdminLogin | Screen::ChangePassword => {}
            },
        }
    }

    fn handle_home_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('a') | KeyCode::Char('A') => {
                self.input.clear();
                self.screen = Screen::AdminLogin;
            }
            KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('t') | KeyCode::Char('T') => self.toggle_automation(),
            KeyCode::Char('l') | KeyCode::Char('L') => self.open_log_viewer(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.open_summary(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export_logs(None),
            KeyCode::Char('o') | KeyCode::Char('O') | KeyCode::Esc => self.go_home(),
            _ => {}
        }
    }

    fn handle_log_viewer_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Up => {
                if let Some(view) = self.log_view.as_mut() {
                    view.select_previous();
                }
            }
            KeyCode::Down => {
                if let Some(view) = self.log_view.as_mut() {
                    view.select_next();
                }
            }
            KeyCode::Enter => {
                if let Some(view) = self.log_view.as_mut() {
                    view.toggle_selected();
                }
            }
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let date = self.log_view.as_ref().and_then(LogView::selected_date);
                self.export_logs(date);
            }
            KeyCode::Char('a') | KeyCode::Char('A') => self.export_logs(None),
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => {
                self.log_view = None;
                self.screen = Screen::Dashboard;
            }
            _ => {}
        }
    }

    fn handle_summary_key(&mut self, key: KeyCode) {
        if matches!(key, KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B')) {
            self.summary_view = None;
            self.screen = Screen::Dashboard;
        }
    }

    /// Password entry / إدخال كلمة المرور
    fn handle_text_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                if self.screen == Screen::AdminLogin {
                    self.submit_login();
                } else {
                    self.submit_password_change();
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Esc => self.go_home(),
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn press_manual(&mut self, face: bool) {
        match self.source.manual_mut() {
            Some(manual) if face => manual.press_face(),
            Some(manual) => manual.press_motion(),
            None => {
                self.status_message = "⌨️ F / M only work with the manual source".to_string();
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // 🔹 Admin Actions / إجراءات المشرف
    // ═══════════════════════════════════════════════════════════════════════════

    fn submit_login(&mut self) {
        let attempt = std::mem::take(&mut self.input);
        match self.session.admin.login(&attempt) {
            Ok(LoginOutcome::Granted) => {
                self.screen = Screen::Dashboard;
                self.status_message = "✅ Welcome, admin".to_string();
            }
            Ok(LoginOutcome::MustChangePassword) => {
                self.screen = Screen::ChangePassword;
                self.status_message = "🔑 Default password in use - choose a new one".to_string();
            }
            Err(e) => self.status_message = format!("❌ {}", e),
        }
    }

    fn submit_password_change(&mut self) {
        let new_password = std::mem::take(&mut self.input);
        match self.session.admin.change_password(&new_password) {
            Ok(()) => {
                self.screen = Screen::Dashboard;
                self.status_message = "✅ Password changed successfully!".to_string();
            }
            Err(e) => self.status_message = format!("❌ {}", e),
        }
    }

    /// Log out and return to the home screen
    /// تسجيل الخروج والعودة للرئيسية
    pub fn go_home(&mut self) {
        self.session.admin.logout();
        self.input.clear();
        self.log_view = None;
        self.summary_view = None;
        self.screen = Screen::Home;
    }

    fn toggle_automation(&mut self) {
        let now = self.clock();
        match self.session.toggle_automation(&mut self.controller, now) {
            Ok(events) => {
                self.apply_events(&events);
                if self.session.automation_enabled() {
                    self.status_message = "▶️ Automation on".to_string();
                } else {
                    self.warning_message = None;
                    self.status_message = "⏸️ Automation off - appliances switched off".to_string();
                }
            }
            Err(e) => self.status_message = format!("❌ {}", e),
        }
    }

    /// Read the whole log; a missing file is reported as "no data"
    fn load_log(&mut self) -> Option<Vec<LogEntry>> {
        if let Err(e) = self.session.admin.require() {
            self.status_message = format!("❌ {}", e);
            return None;
        }

        match self.activity_log.load() {
            Ok(entries) if !entries.is_empty() => Some(entries),
            Ok(_) | Err(Error::NoLogFile(_)) => {
                self.status_message = "📭 No logs found.".to_string();
                None
            }
            Err(e) => {
                error!(error = %e, "failed to read activity log");
                self.status_message = format!("❌ {}", e);
                None
            }
        }
    }

    fn open_log_viewer(&mut self) {
        if let Some(entries) = self.load_log() {
            let view = LogView::new(entries);
            self.status_message = "📜 ↑↓ select date, Enter expand, E export day".to_string();
            self.log_view = Some(view);
            self.screen = Screen::LogViewer;
        }
    }

    fn open_summary(&mut self) {
        let Some(entries) = self.load_log() else {
            return;
        };

        let summary = UsageSummary::from_entries(&entries);
        if summary.is_empty() {
            self.status_message = "📭 No completed ON/OFF pairs yet.".to_string();
            return;
        }

        let days = summary.recent_days(self.config.ui.summary_days);
        let lines = summary.summary_lines(&days);
        self.summary_view = Some(SummaryView {
            summary,
            days,
            lines,
        });
        self.screen = Screen::Summary;
    }

    /// Export the log (all of it, or one day) through a save dialog
    /// تصدير السجل عبر نافذة الحفظ
    fn export_logs(&mut self, date: Option<NaiveDate>) {
        if let Err(e) = self.session.admin.require() {
            self.status_message = format!("❌ {}", e);
            return;
        }

        let source = self.log_path();
        if !source.exists() {
            self.status_message = "📭 No log file to export.".to_string();
            return;
        }

        self.status_message = "📂 Opening save dialog...".to_string();
        let Some(dest) = pick_export_destination(date) else {
            self.status_message = "Export cancelled".to_string();
            return;
        };

        match activity_log::export(&source, &dest, date) {
            Ok(count) => {
                info!(count, dest = %dest.display(), "logs exported");
                self.status_message =
                    format!("✅ Exported {} entries to {}", count, dest.display());
            }
            Err(e) => {
                error!(error = %e, "export failed");
                self.status_message = format!("❌ Export failed: {}", e);
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use presence_tui::sources::ManualSource;
    use presence_tui::Appliance;
    use tempfile::TempDir;

    fn test_app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.storage.log_file = dir.path().join("appliance_logs.csv");
        let app = App::new(config, SampleSource::Manual(ManualSource::new()));
        (app, dir)
    }

    fn at(secs: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, secs)
            .unwrap()
    }

    fn at_millis(millis: i64) -> NaiveDateTime {
        at(0) + chrono::TimeDelta::milliseconds(millis)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
    }

    fn login_as_admin(app: &mut App) {
        app.handle_key(KeyCode::Char('a'));
        type_text(app, "admin");
        assert_eq!(app.screen, Screen::ChangePassword);
        type_text(app, "s3cret");
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[test]
    fn test_manual_face_turns_everything_on() {
        let (mut app, _dir) = test_app();

        app.handle_key(KeyCode::Char('f'));
        app.tick(at(0));

        assert!(app.controller.is_on(Appliance::Lights));
        assert!(app.controller.is_on(Appliance::Aircon));
        assert_eq!(app.activity_log.recent().len(), 2);
        assert_eq!(app.activity_log.recent()[0].message, "LIGHTS turned ON");
    }

    #[test]
    fn test_warning_then_shutoff() {
        let (mut app, _dir) = test_app();

        app.handle_key(KeyCode::Char('m'));
        app.tick(at(0));
        app.tick(at(12));
        assert!(app.warning_message.is_some());

        app.tick(at(16));
        assert!(app.warning_message.is_none());
        assert!(!app.controller.appliances().any_on());

        let messages: Vec<_> = app
            .activity_log
            .recent()
            .iter()
            .map(|e| e.message.as_str())
            .collect();
        assert!(messages.contains(&"LIGHTS turned OFF after 0:00:16"));
    }

    #[test]
    fn test_wrong_password_stays_on_login() {
        let (mut app, _dir) = test_app();
        app.handle_key(KeyCode::Char('a'));
        type_text(&mut app, "nope");

        assert_eq!(app.screen, Screen::AdminLogin);
        assert!(app.status_message.contains("incorrect password"));
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_disabling_automation_stops_feeding() {
        let (mut app, _dir) = test_app();
        login_as_admin(&mut app);

        app.handle_key(KeyCode::Char('f'));
        app.tick(at(0));
        app.handle_key(KeyCode::Char('t'));
        assert!(!app.session.automation_enabled());
        assert!(!app.controller.appliances().any_on());

        // Samples are ignored while automation is off / تجاهل العينات
        app.handle_key(KeyCode::Char('f'));
        app.tick(at(1));
        assert!(!app.controller.appliances().any_on());
        assert!(app.last_sample.is_some_and(|s| s.detected()));
    }

    #[test]
    fn test_log_viewer_needs_data() {
        let (mut app, _dir) = test_app();
        login_as_admin(&mut app);

        app.handle_key(KeyCode::Char('l'));
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.status_message.contains("No logs"));

        app.handle_key(KeyCode::Char('f'));
        app.tick(at(0));
        app.handle_key(KeyCode::Char('l'));
        assert_eq!(app.screen, Screen::LogViewer);

        let view = app.log_view.as_mut().unwrap();
        assert_eq!(view.rows().len(), 1);
        view.toggle_selected();
        assert_eq!(view.rows().len(), 3);
    }

    #[test]
    fn test_home_logs_out() {
        let (mut app, _dir) = test_app();
        login_as_admin(&mut app);

        app.handle_key(KeyCode::Char('h'));
        assert_eq!(app.screen, Screen::Home);
        assert!(!app.session.admin.is_logged_in());
    }

    #[test]
    fn test_feed_history_is_bounded() {
        let mut feed = FeedHistory::new(3);
        for i in 0..5 {
            feed.push(i as f64, i % 2 == 0);
        }
        let points = feed.motion_points();
        assert_eq!(points, vec![(0.0, 2.0), (1.0, 3.0), (2.0, 4.0)]);
        assert_eq!(feed.face_points()[2], (2.0, 100.0));
    }

    #[test]
    fn test_subsecond_clock_matches_log_totals() {
        let (mut app, _dir) = test_app();

        app.handle_key(KeyCode::Char('f'));
        app.tick(at_millis(900));
        app.tick(at_millis(16_100));
        assert!(!app.controller.appliances().any_on());

        let entries = activity_log::read_entries(app.activity_log.path()).unwrap();
        assert_eq!(entries[2].message, "LIGHTS turned OFF after 0:00:16");

        let summary = UsageSummary::from_entries(&entries);
        let day = at(0).date();
        for appliance in Appliance::ALL {
            assert_eq!(
                summary.total(day, appliance),
                app.controller.durations().total(appliance)
            );
        }
    }
}
