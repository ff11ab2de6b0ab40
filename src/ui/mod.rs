// ═══════════════════════════════════════════════════════════════════════════════
// 📦 ui/mod.rs - Terminal User Interface Module
// ═══════════════════════════════════════════════════════════════════════════════
// This module implements the TUI using Ratatui.
// Features:
// - Two-column layout (Status | Feed + Activity)
// - Admin login / change-password popups
// - Admin dashboard, log viewer, usage summary
// ═══════════════════════════════════════════════════════════════════════════════

mod charts;
mod controls;
mod helpers;
mod status_panel;
mod tables;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Screen};
use helpers::{centered_rect, masked};

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Main Render Function / دالة الرسم الرئيسية
// ═══════════════════════════════════════════════════════════════════════════════

/// Render the entire UI
/// رسم واجهة المستخدم بالكامل
pub fn render(frame: &mut Frame, app: &App) {
    let [header, body, footer] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .areas(frame.area());

    render_header(frame, header, app);
    render_footer(frame, footer, app);

    match app.screen {
        Screen::Home | Screen::AdminLogin | Screen::ChangePassword => {
            render_home(frame, body, app);
            if app.screen.takes_text() {
                render_password_popup(frame, body, app);
            }
        }
        Screen::Dashboard => render_dashboard(frame, body, app),
        Screen::LogViewer => match &app.log_view {
            Some(view) => tables::render_log_viewer(frame, body, view),
            None => render_dashboard(frame, body, app),
        },
        Screen::Summary => match &app.summary_view {
            Some(view) => render_summary(frame, body, view),
            None => render_dashboard(frame, body, app),
        },
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " PRESENCE ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.source.label(), Style::default().fg(Color::Cyan)),
    ];
    if app.session.admin.is_admin() {
        spans.push(Span::styled("  🔓 admin", Style::default().fg(Color::Yellow)));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let mut text = app.status_message.clone();
    if let Some(source_status) = app.source.status() {
        text = format!("{}  |  {}", text, source_status);
    }

    let block = Block::default()
        .title("ℹ️ Status")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Screens / الشاشات
// ═══════════════════════════════════════════════════════════════════════════════

/// Home: status on the left, live feed and activity on the right
/// الرئيسية: الحالة يساراً، والبث والنشاط يميناً
fn render_home(frame: &mut Frame, area: Rect, app: &App) {
    let [left, right] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .areas(area);

    status_panel::render(frame, left, app);

    let [feed, activity] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .areas(right);

    charts::render_feed_chart(frame, feed, &app.feed);
    tables::render_activity_table(frame, activity, app.activity_log.recent());
}

fn render_dashboard(frame: &mut Frame, area: Rect, app: &App) {
    let [left, right] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .areas(area);

    status_panel::render(frame, left, app);

    let [panel, activity] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(5)])
        .areas(right);

    let (automation, color) = if app.session.automation_enabled() {
        ("ON", Color::Green)
    } else {
        ("OFF", Color::Red)
    };
    let text = vec![
        Line::from(vec![
            Span::raw("Automation: "),
            Span::styled(automation, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw("Log file: "),
            Span::styled(
                app.activity_log.path().display().to_string(),
                Style::default().fg(Color::Cyan),
            ),
        ]),
        Line::from(vec![
            Span::raw("Timeouts: "),
            Span::styled(
                format!(
                    "warn {:.0}s / off {:.0}s",
                    app.config.controller.warning_after_secs,
                    app.config.controller.shutoff_after_secs
                ),
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    let block = Block::default()
        .title("🛠️ Admin Dashboard")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    frame.render_widget(Paragraph::new(text).block(block), panel);

    tables::render_activity_table(frame, activity, app.activity_log.recent());
}

fn render_summary(frame: &mut Frame, area: Rect, view: &crate::app::SummaryView) {
    let [chart, lines] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .areas(area);

    charts::render_usage_chart(frame, chart, view);

    let text: Vec<Line> = view.lines.iter().map(|l| Line::from(l.as_str())).collect();
    let block = Block::default()
        .title("🧾 Summary")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        lines,
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Popups / النوافذ المنبثقة
// ═══════════════════════════════════════════════════════════════════════════════

fn render_password_popup(frame: &mut Frame, area: Rect, app: &App) {
    let popup = centered_rect(50, 40, area);

    let (title, prompt) = if app.screen == Screen::ChangePassword {
        ("🔑 Change Password", "New password")
    } else {
        ("🔐 Admin Login", "Password")
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(prompt, Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::styled(
                masked(&app.input),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("█", Style::default().fg(Color::Magenta)),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Enter = submit, Esc = cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(text).block(block), popup);
}
