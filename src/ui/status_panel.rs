// ═══════════════════════════════════════════════════════════════════════════════
// 📦 ui/status_panel.rs - Status Panel Components
// ═══════════════════════════════════════════════════════════════════════════════
// Contains: Appliances, Room status, Idle countdown, Session durations, Controls
// ═══════════════════════════════════════════════════════════════════════════════

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use presence_tui::appliance::format_duration;
use presence_tui::{Appliance, Occupancy};

use super::{controls, helpers::on_off_style};
use crate::app::App;

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Main Status Panel / لوحة الحالة الرئيسية
// ═══════════════════════════════════════════════════════════════════════════════

/// Render the left status panel
/// رسم لوحة الحالة اليسرى
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Appliances / الأجهزة
            Constraint::Length(6), // Room status / حالة الغرفة
            Constraint::Length(3), // Idle countdown / العد التنازلي
            Constraint::Length(4), // Session durations / مدد الجلسة
            Constraint::Min(5),    // Controls / التحكم
        ])
        .split(area);

    render_appliances(frame, chunks[0], app);
    render_room_status(frame, chunks[1], app);
    render_idle_gauge(frame, chunks[2], app);
    render_durations(frame, chunks[3], app);
    controls::render(frame, chunks[4], app.screen, app.source.is_manual());
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Appliances / الأجهزة
// ═══════════════════════════════════════════════════════════════════════════════

fn render_appliances(frame: &mut Frame, area: Rect, app: &App) {
    let text: Vec<Line> = Appliance::ALL
        .iter()
        .map(|&appliance| {
            let state = app.controller.appliances().get(appliance);
            let mut spans = vec![
                Span::raw(format!("{} {:<7}", appliance.icon(), appliance.name())),
                Span::styled(
                    if state.is_on() { "● ON " } else { "○ OFF" },
                    on_off_style(state.is_on()),
                ),
            ];
            if let Some(since) = state.on_since() {
                spans.push(Span::styled(
                    format!("  since {}", since.format("%H:%M:%S")),
                    Style::default().fg(Color::Gray),
                ));
            }
            Line::from(spans)
        })
        .collect();

    let block = Block::default()
        .title("🔌 Appliances")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Room Status / حالة الغرفة
// ═══════════════════════════════════════════════════════════════════════════════

fn render_room_status(frame: &mut Frame, area: Rect, app: &App) {
    let (label, color) = if app.session.automation_enabled() {
        let status = app.controller.status();
        let color = match status {
            Occupancy::Searching => Color::Gray,
            Occupancy::Occupied => Color::Green,
            Occupancy::Warning => Color::Yellow,
            Occupancy::Unoccupied => Color::Red,
        };
        (status.label(), color)
    } else {
        ("⏸️ AUTOMATION OFF", Color::DarkGray)
    };

    let mut text = vec![Line::from(Span::styled(
        label,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))];

    if let Some(sample) = app.last_sample {
        text.push(Line::from(vec![
            Span::raw("Face: "),
            Span::styled(
                if sample.face_present { "yes" } else { "no" },
                on_off_style(sample.face_present),
            ),
            Span::raw("  Motion: "),
            Span::styled(
                if sample.motion_present { "yes" } else { "no" },
                on_off_style(sample.motion_present),
            ),
        ]));
    }

    if let Some(warning) = &app.warning_message {
        text.push(Line::from(Span::styled(
            warning.as_str(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }

    let block = Block::default()
        .title("🏠 Room")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    frame.render_widget(Paragraph::new(text).block(block), area);
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Idle Countdown / العد التنازلي للخمول
// ═══════════════════════════════════════════════════════════════════════════════

/// Time since the last detection against the shutoff threshold
/// الوقت منذ آخر كشف مقارنة بعتبة الإيقاف
fn render_idle_gauge(frame: &mut Frame, area: Rect, app: &App) {
    let shutoff = app.controller.timing().shutoff_after;
    let idle = match (app.controller.last_detection(), app.last_sample) {
        (Some(last), Some(sample)) => Some(sample.timestamp - last),
        _ => None,
    };

    let block = Block::default().title("⏱️ Idle").borders(Borders::ALL);

    match idle {
        Some(idle) if shutoff.num_milliseconds() > 0 => {
            let ratio = (idle.num_milliseconds() as f64 / shutoff.num_milliseconds() as f64)
                .clamp(0.0, 1.0);
            let color = if ratio * shutoff.num_milliseconds() as f64
                > app.controller.timing().warning_after.num_milliseconds() as f64
            {
                Color::Yellow
            } else {
                Color::Green
            };
            let gauge = Gauge::default()
                .block(block.border_style(Style::default().fg(color)))
                .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
                .ratio(ratio)
                .label(format!(
                    "{:.1}s / {:.0}s",
                    idle.num_milliseconds().max(0) as f64 / 1000.0,
                    shutoff.num_milliseconds() as f64 / 1000.0
                ));
            frame.render_widget(gauge, area);
        }
        _ => {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "No one seen yet",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block.border_style(Style::default().fg(Color::DarkGray)));
            frame.render_widget(paragraph, area);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Session Durations / مدد الجلسة
// ═══════════════════════════════════════════════════════════════════════════════

fn render_durations(frame: &mut Frame, area: Rect, app: &App) {
    let text: Vec<Line> = Appliance::ALL
        .iter()
        .map(|&appliance| {
            Line::from(vec![
                Span::raw(format!("{:<7} ", appliance.name())),
                Span::styled(
                    format_duration(app.controller.durations().total(appliance)),
                    Style::default().fg(Color::Yellow),
                ),
            ])
        })
        .collect();

    let block = Block::default()
        .title("📊 This session")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue));

    frame.render_widget(Paragraph::new(text).block(block), area);
}
