// ═══════════════════════════════════════════════════════════════════════════════
// 📦 ui/tables.rs - Activity Tables
// ═══════════════════════════════════════════════════════════════════════════════
// Contains: Live activity table, Log viewer grouped by date
// ═══════════════════════════════════════════════════════════════════════════════

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Row, Table},
    Frame,
};

use presence_tui::LogEntry;

use crate::app::{LogRow, LogView};

fn message_style(message: &str) -> Style {
    if message.contains("turned ON") {
        Style::default().fg(Color::Green)
    } else if message.contains("turned OFF") {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Live Activity / النشاط المباشر
// ═══════════════════════════════════════════════════════════════════════════════

/// Transitions recorded this session, newest at the bottom
/// التحولات المسجلة في هذه الجلسة
pub fn render_activity_table(frame: &mut Frame, area: Rect, entries: &[LogEntry]) {
    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            Row::new(vec![
                Span::raw(entry.time_string()),
                Span::styled(entry.message.clone(), message_style(&entry.message)),
            ])
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(10), Constraint::Min(20)])
        .header(
            Row::new(vec!["Time", "Activity"])
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        )
        .block(
            Block::default()
                .title("📝 Activity")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue)),
        );

    frame.render_widget(table, area);
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Log Viewer / عارض السجل
// ═══════════════════════════════════════════════════════════════════════════════

/// Dates newest first; expanded dates list their entries
/// التواريخ من الأحدث، والمفتوحة تعرض إدخالاتها
pub fn render_log_viewer(frame: &mut Frame, area: Rect, view: &LogView) {
    let items: Vec<ListItem> = view
        .rows()
        .into_iter()
        .map(|row| match row {
            LogRow::Date {
                date,
                count,
                expanded,
                ..
            } => ListItem::new(Line::from(vec![
                Span::raw(if expanded { "▼ " } else { "▶ " }),
                Span::styled(
                    date.format("%Y-%m-%d").to_string(),
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("  ({} entries)", count), Style::default().fg(Color::Gray)),
            ])),
            LogRow::Entry(entry) => ListItem::new(Line::from(vec![
                Span::raw("    "),
                Span::styled(entry.time_string(), Style::default().fg(Color::Gray)),
                Span::raw("  "),
                Span::styled(entry.message.clone(), message_style(&entry.message)),
            ])),
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title("📜 Appliance Logs")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default().with_selected((!view.is_empty()).then(|| view.selected_row()));
    frame.render_stateful_widget(list, area, &mut state);
}
