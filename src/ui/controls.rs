// ═══════════════════════════════════════════════════════════════════════════════
// 📦 ui/controls.rs - Keyboard Controls Display
// ═══════════════════════════════════════════════════════════════════════════════
// Displays available keyboard shortcuts based on the current screen
// ═══════════════════════════════════════════════════════════════════════════════

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::Screen;

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Controls Help Box / مربع مساعدة التحكم
// ═══════════════════════════════════════════════════════════════════════════════

/// Render controls help box
/// رسم مربع مساعدة التحكم
pub fn render(frame: &mut Frame, area: Rect, screen: Screen, manual: bool) {
    let mut text = screen_controls(screen);
    if manual && !screen.takes_text() {
        text.push(key_line("F / M", " Face / Motion", Color::Cyan));
    }

    let block = Block::default()
        .title("⌨️ Controls")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}

/// Key hints for one screen / أزرار كل شاشة
pub fn screen_controls(screen: Screen) -> Vec<Line<'static>> {
    match screen {
        Screen::Home => vec![
            key_line("A", " Admin login", Color::Green),
            key_line("Q/Esc", " Quit", Color::Red),
        ],
        Screen::AdminLogin | Screen::ChangePassword => vec![
            key_line("Enter", " Submit", Color::Green),
            key_line("Esc", " Cancel", Color::Red),
        ],
        Screen::Dashboard => vec![
            key_line("T", " Toggle automation", Color::Green),
            key_line("L", " View logs", Color::Cyan),
            key_line("S", " Usage summary", Color::Cyan),
            key_line("E", " Export logs", Color::Yellow),
            key_line("O/H", " Logout", Color::Magenta),
            key_line("Q", " Quit", Color::Red),
        ],
        Screen::LogViewer => vec![
            key_line("↑↓", " Select date", Color::Cyan),
            key_line("Enter", " Expand/Collapse", Color::Green),
            key_line("E", " Export day", Color::Yellow),
            key_line("A", " Export all", Color::Yellow),
            key_line("B/Esc", " Back", Color::Magenta),
        ],
        Screen::Summary => vec![
            key_line("B/Esc", " Back", Color::Magenta),
            key_line("H", " Home", Color::Magenta),
        ],
    }
}

fn key_line(key: &'static str, label: &'static str, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(label),
    ])
}
