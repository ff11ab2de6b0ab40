// ═══════════════════════════════════════════════════════════════════════════════
// 📦 ui/helpers.rs - Helper Functions
// ═══════════════════════════════════════════════════════════════════════════════
// Contains: popup placement, password masking, on/off styling
// ═══════════════════════════════════════════════════════════════════════════════

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
};

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Helper Functions / دوال مساعدة
// ═══════════════════════════════════════════════════════════════════════════════

/// Create a centered rect with given percentage of parent area
/// إنشاء مستطيل في المنتصف بنسبة معينة من المنطقة الأصل
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let [_, middle, _] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .areas(r);

    let [_, center, _] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .areas(middle);

    center
}

/// One `*` per typed character / نجمة لكل حرف
pub fn masked(input: &str) -> String {
    "*".repeat(input.chars().count())
}

/// Green bold for ON, dark gray for OFF
pub fn on_off_style(on: bool) -> Style {
    if on {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(50, 40, outer);
        assert_eq!(inner.width, 50);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 25);
    }

    #[test]
    fn test_masked_counts_chars() {
        assert_eq!(masked("pässwörd"), "********");
        assert_eq!(masked(""), "");
    }
}
