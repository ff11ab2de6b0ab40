// ═══════════════════════════════════════════════════════════════════════════════
// 📦 ui/charts.rs - Chart Components
// ═══════════════════════════════════════════════════════════════════════════════
// Contains: Live detection feed chart, Daily usage bar chart
// ═══════════════════════════════════════════════════════════════════════════════

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use presence_tui::Appliance;

use crate::app::{FeedHistory, SummaryView};

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Constants / الثوابت
// ═══════════════════════════════════════════════════════════════════════════════

/// Y-axis range for the feed chart (% of motion threshold)
/// نطاق المحور الصادي (نسبة من عتبة الحركة)
const Y_AXIS_MAX: f64 = 200.0;

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Detection Feed Chart / رسم بياني الكشف المباشر
// ═══════════════════════════════════════════════════════════════════════════════

/// Motion level and face presence over the last samples; the dashed line at
/// 100 is the motion threshold.
/// مستوى الحركة ووجود الوجوه عبر آخر العينات
pub fn render_feed_chart(frame: &mut Frame, area: Rect, feed: &FeedHistory) {
    let samples = feed.capacity() as f64;

    let motion_data: Vec<(f64, f64)> = feed
        .motion_points()
        .into_iter()
        .map(|(x, y)| (x, y.min(Y_AXIS_MAX)))
        .collect();
    let face_data = feed.face_points();
    let threshold_data = [(0.0, 100.0), (samples, 100.0)];

    let datasets = vec![
        Dataset::default()
            .name("🔴 Motion %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&motion_data),
        Dataset::default()
            .name("🟢 Face")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&face_data),
        Dataset::default()
            .name("Threshold")
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::DarkGray))
            .data(&threshold_data),
    ];

    let x_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{}", feed.capacity() / 2)),
        Span::raw(format!("{}", feed.capacity())),
    ];

    let y_labels = vec![
        Span::raw("0"),
        Span::raw("100"),
        Span::raw(format!("{:.0}", Y_AXIS_MAX)),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title("📷 Live Detection Feed")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .x_axis(
            Axis::default()
                .title("Sample")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, samples])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Level")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, Y_AXIS_MAX])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Usage Bar Chart / رسم أعمدة الاستخدام
// ═══════════════════════════════════════════════════════════════════════════════

fn appliance_color(appliance: Appliance) -> Color {
    match appliance {
        Appliance::Lights => Color::Yellow,
        Appliance::Aircon => Color::Cyan,
    }
}

/// One group per day, one bar per appliance, in minutes
/// مجموعة لكل يوم، وعمود لكل جهاز بالدقائق
pub fn render_usage_chart(frame: &mut Frame, area: Rect, view: &SummaryView) {
    let appliances = view.summary.appliances();

    let legend: Vec<Span> = appliances
        .iter()
        .map(|&a| {
            Span::styled(
                format!(" ■ {} ", a.name()),
                Style::default().fg(appliance_color(a)),
            )
        })
        .collect();

    let mut chart = BarChart::default()
        .block(
            Block::default()
                .title(Line::from(
                    [vec![Span::raw("📊 Daily usage (minutes) ")], legend].concat(),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .bar_width(5)
        .bar_gap(1)
        .group_gap(3)
        .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD));

    for &day in &view.days {
        let bars: Vec<Bar> = appliances
            .iter()
            .map(|&appliance| {
                let minutes = view.summary.minutes(day, appliance);
                Bar::default()
                    .value(minutes.round() as u64)
                    .text_value(format!("{:.0}", minutes))
                    .style(Style::default().fg(appliance_color(appliance)))
            })
            .collect();

        chart = chart.data(
            BarGroup::default()
                .label(Line::from(day.format("%m-%d").to_string()))
                .bars(&bars),
        );
    }

    frame.render_widget(chart, area);
}
