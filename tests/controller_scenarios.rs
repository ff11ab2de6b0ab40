// ═══════════════════════════════════════════════════════════════════════════════
// 📦 tests/controller_scenarios.rs - End-to-end Scenarios
// ═══════════════════════════════════════════════════════════════════════════════
// Detector lines → detection → controller → CSV log → summary
// ═══════════════════════════════════════════════════════════════════════════════

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use presence_tui::activity_log::{export, group_by_date, read_entries};
use presence_tui::parser::DetectorParser;
use presence_tui::{
    quick_detect, ActivityLog, Appliance, DetectionSample, Occupancy, PresenceController,
    Thresholds, Timing, UsageSummary,
};

fn at(day: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, day)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

/// Feed a sample and write every transition to the log
fn feed(controller: &mut PresenceController, log: &mut ActivityLog, sample: DetectionSample) -> Occupancy {
    let outcome = controller.step(&sample);
    for event in &outcome.events {
        if let Some(message) = event.log_message() {
            log.record(event.at(), message).unwrap();
        }
    }
    outcome.status
}

#[test]
fn test_detector_lines_drive_the_log() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = ActivityLog::new(dir.path().join("appliance_logs.csv"), 50);
    let mut controller = PresenceController::new(Timing::default());
    let parser = DetectorParser::new();
    let thresholds = Thresholds::default();

    let script = [
        (0, "faces=1 fg=120"),
        (12, "faces=0 fg=300"),
        (16, "faces=0 fg=4999"),
    ];

    let mut statuses = Vec::new();
    for (secs, line) in script {
        let reading = parser.parse(line).unwrap();
        let sample = quick_detect(&reading, &thresholds, at(1, 9, 0, secs));
        statuses.push(feed(&mut controller, &mut log, sample));
    }

    assert_eq!(
        statuses,
        vec![Occupancy::Occupied, Occupancy::Warning, Occupancy::Unoccupied]
    );
    assert!(controller.last_detection().is_none());

    let messages: Vec<String> = read_entries(log.path())
        .unwrap()
        .into_iter()
        .map(|e| e.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "LIGHTS turned ON",
            "AIRCON turned ON",
            "LIGHTS turned OFF after 0:00:16",
            "AIRCON turned OFF after 0:00:16",
        ]
    );
}

#[test]
fn test_summary_agrees_with_session_totals() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = ActivityLog::new(dir.path().join("appliance_logs.csv"), 50);
    let mut controller = PresenceController::new(Timing::default());

    // Two occupancy episodes on day 1, one on day 2
    // نوبتان في اليوم الأول وواحدة في الثاني
    let episodes = [
        (at(1, 8, 0, 0), at(1, 8, 30, 0)),
        (at(1, 20, 0, 0), at(1, 21, 15, 0)),
        (at(2, 7, 0, 0), at(2, 7, 10, 0)),
    ];

    for (start, last_seen) in episodes {
        let mut t = start;
        while t <= last_seen {
            feed(&mut controller, &mut log, DetectionSample::new(t, true, false));
            t += TimeDelta::seconds(5);
        }
        feed(
            &mut controller,
            &mut log,
            DetectionSample::empty(last_seen + TimeDelta::seconds(20)),
        );
        assert!(!controller.appliances().any_on());
    }

    let entries = read_entries(log.path()).unwrap();
    assert_eq!(entries.len(), 12);

    let grouped = group_by_date(&entries);
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped[&NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()].len(), 8);

    let summary = UsageSummary::from_entries(&entries);
    let days = summary.recent_days(7);
    assert_eq!(days.len(), 2);

    for appliance in Appliance::ALL {
        let from_log: TimeDelta = days
            .iter()
            .map(|&d| summary.total(d, appliance))
            .fold(TimeDelta::zero(), |acc, d| acc + d);
        assert_eq!(from_log, controller.durations().total(appliance));
    }

    // 30m20s + 1h15m20s on day 1 / اليوم الأول
    assert_eq!(
        summary.total(days[0], Appliance::Lights),
        TimeDelta::seconds(30 * 60 + 20 + 75 * 60 + 20)
    );
}

#[test]
fn test_export_one_day() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = ActivityLog::new(dir.path().join("appliance_logs.csv"), 50);
    let mut controller = PresenceController::new(Timing::default());

    feed(&mut controller, &mut log, DetectionSample::new(at(3, 23, 59, 50), false, true));
    feed(&mut controller, &mut log, DetectionSample::empty(at(4, 0, 0, 10)));

    let dest = dir.path().join("export.csv");
    let day = NaiveDate::from_ymd_opt(2024, 5, 4).unwrap();
    assert_eq!(export(log.path(), &dest, Some(day)).unwrap(), 2);

    let exported = read_entries(&dest).unwrap();
    assert!(exported.iter().all(|e| e.date == day));
    assert_eq!(exported[0].message, "LIGHTS turned OFF after 0:00:20");
}
