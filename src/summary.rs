// ═══════════════════════════════════════════════════════════════════════════════
// 📦 summary.rs - Daily Usage Summary
// ═══════════════════════════════════════════════════════════════════════════════
// Rebuilds per-day, per-appliance usage by replaying ON/OFF pairs from the
// activity log. The log is the source of truth for history; an OFF row is
// credited to the date it was written on.
// ═══════════════════════════════════════════════════════════════════════════════

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use regex::Regex;

use crate::activity_log::LogEntry;
use crate::appliance::{clamp_non_negative, format_duration_long, Appliance};

/// Number of days shown by default / عدد الأيام المعروضة افتراضياً
pub const DEFAULT_SUMMARY_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    On,
    Off,
}

fn transition_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\s*(\S+) turned (ON|OFF)\b").expect("Failed to compile regex")
    })
}

/// Extract the appliance and direction from a log message
/// استخراج الجهاز واتجاه التحول من رسالة السجل
fn parse_transition(message: &str) -> Option<(Appliance, Transition)> {
    let caps = transition_regex().captures(message)?;
    let appliance = caps[1].parse::<Appliance>().ok()?;
    let transition = if &caps[2] == "ON" {
        Transition::On
    } else {
        Transition::Off
    };
    Some((appliance, transition))
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Usage Summary / ملخص الاستخدام
// ═══════════════════════════════════════════════════════════════════════════════

/// Total on-time per day and appliance
/// إجمالي مدة التشغيل لكل يوم ولكل جهاز
#[derive(Debug, Clone, Default)]
pub struct UsageSummary {
    days: BTreeMap<NaiveDate, BTreeMap<Appliance, TimeDelta>>,
}

impl UsageSummary {
    /// Replay log entries (file order) into daily totals.
    ///
    /// An OFF without a preceding ON is ignored; a second ON replaces the
    /// pending start.
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut ongoing: HashMap<Appliance, NaiveDateTime> = HashMap::new();
        let mut days: BTreeMap<NaiveDate, BTreeMap<Appliance, TimeDelta>> = BTreeMap::new();

        for entry in entries {
            let Some((appliance, transition)) = parse_transition(&entry.message) else {
                continue;
            };
            match transition {
                Transition::On => {
                    ongoing.insert(appliance, entry.timestamp());
                }
                Transition::Off => {
                    if let Some(start) = ongoing.remove(&appliance) {
                        let duration = clamp_non_negative(entry.timestamp() - start);
                        let slot = days
                            .entry(entry.date)
                            .or_default()
                            .entry(appliance)
                            .or_insert_with(TimeDelta::zero);
                        *slot = *slot + duration;
                    }
                }
            }
        }

        Self { days }
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// The latest `count` days that have data, oldest first
    /// آخر أيام تحتوي على بيانات، من الأقدم للأحدث
    pub fn recent_days(&self, count: usize) -> Vec<NaiveDate> {
        let skip = self.days.len().saturating_sub(count);
        self.days.keys().skip(skip).copied().collect()
    }

    /// Appliances that appear anywhere in the summary
    pub fn appliances(&self) -> Vec<Appliance> {
        self.days
            .values()
            .flat_map(|day| day.keys().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn total(&self, day: NaiveDate, appliance: Appliance) -> TimeDelta {
        self.days
            .get(&day)
            .and_then(|d| d.get(&appliance))
            .copied()
            .unwrap_or_else(TimeDelta::zero)
    }

    /// Usage in minutes, the unit the chart is drawn in
    pub fn minutes(&self, day: NaiveDate, appliance: Appliance) -> f64 {
        self.total(day, appliance).num_milliseconds() as f64 / 60_000.0
    }

    /// Text summary for the given days, skipping zero usage
    /// ملخص نصي للأيام المحددة
    pub fn summary_lines(&self, days: &[NaiveDate]) -> Vec<String> {
        let appliances = self.appliances();
        let mut lines = Vec::new();

        for &day in days {
            lines.push(format!("{}:", day.format("%Y-%m-%d")));
            for &appliance in &appliances {
                let usage = self.total(day, appliance);
                if usage > TimeDelta::zero() {
                    lines.push(format!(
                        "  • {} ON for {}",
                        appliance,
                        format_duration_long(usage)
                    ));
                }
            }
        }

        lines
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u32, h: u32, m: u32, s: u32, message: &str) -> LogEntry {
        let at = NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap();
        LogEntry::new(at, message)
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_parse_transition() {
        assert_eq!(
            parse_transition("LIGHTS turned ON"),
            Some((Appliance::Lights, Transition::On))
        );
        assert_eq!(
            parse_transition("AIRCON turned OFF after 0:00:16"),
            Some((Appliance::Aircon, Transition::Off))
        );
        assert_eq!(parse_transition("FAN turned ON"), None);
        assert_eq!(parse_transition("nothing here"), None);
    }

    #[test]
    fn test_pairs_accumulate_per_day() {
        let entries = vec![
            entry(1, 8, 0, 0, "LIGHTS turned ON"),
            entry(1, 8, 0, 0, "AIRCON turned ON"),
            entry(1, 8, 10, 0, "LIGHTS turned OFF after 0:10:00"),
            entry(1, 8, 10, 0, "AIRCON turned OFF after 0:10:00"),
            entry(1, 9, 0, 0, "LIGHTS turned ON"),
            entry(1, 9, 5, 30, "LIGHTS turned OFF after 0:05:30"),
            entry(2, 7, 0, 0, "AIRCON turned OFF after 9:99:99"),
        ];

        let summary = UsageSummary::from_entries(&entries);
        assert_eq!(summary.total(day(1), Appliance::Lights), TimeDelta::seconds(930));
        assert_eq!(summary.total(day(1), Appliance::Aircon), TimeDelta::seconds(600));
        assert!((summary.minutes(day(1), Appliance::Aircon) - 10.0).abs() < 1e-9);
        // Unmatched OFF is ignored / يتم تجاهل الإطفاء بدون تشغيل
        assert_eq!(summary.total(day(2), Appliance::Aircon), TimeDelta::zero());
        assert_eq!(summary.recent_days(7), vec![day(1)]);
    }

    #[test]
    fn test_overnight_pair_credited_to_off_day() {
        let entries = vec![
            entry(1, 23, 59, 0, "LIGHTS turned ON"),
            entry(2, 0, 1, 0, "LIGHTS turned OFF after 0:02:00"),
        ];
        let summary = UsageSummary::from_entries(&entries);
        assert_eq!(summary.total(day(2), Appliance::Lights), TimeDelta::seconds(120));
        assert_eq!(summary.total(day(1), Appliance::Lights), TimeDelta::zero());
    }

    #[test]
    fn test_recent_days_keeps_latest() {
        let mut entries = Vec::new();
        for d in 1..=9 {
            entries.push(entry(d, 8, 0, 0, "LIGHTS turned ON"));
            entries.push(entry(d, 8, 1, 0, "LIGHTS turned OFF after 0:01:00"));
        }
        let summary = UsageSummary::from_entries(&entries);
        let days = summary.recent_days(DEFAULT_SUMMARY_DAYS);
        assert_eq!(days.len(), 7);
        assert_eq!(days.first(), Some(&day(3)));
        assert_eq!(days.last(), Some(&day(9)));
    }

    #[test]
    fn test_summary_lines() {
        let entries = vec![
            entry(1, 8, 0, 0, "LIGHTS turned ON"),
            entry(1, 9, 2, 3, "LIGHTS turned OFF after 1:02:03"),
        ];
        let summary = UsageSummary::from_entries(&entries);
        assert_eq!(
            summary.summary_lines(&[day(1)]),
            vec!["2024-05-01:", "  • LIGHTS ON for 1 hr 2 min 3 sec"]
        );
    }
}
