// ═══════════════════════════════════════════════════════════════════════════════
// 📦 appliance.rs - Simulated Appliances
// ═══════════════════════════════════════════════════════════════════════════════
// Defines the controllable appliances, their ON/OFF state and the running
// on-duration totals for the current session.
// ═══════════════════════════════════════════════════════════════════════════════

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, TimeDelta};

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Appliance Enum / نوع الجهاز
// ═══════════════════════════════════════════════════════════════════════════════

/// A simulated controllable device
/// جهاز محاكى قابل للتحكم
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Appliance {
    Lights,
    Aircon,
}

impl Appliance {
    /// All appliances in switching order / جميع الأجهزة بترتيب التشغيل
    pub const ALL: [Appliance; 2] = [Appliance::Lights, Appliance::Aircon];

    /// Name used in log messages / الاسم المستخدم في رسائل السجل
    pub fn name(self) -> &'static str {
        match self {
            Appliance::Lights => "LIGHTS",
            Appliance::Aircon => "AIRCON",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Appliance::Lights => "💡",
            Appliance::Aircon => "❄️",
        }
    }

    fn index(self) -> usize {
        match self {
            Appliance::Lights => 0,
            Appliance::Aircon => 1,
        }
    }
}

impl fmt::Display for Appliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Appliance {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LIGHTS" => Ok(Appliance::Lights),
            "AIRCON" => Ok(Appliance::Aircon),
            _ => Err(()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Appliance State / حالة الجهاز
// ═══════════════════════════════════════════════════════════════════════════════

/// ON/OFF state of one appliance.
///
/// The appliance is on exactly when `on_since` holds a timestamp, so the two
/// can never disagree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplianceState {
    on_since: Option<NaiveDateTime>,
}

impl ApplianceState {
    pub fn is_on(&self) -> bool {
        self.on_since.is_some()
    }

    pub fn on_since(&self) -> Option<NaiveDateTime> {
        self.on_since
    }

    /// Switch on at `now`. Returns false if it was already on.
    pub(crate) fn switch_on(&mut self, now: NaiveDateTime) -> bool {
        if self.on_since.is_some() {
            return false;
        }
        self.on_since = Some(now);
        true
    }

    /// Switch off at `now`, returning how long it was on.
    pub(crate) fn switch_off(&mut self, now: NaiveDateTime) -> Option<TimeDelta> {
        self.on_since
            .take()
            .map(|since| clamp_non_negative(now - since))
    }
}

/// State for every appliance, indexed by [`Appliance`]
#[derive(Debug, Clone, Default)]
pub struct ApplianceBank {
    states: [ApplianceState; 2],
}

impl ApplianceBank {
    pub fn get(&self, appliance: Appliance) -> &ApplianceState {
        &self.states[appliance.index()]
    }

    pub(crate) fn get_mut(&mut self, appliance: Appliance) -> &mut ApplianceState {
        &mut self.states[appliance.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Appliance, &ApplianceState)> + '_ {
        Appliance::ALL.iter().map(move |&a| (a, self.get(a)))
    }

    pub fn all_on(&self) -> bool {
        self.states.iter().all(ApplianceState::is_on)
    }

    pub fn any_on(&self) -> bool {
        self.states.iter().any(ApplianceState::is_on)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Session Durations / مدد التشغيل للجلسة
// ═══════════════════════════════════════════════════════════════════════════════

/// Cumulative on-time per appliance for the running session
/// إجمالي مدة التشغيل لكل جهاز خلال الجلسة الحالية
#[derive(Debug, Clone)]
pub struct SessionDurations {
    totals: [TimeDelta; 2],
}

impl Default for SessionDurations {
    fn default() -> Self {
        Self {
            totals: [TimeDelta::zero(); 2],
        }
    }
}

impl SessionDurations {
    pub(crate) fn add(&mut self, appliance: Appliance, duration: TimeDelta) {
        let slot = &mut self.totals[appliance.index()];
        *slot = *slot + duration;
    }

    pub fn total(&self, appliance: Appliance) -> TimeDelta {
        self.totals[appliance.index()]
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Helper Functions / دوال مساعدة
// ═══════════════════════════════════════════════════════════════════════════════

pub(crate) fn clamp_non_negative(delta: TimeDelta) -> TimeDelta {
    delta.max(TimeDelta::zero())
}

/// Format a duration as `H:MM:SS` (whole seconds)
/// تنسيق المدة بصيغة ساعات:دقائق:ثواني
pub fn format_duration(duration: TimeDelta) -> String {
    let secs = clamp_non_negative(duration).num_seconds();
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Format a duration as `H hr M min S sec` for the usage summary
pub fn format_duration_long(duration: TimeDelta) -> String {
    let secs = clamp_non_negative(duration).num_seconds();
    format!(
        "{} hr {} min {} sec",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(secs: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
            + TimeDelta::seconds(secs as i64)
    }

    #[test]
    fn test_switch_on_off_tracks_duration() {
        let mut state = ApplianceState::default();
        assert!(state.switch_on(at(0)));
        assert!(!state.switch_on(at(5)));
        assert_eq!(state.on_since(), Some(at(0)));

        let duration = state.switch_off(at(42)).unwrap();
        assert_eq!(duration.num_seconds(), 42);
        assert!(!state.is_on());
        assert!(state.switch_off(at(50)).is_none());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(TimeDelta::seconds(16)), "0:00:16");
        assert_eq!(format_duration(TimeDelta::seconds(3725)), "1:02:05");
        assert_eq!(format_duration(TimeDelta::seconds(-3)), "0:00:00");
        assert_eq!(format_duration_long(TimeDelta::seconds(3725)), "1 hr 2 min 5 sec");
    }

    #[test]
    fn test_appliance_names_round_trip() {
        for appliance in Appliance::ALL {
            assert_eq!(appliance.name().parse::<Appliance>(), Ok(appliance));
        }
        assert!("TOASTER".parse::<Appliance>().is_err());
    }
}
