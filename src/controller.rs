// ═══════════════════════════════════════════════════════════════════════════════
// 📦 controller.rs - Presence Controller
// ═══════════════════════════════════════════════════════════════════════════════
// Debounced presence state machine that switches the appliances.
// Features:
// - Any face or motion turns every appliance ON
// - One-time warning after the warning threshold without detection
// - Everything OFF after the shutoff threshold, with duration accounting
// - Emits events instead of touching the UI or the log file
// ═══════════════════════════════════════════════════════════════════════════════

use chrono::{NaiveDateTime, TimeDelta};

use crate::appliance::{
    clamp_non_negative, format_duration, Appliance, ApplianceBank, SessionDurations,
};

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Timing / التوقيت
// ═══════════════════════════════════════════════════════════════════════════════

/// Default seconds without detection before the warning
pub const DEFAULT_WARNING_SECS: f64 = 10.0;

/// Default seconds without detection before everything is switched off
pub const DEFAULT_SHUTOFF_SECS: f64 = 15.0;

/// Debounce window of the controller
/// نافذة التأخير قبل إطفاء الأجهزة
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub warning_after: TimeDelta,
    pub shutoff_after: TimeDelta,
}

impl Timing {
    pub fn from_secs(warning_after: f64, shutoff_after: f64) -> Self {
        Self {
            warning_after: secs_to_delta(warning_after),
            shutoff_after: secs_to_delta(shutoff_after),
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from_secs(DEFAULT_WARNING_SECS, DEFAULT_SHUTOFF_SECS)
    }
}

fn secs_to_delta(secs: f64) -> TimeDelta {
    TimeDelta::milliseconds((secs * 1000.0).round() as i64)
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Detection Sample / عينة الكشف
// ═══════════════════════════════════════════════════════════════════════════════

/// One frame's worth of presence signals
/// إشارات الوجود لإطار واحد
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionSample {
    pub timestamp: NaiveDateTime,
    pub face_present: bool,
    pub motion_present: bool,
}

impl DetectionSample {
    pub fn new(timestamp: NaiveDateTime, face_present: bool, motion_present: bool) -> Self {
        Self {
            timestamp,
            face_present,
            motion_present,
        }
    }

    /// A sample with nothing detected
    pub fn empty(timestamp: NaiveDateTime) -> Self {
        Self::new(timestamp, false, false)
    }

    pub fn detected(&self) -> bool {
        self.face_present || self.motion_present
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Status & Events / الحالة والأحداث
// ═══════════════════════════════════════════════════════════════════════════════

/// Room status after the last evaluated sample
/// حالة الغرفة بعد آخر عينة
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Occupancy {
    /// Nobody seen since start or since the last shutoff
    #[default]
    Searching,
    /// Recent detection, appliances on
    Occupied,
    /// No detection for longer than the warning threshold, appliances still on
    Warning,
    /// Appliances were just switched off
    Unoccupied,
}

impl Occupancy {
    pub fn label(self) -> &'static str {
        match self {
            Occupancy::Searching => "🔍 DETECTING...",
            Occupancy::Occupied => "✅ OCCUPIED",
            Occupancy::Warning => "⚠️ OCCUPIED (idle)",
            Occupancy::Unoccupied => "❌ UNOCCUPIED",
        }
    }
}

/// Something the presentation or persistence layer has to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    TurnedOn {
        appliance: Appliance,
        at: NaiveDateTime,
    },
    TurnedOff {
        appliance: Appliance,
        at: NaiveDateTime,
        duration: TimeDelta,
    },
    /// Appliances will be switched off after `remaining` unless someone shows up
    WarningIssued {
        at: NaiveDateTime,
        remaining: TimeDelta,
    },
}

impl ControllerEvent {
    pub fn at(&self) -> NaiveDateTime {
        match self {
            ControllerEvent::TurnedOn { at, .. }
            | ControllerEvent::TurnedOff { at, .. }
            | ControllerEvent::WarningIssued { at, .. } => *at,
        }
    }

    /// Activity log message for transitions; warnings are not logged
    /// رسالة سجل النشاط للتحولات فقط
    pub fn log_message(&self) -> Option<String> {
        match self {
            ControllerEvent::TurnedOn { appliance, .. } => {
                Some(format!("{} turned ON", appliance))
            }
            ControllerEvent::TurnedOff {
                appliance,
                duration,
                ..
            } => Some(format!(
                "{} turned OFF after {}",
                appliance,
                format_duration(*duration)
            )),
            ControllerEvent::WarningIssued { .. } => None,
        }
    }
}

/// Result of a single controller step
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepOutcome {
    pub status: Occupancy,
    pub events: Vec<ControllerEvent>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Presence Controller / وحدة التحكم بالوجود
// ═══════════════════════════════════════════════════════════════════════════════

/// Presence state machine that owns the appliance states
/// آلة حالة الوجود التي تملك حالات الأجهزة
#[derive(Debug, Clone, Default)]
pub struct PresenceController {
    timing: Timing,
    appliances: ApplianceBank,
    durations: SessionDurations,
    last_detection: Option<NaiveDateTime>,
    warning_shown: bool,
    status: Occupancy,
}

impl PresenceController {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    /// Evaluate one detection sample
    /// تقييم عينة كشف واحدة
    pub fn step(&mut self, sample: &DetectionSample) -> StepOutcome {
        let now = sample.timestamp;
        let mut events = Vec::new();

        if sample.detected() {
            self.last_detection = Some(now);
            self.warning_shown = false;
            self.turn_on_all(now, &mut events);
            self.status = Occupancy::Occupied;
        } else if let Some(last) = self.last_detection {
            let elapsed = clamp_non_negative(now - last);
            self.status = Occupancy::Occupied;

            if elapsed > self.timing.warning_after {
                if !self.warning_shown {
                    self.warning_shown = true;
                    events.push(ControllerEvent::WarningIssued {
                        at: now,
                        remaining: clamp_non_negative(self.timing.shutoff_after - elapsed),
                    });
                }
                self.status = Occupancy::Warning;
            }

            if elapsed > self.timing.shutoff_after {
                self.shut_down(now, &mut events);
                self.status = Occupancy::Unoccupied;
            }
        } else {
            self.status = Occupancy::Searching;
        }

        StepOutcome {
            status: self.status,
            events,
        }
    }

    /// Switch everything off immediately (automation disabled)
    /// إطفاء كل الأجهزة فوراً عند تعطيل الأتمتة
    pub fn force_off(&mut self, now: NaiveDateTime) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        self.shut_down(now, &mut events);
        self.status = Occupancy::Unoccupied;
        events
    }

    pub fn status(&self) -> Occupancy {
        self.status
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    pub fn is_on(&self, appliance: Appliance) -> bool {
        self.appliances.get(appliance).is_on()
    }

    pub fn appliances(&self) -> &ApplianceBank {
        &self.appliances
    }

    pub fn durations(&self) -> &SessionDurations {
        &self.durations
    }

    pub fn last_detection(&self) -> Option<NaiveDateTime> {
        self.last_detection
    }

    pub fn warning_shown(&self) -> bool {
        self.warning_shown
    }

    fn turn_on_all(&mut self, now: NaiveDateTime, events: &mut Vec<ControllerEvent>) {
        for appliance in Appliance::ALL {
            if self.appliances.get_mut(appliance).switch_on(now) {
                events.push(ControllerEvent::TurnedOn { appliance, at: now });
            }
        }
    }

    fn shut_down(&mut self, now: NaiveDateTime, events: &mut Vec<ControllerEvent>) {
        for appliance in Appliance::ALL {
            if let Some(duration) = self.appliances.get_mut(appliance).switch_off(now) {
                self.durations.add(appliance, duration);
                events.push(ControllerEvent::TurnedOff {
                    appliance,
                    at: now,
                    duration,
                });
            }
        }
        self.last_detection = None;
        self.warning_shown = false;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════
