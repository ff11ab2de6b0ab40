// ═══════════════════════════════════════════════════════════════════════════════
// 📦 sources/manual.rs - Keyboard Simulation
// ═══════════════════════════════════════════════════════════════════════════════
// محاكاة الكشف من لوحة المفاتيح: f = وجه، m = حركة
// ═══════════════════════════════════════════════════════════════════════════════

use crate::detectors::RawReading;

/// Face/motion flags armed by key presses, consumed by the next tick
#[derive(Debug, Clone, Default)]
pub struct ManualSource {
    face: bool,
    motion: bool,
}

impl ManualSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press_face(&mut self) {
        self.face = true;
    }

    pub fn press_motion(&mut self) {
        self.motion = true;
    }

    /// Build this tick's reading and clear the flags.
    /// Without a key press the reading is empty.
    pub fn take_reading(&mut self) -> RawReading {
        let reading = RawReading {
            faces: u32::from(self.face),
            foreground_pixels: 0,
            motion_hint: Some(self.motion),
        };
        self.face = false;
        self.motion = false;
        reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{quick_detect, Thresholds};
    use chrono::NaiveDate;

    #[test]
    fn test_flags_last_one_tick() {
        let mut manual = ManualSource::new();
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        manual.press_motion();
        let sample = quick_detect(&manual.take_reading(), &Thresholds::default(), at);
        assert!(sample.motion_present);
        assert!(!sample.face_present);

        let sample = quick_detect(&manual.take_reading(), &Thresholds::default(), at);
        assert!(!sample.detected());
    }
}
