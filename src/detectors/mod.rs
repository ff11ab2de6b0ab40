// ═══════════════════════════════════════════════════════════════════════════════
// 📦 detectors/mod.rs - Presence Detection Module
// ═══════════════════════════════════════════════════════════════════════════════
// كشف الوجود من خرج كاشف الكاميرا (الوجوه والحركة)
// Presence detection from the camera detector output (faces and motion)
// ═══════════════════════════════════════════════════════════════════════════════

pub mod face;
pub mod motion;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::controller::DetectionSample;

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Structures / الهياكل
// ═══════════════════════════════════════════════════════════════════════════════

/// What the camera detector reported for one frame
/// ما أبلغ عنه كاشف الكاميرا لإطار واحد
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawReading {
    /// Number of faces found by the cascade / عدد الوجوه المكتشفة
    pub faces: u32,

    /// Foreground-mask pixels counted by the board / عدد بكسلات المقدمة
    pub foreground_pixels: u64,

    /// Explicit motion flag, when the board decides motion itself
    /// علامة حركة صريحة إذا قررت اللوحة ذلك بنفسها
    pub motion_hint: Option<bool>,
}

/// Thresholds that turn a reading into presence booleans
/// العتبات التي تحول القراءة إلى قيم وجود
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Minimum faces for "face present"
    pub min_faces: u32,

    /// Foreground pixels needed for "motion present" (strictly more than)
    pub motion_pixels: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_faces: face::DEFAULT_MIN_FACES,
            motion_pixels: motion::DEFAULT_MOTION_PIXELS,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Main Detection Function / دالة الكشف الرئيسية
// ═══════════════════════════════════════════════════════════════════════════════

/// Turn one reading into a detection sample
/// تحويل قراءة واحدة إلى عينة كشف
pub fn quick_detect(
    reading: &RawReading,
    thresholds: &Thresholds,
    timestamp: NaiveDateTime,
) -> DetectionSample {
    DetectionSample::new(
        timestamp,
        face::detect_face(reading, thresholds),
        motion::detect_motion(reading, thresholds),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════
