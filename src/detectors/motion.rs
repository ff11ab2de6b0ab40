// ═══════════════════════════════════════════════════════════════════════════════
// 📦 detectors/motion.rs - Motion Detection
// ═══════════════════════════════════════════════════════════════════════════════
// كشف الحركة من قناع طرح الخلفية
// Motion detection from the background-subtraction mask
// ═══════════════════════════════════════════════════════════════════════════════

use super::{RawReading, Thresholds};

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Constants / الثوابت
// ═══════════════════════════════════════════════════════════════════════════════

/// عتبة كشف الحركة - عدد بكسلات المقدمة المطلوب
/// Motion threshold - foreground pixels needed (strictly more than)
pub const DEFAULT_MOTION_PIXELS: u64 = 5000;

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Detection Functions / دوال الكشف
// ═══════════════════════════════════════════════════════════════════════════════

/// Motion is present when the board says so, or when the foreground area
/// exceeds the pixel threshold.
///
/// # Algorithm / الخوارزمية
/// ```text
/// - motion_hint موجود → استخدامه مباشرة
/// - وإلا: foreground_pixels > motion_pixels = حركة
/// ```
pub fn detect_motion(reading: &RawReading, thresholds: &Thresholds) -> bool {
    match reading.motion_hint {
        Some(hint) => hint,
        None => reading.foreground_pixels > thresholds.motion_pixels,
    }
}

/// Fraction of the motion threshold reached, for the live chart (0-100+)
/// نسبة الوصول إلى عتبة الحركة للرسم البياني
pub fn motion_level(reading: &RawReading, thresholds: &Thresholds) -> f64 {
    if thresholds.motion_pixels == 0 {
        return 0.0;
    }
    reading.foreground_pixels as f64 / thresholds.motion_pixels as f64 * 100.0
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════
