// ═══════════════════════════════════════════════════════════════════════════════
// 📦 detectors/face.rs - Face Presence
// ═══════════════════════════════════════════════════════════════════════════════
// كشف وجود الوجوه من عدد الوجوه المبلغ عنه
// Face presence from the reported face count
// ═══════════════════════════════════════════════════════════════════════════════

use super::{RawReading, Thresholds};

/// الحد الأدنى لعدد الوجوه
/// Minimum face count for presence
pub const DEFAULT_MIN_FACES: u32 = 1;

/// True when the cascade found at least `min_faces` faces
pub fn detect_face(reading: &RawReading, thresholds: &Thresholds) -> bool {
    reading.faces >= thresholds.min_faces.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_threshold() {
        let thresholds = Thresholds::default();
        let mut reading = RawReading::default();
        assert!(!detect_face(&reading, &thresholds));

        reading.faces = 1;
        assert!(detect_face(&reading, &thresholds));
    }

    #[test]
    fn test_zero_min_faces_still_needs_a_face() {
        let thresholds = Thresholds {
            min_faces: 0,
            ..Thresholds::default()
        };
        assert!(!detect_face(&RawReading::default(), &thresholds));
    }
}
