// ═══════════════════════════════════════════════════════════════════════════════
// 📦 sources/recorder.rs - Reading Recorder
// ═══════════════════════════════════════════════════════════════════════════════
// This module saves live detector readings to CSV so they can be replayed.
// Features:
// - Same `timestamp_ms,faces,fg_pixels,motion` layout the replay source reads
// - Auto-generated file name when none is given
// - Flushes on drop
// ═══════════════════════════════════════════════════════════════════════════════

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::detectors::RawReading;
use crate::error::Result;

/// Header row of a recording / ترويسة ملف التسجيل
pub const RECORDING_HEADER: [&str; 4] = ["timestamp_ms", "faces", "fg_pixels", "motion"];

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Recorder Structure / هيكل المسجل
// ═══════════════════════════════════════════════════════════════════════════════

/// CSV writer for detector readings
/// مسجل CSV لقراءات الكاشف
pub struct ReadingRecorder {
    writer: csv::Writer<File>,
    rows: usize,
}

impl ReadingRecorder {
    /// Create (truncate) a recording file and write its header
    /// إنشاء ملف تسجيل جديد
    pub fn create(path: &Path) -> Result<Self> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(RECORDING_HEADER)?;

        Ok(Self { writer, rows: 0 })
    }

    /// File name with the current local time, e.g. `readings_20240501_093000.csv`
    /// اسم ملف تلقائي بالوقت الحالي
    pub fn timestamped_path() -> PathBuf {
        PathBuf::from(format!("readings_{}.csv", Local::now().format("%Y%m%d_%H%M%S")))
    }

    /// Append one reading; `motion` stays empty when the board sent no hint
    /// إضافة قراءة
    pub fn record(&mut self, timestamp_ms: i64, reading: &RawReading) -> Result<()> {
        let motion = match reading.motion_hint {
            Some(true) => "1",
            Some(false) => "0",
            None => "",
        };
        self.writer.write_record([
            timestamp_ms.to_string(),
            reading.faces.to_string(),
            reading.foreground_pixels.to_string(),
            motion.to_string(),
        ])?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush all buffered rows to disk
    /// تفريغ البيانات المخزنة إلى القرص
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Drop for ReadingRecorder {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::{quick_detect, Thresholds};
    use crate::parser::DetectorParser;
    use crate::sources::ReplaySource;
    use chrono::NaiveDate;
    use std::fs;

    #[test]
    fn test_recording_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.csv");

        let mut recorder = ReadingRecorder::create(&path).unwrap();
        let reading = RawReading {
            faces: 1,
            foreground_pixels: 6200,
            motion_hint: None,
        };
        recorder.record(1_714_550_400_000, &reading).unwrap();
        assert_eq!(recorder.rows(), 1);
        drop(recorder);

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "timestamp_ms,faces,fg_pixels,motion\n1714550400000,1,6200,\n"
        );
    }

    #[test]
    fn test_motion_hint_survives_replay() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.csv");
        let thresholds = Thresholds::default();
        let now = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let parser = DetectorParser::new();
        let moving = parser.parse("faces=0 fg=0 motion=1").unwrap();
        let still = parser.parse("faces=0 fg=9000 motion=0").unwrap();

        let mut recorder = ReadingRecorder::create(&path).unwrap();
        recorder.record(1_714_550_400_000, &moving).unwrap();
        recorder.record(1_714_550_401_000, &still).unwrap();
        drop(recorder);

        let mut replay = ReplaySource::load(&path).unwrap();
        for live in [moving, still] {
            let replayed = replay.next_reading().unwrap().reading;
            assert_eq!(replayed, live);
            assert_eq!(
                quick_detect(&replayed, &thresholds, now).detected(),
                quick_detect(&live, &thresholds, now).detected()
            );
        }
    }
}
