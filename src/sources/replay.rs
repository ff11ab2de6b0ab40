// ═══════════════════════════════════════════════════════════════════════════════
// 📦 sources/replay.rs - Recorded Reading Replay
// ═══════════════════════════════════════════════════════════════════════════════
// This module loads recorded detector readings and plays them back.
// Features:
// - Reads `timestamp_ms,faces,fg_pixels[,motion]` rows
// - Skips the header and any malformed row
// - One reading per tick, stamped with its recorded time
// ═══════════════════════════════════════════════════════════════════════════════

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDateTime};
use tracing::{debug, info};

use super::TimedReading;
use crate::detectors::RawReading;
use crate::error::{Error, Result};

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Replay Structure / هيكل إعادة التشغيل
// ═══════════════════════════════════════════════════════════════════════════════

/// Recorded readings and a playback cursor
/// القراءات المسجلة ومؤشر التشغيل
#[derive(Debug, Clone)]
pub struct ReplaySource {
    path: PathBuf,
    readings: Vec<TimedReading>,
    cursor: usize,
}

impl ReplaySource {
    /// Load a recording from disk
    /// تحميل تسجيل من القرص
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut readings = Vec::new();
        for (line, record) in reader.records().enumerate() {
            let Ok(record) = record else {
                debug!(line = line + 1, "skipping unreadable replay row");
                continue;
            };
            match parse_row(&record) {
                Some(reading) => readings.push(reading),
                None => debug!(line = line + 1, "skipping replay row"),
            }
        }

        if readings.is_empty() {
            return Err(Error::Replay(format!(
                "no readings in {}",
                path.display()
            )));
        }

        info!(path = %path.display(), count = readings.len(), "replay loaded");
        Ok(Self::from_readings(path.to_path_buf(), readings))
    }

    pub fn from_readings(path: PathBuf, readings: Vec<TimedReading>) -> Self {
        Self {
            path,
            readings,
            cursor: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next recorded reading, or `None` once the recording is exhausted
    pub fn next_reading(&mut self) -> Option<TimedReading> {
        let reading = self.readings.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(reading)
    }

    /// (played, total) / (المشغل، الإجمالي)
    pub fn progress(&self) -> (usize, usize) {
        (self.cursor, self.readings.len())
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.readings.len()
    }

    /// Recorded span in seconds / مدة التسجيل بالثواني
    pub fn duration_secs(&self) -> f64 {
        match (self.readings.first(), self.readings.last()) {
            (Some(first), Some(last)) => (last.at - first.at).num_milliseconds() as f64 / 1000.0,
            _ => 0.0,
        }
    }
}

/// Parse one data row; the header and broken rows give `None`
/// تحليل صف بيانات واحد
fn parse_row(record: &csv::StringRecord) -> Option<TimedReading> {
    if record.len() < 3 {
        return None;
    }

    let timestamp_ms: i64 = record.get(0)?.parse().ok()?;
    let faces: u32 = record.get(1)?.parse().ok()?;
    let foreground_pixels: u64 = record.get(2)?.parse().ok()?;
    let motion_hint = record
        .get(3)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<u8>().ok())
        .map(|v| v != 0);

    Some(TimedReading {
        at: local_time(timestamp_ms)?,
        reading: RawReading {
            faces,
            foreground_pixels,
            motion_hint,
        },
    })
}

/// Epoch milliseconds to local wall-clock time
fn local_time(timestamp_ms: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|utc| utc.with_timezone(&Local).naive_local())
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Helper Functions / دوال مساعدة
// ═══════════════════════════════════════════════════════════════════════════════

/// Open file dialog for a recording (uses rfd crate)
/// فتح نافذة اختيار ملف التسجيل
pub fn pick_replay_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("CSV Files", &["csv"])
        .add_filter("All Files", &["*"])
        .set_title("Select Recorded Readings")
        .pick_file()
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_skips_header_and_bad_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.csv");
        fs::write(
            &path,
            "timestamp_ms,faces,fg_pixels\n\
             1714550400000,1,0\n\
             garbage\n\
             1714550401000,x,5\n\
             1714550402000,0,7000,1\n",
        )
        .unwrap();

        let mut replay = ReplaySource::load(&path).unwrap();
        assert_eq!(replay.progress(), (0, 2));
        assert!((replay.duration_secs() - 2.0).abs() < 1e-9);

        let first = replay.next_reading().unwrap();
        assert_eq!(first.reading.faces, 1);

        let second = replay.next_reading().unwrap();
        assert_eq!(second.reading.motion_hint, Some(true));
        assert_eq!((second.at - first.at).num_seconds(), 2);

        assert!(replay.next_reading().is_none());
        assert!(replay.is_finished());
    }

    #[test]
    fn test_load_skips_non_utf8_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.csv");
        let mut bytes = b"1714550400000,1,0\n".to_vec();
        bytes.extend_from_slice(b"\xff\xfe,0,0\n");
        bytes.extend_from_slice(b"1714550401000,0,6000\n");
        fs::write(&path, bytes).unwrap();

        let replay = ReplaySource::load(&path).unwrap();
        assert_eq!(replay.progress(), (0, 2));
    }

    #[test]
    fn test_empty_recording_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "timestamp_ms,faces,fg_pixels\n").unwrap();

        assert!(matches!(ReplaySource::load(&path), Err(Error::Replay(_))));
    }
}
