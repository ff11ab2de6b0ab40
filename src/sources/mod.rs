// ═══════════════════════════════════════════════════════════════════════════════
// 📦 sources/mod.rs - Reading Sources
// ═══════════════════════════════════════════════════════════════════════════════
// مصادر القراءات: جهاز تسلسلي، إعادة تشغيل CSV، أو لوحة المفاتيح
// Where detector readings come from: a serial device, a CSV replay, or keys
// ═══════════════════════════════════════════════════════════════════════════════

pub mod manual;
pub mod recorder;
pub mod replay;
pub mod serial_reader;

use chrono::NaiveDateTime;

use crate::detectors::RawReading;

pub use manual::ManualSource;
pub use recorder::ReadingRecorder;
pub use replay::ReplaySource;
pub use serial_reader::{SerialReader, SerialSettings};

/// A reading and the moment it belongs to
/// قراءة مع وقتها
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedReading {
    pub at: NaiveDateTime,
    pub reading: RawReading,
}

/// The active reading source, polled once per tick
/// مصدر القراءات النشط
pub enum SampleSource {
    Serial(SerialReader),
    Replay(ReplaySource),
    Manual(ManualSource),
}

impl SampleSource {
    /// Pull at most one reading for this tick.
    ///
    /// `None` means nothing arrived; the caller skips the tick.
    pub fn next_reading(&mut self, now: NaiveDateTime) -> Option<TimedReading> {
        match self {
            SampleSource::Serial(reader) => reader.poll().map(|reading| TimedReading { at: now, reading }),
            SampleSource::Replay(replay) => replay.next_reading(),
            SampleSource::Manual(manual) => Some(TimedReading {
                at: now,
                reading: manual.take_reading(),
            }),
        }
    }

    /// Short label for the status panel
    pub fn label(&self) -> String {
        match self {
            SampleSource::Serial(reader) => format!("📡 Serial {}", reader.port_name()),
            SampleSource::Replay(replay) => {
                let (done, total) = replay.progress();
                let name = replay
                    .path()
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                format!("📂 Replay {} {}/{}", name, done, total)
            }
            SampleSource::Manual(_) => "⌨️ Manual (f = face, m = motion)".to_string(),
        }
    }

    /// Latest connection/progress message, if the source has one
    pub fn status(&self) -> Option<&str> {
        match self {
            SampleSource::Serial(reader) => Some(reader.status()),
            SampleSource::Replay(replay) if replay.is_finished() => Some("⏹️ Replay finished"),
            _ => None,
        }
    }

    pub fn is_manual(&self) -> bool {
        matches!(self, SampleSource::Manual(_))
    }

    pub fn manual_mut(&mut self) -> Option<&mut ManualSource> {
        match self {
            SampleSource::Manual(manual) => Some(manual),
            _ => None,
        }
    }
}
