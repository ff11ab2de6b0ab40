// ═══════════════════════════════════════════════════════════════════════════════
// 📦 sources/serial_reader.rs - Serial Port Detector Reader
// ═══════════════════════════════════════════════════════════════════════════════
// This module reads detector lines from the camera board via serial port.
// Features:
// - Runs in background thread
// - Splits the byte stream into lines
// - Uses parser to decode readings
// - Hands readings to the UI thread over a bounded channel
// - Optionally records readings in replay format
// ═══════════════════════════════════════════════════════════════════════════════

use std::io::Read;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::Utc;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use serialport::{available_ports, SerialPortType};
use tracing::{debug, error, info, warn};

use super::recorder::ReadingRecorder;
use crate::detectors::RawReading;
use crate::error::{Error, Result};
use crate::parser::{drain_lines, DetectorParser};

/// Automatically chooses the first available USB serial port.
pub fn auto_select_port() -> Option<String> {
    let ports = available_ports().ok()?;

    ports
        .into_iter()
        .find(|p| matches!(p.port_type, SerialPortType::UsbPort(_)))
        .map(|p| p.port_name)
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Serial Reader Configuration / إعدادات قارئ التسلسل
// ═══════════════════════════════════════════════════════════════════════════════

/// Default serial port name / اسم المنفذ التسلسلي الافتراضي
/// Used as a fallback if auto-detection fails.
pub const DEFAULT_PORT: &str = "COM3";

/// Default baud rate / معدل البود الافتراضي
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Read timeout in milliseconds / مهلة القراءة بالميلي ثانية
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 100;

/// Readings queued between the reader thread and the UI
/// عدد القراءات المسموح بها في القناة
pub const CHANNEL_CAPACITY: usize = 256;

/// Line buffer limit before the partial line is dropped
const MAX_BUFFER_LEN: usize = 10_000;

/// Serial connection settings / إعدادات الاتصال التسلسلي
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Port name; `None` auto-selects the first USB port
    pub port: Option<String>,
    pub baud_rate: u32,
    pub read_timeout_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            port: None,
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl SerialSettings {
    /// Configured port, else the first USB port, else the fallback name
    pub fn resolve_port(&self) -> String {
        self.port
            .clone()
            .or_else(auto_select_port)
            .unwrap_or_else(|| DEFAULT_PORT.to_string())
    }
}

/// Messages from the reader thread / رسائل خيط القارئ
#[derive(Debug, Clone, PartialEq)]
enum SerialMessage {
    Connected,
    Reading(RawReading),
    Failed(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Serial Reader Structure / هيكل قارئ التسلسل
// ═══════════════════════════════════════════════════════════════════════════════

/// Serial reader for detector lines
/// قارئ التسلسل لأسطر الكاشف
pub struct SerialReader {
    /// Port name (e.g., "COM3") / اسم المنفذ (مثل "COM3")
    port_name: String,

    settings: SerialSettings,

    /// Where to record readings, if anywhere / مسار تسجيل القراءات
    record_path: Option<PathBuf>,

    /// Receiving end of the reading channel / طرف الاستقبال
    receiver: Option<Receiver<SerialMessage>>,

    /// Last status line for the UI / آخر رسالة حالة
    status: String,

    /// Whether the port is open / هل المنفذ مفتوح
    connected: bool,

    /// Flag to stop the reader thread / علامة لإيقاف خيط القارئ
    stop_flag: Arc<AtomicBool>,

    /// Handle to the reader thread / مقبض خيط القارئ
    thread_handle: Option<JoinHandle<()>>,
}

impl SerialReader {
    /// Create a new serial reader
    /// إنشاء قارئ تسلسل جديد
    pub fn new(settings: SerialSettings, record_path: Option<PathBuf>) -> Self {
        Self {
            port_name: settings.resolve_port(),
            settings,
            record_path,
            receiver: None,
            status: "⏹️ Serial reader idle".to_string(),
            connected: false,
            stop_flag: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Start the serial reader thread
    /// بدء خيط قارئ التسلسل
    pub fn start(&mut self) -> Result<()> {
        if self.thread_handle.is_some() {
            return Err(Error::ReaderRunning(self.port_name.clone()));
        }

        self.stop_flag.store(false, Ordering::SeqCst);

        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        self.receiver = Some(receiver);

        let port_name = self.port_name.clone();
        let baud_rate = self.settings.baud_rate;
        let timeout = Duration::from_millis(self.settings.read_timeout_ms);
        let record_path = self.record_path.clone();
        let stop_flag = Arc::clone(&self.stop_flag);

        self.status = format!("🔄 Connecting to {}...", port_name);
        info!(port = %port_name, baud_rate, "starting serial reader");

        let handle = thread::spawn(move || {
            run_serial_reader(&port_name, baud_rate, timeout, record_path, &sender, &stop_flag);
        });

        self.thread_handle = Some(handle);
        Ok(())
    }

    /// Drain the channel and return the newest reading.
    ///
    /// Status messages update `status()` on the way through.
    /// تفريغ القناة وإرجاع أحدث قراءة
    pub fn poll(&mut self) -> Option<RawReading> {
        let receiver = self.receiver.as_ref()?;
        let mut latest = None;

        for message in receiver.try_iter() {
            match message {
                SerialMessage::Connected => {
                    self.connected = true;
                    self.status = format!("✅ Connected to {}", self.port_name);
                }
                SerialMessage::Reading(reading) => latest = Some(reading),
                SerialMessage::Failed(reason) => {
                    self.connected = false;
                    self.status = format!("❌ {}", reason);
                }
            }
        }

        latest
    }

    /// Stop the serial reader thread
    /// إيقاف خيط قارئ التسلسل
    pub fn stop(&mut self) {
        self.stop_flag.store(true, Ordering::SeqCst);

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
            info!(port = %self.port_name, "serial reader stopped");
        }

        self.receiver = None;
        self.connected = false;
        self.status = "⏹️ Serial reader stopped".to_string();
    }
}

impl Drop for SerialReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Serial Reader Thread Function / دالة خيط قارئ التسلسل
// ═══════════════════════════════════════════════════════════════════════════════

/// Main function that runs in the serial reader thread
/// الدالة الرئيسية التي تعمل في خيط قارئ التسلسل
fn run_serial_reader(
    port_name: &str,
    baud_rate: u32,
    timeout: Duration,
    record_path: Option<PathBuf>,
    sender: &Sender<SerialMessage>,
    stop_flag: &Arc<AtomicBool>,
) {
    let mut port = match serialport::new(port_name, baud_rate).timeout(timeout).open() {
        Ok(p) => {
            let _ = sender.try_send(SerialMessage::Connected);
            p
        }
        Err(e) => {
            error!(port = %port_name, error = %e, "failed to open serial port");
            let _ = sender.try_send(SerialMessage::Failed(format!(
                "Failed to open {}: {}",
                port_name, e
            )));
            return;
        }
    };

    let mut recorder = record_path.and_then(|path| match ReadingRecorder::create(&path) {
        Ok(recorder) => Some(recorder),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "recording disabled");
            None
        }
    });

    let parser = DetectorParser::new();
    let mut text_buffer = String::new();
    let mut read_buffer = [0u8; 1024];

    // Main reading loop / حلقة القراءة الرئيسية
    while !stop_flag.load(Ordering::SeqCst) {
        match port.read(&mut read_buffer) {
            Ok(bytes_read) if bytes_read > 0 => {
                let text = String::from_utf8_lossy(&read_buffer[..bytes_read]);
                text_buffer.push_str(&text);

                if !process_buffer(&mut text_buffer, &parser, sender, &mut recorder) {
                    break;
                }
            }
            Ok(_) => {}
            Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => {
                // Timeout is normal, continue / المهلة طبيعية، متابعة
            }
            Err(e) => {
                error!(port = %port_name, error = %e, "serial read failed");
                let _ = sender.try_send(SerialMessage::Failed(format!("Read error: {}", e)));
                break;
            }
        }
    }

    if let Some(ref mut recorder) = recorder {
        if let Err(e) = recorder.flush() {
            warn!(error = %e, "failed to flush recording");
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Buffer Processing / معالجة المخزن المؤقت
// ═══════════════════════════════════════════════════════════════════════════════

/// Parse every complete line in the buffer and forward the readings.
///
/// Returns `false` once the UI side has hung up.
/// معالجة الأسطر المكتملة وإرسال القراءات
fn process_buffer(
    buffer: &mut String,
    parser: &DetectorParser,
    sender: &Sender<SerialMessage>,
    recorder: &mut Option<ReadingRecorder>,
) -> bool {
    for line in drain_lines(buffer) {
        let Some(reading) = parser.parse(&line) else {
            debug!(line = %line, "ignoring non-reading line");
            continue;
        };

        if let Some(ref mut rec) = recorder {
            if let Err(e) = rec.record(Utc::now().timestamp_millis(), &reading) {
                warn!(error = %e, "failed to record reading");
            }
        }

        match sender.try_send(SerialMessage::Reading(reading)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => debug!("reading channel full, dropping reading"),
            Err(TrySendError::Disconnected(_)) => return false,
        }
    }

    // A line with no newline for this long is noise / سطر طويل جداً بدون نهاية
    if buffer.len() > MAX_BUFFER_LEN {
        buffer.clear();
    }

    true
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_port_wins() {
        let settings = SerialSettings {
            port: Some("/dev/ttyUSB7".to_string()),
            ..SerialSettings::default()
        };
        let reader = SerialReader::new(settings, None);
        assert_eq!(reader.port_name(), "/dev/ttyUSB7");
        assert!(!reader.is_connected());
    }

    #[test]
    fn test_second_start_is_rejected() {
        let settings = SerialSettings {
            port: Some("/dev/presence-missing-port".to_string()),
            ..SerialSettings::default()
        };
        let mut reader = SerialReader::new(settings, None);

        reader.start().unwrap();
        match reader.start() {
            Err(Error::ReaderRunning(port)) => assert_eq!(port, "/dev/presence-missing-port"),
            other => panic!("expected ReaderRunning, got {:?}", other.err()),
        }

        reader.stop();
        assert!(!reader.is_connected());
    }

    #[test]
    fn test_process_buffer_forwards_newest_last() {
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        let parser = DetectorParser::new();
        let mut buffer = String::from("boot ok\nfaces=1 fg=0\nfaces=0 fg=9000\nfaces=");

        assert!(process_buffer(&mut buffer, &parser, &sender, &mut None));
        assert_eq!(buffer, "faces=");

        let readings: Vec<_> = receiver.try_iter().collect();
        assert_eq!(readings.len(), 2);
        assert_eq!(
            readings[1],
            SerialMessage::Reading(RawReading {
                faces: 0,
                foreground_pixels: 9000,
                motion_hint: None,
            })
        );
    }

    #[test]
    fn test_process_buffer_stops_when_ui_gone() {
        let (sender, receiver) = bounded(CHANNEL_CAPACITY);
        drop(receiver);
        let parser = DetectorParser::new();
        let mut buffer = String::from("faces=1\n");

        assert!(!process_buffer(&mut buffer, &parser, &sender, &mut None));
    }

    #[test]
    fn test_poll_without_start_is_empty() {
        let settings = SerialSettings {
            port: Some("COM9".to_string()),
            ..SerialSettings::default()
        };
        let mut reader = SerialReader::new(settings, None);
        assert!(reader.poll().is_none());
    }
}
