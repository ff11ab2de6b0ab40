// ═══════════════════════════════════════════════════════════════════════════════
// 📦 error.rs - Crate Error Type
// ═══════════════════════════════════════════════════════════════════════════════
// One error enum for the library. The binary wraps it in anyhow at the edge.
// ═══════════════════════════════════════════════════════════════════════════════

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the presence library
/// الأخطاء الناتجة عن مكتبة كشف الوجود
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("serial reader already running on {0}")]
    ReaderRunning(String),

    /// The activity log does not exist yet (nothing has been recorded)
    #[error("no log file at {}", .0.display())]
    NoLogFile(PathBuf),

    #[error("incorrect password")]
    IncorrectPassword,

    #[error("password rejected: {0}")]
    PasswordRejected(&'static str),

    #[error("admin login required")]
    AdminRequired,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("replay error: {0}")]
    Replay(String),
}

pub type Result<T> = std::result::Result<T, Error>;
