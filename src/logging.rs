// ═══════════════════════════════════════════════════════════════════════════════
// 📦 logging.rs - Diagnostic Logging
// ═══════════════════════════════════════════════════════════════════════════════
// The terminal belongs to the TUI, so diagnostics go to a file.
// الطرفية مشغولة بالواجهة، لذلك تكتب السجلات التشخيصية إلى ملف
// ═══════════════════════════════════════════════════════════════════════════════

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "info";

/// Install the tracing subscriber, appending to `path`.
///
/// Calling it twice keeps the first subscriber.
pub fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(filter)
        .try_init();

    if installed.is_err() {
        debug!("tracing subscriber already installed");
    }
    Ok(())
}
