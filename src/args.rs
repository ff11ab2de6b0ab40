// ═══════════════════════════════════════════════════════════════════════════════
// 📦 args.rs - Command Line Arguments
// ═══════════════════════════════════════════════════════════════════════════════

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use presence_tui::config::DEFAULT_CONFIG_PATH;

/// Where readings come from / مصدر القراءات
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Camera detector board on a serial port
    Serial,
    /// Recorded readings from a CSV file
    Replay,
    /// Keyboard: f = face, m = motion
    Manual,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Presence-based appliance automation", long_about = None)]
pub struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Reading source; without it the startup menu is shown
    #[arg(short, long, value_enum)]
    pub source: Option<SourceKind>,

    /// Serial port (overrides config, default: first USB port)
    #[arg(short, long)]
    pub port: Option<String>,

    /// Serial baud rate (overrides config)
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// Recording to replay (default: file dialog)
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Record serial readings for later replay (default name: readings_<time>.csv)
    #[arg(long, value_name = "FILE", num_args = 0..=1)]
    pub record: Option<Option<PathBuf>>,

    /// Appliance activity log (overrides config)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["presence_tui"]);
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(args.source.is_none());
    }

    #[test]
    fn test_serial_overrides() {
        let args = Args::parse_from([
            "presence_tui",
            "--source",
            "serial",
            "--port",
            "/dev/ttyACM0",
            "--baud",
            "9600",
        ]);
        assert_eq!(args.source, Some(SourceKind::Serial));
        assert_eq!(args.port.as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(args.baud, Some(9600));
    }

    #[test]
    fn test_record_without_file() {
        let args = Args::parse_from(["presence_tui", "--record"]);
        assert_eq!(args.record, Some(None));
    }
}
