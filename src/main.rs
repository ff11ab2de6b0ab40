// main.rs - Application Entry Point
mod app;
mod args;
mod menu;
mod ui;

use std::io;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

use presence_tui::logging::init_logging;
use presence_tui::sources::replay::pick_replay_file;
use presence_tui::sources::{
    ManualSource, ReadingRecorder, ReplaySource, SampleSource, SerialReader,
};
use presence_tui::AppConfig;

use crate::app::App;
use crate::args::{Args, SourceKind};
use crate::menu::{show_menu, MenuChoice};

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    apply_overrides(&mut config, &args);

    init_logging(&config.storage.diagnostics_file)?;
    info!(config = %args.config.display(), "presence starting");

    let kind = match args.source {
        Some(kind) => kind,
        None => match show_menu(config.serial.baud_rate)? {
            MenuChoice::Serial { port, baud } => {
                if port.is_some() {
                    config.serial.port = port;
                }
                config.serial.baud_rate = baud;
                SourceKind::Serial
            }
            MenuChoice::Replay => SourceKind::Replay,
            MenuChoice::Manual => SourceKind::Manual,
            MenuChoice::Quit => {
                println!("Goodbye!");
                return Ok(());
            }
        },
    };

    let source = build_source(kind, &config, &args)?;
    let result = run_presence_tui(config, source);
    if let Err(ref e) = result {
        error!(error = %e, "presence stopped with an error");
    }
    info!("presence stopped");
    result
}

/// Command line values win over the config file
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(port) = &args.port {
        config.serial.port = Some(port.clone());
    }
    if let Some(baud) = args.baud {
        config.serial.baud_rate = baud;
    }
    if let Some(log_file) = &args.log_file {
        config.storage.log_file = log_file.clone();
    }
}

fn build_source(kind: SourceKind, config: &AppConfig, args: &Args) -> Result<SampleSource> {
    if args.record.is_some() && kind != SourceKind::Serial {
        warn!("--record only applies to the serial source");
    }

    match kind {
        SourceKind::Serial => {
            let record_path = args
                .record
                .clone()
                .map(|path| path.unwrap_or_else(ReadingRecorder::timestamped_path));
            let mut reader = SerialReader::new(config.serial.clone(), record_path);
            reader.start()?;
            Ok(SampleSource::Serial(reader))
        }
        SourceKind::Replay => {
            let path = args
                .replay
                .clone()
                .or_else(pick_replay_file)
                .context("no replay file selected")?;
            let replay = ReplaySource::load(&path)
                .with_context(|| format!("loading replay {}", path.display()))?;
            info!(seconds = replay.duration_secs(), "replay ready");
            Ok(SampleSource::Replay(replay))
        }
        SourceKind::Manual => Ok(SampleSource::Manual(ManualSource::new())),
    }
}

fn run_presence_tui(config: AppConfig, source: SampleSource) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(config, source);
    let result = run_app_loop(&mut terminal, &mut app);

    // Cleanup - important to do in correct order!
    // تنظيف - مهم بالترتيب الصحيح!
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    // Clear any pending events
    // تنظيف الأحداث المعلقة
    while crossterm::event::poll(std::time::Duration::from_millis(10))? {
        let _ = crossterm::event::read();
    }

    result
}

fn run_app_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.tick(Local::now().naive_local());
        terminal.draw(|frame| ui::render(frame, app))?;
        if app.handle_events()? {
            break;
        }
    }
    Ok(())
}
