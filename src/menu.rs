// ═══════════════════════════════════════════════════════════════════════════════
// 📦 menu.rs - Startup Menu
// ═══════════════════════════════════════════════════════════════════════════════
// قائمة البداية: اختيار مصدر القراءات
// ═══════════════════════════════════════════════════════════════════════════════

use std::io::{self, Write};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use crossterm::{
    cursor::MoveTo,
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

use presence_tui::sources::serial_reader::auto_select_port;

/// Menu choice
#[derive(Debug, Clone, PartialEq)]
pub enum MenuChoice {
    Serial { port: Option<String>, baud: u32 },
    Replay,
    Manual,
    Quit,
}

/// Show the startup menu and get a choice
pub fn show_menu(default_baud: u32) -> Result<MenuChoice> {
    let _ = disable_raw_mode();

    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

    println!();
    println!("  ╔═══════════════════════════════════════════════════╗");
    println!("  ║                                                   ║");
    println!("  ║         🏠 PRESENCE - Appliance Automation        ║");
    println!("  ║                                                   ║");
    println!("  ╠═══════════════════════════════════════════════════╣");
    println!("  ║                                                   ║");
    println!("  ║   [1] 📡 Serial   - Camera detector board         ║");
    println!("  ║                                                   ║");
    println!("  ║   [2] 📂 Replay   - Recorded readings (CSV)       ║");
    println!("  ║                                                   ║");
    println!("  ║   [3] ⌨️  Manual   - Simulate with F / M keys      ║");
    println!("  ║                                                   ║");
    println!("  ║   [Q] 🚪 Quit                                     ║");
    println!("  ║                                                   ║");
    println!("  ╚═══════════════════════════════════════════════════╝");
    println!();

    print_available_ports();

    println!();
    println!("  Press 1, 2, 3, or Q:");
    stdout.flush()?;

    enable_raw_mode()?;

    // Drop keys pressed before the menu was drawn
    while event::poll(Duration::from_millis(100)).unwrap_or(false) {
        let _ = event::read();
    }

    let choice = loop {
        if event::poll(Duration::from_millis(100))? {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('1') => break 1,
                    KeyCode::Char('2') => break 2,
                    KeyCode::Char('3') => break 3,
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => break 0,
                    _ => continue,
                }
            }
        }
    };

    disable_raw_mode()?;

    match choice {
        1 => {
            let (port, baud) = get_port_settings(default_baud)?;
            Ok(MenuChoice::Serial { port, baud })
        }
        2 => Ok(MenuChoice::Replay),
        3 => Ok(MenuChoice::Manual),
        _ => Ok(MenuChoice::Quit),
    }
}

/// Ask for port and baud; empty answers keep the defaults
fn get_port_settings(default_baud: u32) -> Result<(Option<String>, u32)> {
    let mut stdout = io::stdout();

    println!();
    println!("  ─────────────────────────────────────────────────────");
    println!("  🔌 Serial Port Configuration");
    println!("  ─────────────────────────────────────────────────────");

    let suggested = auto_select_port();
    println!();
    print!(
        "  Enter port name [{}]: ",
        suggested.as_deref().unwrap_or("auto")
    );
    stdout.flush()?;

    let mut port = String::new();
    io::stdin().read_line(&mut port).context("reading port name")?;
    let port = port.trim();
    let port = if port.is_empty() {
        suggested
    } else {
        Some(port.to_string())
    };

    println!();
    println!("  Common baud rates: 9600, 115200, 460800, 921600");
    print!("  Enter baud rate [{}]: ", default_baud);
    stdout.flush()?;

    let mut baud_str = String::new();
    io::stdin().read_line(&mut baud_str).context("reading baud rate")?;
    let baud_str = baud_str.trim();

    let baud: u32 = if baud_str.is_empty() {
        default_baud
    } else {
        match baud_str.parse() {
            Ok(b) => b,
            Err(_) => bail!("Invalid baud rate: {}", baud_str),
        }
    };

    println!();
    println!(
        "  ✅ Connecting to {} @ {} baud...",
        port.as_deref().unwrap_or("auto"),
        baud
    );
    println!();

    Ok((port, baud))
}

/// Print available serial ports
fn print_available_ports() {
    print!("  📋 Available ports: ");

    match serialport::available_ports() {
        Ok(ports) if !ports.is_empty() => {
            let port_names: Vec<String> = ports.into_iter().map(|p| p.port_name).collect();
            println!("{}", port_names.join(", "));
        }
        _ => println!("(none detected)"),
    }
}
