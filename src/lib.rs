// ═══════════════════════════════════════════════════════════════════════════════
// 📦 lib.rs - Presence Automation Library
// ═══════════════════════════════════════════════════════════════════════════════
// Turns camera presence readings into appliance ON/OFF decisions, logs every
// transition to CSV and summarises daily usage.
// يحول قراءات الوجود إلى قرارات تشغيل وإيقاف الأجهزة ويسجلها
// ═══════════════════════════════════════════════════════════════════════════════

pub mod activity_log;
pub mod admin;
pub mod appliance;
pub mod config;
pub mod controller;
pub mod detectors;
pub mod error;
pub mod logging;
pub mod parser;
pub mod session;
pub mod sources;
pub mod summary;

pub use activity_log::{ActivityLog, LogEntry};
pub use admin::{AdminGate, LoginOutcome};
pub use appliance::{Appliance, ApplianceBank, SessionDurations};
pub use config::AppConfig;
pub use controller::{
    ControllerEvent, DetectionSample, Occupancy, PresenceController, StepOutcome, Timing,
};
pub use detectors::{quick_detect, RawReading, Thresholds};
pub use error::{Error, Result};
pub use session::Session;
pub use summary::UsageSummary;
