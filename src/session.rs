// ═══════════════════════════════════════════════════════════════════════════════
// 📦 session.rs - Session State
// ═══════════════════════════════════════════════════════════════════════════════
// Everything that used to be global: the automation switch and the admin gate.
// ═══════════════════════════════════════════════════════════════════════════════

use chrono::NaiveDateTime;
use tracing::info;

use crate::admin::AdminGate;
use crate::controller::{ControllerEvent, PresenceController};
use crate::error::Result;

/// Per-run session state passed explicitly to whoever needs it
/// حالة الجلسة التي تمرر صراحة
#[derive(Debug, Clone)]
pub struct Session {
    automation_enabled: bool,
    pub admin: AdminGate,
}

impl Session {
    pub fn new(admin: AdminGate) -> Self {
        Self {
            automation_enabled: true,
            admin,
        }
    }

    /// While false the controller must not receive samples
    pub fn automation_enabled(&self) -> bool {
        self.automation_enabled
    }

    /// Enable or disable automation (admin only).
    ///
    /// Disabling forces every appliance off once, immediately; the returned
    /// events carry the OFF transitions to log.
    pub fn set_automation(
        &mut self,
        enabled: bool,
        controller: &mut PresenceController,
        now: NaiveDateTime,
    ) -> Result<Vec<ControllerEvent>> {
        self.admin.require()?;

        if enabled == self.automation_enabled {
            return Ok(Vec::new());
        }
        self.automation_enabled = enabled;
        info!(enabled, "automation toggled");

        if enabled {
            Ok(Vec::new())
        } else {
            Ok(controller.force_off(now))
        }
    }

    pub fn toggle_automation(
        &mut self,
        controller: &mut PresenceController,
        now: NaiveDateTime,
    ) -> Result<Vec<ControllerEvent>> {
        let enabled = !self.automation_enabled;
        self.set_automation(enabled, controller, now)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AdminGate::default())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::DetectionSample;
    use crate::error::Error;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn admin_session() -> Session {
        let mut session = Session::default();
        session.admin.login("admin").unwrap();
        session.admin.change_password("s3cret").unwrap();
        session
    }

    #[test]
    fn test_toggle_requires_admin() {
        let mut session = Session::default();
        let mut controller = PresenceController::default();
        assert!(matches!(
            session.toggle_automation(&mut controller, now()),
            Err(Error::AdminRequired)
        ));
        assert!(session.automation_enabled());
    }

    #[test]
    fn test_disable_forces_off_once() {
        let mut session = admin_session();
        let mut controller = PresenceController::default();
        controller.step(&DetectionSample::new(now(), true, false));

        let events = session.toggle_automation(&mut controller, now()).unwrap();
        assert_eq!(events.len(), 2);
        assert!(!session.automation_enabled());
        assert!(!controller.appliances().any_on());

        // Disabling again is a no-op / التعطيل مرة أخرى لا يفعل شيئاً
        let events = session.set_automation(false, &mut controller, now()).unwrap();
        assert!(events.is_empty());

        let events = session.toggle_automation(&mut controller, now()).unwrap();
        assert!(events.is_empty());
        assert!(session.automation_enabled());
    }
}
