// ═══════════════════════════════════════════════════════════════════════════════
// 📦 admin.rs - Admin Password Gate
// ═══════════════════════════════════════════════════════════════════════════════
// A single shared password guards the admin actions. Logging in with the
// default password forces a change before anything else is allowed.
// ═══════════════════════════════════════════════════════════════════════════════

use tracing::{info, warn};

use crate::error::{Error, Result};

/// Built-in password used until the admin changes it
/// كلمة المرور الافتراضية
pub const DEFAULT_PASSWORD: &str = "admin";

/// What a successful login unlocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Dashboard is available
    Granted,
    /// Still on the default password: a new one must be set first
    MustChangePassword,
}

/// Password gate for the admin panel
/// بوابة كلمة المرور للوحة المشرف
#[derive(Debug, Clone)]
pub struct AdminGate {
    default_password: String,
    current_password: String,
    logged_in: bool,
}

impl AdminGate {
    pub fn new(default_password: impl Into<String>) -> Self {
        let default_password = default_password.into();
        Self {
            current_password: default_password.clone(),
            default_password,
            logged_in: false,
        }
    }

    /// Check a password attempt. No lockout on failure.
    pub fn login(&mut self, attempt: &str) -> Result<LoginOutcome> {
        if attempt != self.current_password {
            warn!("admin login failed");
            return Err(Error::IncorrectPassword);
        }

        self.logged_in = true;
        info!("admin logged in");
        if self.must_change_password() {
            Ok(LoginOutcome::MustChangePassword)
        } else {
            Ok(LoginOutcome::Granted)
        }
    }

    /// Replace the password. Must be logged in; the new password cannot be
    /// empty or equal to the default.
    pub fn change_password(&mut self, new_password: &str) -> Result<()> {
        if !self.logged_in {
            return Err(Error::AdminRequired);
        }
        if new_password.is_empty() {
            return Err(Error::PasswordRejected("password cannot be empty"));
        }
        if new_password == self.default_password {
            return Err(Error::PasswordRejected(
                "password must be different from the default",
            ));
        }

        self.current_password = new_password.to_string();
        info!("admin password changed");
        Ok(())
    }

    pub fn logout(&mut self) {
        if self.logged_in {
            info!("admin logged out");
        }
        self.logged_in = false;
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    pub fn must_change_password(&self) -> bool {
        self.logged_in && self.current_password == self.default_password
    }

    /// Full admin access: logged in and past the forced password change
    pub fn is_admin(&self) -> bool {
        self.logged_in && !self.must_change_password()
    }

    /// Guard for admin-only actions / حارس لإجراءات المشرف فقط
    pub fn require(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::AdminRequired)
        }
    }
}

impl Default for AdminGate {
    fn default() -> Self {
        Self::new(DEFAULT_PASSWORD)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// 🔹 Unit Tests / اختبارات الوحدة
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_password_rejected() {
        let mut gate = AdminGate::default();
        assert!(matches!(gate.login("nope"), Err(Error::IncorrectPassword)));
        assert!(!gate.is_logged_in());
        // No lockout / لا يوجد قفل
        assert!(gate.login("admin").is_ok());
    }

    #[test]
    fn test_default_password_forces_change() {
        let mut gate = AdminGate::default();
        assert_eq!(gate.login("admin").unwrap(), LoginOutcome::MustChangePassword);
        assert!(!gate.is_admin());
        assert!(gate.require().is_err());

        assert!(matches!(
            gate.change_password(""),
            Err(Error::PasswordRejected(_))
        ));
        assert!(matches!(
            gate.change_password("admin"),
            Err(Error::PasswordRejected(_))
        ));

        gate.change_password("s3cret").unwrap();
        assert!(gate.is_admin());
        assert!(gate.require().is_ok());
    }

    #[test]
    fn test_changed_password_is_required_after_logout() {
        let mut gate = AdminGate::default();
        gate.login("admin").unwrap();
        gate.change_password("s3cret").unwrap();
        gate.logout();

        assert!(gate.require().is_err());
        assert!(gate.login("admin").is_err());
        assert_eq!(gate.login("s3cret").unwrap(), LoginOutcome::Granted);
    }

    #[test]
    fn test_change_requires_login() {
        let mut gate = AdminGate::default();
        assert!(matches!(
            gate.change_password("s3cret"),
            Err(Error::AdminRequired)
        ));
    }
}
