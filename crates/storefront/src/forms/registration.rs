//! Signup form validation and the simulated registration.
//!
//! No account is created: a valid submission waits for a fixed delay and
//! then reports success.

use std::time::Duration;

use emporium_core::Email;
use serde::Deserialize;

use super::FormState;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Registration form data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

impl RegistrationForm {
    /// Check every rule and collect one message per failing field.
    ///
    /// The returned state echoes name and email back but never the
    /// passwords.
    #[must_use]
    pub fn validate(&self) -> FormState {
        let mut form = FormState::new();
        form.set_value("name", self.name.trim());
        form.set_value("email", self.email.trim());

        if self.name.trim().is_empty() {
            form.set_error("name", "Name is required");
        }

        let email = self.email.trim();
        if email.is_empty() {
            form.set_error("email", "Email is required");
        } else if Email::parse(email).is_err() {
            form.set_error("email", "Email is invalid");
        }

        if self.password.is_empty() {
            form.set_error("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            form.set_error(
                "password",
                format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
        }

        if self.confirm_password != self.password {
            form.set_error("confirm_password", "Passwords do not match");
        }

        form
    }
}

/// Stand-in for the account creation call.
///
/// Sleeps for `delay`, then returns the success notice.
pub async fn simulate_registration(form: &RegistrationForm, delay: Duration) -> String {
    tracing::info!(email = %form.email.trim(), "Simulating registration (no account is created)");
    tokio::time::sleep(delay).await;
    format!("Registration successful! Welcome, {}.", form.name.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> RegistrationForm {
        RegistrationForm {
            name: "Linus".to_string(),
            email: "linus@example.com".to_string(),
            password: "abc123".to_string(),
            confirm_password: "abc123".to_string(),
        }
    }

    #[test]
    fn test_valid_form_has_no_errors() {
        let form = valid().validate();
        assert!(!form.has_errors());
        assert_eq!(form.value("name"), "Linus");
        assert_eq!(form.value("password"), "");
    }

    #[test]
    fn test_short_password_is_rejected() {
        let mut input = valid();
        input.password = "abc12".to_string();
        input.confirm_password = "abc12".to_string();

        let form = input.validate();
        assert_eq!(
            form.error("password"),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(form.error("confirm_password"), None);
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let form = RegistrationForm::default().validate();
        assert_eq!(form.error("name"), Some("Name is required"));
        assert_eq!(form.error("email"), Some("Email is required"));
        assert_eq!(form.error("password"), Some("Password is required"));
        // Both passwords are empty, so they match.
        assert_eq!(form.error("confirm_password"), None);
    }

    #[test]
    fn test_bad_email_and_mismatch() {
        let mut input = valid();
        input.email = "linus@kernel".to_string();
        input.confirm_password = "abc124".to_string();

        let form = input.validate();
        assert_eq!(form.error("email"), Some("Email is invalid"));
        assert_eq!(form.error("confirm_password"), Some("Passwords do not match"));
        assert_eq!(form.errors().len(), 2);
    }

    #[test]
    fn test_whitespace_name_is_empty() {
        let mut input = valid();
        input.name = "   ".to_string();
        assert_eq!(input.validate().error("name"), Some("Name is required"));
    }

    #[tokio::test]
    async fn test_simulated_registration_reports_success() {
        let notice = simulate_registration(&valid(), Duration::from_millis(5)).await;
        assert_eq!(notice, "Registration successful! Welcome, Linus.");
    }
}
