//! Registration form checks.
//!
//! Runs the same validation the storefront applies to `/register`, so form
//! rules can be checked without a browser.

use std::time::Duration;

use emporium_storefront::forms::registration::{RegistrationForm, simulate_registration};

use super::CliError;

/// Validate a registration and, if it passes, run the simulated signup.
///
/// # Errors
///
/// Returns `CliError::InvalidForm` with the number of failing fields.
pub async fn check(form: RegistrationForm, delay: Duration) -> Result<(), CliError> {
    let state = form.validate();
    if state.has_errors() {
        for (field, message) in state.errors() {
            tracing::warn!(field = %field, "{message}");
        }
        return Err(CliError::InvalidForm(state.errors().len()));
    }

    let notice = simulate_registration(&form, delay).await;
    tracing::info!("{notice}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_counts_failing_fields() {
        let form = RegistrationForm {
            name: String::new(),
            email: "not-an-email".to_string(),
            password: "abc12".to_string(),
            confirm_password: "abc12".to_string(),
        };
        let err = check(form, Duration::ZERO).await.unwrap_err();
        assert!(matches!(err, CliError::InvalidForm(3)));
    }

    #[tokio::test]
    async fn test_check_accepts_valid_form() {
        let form = RegistrationForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "abc123".to_string(),
            confirm_password: "abc123".to_string(),
        };
        assert!(check(form, Duration::ZERO).await.is_ok());
    }
}
