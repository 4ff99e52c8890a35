//! Password policy enforcement for new passwords.

use prepdeck_core::config::AuthConfig;
use prepdeck_core::error::AppError;

/// Validates password strength against configured policies.
///
/// Policy is length plus a zxcvbn strength estimate. There are no
/// character-class rules; a long passphrase of lowercase words passes
/// while `P@ssw0rd1` does not.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length.
    min_length: usize,
    /// Minimum acceptable zxcvbn score.
    min_score: zxcvbn::Score,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
            min_score: score_from_config(config.password_min_score),
        }
    }

    /// Validates a password against all configured policies.
    ///
    /// Returns `Ok(())` if the password meets all requirements,
    /// or an error describing the first violation found.
    pub fn validate(&self, password: &str) -> Result<(), AppError> {
        if password.len() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, &[]);
        if estimate.score() < self.min_score {
            return Err(AppError::validation(
                "Password is too weak. Please use a longer or less predictable password.",
            ));
        }

        Ok(())
    }

    /// Validates that a new password differs from the old one.
    pub fn validate_not_same(
        &self,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if old_password == new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }
        Ok(())
    }
}

/// Maps the configured 0-4 score to the zxcvbn scale, clamping out-of-range
/// values to the strictest setting.
fn score_from_config(score: u8) -> zxcvbn::Score {
    match score {
        0 => zxcvbn::Score::Zero,
        1 => zxcvbn::Score::One,
        2 => zxcvbn::Score::Two,
        3 => zxcvbn::Score::Three,
        _ => zxcvbn::Score::Four,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(min_length: usize, min_score: u8) -> PasswordValidator {
        PasswordValidator::new(&AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_ttl_hours: 24,
            password_min_length: min_length,
            password_min_score: min_score,
        })
    }

    #[test]
    fn rejects_short_passwords() {
        let err = validator(8, 0).validate("abc").unwrap_err();
        assert!(err.to_string().contains("at least 8 characters"));
    }

    #[test]
    fn rejects_common_passwords() {
        assert!(validator(8, 2).validate("password").is_err());
        assert!(validator(8, 2).validate("12345678").is_err());
    }

    #[test]
    fn accepts_strong_passphrases() {
        assert!(
            validator(8, 3)
                .validate("quartz-heron-mandala-92")
                .is_ok()
        );
    }

    #[test]
    fn score_zero_only_enforces_length() {
        assert!(validator(8, 0).validate("password").is_ok());
    }

    #[test]
    fn new_password_must_differ() {
        let v = validator(8, 0);
        assert!(v.validate_not_same("same-thing", "same-thing").is_err());
        assert!(v.validate_not_same("old-thing", "new-thing").is_ok());
    }
}
