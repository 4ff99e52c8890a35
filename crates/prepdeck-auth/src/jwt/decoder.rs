//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use prepdeck_core::config::auth::AuthConfig;
use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;

use super::claims::Claims;

/// Validates JWT tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks signature validity and expiration. Session liveness is a
    /// separate check performed against the database.
    pub fn decode(&self, token: &str) -> AppResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                        AppError::authentication("Token has expired")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidToken => {
                        AppError::authentication("Invalid token format")
                    }
                    jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                        AppError::authentication("Invalid token signature")
                    }
                    _ => AppError::authentication(format!("Token validation failed: {e}")),
                }
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::encoder::JwtEncoder;
    use chrono::Utc;
    use prepdeck_entity::user::{User, UserRole, UserStatus};
    use uuid::Uuid;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-for-unit-tests".to_string(),
            jwt_ttl_hours: 24,
            password_min_length: 8,
            password_min_score: 2,
        }
    }

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            email: Some("student@example.com".to_string()),
            phone: None,
            password_hash: None,
            display_name: Some("Test Student".to_string()),
            role: UserRole::Student,
            status: UserStatus::Active,
            email_verified: true,
            phone_verified: false,
            google_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        }
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let config = test_config();
        let encoder = JwtEncoder::new(&config);
        let decoder = JwtDecoder::new(&config);
        let user = test_user();

        let issued = encoder.generate_token(&user, "a".repeat(64).as_str()).unwrap();
        let claims = decoder.decode(&issued.access_token).unwrap();

        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, user.email);
        assert_eq!(claims.role, UserRole::Student);
        assert_eq!(claims.session_token().len(), 64);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let encoder = JwtEncoder::new(&test_config());
        let other = AuthConfig {
            jwt_secret: "a-different-secret".to_string(),
            ..test_config()
        };
        let decoder = JwtDecoder::new(&other);
        let user = test_user();

        let issued = encoder.generate_token(&user, "s").unwrap();
        assert!(decoder.decode(&issued.access_token).is_err());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let decoder = JwtDecoder::new(&test_config());
        assert!(decoder.decode("not-a-jwt").is_err());
    }
}
