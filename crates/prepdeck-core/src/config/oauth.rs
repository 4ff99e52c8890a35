//! OAuth provider configuration.

use serde::{Deserialize, Serialize};

/// OAuth provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OAuthConfig {
    /// Google OAuth settings.
    #[serde(default)]
    pub google: GoogleOAuthConfig,
}

/// Google OAuth 2.0 configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleOAuthConfig {
    /// Whether Google sign-in is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// OAuth client ID.
    #[serde(default)]
    pub client_id: String,
    /// OAuth client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Redirect URI registered with Google.
    #[serde(default)]
    pub redirect_uri: String,
    /// Token endpoint. Overridable for tests.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Userinfo endpoint. Overridable for tests.
    #[serde(default = "default_userinfo_url")]
    pub userinfo_url: String,
    /// Seconds a consumed authorization code is remembered for replay
    /// rejection.
    #[serde(default = "default_code_guard_ttl")]
    pub code_guard_ttl_seconds: u64,
}

impl Default for GoogleOAuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: String::new(),
            token_url: default_token_url(),
            userinfo_url: default_userinfo_url(),
            code_guard_ttl_seconds: default_code_guard_ttl(),
        }
    }
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_userinfo_url() -> String {
    "https://www.googleapis.com/oauth2/v2/userinfo".to_string()
}

fn default_code_guard_ttl() -> u64 {
    600
}
