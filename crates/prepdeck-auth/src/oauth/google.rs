//! Google OAuth 2.0 authorization-code exchange.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use prepdeck_cache::{CacheManager, keys};
use prepdeck_core::CacheProvider;
use prepdeck_core::config::GoogleOAuthConfig;
use prepdeck_core::error::{AppError, ErrorKind};
use prepdeck_core::result::AppResult;

/// Profile fields returned by Google's userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleUserInfo {
    /// Stable Google account identifier.
    pub id: String,
    /// Account email address.
    pub email: String,
    /// Whether Google has verified the email.
    #[serde(default)]
    pub verified_email: bool,
    /// Display name, if shared.
    #[serde(default)]
    pub name: Option<String>,
    /// Avatar URL, if shared.
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchanges Google authorization codes for verified profiles.
///
/// Each code is claimed in the shared cache with set-if-absent before
/// the exchange, so a replayed or concurrently submitted code is
/// rejected on every instance, not just the one that saw it first.
#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    config: GoogleOAuthConfig,
    client: reqwest::Client,
    cache: CacheManager,
}

impl GoogleOAuth {
    /// Creates a provider from Google OAuth configuration.
    pub fn new(config: GoogleOAuthConfig, cache: CacheManager) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Failed to build HTTP client", e)
            })?;
        Ok(Self {
            config,
            client,
            cache,
        })
    }

    /// Whether Google sign-in is configured and enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Exchanges an authorization code for the Google account profile.
    ///
    /// Fails with an authentication error if the code was already used
    /// within the guard window, or if Google rejects it.
    pub async fn exchange_code(&self, code: &str) -> AppResult<GoogleUserInfo> {
        if !self.config.enabled {
            return Err(AppError::configuration("Google sign-in is not enabled"));
        }

        self.claim_code(code).await?;

        let access_token = self.fetch_access_token(code).await?;
        let info = self.fetch_user_info(&access_token).await?;

        debug!(google_id = %info.id, "Exchanged Google authorization code");
        Ok(info)
    }

    /// Claims the code in the cache; a second claim within the guard TTL
    /// is a replay.
    async fn claim_code(&self, code: &str) -> AppResult<()> {
        let claimed = self
            .cache
            .set_nx(
                &keys::oauth_code_guard(code),
                "1",
                Duration::from_secs(self.config.code_guard_ttl_seconds),
            )
            .await?;

        if !claimed {
            warn!("Rejected replayed Google authorization code");
            return Err(AppError::authentication(
                "Authorization code has already been used",
            ));
        }
        Ok(())
    }

    async fn fetch_access_token(&self, code: &str) -> AppResult<String> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
                ("redirect_uri", &self.config.redirect_uri),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Google token endpoint request failed",
                    e,
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            warn!(%status, detail, "Google rejected the authorization code");
            return Err(AppError::authentication("Invalid Google authorization code"));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Failed to parse Google token response",
                e,
            )
        })?;
        Ok(token.access_token)
    }

    async fn fetch_user_info(&self, access_token: &str) -> AppResult<GoogleUserInfo> {
        let response = self
            .client
            .get(&self.config.userinfo_url)
            .header("Authorization", format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    "Google userinfo request failed",
                    e,
                )
            })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "Google userinfo returned {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Failed to parse Google userinfo response",
                e,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use prepdeck_cache::memory::MemoryCacheProvider;
    use prepdeck_core::config::cache::MemoryCacheConfig;

    fn memory_cache() -> CacheManager {
        let provider = MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 }, 60);
        CacheManager::from_provider(Arc::new(provider))
    }

    fn enabled_config() -> GoogleOAuthConfig {
        GoogleOAuthConfig {
            enabled: true,
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://app.example.com/oauth/callback".to_string(),
            ..GoogleOAuthConfig::default()
        }
    }

    #[tokio::test]
    async fn disabled_provider_rejects_exchange() {
        let oauth = GoogleOAuth::new(GoogleOAuthConfig::default(), memory_cache()).unwrap();
        assert!(!oauth.is_enabled());

        let err = oauth.exchange_code("4/some-code").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn code_can_only_be_claimed_once() {
        let oauth = GoogleOAuth::new(enabled_config(), memory_cache()).unwrap();

        oauth.claim_code("4/fresh-code").await.unwrap();
        let err = oauth.claim_code("4/fresh-code").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authentication);
        assert!(err.to_string().contains("already been used"));
    }

    #[tokio::test]
    async fn distinct_codes_claim_independently() {
        let oauth = GoogleOAuth::new(enabled_config(), memory_cache()).unwrap();

        oauth.claim_code("4/code-a").await.unwrap();
        oauth.claim_code("4/code-b").await.unwrap();
    }
}
