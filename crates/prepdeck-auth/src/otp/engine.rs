//! Issuance and verification of one-time passwords.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::{info, warn};

use prepdeck_core::config::OtpConfig;
use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;
use prepdeck_database::repositories::OtpRepository;
use prepdeck_entity::otp::model::CreateOtp;
use prepdeck_entity::otp::{Otp, OtpChannel, OtpKind};
use prepdeck_notify::{Notifier, message};

use super::generator::OtpGenerator;
use super::policy::{ChannelUsage, OtpPolicy};

/// Usage counters for one owner and kind, plus a request-availability
/// hint for client UX.
#[derive(Debug, Clone, Serialize)]
pub struct OtpUsage {
    /// Codes issued in the last rolling hour.
    pub issued_last_hour: i64,
    /// Codes issued in the last rolling 24 hours.
    pub issued_last_day: i64,
    /// Hourly issuance cap for this channel.
    pub max_per_hour: i64,
    /// Daily issuance cap for this channel.
    pub max_per_day: i64,
    /// Cooldown between consecutive requests, in minutes.
    pub cooldown_minutes: i64,
    /// Whether a request right now would pass the limits.
    pub can_request_now: bool,
    /// Seconds until the next request would be allowed, when blocked.
    pub seconds_until_next_request: Option<i64>,
}

/// Issues, rate-limits, and verifies one-time passwords.
///
/// Issuance and delivery are deliberately decoupled: the code row is
/// stored first and delivery is best-effort, so a mail or SMS outage
/// never invalidates a code that may still arrive late.
#[derive(Debug, Clone)]
pub struct OtpEngine {
    repo: Arc<OtpRepository>,
    notifier: Arc<Notifier>,
    generator: OtpGenerator,
    policy: OtpPolicy,
    ttl_minutes: i64,
}

impl OtpEngine {
    /// Creates an engine from OTP configuration and its collaborators.
    pub fn new(config: &OtpConfig, repo: Arc<OtpRepository>, notifier: Arc<Notifier>) -> Self {
        Self {
            repo,
            notifier,
            generator: OtpGenerator::new(config.code_length),
            policy: OtpPolicy::new(config.clone()),
            ttl_minutes: config.ttl_minutes as i64,
        }
    }

    /// Issues a code to the owner and dispatches it to the target.
    ///
    /// Limits are enforced before the row is inserted, so a blocked
    /// request leaves no trace in the issuance history. Delivery failure
    /// is logged and swallowed; the stored code stays verifiable.
    pub async fn issue(&self, owner: &str, kind: OtpKind, target: &str) -> AppResult<Otp> {
        let now = Utc::now();
        let usage = self.channel_usage(owner, kind).await?;
        let limits = self.policy.limits_for(owner, kind);
        self.policy.enforce(&limits, &usage, now)?;

        let code = self.generator.generate();
        let otp = self
            .repo
            .create(&CreateOtp {
                owner: owner.to_string(),
                code,
                kind,
                target: target.to_string(),
                expires_at: now + Duration::minutes(self.ttl_minutes),
            })
            .await?;

        info!(owner = %owner, kind = %kind, "Issued verification code");

        let delivery = match kind.channel() {
            OtpChannel::Email => {
                self.notifier
                    .send_email(&message::otp_email(target, &otp.code, self.ttl_minutes))
                    .await
            }
            OtpChannel::Phone => {
                self.notifier
                    .send_sms(&message::otp_sms(target, &otp.code, self.ttl_minutes))
                    .await
            }
        };
        if let Err(e) = delivery {
            warn!(owner = %owner, kind = %kind, error = %e, "Code delivery failed; code remains valid");
        }

        Ok(otp)
    }

    /// Verifies a code and consumes it on success, returning the
    /// consumed row (callers use its `target` for change flows).
    ///
    /// The lookup matches the newest unconsumed row for (owner, code,
    /// kind), so a code can be used at most once while codes issued
    /// earlier stay independently valid.
    pub async fn verify(&self, owner: &str, code: &str, kind: OtpKind) -> AppResult<Otp> {
        let mut otp = self
            .repo
            .find_newest_unconsumed(owner, code, kind)
            .await?
            .ok_or_else(|| AppError::authentication("Invalid verification code"))?;

        if otp.is_expired() {
            return Err(AppError::authentication("Verification code has expired"));
        }

        self.repo.mark_consumed(otp.id).await?;
        otp.consumed = true;
        info!(owner = %owner, kind = %kind, "Verification code consumed");
        Ok(otp)
    }

    /// Reports current usage against the limits for this owner and kind.
    pub async fn usage_stats(&self, owner: &str, kind: OtpKind) -> AppResult<OtpUsage> {
        let now = Utc::now();
        let usage = self.channel_usage(owner, kind).await?;
        let limits = self.policy.limits_for(owner, kind);
        let wait = self.policy.next_allowed_in(&limits, &usage, now);

        Ok(OtpUsage {
            issued_last_hour: usage.issued_last_hour,
            issued_last_day: usage.issued_last_day,
            max_per_hour: limits.max_per_hour,
            max_per_day: limits.max_per_day,
            cooldown_minutes: limits.cooldown_minutes,
            can_request_now: wait.is_none(),
            seconds_until_next_request: wait.map(|d| d.num_seconds()),
        })
    }

    async fn channel_usage(&self, owner: &str, kind: OtpKind) -> AppResult<ChannelUsage> {
        let now = Utc::now();
        let issued_last_hour = self
            .repo
            .count_created_since(owner, kind, now - Duration::hours(1))
            .await?;
        let issued_last_day = self
            .repo
            .count_created_since(owner, kind, now - Duration::hours(24))
            .await?;
        let last_issued_at = self
            .repo
            .find_latest(owner, kind)
            .await?
            .map(|otp| otp.created_at);

        Ok(ChannelUsage {
            issued_last_hour,
            issued_last_day,
            last_issued_at,
        })
    }
}
