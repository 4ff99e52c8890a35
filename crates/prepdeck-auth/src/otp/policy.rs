//! Per-channel issuance limits for verification codes.

use chrono::{DateTime, Duration, Utc};

use prepdeck_core::config::{OtpChannelLimits, OtpConfig};
use prepdeck_core::error::AppError;
use prepdeck_core::result::AppResult;
use prepdeck_entity::otp::{Otp, OtpChannel, OtpKind};

/// Observed issuance history for one owner and kind.
///
/// Counts are taken over rolling windows ending at the evaluation
/// instant; `last_issued_at` is the creation time of the single most
/// recent code regardless of consumption.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelUsage {
    /// Codes created in the last rolling hour.
    pub issued_last_hour: i64,
    /// Codes created in the last rolling 24 hours.
    pub issued_last_day: i64,
    /// Creation time of the most recent code, if any exist.
    pub last_issued_at: Option<DateTime<Utc>>,
}

/// Evaluates issuance limits before a code is sent.
///
/// Anonymous owners (pre-registration phone verification, keyed on the
/// destination number rather than an account) get their own, stricter
/// limit set.
#[derive(Debug, Clone)]
pub struct OtpPolicy {
    config: OtpConfig,
}

impl OtpPolicy {
    /// Creates a policy from OTP configuration.
    pub fn new(config: OtpConfig) -> Self {
        Self { config }
    }

    /// Selects the limit set that applies to this owner and kind.
    pub fn limits_for(&self, owner: &str, kind: OtpKind) -> OtpChannelLimits {
        if Otp::is_anonymous_owner(owner) {
            return self.config.anonymous;
        }
        match kind.channel() {
            OtpChannel::Email => self.config.email,
            OtpChannel::Phone => self.config.phone,
        }
    }

    /// Enforces all three bounds against observed usage.
    ///
    /// Checks run cooldown first so the caller sees the most precise
    /// wait message available. Each violation is a rate-limit error with
    /// a human-readable remaining-wait hint.
    pub fn enforce(
        &self,
        limits: &OtpChannelLimits,
        usage: &ChannelUsage,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        if let Some(last) = usage.last_issued_at {
            let cooldown_ends = last + Duration::minutes(limits.cooldown_minutes);
            if now < cooldown_ends {
                return Err(AppError::rate_limit(format!(
                    "Please wait {} before requesting another code",
                    wait_text(cooldown_ends - now)
                )));
            }
        }

        if usage.issued_last_hour >= limits.max_per_hour {
            return Err(AppError::rate_limit(format!(
                "Too many codes requested ({} per hour). Try again within the hour.",
                limits.max_per_hour
            )));
        }

        if usage.issued_last_day >= limits.max_per_day {
            return Err(AppError::rate_limit(format!(
                "Daily code limit reached ({} per day). Try again tomorrow.",
                limits.max_per_day
            )));
        }

        Ok(())
    }

    /// How long until the next request would be allowed, if it would be
    /// blocked right now.
    ///
    /// For the hourly and daily caps this is an upper bound anchored on
    /// the most recent code; the window may free up sooner as older
    /// codes age out.
    pub fn next_allowed_in(
        &self,
        limits: &OtpChannelLimits,
        usage: &ChannelUsage,
        now: DateTime<Utc>,
    ) -> Option<Duration> {
        let last = usage.last_issued_at?;

        let mut blocked_until = last + Duration::minutes(limits.cooldown_minutes);
        if usage.issued_last_hour >= limits.max_per_hour {
            blocked_until = blocked_until.max(last + Duration::hours(1));
        }
        if usage.issued_last_day >= limits.max_per_day {
            blocked_until = blocked_until.max(last + Duration::hours(24));
        }

        if now < blocked_until {
            Some(blocked_until - now)
        } else {
            None
        }
    }
}

/// Renders a wait duration for rate-limit messages.
fn wait_text(wait: Duration) -> String {
    let seconds = wait.num_seconds().max(0);
    if seconds < 60 {
        return "under a minute".to_string();
    }
    let minutes = (seconds + 59) / 60;
    if minutes == 1 {
        "about 1 minute".to_string()
    } else {
        format!("about {minutes} minutes")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prepdeck_core::error::ErrorKind;

    fn policy() -> OtpPolicy {
        OtpPolicy::new(OtpConfig::default())
    }

    fn clear_usage() -> ChannelUsage {
        ChannelUsage::default()
    }

    #[test]
    fn anonymous_owners_get_the_strict_limits() {
        let p = policy();
        let anon = p.limits_for(&Otp::anonymous_owner("+15551234567"), OtpKind::Phone);
        assert_eq!(anon.max_per_hour, 2);

        let known = p.limits_for("8f14e45f-ceea-4a7b-9c3d-000000000000", OtpKind::Phone);
        assert_eq!(known.max_per_hour, 3);
    }

    #[test]
    fn change_kinds_use_the_base_channel_limits() {
        let p = policy();
        let email = p.limits_for("some-user", OtpKind::EmailChange);
        assert_eq!(email.max_per_hour, 5);

        let phone = p.limits_for("some-user", OtpKind::PhoneChange);
        assert_eq!(phone.max_per_hour, 3);
    }

    #[test]
    fn fresh_owner_is_allowed() {
        let p = policy();
        let limits = p.limits_for("u", OtpKind::Email);
        assert!(p.enforce(&limits, &clear_usage(), Utc::now()).is_ok());
    }

    #[test]
    fn cooldown_blocks_with_wait_message() {
        let p = policy();
        let limits = OtpChannelLimits {
            max_per_hour: 5,
            max_per_day: 20,
            cooldown_minutes: 2,
        };
        let now = Utc::now();
        let usage = ChannelUsage {
            issued_last_hour: 1,
            issued_last_day: 1,
            last_issued_at: Some(now - Duration::seconds(30)),
        };

        let err = p.enforce(&limits, &usage, now).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimit);
        assert!(err.to_string().contains("wait"));
    }

    #[test]
    fn hourly_cap_blocks_after_cooldown_passes() {
        let p = policy();
        let limits = OtpChannelLimits {
            max_per_hour: 3,
            max_per_day: 10,
            cooldown_minutes: 2,
        };
        let now = Utc::now();
        let usage = ChannelUsage {
            issued_last_hour: 3,
            issued_last_day: 3,
            last_issued_at: Some(now - Duration::minutes(10)),
        };

        let err = p.enforce(&limits, &usage, now).unwrap_err();
        assert_eq!(err.kind, ErrorKind::RateLimit);
        assert!(err.to_string().contains("hour"));
    }

    #[test]
    fn daily_cap_blocks_when_hourly_window_has_room() {
        let p = policy();
        let limits = OtpChannelLimits {
            max_per_hour: 3,
            max_per_day: 10,
            cooldown_minutes: 2,
        };
        let now = Utc::now();
        let usage = ChannelUsage {
            issued_last_hour: 0,
            issued_last_day: 10,
            last_issued_at: Some(now - Duration::hours(2)),
        };

        let err = p.enforce(&limits, &usage, now).unwrap_err();
        assert!(err.to_string().contains("tomorrow"));
    }

    #[test]
    fn next_allowed_tracks_the_tightest_bound() {
        let p = policy();
        let limits = OtpChannelLimits {
            max_per_hour: 3,
            max_per_day: 10,
            cooldown_minutes: 2,
        };
        let now = Utc::now();

        // Only the cooldown is active.
        let usage = ChannelUsage {
            issued_last_hour: 1,
            issued_last_day: 1,
            last_issued_at: Some(now - Duration::seconds(60)),
        };
        let wait = p.next_allowed_in(&limits, &usage, now).unwrap();
        assert!(wait <= Duration::minutes(1));

        // Hourly cap pushes the bound out to the window edge.
        let usage = ChannelUsage {
            issued_last_hour: 3,
            issued_last_day: 3,
            last_issued_at: Some(now - Duration::minutes(10)),
        };
        let wait = p.next_allowed_in(&limits, &usage, now).unwrap();
        assert!(wait > Duration::minutes(2));
        assert!(wait <= Duration::hours(1));

        // Nothing outstanding.
        assert!(p.next_allowed_in(&limits, &clear_usage(), now).is_none());
    }

    #[test]
    fn wait_text_rounds_up_to_minutes() {
        assert_eq!(wait_text(Duration::seconds(30)), "under a minute");
        assert_eq!(wait_text(Duration::seconds(61)), "about 2 minutes");
        assert_eq!(wait_text(Duration::seconds(60)), "about 1 minute");
    }
}
