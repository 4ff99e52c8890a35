//! Subscription use cases.
//!
//! Billing is out of scope; subscriptions enter the system through the
//! referral engine (trial creation, extensions) and admin grants, so
//! this service is read-mostly.

use std::sync::Arc;

use prepdeck_core::result::AppResult;
use prepdeck_database::repositories::SubscriptionRepository;
use prepdeck_entity::subscription::plan::Plan;
use prepdeck_entity::subscription::Subscription;

use crate::context::RequestContext;

/// A user's subscription state as shown on the account page.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SubscriptionOverview {
    /// The currently active subscription, if any.
    pub active: Option<Subscription>,
    /// Full subscription history, newest first.
    pub history: Vec<Subscription>,
}

/// Read access to subscriptions and plans.
#[derive(Debug, Clone)]
pub struct SubscriptionService {
    subscription_repo: Arc<SubscriptionRepository>,
}

impl SubscriptionService {
    /// Creates a new subscription service.
    pub fn new(subscription_repo: Arc<SubscriptionRepository>) -> Self {
        Self { subscription_repo }
    }

    /// Returns the current user's subscription state.
    pub async fn my_subscription(&self, ctx: &RequestContext) -> AppResult<SubscriptionOverview> {
        let active = self.subscription_repo.find_active_by_user(ctx.user_id).await?;
        let history = self.subscription_repo.list_for_user(ctx.user_id).await?;
        Ok(SubscriptionOverview { active, history })
    }

    /// Lists the plans students can currently subscribe to.
    pub async fn plans(&self) -> AppResult<Vec<Plan>> {
        self.subscription_repo.list_active_plans().await
    }

    /// Flips overdue subscriptions to expired. Used by the worker sweep.
    pub async fn expire_overdue(&self) -> AppResult<u64> {
        self.subscription_repo.expire_overdue().await
    }
}
