use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_error::{AppError, AppResult},
    application::{
        billing_period::{BillingPeriod, format_month_year, parse_month_year, parse_optional_month_year},
        proration::{CostQuery, sum_total_cost},
    },
    domain::entities::subscription::Subscription,
};

#[async_trait]
pub trait SubscriptionRepo: Send + Sync {
    async fn save(&self, subscription: &Subscription) -> AppResult<()>;
    /// Fails with `AppError::NotFound` when no row has `id`.
    async fn delete(&self, id: Uuid) -> AppResult<()>;
    /// Fails with `AppError::NotFound` when no row has `id`.
    async fn get_by_id(&self, id: Uuid) -> AppResult<Subscription>;
    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Subscription>>;
    /// Replaces every field but `id`. Fails with `AppError::NotFound` when no row has `subscription.id`.
    async fn update(&self, subscription: &Subscription) -> AppResult<()>;
    /// Subscriptions of `user_id` for `service_name` whose active interval may overlap `period`.
    async fn find_for_period(
        &self,
        user_id: &str,
        service_name: &str,
        period: &BillingPeriod,
    ) -> AppResult<Vec<Subscription>>;
}

/// Client-supplied subscription fields, dates as `MM-YYYY`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubscriptionInput {
    #[validate(length(min = 1, message = "service_name must not be empty"))]
    pub service_name: String,
    #[validate(range(min = 0, message = "price must not be negative"))]
    pub price: i64,
    #[validate(length(min = 1, message = "user_id must not be empty"))]
    pub user_id: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
}

impl SubscriptionInput {
    /// Builds the stored record, field by field.
    pub fn into_subscription(mut self, id: Uuid) -> AppResult<Subscription> {
        self.service_name = self.service_name.trim().to_string();
        self.user_id = self.user_id.trim().to_string();
        self.validate()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let start_date = parse_month_year(self.start_date.trim())?;
        let end_date = parse_optional_month_year(self.end_date.as_deref())?;

        if let Some(end) = end_date
            && end <= start_date
        {
            return Err(AppError::InvalidInput(format!(
                "end_date {} must be after start_date {}",
                format_month_year(end),
                format_month_year(start_date)
            )));
        }

        Ok(Subscription {
            id,
            service_name: self.service_name,
            price: self.price,
            user_id: self.user_id,
            start_date,
            end_date,
        })
    }
}

#[derive(Clone)]
pub struct SubscriptionUseCases {
    repo: Arc<dyn SubscriptionRepo>,
}

impl SubscriptionUseCases {
    pub fn new(repo: Arc<dyn SubscriptionRepo>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, input), fields(user_id = %input.user_id, service_name = %input.service_name))]
    pub async fn create(&self, input: SubscriptionInput) -> AppResult<Subscription> {
        let subscription = input.into_subscription(Uuid::new_v4())?;
        self.repo.save(&subscription).await?;
        tracing::info!(subscription_id = %subscription.id, "Subscription saved");
        Ok(subscription)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        tracing::info!(subscription_id = %id, "Subscription deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> AppResult<Subscription> {
        self.repo.get_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Subscription>> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(AppError::InvalidInput("user_id is required".into()));
        }
        self.repo.list_by_user(user_id).await
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: Uuid, input: SubscriptionInput) -> AppResult<Subscription> {
        let subscription = input.into_subscription(id)?;
        self.repo.update(&subscription).await?;
        tracing::info!(subscription_id = %id, "Subscription updated");
        Ok(subscription)
    }

    /// Total billed to `user_id` for `service_name` over `[period_start, period_end)`.
    #[instrument(skip(self))]
    pub async fn total_cost(
        &self,
        user_id: &str,
        service_name: &str,
        period_start: &str,
        period_end: &str,
    ) -> AppResult<i64> {
        let (user_id, service_name) = (user_id.trim(), service_name.trim());
        if user_id.is_empty() {
            return Err(AppError::InvalidInput("user_id is required".into()));
        }
        if service_name.is_empty() {
            return Err(AppError::InvalidInput("service_name is required".into()));
        }

        let period = BillingPeriod::parse(period_start.trim(), period_end.trim())?;

        let candidates = self
            .repo
            .find_for_period(user_id, service_name, &period)
            .await?;

        let total = sum_total_cost(
            &candidates,
            &CostQuery {
                user_id,
                service_name,
                period,
            },
        )?;

        tracing::debug!(candidates = candidates.len(), total, "Computed total cost");
        Ok(total)
    }
}
