//! In-memory mock implementation of the subscription repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use crate::{
    app_error::{AppError, AppResult},
    application::{billing_period::BillingPeriod, use_cases::subscription::SubscriptionRepo},
    domain::entities::subscription::Subscription,
};

/// In-memory implementation of SubscriptionRepo for testing.
#[derive(Default)]
pub struct InMemorySubscriptionRepo {
    pub subscriptions: Mutex<HashMap<Uuid, Subscription>>,
}

impl InMemorySubscriptionRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the repo with initial subscriptions for testing.
    pub fn with_subscriptions(subscriptions: Vec<Subscription>) -> Self {
        let map: HashMap<Uuid, Subscription> =
            subscriptions.into_iter().map(|s| (s.id, s)).collect();
        Self {
            subscriptions: Mutex::new(map),
        }
    }

    /// Get all subscriptions (for test assertions).
    pub fn get_all(&self) -> Vec<Subscription> {
        self.subscriptions.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl SubscriptionRepo for InMemorySubscriptionRepo {
    async fn save(&self, subscription: &Subscription) -> AppResult<()> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        if subscriptions.contains_key(&subscription.id) {
            return Err(AppError::InvalidInput(
                "A record with this value already exists".into(),
            ));
        }
        subscriptions.insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.subscriptions
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Subscription> {
        self.subscriptions
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(AppError::NotFound)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Subscription>> {
        let mut listed: Vec<Subscription> = self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        listed.sort_by_key(|s| (s.start_date, s.id));
        Ok(listed)
    }

    async fn update(&self, subscription: &Subscription) -> AppResult<()> {
        let mut subscriptions = self.subscriptions.lock().unwrap();
        let existing = subscriptions
            .get_mut(&subscription.id)
            .ok_or(AppError::NotFound)?;
        *existing = subscription.clone();
        Ok(())
    }

    async fn find_for_period(
        &self,
        user_id: &str,
        service_name: &str,
        period: &BillingPeriod,
    ) -> AppResult<Vec<Subscription>> {
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .values()
            .filter(|s| {
                s.user_id == user_id
                    && s.service_name == service_name
                    && s.end_date.is_none_or(|end| end > period.start)
                    && s.start_date < period.end
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_subscription, test_month};

    #[tokio::test]
    async fn save_rejects_duplicate_id() {
        let repo = InMemorySubscriptionRepo::new();
        let sub = create_test_subscription(|_| {});

        repo.save(&sub).await.unwrap();
        assert!(matches!(
            repo.save(&sub).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn find_for_period_applies_overlap_predicate() {
        let touching_start = create_test_subscription(|s| {
            s.start_date = test_month(2024, 1);
            s.end_date = Some(test_month(2024, 3));
        });
        let touching_end = create_test_subscription(|s| s.start_date = test_month(2024, 6));
        let overlapping = create_test_subscription(|s| s.start_date = test_month(2024, 4));
        let repo = InMemorySubscriptionRepo::with_subscriptions(vec![
            touching_start,
            touching_end,
            overlapping.clone(),
        ]);

        let period = BillingPeriod::new(test_month(2024, 3), test_month(2024, 6)).unwrap();
        let found = repo
            .find_for_period(&overlapping.user_id, &overlapping.service_name, &period)
            .await
            .unwrap();

        assert_eq!(found, vec![overlapping]);
    }

    #[tokio::test]
    async fn list_by_user_is_ordered_by_start_date() {
        let later = create_test_subscription(|s| s.start_date = test_month(2025, 1));
        let earlier = create_test_subscription(|s| s.start_date = test_month(2023, 1));
        let repo =
            InMemorySubscriptionRepo::with_subscriptions(vec![later.clone(), earlier.clone()]);

        let listed = repo.list_by_user(&later.user_id).await.unwrap();
        assert_eq!(listed, vec![earlier, later]);
    }
}
