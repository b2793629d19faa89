//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::entities::subscription::Subscription;

/// Create a test subscription with sensible defaults.
pub fn create_test_subscription(overrides: impl FnOnce(&mut Subscription)) -> Subscription {
    let mut subscription = Subscription {
        id: Uuid::new_v4(),
        service_name: "Yandex Plus".to_string(),
        price: 400,
        user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".to_string(),
        start_date: test_month(2025, 7),
        end_date: None,
    };
    overrides(&mut subscription);
    subscription
}

/// First day of the given month.
pub fn test_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("valid test month")
}
