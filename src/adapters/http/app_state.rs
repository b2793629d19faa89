use std::sync::Arc;

use crate::{infra::config::AppConfig, use_cases::subscription::SubscriptionUseCases};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub subscription_use_cases: Arc<SubscriptionUseCases>,
}
