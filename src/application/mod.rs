pub mod app_error;
pub mod billing_period;
pub mod proration;
pub mod use_cases;
