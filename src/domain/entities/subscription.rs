use chrono::NaiveDate;
use uuid::Uuid;

/// A recurring monthly charge for one service, billed over `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    pub id: Uuid,
    pub service_name: String,
    /// Cost of one full billing month.
    pub price: i64,
    pub user_id: String,
    pub start_date: NaiveDate,
    /// `None` while the subscription is still running.
    pub end_date: Option<NaiveDate>,
}
