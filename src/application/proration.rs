//! Whole-month proration of subscription prices over a query window.
//!
//! A record is charged `price` for every calendar month in which its active
//! interval and the window share at least one day. The end of the overlap is
//! exclusive, so it is stepped back one day before truncating to a month:
//! an overlap ending on the 1st never bills the month it merely touches.

use chrono::{Days, NaiveDate};

use crate::{
    app_error::{AppError, AppResult},
    application::billing_period::{BillingPeriod, month_index},
    domain::entities::subscription::Subscription,
};

/// Identifies whose charges are being totalled.
#[derive(Debug, Clone, Copy)]
pub struct CostQuery<'a> {
    pub user_id: &'a str,
    pub service_name: &'a str,
    pub period: BillingPeriod,
}

impl CostQuery<'_> {
    /// Candidate filter. Matches the repository-side pre-filter so a raw
    /// snapshot and a pre-filtered one yield the same total.
    pub fn matches(&self, record: &Subscription) -> bool {
        record.user_id == self.user_id
            && record.service_name == self.service_name
            && record.end_date.is_none_or(|end| end > self.period.start)
            && record.start_date < self.period.end
    }
}

/// `[actual_start, actual_end)` or `None` when the record never overlaps the window.
pub fn overlap(record: &Subscription, period: &BillingPeriod) -> Option<(NaiveDate, NaiveDate)> {
    let actual_start = record.start_date.max(period.start);
    let actual_end = record
        .end_date
        .map_or(period.end, |end| end.min(period.end));

    (actual_start < actual_end).then_some((actual_start, actual_end))
}

/// Number of billing months `record` is charged for within `period`.
pub fn billed_months(record: &Subscription, period: &BillingPeriod) -> i64 {
    let Some((actual_start, actual_end)) = overlap(record, period) else {
        return 0;
    };

    // actual_end > actual_start, so the day before always exists.
    let last_billed_day = actual_end
        .checked_sub_days(Days::new(1))
        .unwrap_or(actual_start);

    (month_index(last_billed_day) - month_index(actual_start) + 1).max(0)
}

/// Sum of `price x billed months` over every record matching `query`.
///
/// Fails with `AppError::Internal` when the total does not fit in an `i64`.
pub fn sum_total_cost(records: &[Subscription], query: &CostQuery<'_>) -> AppResult<i64> {
    records
        .iter()
        .filter(|record| query.matches(record))
        .try_fold(0i64, |total, record| {
            record
                .price
                .max(0)
                .checked_mul(billed_months(record, &query.period))
                .and_then(|charge| total.checked_add(charge))
                .ok_or_else(|| {
                    AppError::Internal(format!(
                        "total cost overflows at subscription {}",
                        record.id
                    ))
                })
        })
}
