use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    adapters::persistence::PostgresPersistence,
    app_error::{AppError, AppResult},
    application::{billing_period::BillingPeriod, use_cases::subscription::SubscriptionRepo},
    domain::entities::subscription::Subscription,
};

// Subscription row as stored in the db.
#[derive(FromRow)]
struct SubscriptionDb {
    id: Uuid,
    service_name: String,
    price: i64,
    user_id: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl From<SubscriptionDb> for Subscription {
    fn from(row: SubscriptionDb) -> Self {
        Subscription {
            id: row.id,
            service_name: row.service_name,
            price: row.price,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
        }
    }
}

const SELECT_COLS: &str = "id, service_name, price, user_id, start_date, end_date";

#[async_trait]
impl SubscriptionRepo for PostgresPersistence {
    async fn save(&self, subscription: &Subscription) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO subscriptions (id, service_name, price, user_id, start_date, end_date)
               VALUES ($1, $2, $3, $4, $5, $6)"#,
        )
        .bind(subscription.id)
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(&subscription.user_id)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Subscription> {
        let row = sqlx::query_as::<_, SubscriptionDb>(&format!(
            "SELECT {} FROM subscriptions WHERE id = $1",
            SELECT_COLS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)?;

        row.map(Subscription::from).ok_or(AppError::NotFound)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionDb>(&format!(
            "SELECT {} FROM subscriptions WHERE user_id = $1 ORDER BY start_date, id",
            SELECT_COLS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn update(&self, subscription: &Subscription) -> AppResult<()> {
        let result = sqlx::query(
            r#"UPDATE subscriptions
               SET service_name = $1, price = $2, user_id = $3, start_date = $4, end_date = $5,
                   updated_at = now()
               WHERE id = $6"#,
        )
        .bind(&subscription.service_name)
        .bind(subscription.price)
        .bind(&subscription.user_id)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.id)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn find_for_period(
        &self,
        user_id: &str,
        service_name: &str,
        period: &BillingPeriod,
    ) -> AppResult<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionDb>(&format!(
            r#"SELECT {}
               FROM subscriptions
               WHERE user_id = $1
                 AND service_name = $2
                 AND (end_date IS NULL OR end_date > $3)
                 AND start_date < $4"#,
            SELECT_COLS
        ))
        .bind(user_id)
        .bind(service_name)
        .bind(period.start)
        .bind(period.end)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(rows.into_iter().map(Subscription::from).collect())
    }
}
