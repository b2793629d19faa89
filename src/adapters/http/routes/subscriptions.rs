use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    adapters::http::app_state::AppState,
    app_error::{AppError, AppResult},
    application::billing_period::format_month_year,
    domain::entities::subscription::Subscription,
    use_cases::subscription::SubscriptionInput,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscriptions).post(create_subscription))
        .route("/total-cost", get(total_cost))
        .route(
            "/{id}",
            get(get_subscription)
                .put(update_subscription)
                .delete(delete_subscription),
        )
}

#[derive(Serialize)]
struct SubscriptionResponse {
    id: Uuid,
    service_name: String,
    price: i64,
    user_id: String,
    start_date: String,
    end_date: Option<String>,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(s: Subscription) -> Self {
        Self {
            id: s.id,
            service_name: s.service_name,
            price: s.price,
            user_id: s.user_id,
            start_date: format_month_year(s.start_date),
            end_date: s.end_date.map(format_month_year),
        }
    }
}

#[derive(Serialize)]
struct SubscriptionsResponse {
    items: Vec<SubscriptionResponse>,
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    user_id: String,
}

#[derive(Deserialize)]
struct TotalCostQuery {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    service_name: String,
    #[serde(default)]
    period_start: String,
    #[serde(default)]
    period_end: String,
}

#[derive(Serialize)]
struct TotalCostResponse {
    total_cost: i64,
}

/// POST /subscriptions
async fn create_subscription(
    State(app_state): State<AppState>,
    payload: Result<Json<SubscriptionInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload.map_err(invalid_body)?;

    let created = app_state.subscription_use_cases.create(input).await?;

    Ok((StatusCode::CREATED, Json(SubscriptionResponse::from(created))))
}

/// DELETE /subscriptions/{id}
async fn delete_subscription(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    app_state.subscription_use_cases.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /subscriptions/{id}
async fn get_subscription(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;

    let subscription = app_state.subscription_use_cases.get(id).await?;
    tracing::info!(subscription_id = %id, "Subscription found");

    Ok(Json(SubscriptionResponse::from(subscription)))
}

/// GET /subscriptions?user_id=
async fn list_subscriptions(
    State(app_state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let subscriptions = app_state
        .subscription_use_cases
        .list_by_user(&query.user_id)
        .await?;
    tracing::info!(user_id = %query.user_id, count = subscriptions.len(), "Subscriptions listed");

    Ok(Json(SubscriptionsResponse {
        items: subscriptions.into_iter().map(Into::into).collect(),
    }))
}

/// PUT /subscriptions/{id}
async fn update_subscription(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SubscriptionInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let Json(input) = payload.map_err(invalid_body)?;

    let updated = app_state.subscription_use_cases.update(id, input).await?;

    Ok(Json(SubscriptionResponse::from(updated)))
}

/// GET /subscriptions/total-cost?user_id=&service_name=&period_start=MM-YYYY&period_end=MM-YYYY
/// `period_end` is exclusive: `01-2024`..`04-2024` bills January through March.
async fn total_cost(
    State(app_state): State<AppState>,
    Query(query): Query<TotalCostQuery>,
) -> AppResult<impl IntoResponse> {
    let total_cost = app_state
        .subscription_use_cases
        .total_cost(
            &query.user_id,
            &query.service_name,
            &query.period_start,
            &query.period_end,
        )
        .await?;
    tracing::info!(
        user_id = %query.user_id,
        service_name = %query.service_name,
        total_cost,
        "Total cost calculated"
    );

    Ok(Json(TotalCostResponse { total_cost }))
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidInput(format!("invalid subscription id {raw:?}")))
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::InvalidInput(format!("invalid request body: {}", rejection.body_text()))
}
