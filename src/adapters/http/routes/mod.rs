pub mod subscriptions;

use axum::{Router, routing::get};

use crate::adapters::http::app_state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .nest("/subscriptions", subscriptions::router())
}

async fn root() -> &'static str {
    "Service start"
}
