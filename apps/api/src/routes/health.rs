use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use crate::dto::HealthView;
use crate::state::AppState;

/// `GET /health`, 503 when the store cannot serve queries.
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthView>) {
    let storage = state.ledger.backend();

    if state.ledger.health_check().await {
        (StatusCode::OK, Json(HealthView { status: "ok", storage }))
    } else {
        error!(storage, "Health check failed");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthView {
                status: "unavailable",
                storage,
            }),
        )
    }
}
