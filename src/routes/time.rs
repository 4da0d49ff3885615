use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

/// Server clock in epoch seconds. Sniffers poll this to compute query
/// instants compatible with the server's idea of time.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub(crate) struct TimeResponse {
    pub now: i64,
}

#[utoipa::path(
    get,
    path = "/time",
    tag = "time",
    responses((status = 200, description = "Current server time", body = TimeResponse))
)]
pub(crate) async fn get_time(State(state): State<AppState>) -> Json<TimeResponse> {
    Json(TimeResponse {
        now: state.clock.now().timestamp(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/time", get(get_time))
}
