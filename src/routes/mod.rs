pub mod health;
pub mod packets;
pub mod routers;
pub mod sniffers;
pub mod stats;
pub mod time;

use axum::http::StatusCode;
use axum::Router;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(packets::router())
        .merge(sniffers::router())
        .merge(routers::router())
        .merge(stats::router())
        .merge(time::router())
        .merge(crate::openapi::router())
        .with_state(state)
}

/// All sniffer-scoped endpoints take the sniffer MAC as a path segment; an
/// empty or blank value means the scope does not exist.
pub(crate) fn require_sniffer_mac(raw: &str) -> Result<String, (StatusCode, String)> {
    let sniffer_mac = raw.trim();
    if sniffer_mac.is_empty() {
        return Err((StatusCode::NOT_FOUND, "Sniffer not specified".to_string()));
    }
    Ok(sniffer_mac.to_string())
}
