use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::error::map_db_error;
use crate::routes::require_sniffer_mac;
use crate::state::AppState;
use crate::store::{RouterObservation, RouterStore};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Wire form of a nearby access point as reported by a sniffer scan.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub(crate) struct RouterExternal {
    #[serde(rename = "MAC", default)]
    pub mac: String,
    #[serde(rename = "SSID", default)]
    pub ssid: String,
}

impl From<RouterObservation> for RouterExternal {
    fn from(router: RouterObservation) -> Self {
        Self {
            mac: router.mac,
            ssid: router.ssid,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/sniffers/{sniffer_mac}/routers",
    tag = "routers",
    request_body = Vec<RouterExternal>,
    params(("sniffer_mac" = String, Path, description = "Sniffer MAC")),
    responses(
        (status = 201, description = "Valid subset stored", body = Vec<RouterExternal>),
        (status = 400, description = "Every router in the batch is invalid"),
        (status = 404, description = "Sniffer not specified"),
        (status = 500, description = "Store failure")
    )
)]
pub(crate) async fn create_routers(
    State(state): State<AppState>,
    Path(sniffer_mac): Path<String>,
    Json(payload): Json<Vec<RouterExternal>>,
) -> Result<(StatusCode, Json<Vec<RouterExternal>>), (StatusCode, String)> {
    let sniffer_mac = require_sniffer_mac(&sniffer_mac)?;

    let valid: Vec<RouterExternal> = payload.into_iter().filter(|r| !r.mac.is_empty()).collect();
    if valid.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No valid routers".to_string()));
    }

    let last_seen = state.clock.now().timestamp();
    for router in &valid {
        state
            .store
            .upsert_router(&RouterObservation {
                mac: router.mac.clone(),
                ssid: router.ssid.clone(),
                sniffer_mac: sniffer_mac.clone(),
                last_seen,
            })
            .await
            .map_err(map_db_error)?;
    }

    Ok((StatusCode::CREATED, Json(valid)))
}

#[utoipa::path(
    get,
    path = "/sniffers/{sniffer_mac}/routers",
    tag = "routers",
    params(("sniffer_mac" = String, Path, description = "Sniffer MAC")),
    responses(
        (status = 200, description = "Routers seen by this sniffer", body = Vec<RouterExternal>),
        (status = 404, description = "Sniffer not specified")
    )
)]
pub(crate) async fn list_routers(
    State(state): State<AppState>,
    Path(sniffer_mac): Path<String>,
) -> Result<Json<Vec<RouterExternal>>, (StatusCode, String)> {
    let sniffer_mac = require_sniffer_mac(&sniffer_mac)?;
    let routers = state
        .store
        .routers_by_sniffer(&sniffer_mac)
        .await
        .map_err(map_db_error)?;
    Ok(Json(routers.into_iter().map(RouterExternal::from).collect()))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sniffers/{sniffer_mac}/routers", post(create_routers))
        .route("/sniffers/{sniffer_mac}/routers", get(list_routers))
}
