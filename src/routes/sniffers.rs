use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};

use crate::error::map_db_error;
use crate::state::AppState;
use crate::store::{Sniffer, SnifferStore};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub(crate) struct SnifferBody {
    #[serde(rename = "MAC", default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
}

impl From<Sniffer> for SnifferBody {
    fn from(sniffer: Sniffer) -> Self {
        Self {
            mac: sniffer.mac,
            name: sniffer.name,
            location: sniffer.location,
        }
    }
}

impl From<SnifferBody> for Sniffer {
    fn from(body: SnifferBody) -> Self {
        Self {
            mac: body.mac,
            name: body.name,
            location: body.location,
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/sniffers",
    tag = "sniffers",
    responses((status = 200, description = "Registered sniffers", body = Vec<SnifferBody>))
)]
pub(crate) async fn list_sniffers(
    State(state): State<AppState>,
) -> Result<Json<Vec<SnifferBody>>, (StatusCode, String)> {
    let sniffers = state.store.sniffers().await.map_err(map_db_error)?;
    Ok(Json(sniffers.into_iter().map(SnifferBody::from).collect()))
}

#[utoipa::path(
    post,
    path = "/sniffers",
    tag = "sniffers",
    request_body = SnifferBody,
    responses(
        (status = 201, description = "Sniffer registered", body = SnifferBody),
        (status = 400, description = "Missing MAC"),
        (status = 500, description = "Store failure")
    )
)]
pub(crate) async fn create_sniffer(
    State(state): State<AppState>,
    Json(payload): Json<SnifferBody>,
) -> Result<(StatusCode, Json<SnifferBody>), (StatusCode, String)> {
    if payload.mac.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Invalid sniffer".to_string()));
    }

    state
        .store
        .create_sniffer(&payload.clone().into())
        .await
        .map_err(map_db_error)?;

    Ok((StatusCode::CREATED, Json(payload)))
}

#[utoipa::path(
    put,
    path = "/sniffers/{sniffer_mac}",
    tag = "sniffers",
    request_body = SnifferBody,
    params(("sniffer_mac" = String, Path, description = "Sniffer MAC")),
    responses(
        (status = 200, description = "Sniffer replaced"),
        (status = 400, description = "Missing MAC"),
        (status = 500, description = "Store failure")
    )
)]
pub(crate) async fn update_sniffer(
    State(state): State<AppState>,
    Path(sniffer_mac): Path<String>,
    Json(payload): Json<SnifferBody>,
) -> Result<StatusCode, (StatusCode, String)> {
    let sniffer_mac = sniffer_mac.trim().to_string();
    if sniffer_mac.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Invalid sniffer".to_string()));
    }

    // The path segment is authoritative; the body cannot re-key the record.
    let sniffer = Sniffer {
        mac: sniffer_mac,
        name: payload.name,
        location: payload.location,
    };

    state
        .store
        .update_sniffer(&sniffer)
        .await
        .map_err(map_db_error)?;

    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sniffers", get(list_sniffers))
        .route("/sniffers", post(create_sniffer))
        .route("/sniffers/{sniffer_mac}", put(update_sniffer))
}
