use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};

use crate::error::map_db_error;
use crate::routes::require_sniffer_mac;
use crate::state::AppState;
use crate::store::{Packet, PacketStore};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Wire form of a sighting as reported by sniffer firmware. Field names
/// match the device payloads. Missing fields deserialize to their zero
/// values and are rejected by validation rather than by the JSON layer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub(crate) struct SnifferPacket {
    #[serde(rename = "MAC", default)]
    pub mac: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(rename = "RSSI", default)]
    pub rssi: f64,
}

impl SnifferPacket {
    fn is_valid(&self) -> bool {
        !self.mac.is_empty() && self.timestamp != 0
    }

    fn to_packet(&self, sniffer_mac: &str) -> Packet {
        Packet {
            device_mac: self.mac.clone(),
            timestamp: self.timestamp,
            rssi: self.rssi,
            sniffer_mac: sniffer_mac.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/sniffers/{sniffer_mac}/packets",
    tag = "packets",
    request_body = SnifferPacket,
    params(("sniffer_mac" = String, Path, description = "Sniffer MAC")),
    responses(
        (status = 201, description = "Packet stored", body = SnifferPacket),
        (status = 400, description = "Missing device MAC or timestamp"),
        (status = 404, description = "Sniffer not specified"),
        (status = 500, description = "Store failure")
    )
)]
pub(crate) async fn create_packet(
    State(state): State<AppState>,
    Path(sniffer_mac): Path<String>,
    Json(payload): Json<SnifferPacket>,
) -> Result<(StatusCode, Json<SnifferPacket>), (StatusCode, String)> {
    let sniffer_mac = require_sniffer_mac(&sniffer_mac)?;

    if !payload.is_valid() {
        return Err((StatusCode::BAD_REQUEST, "Invalid packet".to_string()));
    }

    state
        .store
        .create_packet(&payload.to_packet(&sniffer_mac))
        .await
        .map_err(map_db_error)?;

    Ok((StatusCode::CREATED, Json(payload)))
}

#[utoipa::path(
    post,
    path = "/sniffers/{sniffer_mac}/packets-collection",
    tag = "packets",
    request_body = Vec<SnifferPacket>,
    params(("sniffer_mac" = String, Path, description = "Sniffer MAC")),
    responses(
        (status = 201, description = "Valid subset stored; full batch echoed", body = Vec<SnifferPacket>),
        (status = 400, description = "Every packet in the batch is invalid"),
        (status = 404, description = "Sniffer not specified"),
        (status = 500, description = "Store failure")
    )
)]
pub(crate) async fn create_packets(
    State(state): State<AppState>,
    Path(sniffer_mac): Path<String>,
    Json(payload): Json<Vec<SnifferPacket>>,
) -> Result<(StatusCode, Json<Vec<SnifferPacket>>), (StatusCode, String)> {
    let sniffer_mac = require_sniffer_mac(&sniffer_mac)?;

    let valid: Vec<&SnifferPacket> = payload.iter().filter(|p| p.is_valid()).collect();
    if valid.is_empty() {
        return Err((StatusCode::BAD_REQUEST, "No valid packets".to_string()));
    }

    for packet in valid {
        state
            .store
            .create_packet(&packet.to_packet(&sniffer_mac))
            .await
            .map_err(map_db_error)?;
    }

    // The device expects its batch back unchanged, invalid entries included.
    Ok((StatusCode::CREATED, Json(payload)))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sniffers/{sniffer_mac}/packets", post(create_packet))
        .route(
            "/sniffers/{sniffer_mac}/packets-collection",
            post(create_packets),
        )
}
