use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "crowd-server-rs",
        description = "Wi-Fi probe telemetry ingestion and crowd statistics"
    ),
    paths(
        crate::routes::health::healthz_handler,
        crate::routes::packets::create_packet,
        crate::routes::packets::create_packets,
        crate::routes::sniffers::list_sniffers,
        crate::routes::sniffers::create_sniffer,
        crate::routes::sniffers::update_sniffer,
        crate::routes::routers::create_routers,
        crate::routes::routers::list_routers,
        crate::routes::stats::get_crowd,
        crate::routes::stats::get_total_sniffed_daily,
        crate::routes::time::get_time,
    ),
    components(schemas(
        crate::routes::health::HealthResponse,
        crate::routes::packets::SnifferPacket,
        crate::routes::sniffers::SnifferBody,
        crate::routes::routers::RouterExternal,
        crate::routes::stats::TotalSniffedResponse,
        crate::routes::time::TimeResponse,
        crate::services::crowd::CrowdSample,
    ))
)]
pub struct ApiDoc;

pub fn openapi_json() -> serde_json::Value {
    serde_json::to_value(ApiDoc::openapi()).unwrap_or_default()
}

pub(crate) async fn serve_openapi() -> Json<serde_json::Value> {
    Json(openapi_json())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}
