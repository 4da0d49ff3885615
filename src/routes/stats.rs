use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::error::map_db_error;
use crate::routes::require_sniffer_mac;
use crate::services::crowd::CrowdSample;
use crate::state::AppState;
use crate::store::PacketStore;

const DAILY_WINDOW_SECONDS: i64 = 24 * 3600;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw crowd query parameters. Range mode needs all three; anything missing
/// or unparsable degrades to instant mode.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub(crate) struct CrowdQuery {
    from: Option<String>,
    until: Option<String>,
    #[serde(rename = "for")]
    for_every: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub(crate) struct TotalSniffedResponse {
    pub count: i64,
}

fn parse_range(query: &CrowdQuery) -> Option<(i64, i64, i64)> {
    let from = query.from.as_deref()?.parse::<i64>().ok()?;
    let until = query.until.as_deref()?.parse::<i64>().ok()?;
    let step = query.for_every.as_deref()?.parse::<i64>().ok()?;
    (step > 0).then_some((from, until, step))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/sniffers/{sniffer_mac}/stats/crowd",
    tag = "stats",
    params(
        ("sniffer_mac" = String, Path, description = "Sniffer MAC"),
        ("from" = Option<String>, Query, description = "Range start, epoch seconds"),
        ("until" = Option<String>, Query, description = "Range end, epoch seconds"),
        ("for" = Option<String>, Query, description = "Sampling step, seconds"),
    ),
    responses(
        (status = 200, description = "Occupancy samples, ascending by time", body = Vec<CrowdSample>),
        (status = 404, description = "Sniffer not specified"),
        (status = 500, description = "Store failure")
    )
)]
pub(crate) async fn get_crowd(
    State(state): State<AppState>,
    Path(sniffer_mac): Path<String>,
    Query(query): Query<CrowdQuery>,
) -> Result<Json<Vec<CrowdSample>>, (StatusCode, String)> {
    let sniffer_mac = require_sniffer_mac(&sniffer_mac)?;

    if let Some((from, until, step)) = parse_range(&query) {
        let samples = state
            .sampler
            .sample_range(state.store.as_ref(), &sniffer_mac, from, until, step)
            .await
            .map_err(map_db_error)?;
        return Ok(Json(samples));
    }

    let sample = state
        .sampler
        .sample_now(state.store.as_ref(), &sniffer_mac)
        .await
        .map_err(map_db_error)?;
    Ok(Json(vec![sample]))
}

#[utoipa::path(
    get,
    path = "/sniffers/{sniffer_mac}/stats/total-sniffed/daily",
    tag = "stats",
    params(("sniffer_mac" = String, Path, description = "Sniffer MAC")),
    responses(
        (status = 200, description = "Distinct devices over the trailing 24 hours", body = TotalSniffedResponse),
        (status = 404, description = "Sniffer not specified"),
        (status = 500, description = "Store failure")
    )
)]
pub(crate) async fn get_total_sniffed_daily(
    State(state): State<AppState>,
    Path(sniffer_mac): Path<String>,
) -> Result<Json<TotalSniffedResponse>, (StatusCode, String)> {
    let sniffer_mac = require_sniffer_mac(&sniffer_mac)?;

    let now = state.clock.now().timestamp();
    let count = state
        .store
        .unique_device_count_between(&sniffer_mac, now - DAILY_WINDOW_SECONDS, now)
        .await
        .map_err(map_db_error)?;

    Ok(Json(TotalSniffedResponse { count }))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sniffers/{sniffer_mac}/stats/crowd", get(get_crowd))
        .route(
            "/sniffers/{sniffer_mac}/stats/total-sniffed/daily",
            get(get_total_sniffed_daily),
        )
}
