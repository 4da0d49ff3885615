use crate::config::ServerConfig;
use crate::services::crowd::CrowdSampler;
use crate::store::Store;
use crate::time::Clock;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub sampler: Arc<CrowdSampler>,
}
