use std::sync::Arc;

use crate::config::Config;
use crate::services::appwrite_api::AppwriteApiService;
use crate::services::lead_service::LeadSink;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub appwrite: AppwriteApiService,
    pub leads: Arc<dyn LeadSink>,
}
