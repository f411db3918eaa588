use std::sync::Arc;

use crate::application::services::{
    BatchService, IngestionService, ResponseService, TenantResolver, TextResponseService,
};

#[derive(Clone)]
pub struct AppState {
    pub tenants: Arc<TenantResolver>,
    pub ingestion_service: Arc<IngestionService>,
    pub text_response_service: Arc<TextResponseService>,
    pub batch_service: Arc<BatchService>,
    pub response_service: Arc<ResponseService>,
}
