mod audio_form;
mod batch;
mod error;
mod health;
mod recordings;
mod text_response;
mod transcribe;
mod widget_config;
mod widget_tenant;

pub use batch::{
    batch_cancel_handler, batch_confirm_handler, batch_quote_handler, batch_status_handler,
};
pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use recordings::retranscribe_handler;
pub use text_response::text_response_handler;
pub use transcribe::{transcribe_handler, upload_handler};
pub use widget_config::widget_config_handler;
pub use widget_tenant::{PROJECT_KEY_HEADER, WidgetTenant, request_origin};
