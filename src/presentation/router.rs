use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    batch_cancel_handler, batch_confirm_handler, batch_quote_handler, batch_status_handler,
    health_handler, retranscribe_handler, text_response_handler, transcribe_handler,
    upload_handler, widget_config_handler,
};
use crate::presentation::state::AppState;

/// Multipart framing allowance on top of the audio size limit.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn create_router(state: AppState, max_audio_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let widget = Router::new()
        .route("/api/widget-config/{project_key}", get(widget_config_handler))
        .route("/api/transcribe", post(transcribe_handler))
        .route("/api/upload", post(upload_handler))
        .route("/api/text-response", post(text_response_handler))
        .layer(DefaultBodyLimit::max(
            max_audio_bytes + MULTIPART_OVERHEAD_BYTES,
        ));

    let dashboard = Router::new()
        .route(
            "/api/projects/{project_id}/transcribe-batch",
            post(batch_quote_handler),
        )
        .route(
            "/api/projects/{project_id}/transcribe-batch/{batch_id}",
            get(batch_status_handler),
        )
        .route(
            "/api/projects/{project_id}/transcribe-batch/{batch_id}/confirm",
            post(batch_confirm_handler),
        )
        .route(
            "/api/projects/{project_id}/transcribe-batch/{batch_id}/cancel",
            post(batch_cancel_handler),
        )
        .route(
            "/api/projects/{project_id}/recordings/{response_id}/retranscribe",
            post(retranscribe_handler),
        );

    Router::new()
        .route("/health", get(health_handler))
        .merge(widget)
        .merge(dashboard)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
