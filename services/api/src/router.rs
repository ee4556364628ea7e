use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use tempmail_core::health::{healthz, readyz};
use tempmail_core::middleware::{cors_layer, propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    admin::{admin_login, generate_code, get_stats, list_codes, revoke_code},
    mailbox::{generate_address, list_addresses},
    message::{delete_message, get_message, ingest_message, list_messages},
    session::verify_code,
};
use crate::state::AppState;

/// Router-level switches that do not belong in handler state.
#[derive(Debug, Clone, Default)]
pub struct RouterOptions {
    pub cors_origins: Vec<String>,
    /// Mount `POST /api/mock-email`.
    pub mock_ingest_enabled: bool,
}

pub fn build_router(state: AppState, options: &RouterOptions) -> Router {
    let mut api = Router::new()
        // Session
        .route("/verify-code", post(verify_code))
        // Mailbox
        .route("/email/generate", post(generate_address))
        .route("/emails", get(list_addresses))
        // Messages
        .route("/messages", get(list_messages))
        .route("/messages/{id}", get(get_message))
        .route("/messages/{id}", delete(delete_message))
        // Admin
        .route("/admin/login", post(admin_login))
        .route("/admin/generate-code", post(generate_code))
        .route("/admin/codes", get(list_codes))
        .route("/admin/codes/{id}", delete(revoke_code))
        .route("/admin/stats", get(get_stats));

    if options.mock_ingest_enabled {
        api = api.route("/mock-email", post(ingest_message));
    }

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz::<AppState>))
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(&options.cors_origins))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
}
