use axum::{
    Router,
    body::Body,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use posyandu_core::health::healthz;
use posyandu_core::middleware::{propagate_request_id_layer, request_id_layer, request_span};

use crate::handlers::{
    account::{create_account, create_accounts_bulk, register_parent},
    health::readyz,
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Accounts
        .route("/accounts", post(create_account))
        .route("/accounts/parents", post(register_parent))
        .route("/accounts/bulk", post(create_accounts_bulk))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(request_span::<Body>))
        .layer(request_id_layer())
        .with_state(state)
}
