use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::{TokenIssuer, TokenVerifier};
use crate::database::AccountStore;
use crate::handlers::{self, method_not_allowed, protected, public};
use crate::middleware::{require_account_token, AccessGate};

/// Shared per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AccountStore>,
    pub issuer: Arc<TokenIssuer>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    /// Build state around `store`, keying issuer and verifier with `secret`.
    pub fn new(store: Arc<dyn AccountStore>, secret: &str, expires_at: i64) -> Self {
        Self {
            store,
            issuer: Arc::new(TokenIssuer::new(secret, expires_at)),
            verifier: Arc::new(TokenVerifier::new(secret)),
        }
    }

    pub fn gate(&self) -> AccessGate {
        AccessGate::new(self.verifier.clone(), self.store.clone())
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(public::health))
        .merge(account_public_routes())
        .merge(account_protected_routes(state.gate()))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn account_public_routes() -> Router<AppState> {
    Router::new().route(
        "/account",
        get(public::account_list)
            .post(public::account_create)
            .fallback(method_not_allowed),
    )
}

fn account_protected_routes(gate: AccessGate) -> Router<AppState> {
    Router::new()
        .route(
            "/account/:id",
            get(protected::account_get)
                .delete(protected::account_delete)
                .fallback(method_not_allowed),
        )
        .route("/transfer", post(protected::transfer).fallback(method_not_allowed))
        .route_layer(from_fn_with_state(gate, require_account_token))
}
