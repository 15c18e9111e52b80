use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{TokenVerifier, TOKEN_HEADER};
use crate::database::{Account, AccountStore};
use crate::error::ApiError;

/// Outcome of evaluating one gated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Permit(Account),
    Deny(DenyReason),
}

/// Account resolved by the gate, inserted into request extensions on permit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizedAccount(pub Account);

/// Why a request was denied. Logged only; callers always see `permission denied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingToken,
    InvalidToken,
    InvalidResourceId,
    AccountUnavailable,
    AccountMismatch,
}

/// Ties a verified token to the account addressed by the request path.
#[derive(Clone)]
pub struct AccessGate {
    verifier: Arc<TokenVerifier>,
    store: Arc<dyn AccountStore>,
}

impl AccessGate {
    pub fn new(verifier: Arc<TokenVerifier>, store: Arc<dyn AccountStore>) -> Self {
        Self { verifier, store }
    }

    /// Permit only when `token` verifies and its account number matches the
    /// account stored under `resource_id`.
    pub async fn authorize(&self, token: Option<&str>, resource_id: Option<&str>) -> AccessDecision {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return AccessDecision::Deny(DenyReason::MissingToken);
        };

        let claims = match self.verifier.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Token rejected: {}", e);
                return AccessDecision::Deny(DenyReason::InvalidToken);
            }
        };

        let Some(id) = resource_id.and_then(|s| s.parse::<i64>().ok()) else {
            return AccessDecision::Deny(DenyReason::InvalidResourceId);
        };

        let account = match self.store.get_account_by_id(id).await {
            Ok(account) => account,
            Err(e) => {
                tracing::debug!("Account lookup for {} failed: {}", id, e);
                return AccessDecision::Deny(DenyReason::AccountUnavailable);
            }
        };

        if claims.account_number != account.number {
            return AccessDecision::Deny(DenyReason::AccountMismatch);
        }

        AccessDecision::Permit(account)
    }
}

/// Middleware guarding `/:id` routes with the account token in `x-jwt-token`.
///
/// Every denial collapses to the same 403 response. On permit the resolved
/// [`AuthorizedAccount`] is attached to the request and the wrapped handler's
/// response is returned as is.
pub async fn require_account_token(
    State(gate): State<AccessGate>,
    path: Option<Path<HashMap<String, String>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok());
    let resource_id = path
        .as_ref()
        .and_then(|Path(params)| params.get("id"))
        .map(String::as_str);

    let decision = gate.authorize(token, resource_id).await;

    match decision {
        AccessDecision::Permit(account) => {
            tracing::debug!("Access granted to account {}", account.id);
            request.extensions_mut().insert(AuthorizedAccount(account));
            Ok(next.run(request).await)
        }
        AccessDecision::Deny(reason) => {
            tracing::debug!("Access denied to {}: {:?}", request.uri().path(), reason);
            Err(ApiError::permission_denied())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenIssuer;
    use crate::database::MemoryStore;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Extension, Router,
    };
    use tower::ServiceExt;

    const SECRET: &str = "gate-secret";

    struct Fixture {
        gate: AccessGate,
        store: Arc<MemoryStore>,
        issuer: TokenIssuer,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let verifier = Arc::new(TokenVerifier::new(SECRET));
        Fixture {
            gate: AccessGate::new(verifier, store.clone()),
            store,
            issuer: TokenIssuer::new(SECRET, 15000),
        }
    }

    async fn create(store: &MemoryStore, first: &str) -> Account {
        store.create_account(Account::new(first, "bb")).await.unwrap()
    }

    #[tokio::test]
    async fn permits_matching_token() {
        let fx = fixture();
        let account = create(&fx.store, "aa").await;
        let token = fx.issuer.issue(&account).unwrap();

        let decision = fx.gate.authorize(Some(&token), Some(&account.id.to_string())).await;
        assert_eq!(decision, AccessDecision::Permit(account));
    }

    #[tokio::test]
    async fn denies_missing_or_empty_token() {
        let fx = fixture();
        let account = create(&fx.store, "aa").await;
        let id = account.id.to_string();

        assert_eq!(
            fx.gate.authorize(None, Some(&id)).await,
            AccessDecision::Deny(DenyReason::MissingToken)
        );
        assert_eq!(
            fx.gate.authorize(Some(""), Some(&id)).await,
            AccessDecision::Deny(DenyReason::MissingToken)
        );
    }

    #[tokio::test]
    async fn denies_foreign_signature() {
        let fx = fixture();
        let account = create(&fx.store, "aa").await;
        let token = TokenIssuer::new("someone-else", 15000).issue(&account).unwrap();

        let decision = fx.gate.authorize(Some(&token), Some(&account.id.to_string())).await;
        assert_eq!(decision, AccessDecision::Deny(DenyReason::InvalidToken));
    }

    #[tokio::test]
    async fn denies_unparseable_resource_id() {
        let fx = fixture();
        let account = create(&fx.store, "aa").await;
        let token = fx.issuer.issue(&account).unwrap();

        for id in [None, Some("abc"), Some("")] {
            let decision = fx.gate.authorize(Some(&token), id).await;
            assert_eq!(decision, AccessDecision::Deny(DenyReason::InvalidResourceId));
        }
    }

    #[tokio::test]
    async fn denies_unknown_account() {
        let fx = fixture();
        let account = create(&fx.store, "aa").await;
        let token = fx.issuer.issue(&account).unwrap();

        let decision = fx.gate.authorize(Some(&token), Some("999")).await;
        assert_eq!(decision, AccessDecision::Deny(DenyReason::AccountUnavailable));
    }

    #[tokio::test]
    async fn denies_token_for_other_account() {
        let fx = fixture();
        let owner = create(&fx.store, "aa").await;
        let mut other = create(&fx.store, "cc").await;
        if other.number == owner.number {
            other.number += 1;
        }
        let token = fx.issuer.issue(&other).unwrap();

        let decision = fx.gate.authorize(Some(&token), Some(&owner.id.to_string())).await;
        assert_eq!(decision, AccessDecision::Deny(DenyReason::AccountMismatch));
    }

    fn router(gate: AccessGate) -> Router {
        Router::new()
            .route(
                "/account/:id",
                get(|Extension(AuthorizedAccount(account)): Extension<AuthorizedAccount>| async move {
                    format!("inner {}", account.number)
                }),
            )
            .route("/transfer", get(|| async { "inner" }))
            .route_layer(from_fn_with_state(gate, require_account_token))
    }

    #[tokio::test]
    async fn middleware_runs_handler_on_permit() {
        let fx = fixture();
        let account = create(&fx.store, "aa").await;
        let token = fx.issuer.issue(&account).unwrap();

        let response = router(fx.gate)
            .oneshot(
                HttpRequest::get(format!("/account/{}", account.id))
                    .header(TOKEN_HEADER, token)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, format!("inner {}", account.number).as_bytes());
    }

    #[tokio::test]
    async fn middleware_denies_with_uniform_403() {
        let fx = fixture();
        let account = create(&fx.store, "aa").await;
        let token = fx.issuer.issue(&account).unwrap();

        let requests = vec![
            HttpRequest::get(format!("/account/{}", account.id)).body(Body::empty()).unwrap(),
            HttpRequest::get("/account/nope").header(TOKEN_HEADER, &token).body(Body::empty()).unwrap(),
            HttpRequest::get("/account/404").header(TOKEN_HEADER, &token).body(Body::empty()).unwrap(),
            HttpRequest::get("/transfer").header(TOKEN_HEADER, &token).body(Body::empty()).unwrap(),
        ];

        for request in requests {
            let response = router(fx.gate.clone()).oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(value, serde_json::json!({ "error": "permission denied", "code": 403 }));
        }
    }
}
