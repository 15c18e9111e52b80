use axum::{extract::State, Extension, Json};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::database::models::Account;
use crate::error::ApiError;
use crate::middleware::AuthorizedAccount;

/// GET /account/:id - the account the gate already resolved
pub async fn account_get(Extension(AuthorizedAccount(account)): Extension<AuthorizedAccount>) -> Json<Account> {
    Json(account)
}

/// DELETE /account/:id
pub async fn account_delete(
    State(state): State<AppState>,
    Extension(AuthorizedAccount(account)): Extension<AuthorizedAccount>,
) -> Result<Json<Value>, ApiError> {
    state.store.delete_account(account.id).await?;
    tracing::info!("Deleted account {}", account.id);
    Ok(Json(json!({ "deleted": account.id })))
}
