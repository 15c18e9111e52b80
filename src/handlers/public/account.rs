use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};

use crate::app::AppState;
use crate::auth::TOKEN_HEADER;
use crate::database::models::{Account, CreateAccountRequest};
use crate::error::ApiError;
use crate::handlers::read_json;

/// GET /account - list every account
pub async fn account_list(State(state): State<AppState>) -> Result<Json<Vec<Account>>, ApiError> {
    let accounts = state.store.get_accounts().await?;
    Ok(Json(accounts))
}

/// POST /account - create an account and issue its token
///
/// The token is handed back in the `x-jwt-token` response header; the body is
/// the stored account.
pub async fn account_create(
    State(state): State<AppState>,
    payload: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let request = read_json(payload)?;

    let account = state
        .store
        .create_account(Account::new(request.first_name, request.last_name))
        .await?;

    let token = state.issuer.issue(&account)?;
    tracing::info!("Issued token for account {} (number {})", account.id, account.number);

    Ok(([(TOKEN_HEADER, token)], Json(account)))
}
