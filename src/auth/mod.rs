//! Signed account tokens.
//!
//! A token is an HS256 JWT whose claim set binds an account number. The
//! [`TokenIssuer`] mints one when an account is created and the
//! [`TokenVerifier`] checks it on every gated request. Both are built from a
//! secret handed to them at startup.

pub mod issuer;
pub mod verifier;

use serde::{Deserialize, Serialize};

use crate::database::Account;

pub use issuer::TokenIssuer;
pub use verifier::TokenVerifier;

/// Header that gated requests carry their token in
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Claim set carried by an account token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub account_number: i64,
    /// Fixed hint copied from configuration. Not compared against the clock.
    pub expires_at: i64,
}

impl Claims {
    pub fn for_account(account: &Account, expires_at: i64) -> Self {
        Self {
            account_number: account.number,
            expires_at,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("JWT generation error: {0}")]
    Signing(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,

    #[error("Malformed JWT token")]
    MalformedToken,

    #[error("Invalid JWT signature")]
    InvalidSignature,
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm
            | ErrorKind::InvalidKeyFormat => AuthError::InvalidSignature,
            _ => AuthError::MalformedToken,
        }
    }
}
