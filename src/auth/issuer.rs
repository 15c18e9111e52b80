use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use super::{AuthError, Claims};
use crate::database::Account;

/// Mints account tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    // None when the configured secret is empty
    encoding_key: Option<EncodingKey>,
    expires_at: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, expires_at: i64) -> Self {
        let encoding_key = (!secret.is_empty()).then(|| EncodingKey::from_secret(secret.as_bytes()));

        Self {
            encoding_key,
            expires_at,
        }
    }

    /// Sign a claim set binding `account.number`.
    pub fn issue(&self, account: &Account) -> Result<String, AuthError> {
        let encoding_key = self.encoding_key.as_ref().ok_or(AuthError::InvalidSecret)?;
        let claims = Claims::for_account(account, self.expires_at);

        encode(&Header::new(Algorithm::HS256), &claims, encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("has_secret", &self.encoding_key.is_some())
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
