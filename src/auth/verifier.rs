use std::collections::HashSet;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use super::{AuthError, Claims};

const HMAC_ALGORITHMS: [&str; 3] = ["HS256", "HS384", "HS512"];

/// Just enough of the JOSE header to read `alg` as a plain string
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

/// Structural and algorithm checks run before `jsonwebtoken` sees the token.
///
/// `jsonwebtoken` fails to parse `none` or unknown algorithm names at all, and
/// splits on the last dot, so both cases would otherwise surface as malformed.
fn screen(token: &str) -> Result<(), AuthError> {
    let mut segments = token.splitn(3, '.');
    let (Some(header), Some(_payload), Some(signature)) = (segments.next(), segments.next(), segments.next()) else {
        return Err(AuthError::MalformedToken);
    };

    let header = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|_| AuthError::MalformedToken)?;
    let header: RawHeader = serde_json::from_slice(&header).map_err(|_| AuthError::MalformedToken)?;

    if !HMAC_ALGORITHMS.contains(&header.alg.as_str()) {
        return Err(AuthError::InvalidSignature);
    }

    // base64url never contains a dot
    if signature.contains('.') {
        return Err(AuthError::InvalidSignature);
    }

    Ok(())
}

/// Validates account tokens and returns their claims.
#[derive(Clone)]
pub struct TokenVerifier {
    // None when the configured secret is empty
    decoding_key: Option<DecodingKey>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let decoding_key = (!secret.is_empty()).then(|| DecodingKey::from_secret(secret.as_bytes()));

        // HMAC family only; anything else fails as InvalidAlgorithm.
        // expiresAt is not a registered claim, so no expiry is checked.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;

        Self {
            decoding_key,
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let decoding_key = self.decoding_key.as_ref().ok_or(AuthError::InvalidSignature)?;
        screen(token)?;

        let token_data = decode::<Claims>(token, decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("has_secret", &self.decoding_key.is_some())
            .field("algorithms", &self.validation.algorithms)
            .finish()
    }
}
