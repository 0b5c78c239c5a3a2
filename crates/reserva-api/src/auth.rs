use axum::http::HeaderMap;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::AppError;

/// The caller established from a verified bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// HS256 bearer-token verifier
///
/// Token issuance lives elsewhere; this side only checks the signature
/// and expiry against the shared secret.
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let decoded =
            decode::<Claims>(token, &self.key, &self.validation).map_err(|error| {
                tracing::debug!(%error, "Token verification failed");
                AppError::InvalidToken
            })?;

        if decoded.claims.sub.trim().is_empty() {
            return Err(AppError::InvalidToken);
        }

        Ok(AuthenticatedUser {
            user_id: decoded.claims.sub,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: i64,
}

/// Pull the bearer token out of the Authorization header
///
/// A missing header is "Missing token"; a present but malformed header
/// is "Invalid token".
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get("authorization")
        .ok_or(AppError::MissingToken)?
        .to_str()
        .map_err(|_| AppError::InvalidToken)?;

    let (scheme, token) = header.split_once(' ').ok_or(AppError::InvalidToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::InvalidToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::InvalidToken);
    }

    Ok(token)
}
