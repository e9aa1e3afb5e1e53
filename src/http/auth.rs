//! Bearer-token verification.
//!
//! Only SHA-256 digests of accepted tokens are held in memory. A presented
//! token is hashed and compared against every digest in constant time.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use tracing::warn;

use super::response::HttpError;

/// Accepted bearer tokens, held as SHA-256 digests.
#[derive(Debug, Clone, Default)]
pub struct TokenVerifier {
    digests: Vec<[u8; 32]>,
}

impl TokenVerifier {
    /// Build from hex-encoded SHA-256 digests.
    pub fn from_hex_digests<I, D>(digests: I) -> Result<Self, hex::FromHexError>
    where
        I: IntoIterator<Item = D>,
        D: AsRef<[u8]>,
    {
        let mut parsed = Vec::new();
        for digest in digests {
            let mut bytes = [0u8; 32];
            hex::decode_to_slice(digest, &mut bytes)?;
            parsed.push(bytes);
        }
        Ok(Self { digests: parsed })
    }

    /// Build from plaintext tokens; they are hashed immediately.
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Self {
            digests: tokens.into_iter().map(|t| digest(t.as_ref())).collect(),
        }
    }

    /// Hex SHA-256 digest of `token`, the form expected in configuration.
    pub fn hex_digest(token: &str) -> String {
        hex::encode(digest(token.as_bytes()))
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Whether `token` is accepted. Always false when no digests are configured.
    pub fn verify(&self, token: &str) -> bool {
        let presented = digest(token.as_bytes());
        self.digests
            .iter()
            .fold(false, |found, accepted| found | constant_time_eq(accepted, &presented))
    }
}

fn digest(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

fn constant_time_eq(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Middleware rejecting requests without an accepted bearer token.
pub async fn require_token(
    State(verifier): State<Arc<TokenVerifier>>,
    request: Request,
    next: Next,
) -> Response {
    let verdict = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(|token| verifier.verify(token));

    match verdict {
        Some(true) => next.run(request).await,
        Some(false) => {
            warn!(path = %request.uri().path(), "rejected bearer token");
            HttpError::Unauthorized.into_response()
        }
        None => {
            warn!(path = %request.uri().path(), "missing bearer token");
            HttpError::Unauthorized.into_response()
        }
    }
}
