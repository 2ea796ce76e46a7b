//! Stored OAuth token decoding

use goca_core::TokenCodec;
use goca_domain::{GocaError, OAuthToken, Result};

/// Decodes the JSON token payload stored with a provider credential.
///
/// Accepts the shape written by common OAuth2 libraries: `access_token`,
/// optional `token_type`, `refresh_token` and RFC 3339 `expiry`.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonTokenCodec;

impl TokenCodec for JsonTokenCodec {
    fn decode(&self, raw: &str) -> Result<OAuthToken> {
        if raw.trim().is_empty() {
            return Err(GocaError::Credential("stored token is empty".into()));
        }
        serde_json::from_str(raw)
            .map_err(|err| GocaError::Credential(format!("malformed token payload: {err}")))
    }
}
