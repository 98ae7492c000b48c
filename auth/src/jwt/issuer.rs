use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::SessionClaims;
use super::errors::TokenError;

/// A freshly minted token together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Encoded, signed token string
    pub token: String,

    /// Instant at which the token stops being valid
    pub expires_at: DateTime<Utc>,
}

/// Mints signed session tokens for verified accounts.
///
/// Uses HS256 (HMAC with SHA-256); issuer, audience, and lifetime are
/// fixed at construction so every token from one issuer instance carries
/// the same trust parameters.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing key (at least 32 bytes for HS256)
    /// * `issuer` - Value for the `iss` claim
    /// * `audience` - Value for the `aud` claim
    /// * `lifetime` - Validity window granted to each token
    pub fn new(
        secret: &[u8],
        issuer: impl ToString,
        audience: impl ToString,
        lifetime: Duration,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
            lifetime,
        }
    }

    /// Issue a signed token for an authenticated account.
    ///
    /// # Arguments
    /// * `account_id` - Account identifier placed in the `sub` claim
    /// * `email` - Account email placed in the `email` claim
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, account_id: &str, email: &str) -> Result<IssuedToken, TokenError> {
        let claims = SessionClaims::for_account(
            account_id,
            email,
            &self.issuer,
            &self.audience,
            self.lifetime,
        );

        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| TokenError::EncodingFailed(e.to_string()))?;

        // exp was computed from a real Utc instant, so this cannot be out of range
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| TokenError::EncodingFailed("expiry out of range".to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}
