use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::TokenError;

/// Verifies presented session tokens.
///
/// A token passes only if its HS256 signature checks out against the
/// configured key AND its issuer, audience, and expiry claims hold.
/// Tokens signed with a different key or a different algorithm are
/// rejected; so are structurally malformed strings. No code path panics
/// on attacker-controlled input.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenValidator {
    /// Create a new validator bound to a key and trust parameters.
    ///
    /// # Arguments
    /// * `secret` - Symmetric key the tokens must be signed with
    /// * `issuer` - Expected `iss` claim
    /// * `audience` - Expected `aud` claim
    pub fn new(secret: &[u8], issuer: impl ToString, audience: impl ToString) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            issuer: issuer.to_string(),
            audience: audience.to_string(),
        }
    }

    /// Fully validate a token: signature, issuer, audience, and expiry.
    ///
    /// This is the only entry point authorization decisions may use.
    ///
    /// # Errors
    /// * `Expired` - Expiry claim is in the past
    /// * `SignatureMismatch` - Signed with a different key or algorithm
    /// * `IssuerMismatch` / `AudienceMismatch` - Trust parameters differ
    /// * `Malformed` - Not a structurally valid token
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.decode_with(token, true)
    }

    /// Validate signature, issuer, and audience while ignoring expiry.
    ///
    /// Used by the refresh flow: an expired-but-authentic token is proof
    /// of a prior session and may be exchanged for a fresh one.
    ///
    /// # Errors
    /// Same as [`validate`](Self::validate), minus `Expired`.
    pub fn validate_ignoring_expiry(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.decode_with(token, false)
    }

    fn decode_with(&self, token: &str, validate_exp: bool) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.validate_exp = validate_exp;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::SignatureMismatch
                }
                ErrorKind::InvalidIssuer => TokenError::IssuerMismatch,
                ErrorKind::InvalidAudience => TokenError::AudienceMismatch,
                _ => TokenError::Malformed(e.to_string()),
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::jwt::issuer::TokenIssuer;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn issuer(lifetime: Duration) -> TokenIssuer {
        TokenIssuer::new(SECRET, "test-issuer", "test-audience", lifetime)
    }

    fn validator() -> TokenValidator {
        TokenValidator::new(SECRET, "test-issuer", "test-audience")
    }

    #[test]
    fn test_validate_accepts_own_token() {
        let issued = issuer(Duration::hours(1))
            .issue("account-1", "alice@example.com")
            .unwrap();

        let claims = validator().validate(&issued.token).expect("should validate");
        assert_eq!(claims.sub, "account-1");
        assert_eq!(claims.email, "alice@example.com");
    }

    #[test]
    fn test_validate_rejects_foreign_key() {
        let foreign = TokenIssuer::new(
            b"another_secret_key_of_32_bytes_ok!",
            "test-issuer",
            "test-audience",
            Duration::hours(1),
        )
        .issue("account-1", "alice@example.com")
        .unwrap();

        assert_eq!(
            validator().validate(&foreign.token),
            Err(TokenError::SignatureMismatch)
        );
    }

    #[test]
    fn test_validate_rejects_wrong_issuer() {
        let other = TokenIssuer::new(SECRET, "rogue-issuer", "test-audience", Duration::hours(1))
            .issue("account-1", "alice@example.com")
            .unwrap();

        assert_eq!(
            validator().validate(&other.token),
            Err(TokenError::IssuerMismatch)
        );
    }

    #[test]
    fn test_validate_rejects_wrong_audience() {
        let other = TokenIssuer::new(SECRET, "test-issuer", "other-audience", Duration::hours(1))
            .issue("account-1", "alice@example.com")
            .unwrap();

        assert_eq!(
            validator().validate(&other.token),
            Err(TokenError::AudienceMismatch)
        );
    }

    #[test]
    fn test_validate_rejects_expired_token() {
        let issued = issuer(Duration::seconds(-3600))
            .issue("account-1", "alice@example.com")
            .unwrap();

        assert_eq!(validator().validate(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_validate_ignoring_expiry_accepts_expired_token() {
        let issued = issuer(Duration::seconds(-3600))
            .issue("account-1", "alice@example.com")
            .unwrap();

        let claims = validator()
            .validate_ignoring_expiry(&issued.token)
            .expect("authentic expired token should pass relaxed validation");
        assert_eq!(claims.sub, "account-1");
    }

    #[test]
    fn test_validate_ignoring_expiry_still_checks_signature() {
        let foreign = TokenIssuer::new(
            b"another_secret_key_of_32_bytes_ok!",
            "test-issuer",
            "test-audience",
            Duration::seconds(-3600),
        )
        .issue("account-1", "alice@example.com")
        .unwrap();

        assert_eq!(
            validator().validate_ignoring_expiry(&foreign.token),
            Err(TokenError::SignatureMismatch)
        );
    }

    #[test]
    fn test_validate_rejects_malformed_input() {
        assert!(matches!(
            validator().validate("definitely not a jwt"),
            Err(TokenError::Malformed(_))
        ));
        assert!(validator().validate("").is_err());
    }
}
