pub mod claims;
pub mod errors;
pub mod issuer;
pub mod validator;

use jsonwebtoken::decode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

pub use claims::SessionClaims;
pub use errors::TokenError;
pub use issuer::IssuedToken;
pub use issuer::TokenIssuer;
pub use validator::TokenValidator;

/// Decode a token's claims without verifying the signature.
///
/// Requires no key, so clients can inspect tokens they merely hold.
///
/// # Security Warning
/// The returned claims are NOT trustworthy. Use only for local
/// bookkeeping (display, expiry estimation, storage keys). Any
/// authorization decision must go through [`TokenValidator::validate`].
///
/// # Errors
/// * `Malformed` - Input is not a structurally valid JWT
pub fn decode_unverified(token: &str) -> Result<SessionClaims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_aud = false;

    // Key content is irrelevant once signature validation is disabled.
    let token_data = decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| TokenError::Malformed(e.to_string()))?;

    Ok(token_data.claims)
}

/// Best-effort read of the subject (account id) claim.
///
/// Returns `None` on any malformed input, including empty strings.
pub fn extract_account_id(token: &str) -> Option<String> {
    decode_unverified(token).ok().map(|claims| claims.sub)
}

/// Best-effort read of the email claim.
///
/// Returns `None` on any malformed input, including empty strings.
pub fn extract_email(token: &str) -> Option<String> {
    decode_unverified(token).ok().map(|claims| claims.email)
}

/// Whether a token is past its expiry claim.
///
/// A token that fails to decode at all counts as expired (fail closed).
/// This is an "is it worth presenting" check, not a security check.
pub fn is_expired(token: &str) -> bool {
    match decode_unverified(token) {
        Ok(claims) => claims.is_expired(chrono::Utc::now().timestamp()),
        Err(_) => true,
    }
}
