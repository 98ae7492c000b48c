use thiserror::Error;

/// Error type for token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Token signature is invalid")]
    SignatureMismatch,

    #[error("Token was issued by an unaccepted issuer")]
    IssuerMismatch,

    #[error("Token was minted for a different audience")]
    AudienceMismatch,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
