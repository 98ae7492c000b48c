//! Session token contract library
//!
//! Shared between the auth service and its clients:
//! - Claims layout for session tokens
//! - Token issuance (server side)
//! - Token validation (server side)
//! - Unverified claim inspection (client side)
//!
//! The server and client depend on the same crate so the claims surface
//! cannot drift between the two halves of the system.
//!
//! # Examples
//!
//! ## Issuing and validating
//! ```
//! use auth::{TokenIssuer, TokenValidator};
//! use chrono::Duration;
//!
//! let secret = b"secret_key_at_least_32_bytes_long!";
//! let issuer = TokenIssuer::new(secret, "auth-service", "session-clients", Duration::days(7));
//! let validator = TokenValidator::new(secret, "auth-service", "session-clients");
//!
//! let issued = issuer.issue("account-1", "alice@example.com").unwrap();
//! let claims = validator.validate(&issued.token).unwrap();
//! assert_eq!(claims.sub, "account-1");
//! ```
//!
//! ## Client-side inspection (no key, no signature check)
//! ```
//! use auth::{TokenIssuer, extract_account_id};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(b"secret_key_at_least_32_bytes_long!", "iss", "aud", Duration::hours(1));
//! let issued = issuer.issue("account-1", "alice@example.com").unwrap();
//! assert_eq!(extract_account_id(&issued.token).as_deref(), Some("account-1"));
//! ```

pub mod jwt;

pub use jwt::claims::SessionClaims;
pub use jwt::decode_unverified;
pub use jwt::errors::TokenError;
pub use jwt::extract_account_id;
pub use jwt::extract_email;
pub use jwt::is_expired;
pub use jwt::issuer::IssuedToken;
pub use jwt::issuer::TokenIssuer;
pub use jwt::validator::TokenValidator;
