use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by a session token.
///
/// Every field is mandatory: a session token that omits any of them is
/// rejected outright rather than treated as a wildcard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject: the account's unique identifier
    pub sub: String,

    /// Email address the account was registered under
    pub email: String,

    /// Issuer of the token
    pub iss: String,

    /// Audience the token was minted for
    pub aud: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Build claims for a freshly authenticated account.
    ///
    /// Sets `iat` to the current time and `exp` to `iat + lifetime`.
    pub fn for_account(
        account_id: impl ToString,
        email: impl ToString,
        issuer: impl ToString,
        audience: impl ToString,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id.to_string(),
            email: email.to_string(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }

    /// Expiry as a UTC timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check whether the expiry claim lies at or before the given instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp <= current_timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_account_sets_lifetime() {
        let claims = SessionClaims::for_account(
            "account-1",
            "alice@example.com",
            "test-issuer",
            "test-audience",
            Duration::hours(24),
        );

        assert_eq!(claims.sub, "account-1");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_is_expired_boundary() {
        let claims = SessionClaims {
            sub: "account-1".to_string(),
            email: "alice@example.com".to_string(),
            iss: "iss".to_string(),
            aud: "aud".to_string(),
            iat: 900,
            exp: 1000,
        };

        assert!(!claims.is_expired(999));
        assert!(claims.is_expired(1000));
        assert!(claims.is_expired(1001));
    }

    #[test]
    fn test_expires_at_round_trips() {
        let claims = SessionClaims::for_account(
            "account-1",
            "alice@example.com",
            "iss",
            "aud",
            Duration::hours(1),
        );

        let expires_at = claims.expires_at().expect("valid timestamp");
        assert_eq!(expires_at.timestamp(), claims.exp);
    }
}
