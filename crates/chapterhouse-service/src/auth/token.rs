//! Bearer-token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the configured secret. The claims carry
//! everything the request path needs (id, display name, role) so handlers do
//! not have to re-read the member row on every request.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chapterhouse_core::config::AuthConfig;
use chapterhouse_db::db::enums::MemberRole;

use crate::error::{ServiceError, ServiceResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Member id.
    pub sub: Uuid,
    /// Display name at issuance time.
    pub name: String,
    /// Role at issuance time.
    pub role: MemberRole,
    /// Issued-at, seconds since the epoch.
    pub iat: i64,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

/// ## Summary
/// Issues a signed token for the given member, valid for the configured TTL.
///
/// ## Errors
/// Returns an error if the configured TTL is not representable or signing
/// fails.
pub fn issue_token(
    config: &AuthConfig,
    member_id: Uuid,
    name: &str,
    role: MemberRole,
) -> ServiceResult<String> {
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(TimeDelta::minutes(config.token_ttl_minutes))
        .ok_or(ServiceError::InvariantViolation(
            "Token TTL overflows the timestamp range",
        ))?;

    let claims = Claims {
        sub: member_id,
        name: name.to_owned(),
        role,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?)
}

/// ## Summary
/// Verifies a token's signature and expiry and returns its claims.
///
/// ## Errors
/// Returns `ServiceError::NotAuthenticated` for any invalid, expired, or
/// tampered token.
pub fn verify_token(config: &AuthConfig, token: &str) -> ServiceResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| {
        tracing::trace!("Token verification failed: {}", err);
        ServiceError::NotAuthenticated
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "unit-test-secret".to_string(),
            token_ttl_minutes: 60,
        }
    }

    #[test_log::test]
    fn issued_token_verifies_with_same_secret() {
        let config = test_config();
        let member_id = Uuid::now_v7();

        let token = issue_token(&config, member_id, "Robin", MemberRole::Board)
            .expect("token should be issued");
        let claims = verify_token(&config, &token).expect("token should verify");

        assert_eq!(claims.sub, member_id);
        assert_eq!(claims.name, "Robin");
        assert_eq!(claims.role, MemberRole::Board);
        assert!(claims.exp > claims.iat);
    }

    #[test_log::test]
    fn token_fails_with_different_secret() {
        let config = test_config();
        let other = AuthConfig {
            jwt_secret: "a-different-secret".to_string(),
            token_ttl_minutes: 60,
        };

        let token = issue_token(&config, Uuid::now_v7(), "Robin", MemberRole::Member)
            .expect("token should be issued");
        assert!(matches!(
            verify_token(&other, &token),
            Err(ServiceError::NotAuthenticated)
        ));
    }

    #[test_log::test]
    fn garbage_token_is_rejected() {
        let config = test_config();
        assert!(matches!(
            verify_token(&config, "not.a.token"),
            Err(ServiceError::NotAuthenticated)
        ));
    }
}
