//! JWT token issuance and verification
//!
//! Tokens are HS256-signed with a secret injected at construction time.
//! Keys are derived once and shared behind `Arc`.

use anyhow::Result;
use chrono::Utc;
use cve_registry_shared::AuthError;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Lifetime used when the caller does not ask for one
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user email)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    #[serde(default)]
    pub iat: i64,
}

/// Pre-computed JWT keys for efficient token operations
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    /// Create new JWT keys from secret
    /// This should be called once at startup
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: Arc::new(EncodingKey::from_secret(bytes)),
            decoding: Arc::new(DecodingKey::from_secret(bytes)),
        }
    }
}

/// Token issuer and verifier
#[derive(Clone)]
pub struct TokenService {
    keys: JwtKeys,
    default_ttl: Duration,
}

impl TokenService {
    /// Create a token service with pre-computed keys
    pub fn new(secret: &SecretString, default_ttl: Duration) -> Self {
        Self {
            keys: JwtKeys::new(secret),
            default_ttl,
        }
    }

    /// Issue a token for `subject` valid for `ttl`, or the default lifetime
    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<String> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        let now = Utc::now().timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs())
            .map_err(|_| anyhow::anyhow!("Token lifetime out of range"))?;

        let claims = Claims {
            sub: subject.to_string(),
            exp: now.saturating_add(ttl_secs),
            iat: now,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to issue token: {}", e))
    }

    /// Verify a token and return its subject
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below with zero leeway
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub", "exp"]);

        let claims = decode::<Claims>(token, &self.keys.decoding, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                _ => AuthError::MalformedToken,
            })?
            .claims;

        if claims.sub.is_empty() {
            return Err(AuthError::MalformedToken);
        }
        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use proptest::prelude::*;

    const HOUR: Duration = Duration::from_secs(60 * 60);

    fn create_test_service() -> TokenService {
        TokenService::new(&SecretString::new("test-secret".to_string()), DEFAULT_TOKEN_TTL)
    }

    fn flip_signature_byte(token: &str) -> String {
        let (message, signature) = token.rsplit_once('.').unwrap();
        let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
        bytes[0] ^= 0x01;
        format!("{}.{}", message, URL_SAFE_NO_PAD.encode(bytes))
    }

    #[test]
    fn test_issue_and_verify() {
        let service = create_test_service();
        let token = service.issue("alice@example.com", Some(HOUR)).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(service.verify(&token).unwrap(), "alice@example.com");
    }

    #[test]
    fn test_default_ttl_is_fifteen_minutes() {
        let service = create_test_service();
        let token = service.issue("alice@example.com", None).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let claims = decode::<Claims>(&token, &service.keys.decoding, &validation)
            .unwrap()
            .claims;
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_zero_ttl_is_expired() {
        let service = create_test_service();
        let token = service.issue("alice@example.com", Some(Duration::ZERO)).unwrap();

        assert_eq!(service.verify(&token), Err(AuthError::Expired));
    }

    #[test]
    fn test_flipped_signature_rejected() {
        let service = create_test_service();
        let token = service.issue("alice@example.com", Some(HOUR)).unwrap();
        let tampered = flip_signature_byte(&token);

        assert_eq!(service.verify(&tampered), Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_token_with_wrong_secret_rejected() {
        let other = TokenService::new(&SecretString::new("wrong-secret".to_string()), HOUR);
        let token = other.issue("alice@example.com", Some(HOUR)).unwrap();

        assert_eq!(
            create_test_service().verify(&token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let secret = b"test-secret";
        let claims = Claims {
            sub: "alice@example.com".to_string(),
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap();

        assert_eq!(
            create_test_service().verify(&token),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn test_invalid_token_is_malformed() {
        let service = create_test_service();
        assert_eq!(service.verify("invalid.token.here"), Err(AuthError::MalformedToken));
        assert_eq!(service.verify(""), Err(AuthError::MalformedToken));
        assert_eq!(service.verify("no-dots-at-all"), Err(AuthError::MalformedToken));
    }

    #[test]
    fn test_missing_subject_is_malformed() {
        #[derive(Serialize)]
        struct NoSubject {
            exp: i64,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoSubject {
                exp: Utc::now().timestamp() + 3600,
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(
            create_test_service().verify(&token),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn test_missing_expiry_is_malformed() {
        #[derive(Serialize)]
        struct NoExpiry {
            sub: String,
            iat: i64,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &NoExpiry {
                sub: "alice@example.com".to_string(),
                iat: Utc::now().timestamp(),
            },
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(
            create_test_service().verify(&token),
            Err(AuthError::MalformedToken)
        );
    }

    #[test]
    fn test_empty_subject_is_malformed() {
        let service = create_test_service();
        let token = service.issue("", Some(HOUR)).unwrap();
        assert_eq!(service.verify(&token), Err(AuthError::MalformedToken));
    }

    #[test]
    fn test_service_clones_share_keys() {
        let service = create_test_service();
        let cloned = service.clone();

        let token = service.issue("bob@example.com", Some(HOUR)).unwrap();
        assert_eq!(cloned.verify(&token).unwrap(), "bob@example.com");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_issue_verify_round_trip(
            subject in "[a-zA-Z0-9._%+-]{1,24}@[a-z0-9-]{1,16}\\.[a-z]{2,6}",
            ttl_secs in 60u64..=7 * 24 * 3600,
        ) {
            let service = create_test_service();
            let token = service.issue(&subject, Some(Duration::from_secs(ttl_secs))).unwrap();
            prop_assert_eq!(service.verify(&token).unwrap(), subject);
        }
    }
}
