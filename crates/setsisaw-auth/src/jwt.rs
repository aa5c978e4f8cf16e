//! Token encoding and decoding with the HS256 algorithm.
//!
//! Tokens are compact JWS strings signed with a single server-wide secret.
//! Expiry is checked here against an explicit clock rather than inside
//! `jsonwebtoken`, so callers (and tests) decide what "now" is.

use crate::claims::Claims;
use crate::error::TokenError;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

/// Server-wide HMAC secret.
///
/// Loaded once at startup and shared read-only afterwards. `Debug` output is
/// redacted.
#[derive(Clone)]
pub struct SigningSecret {
    bytes: Vec<u8>,
}

impl SigningSecret {
    /// Wrap raw secret bytes.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the secret is empty.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Result<Self, TokenError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(TokenError::Signing(
                "signing secret must not be empty".to_string(),
            ));
        }
        Ok(Self { bytes })
    }

    fn encoding_key(&self) -> EncodingKey {
        EncodingKey::from_secret(&self.bytes)
    }

    fn decoding_key(&self) -> DecodingKey {
        DecodingKey::from_secret(&self.bytes)
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Configuration for token validation.
#[derive(Debug, Clone, Default)]
pub struct ValidationConfig {
    /// Seconds a token stays acceptable past its `exp` (clock skew tolerance).
    pub leeway: u64,
}

impl ValidationConfig {
    /// Create a new validation config with custom leeway.
    #[must_use]
    pub fn with_leeway(leeway: u64) -> Self {
        Self { leeway }
    }
}

/// Encode claims into a signed token string using HS256.
///
/// # Errors
///
/// Returns `TokenError::Signing` if the key is rejected by the signer.
///
/// # Example
///
/// ```rust
/// use setsisaw_auth::{decode_token, encode_token, Claims, SigningSecret};
///
/// let secret = SigningSecret::new("s3cret").unwrap();
/// let claims = Claims::builder().username("alice").build();
///
/// let token = encode_token(&claims, &secret).unwrap();
/// assert_eq!(decode_token(&token, &secret).unwrap(), claims);
/// ```
pub fn encode_token(claims: &Claims, secret: &SigningSecret) -> Result<String, TokenError> {
    let header = Header::new(Algorithm::HS256);

    encode(&header, claims, &secret.encoding_key())
        .map_err(|e| TokenError::Signing(format!("Encoding failed: {e}")))
}

/// Decode and validate a token against the current time.
///
/// # Errors
///
/// - `TokenError::InvalidSignature` - Signature verification failed
/// - `TokenError::MalformedToken` - Token or claims are structurally invalid
/// - `TokenError::Expired` - Signature is valid but the token has expired
pub fn decode_token(token: &str, secret: &SigningSecret) -> Result<Claims, TokenError> {
    decode_token_at(token, secret, Utc::now(), &ValidationConfig::default())
}

/// Decode and validate a token as of `now`.
///
/// The signature is checked before any claim is trusted, so an expired token
/// with a bad signature reports `InvalidSignature`, never `Expired`.
pub fn decode_token_at(
    token: &str,
    secret: &SigningSecret,
    now: DateTime<Utc>,
    config: &ValidationConfig,
) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    // Only accept HS256
    validation.algorithms = vec![Algorithm::HS256];
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.set_required_spec_claims(&["exp"]);

    let claims = decode::<Claims>(token, &secret.decoding_key(), &validation)
        .map_err(map_jwt_error)?
        .claims;

    let leeway = i64::try_from(config.leeway).unwrap_or(i64::MAX);
    if now.timestamp() > claims.exp.saturating_add(leeway) {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

/// Map jsonwebtoken errors to TokenError.
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> TokenError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidToken => TokenError::MalformedToken("Malformed token".to_string()),
        ErrorKind::Base64(_) => TokenError::MalformedToken("Invalid base64 encoding".to_string()),
        ErrorKind::Json(_) => TokenError::MalformedToken("Invalid JSON in claims".to_string()),
        ErrorKind::Utf8(_) => TokenError::MalformedToken("Invalid UTF-8 in token".to_string()),
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::MalformedToken(format!("Missing required claim: {claim}"))
        }
        ErrorKind::InvalidKeyFormat | ErrorKind::InvalidAlgorithmName => {
            TokenError::Signing(format!("Key rejected: {err}"))
        }
        _ => TokenError::MalformedToken(format!("Token validation failed: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use setsisaw_core::{Role, UserId};

    const TEST_SECRET: &[u8] = b"test-signing-secret-for-unit-tests";

    fn secret() -> SigningSecret {
        SigningSecret::new(TEST_SECRET).unwrap()
    }

    fn at(ts: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(ts, 0).unwrap()
    }

    fn alice(issued: i64) -> Claims {
        Claims::issue(
            "alice",
            UserId::from("1"),
            Role::User,
            at(issued),
            Duration::minutes(5),
        )
        .unwrap()
    }

    fn decode_at(token: &str, now: i64) -> Result<Claims, TokenError> {
        decode_token_at(token, &secret(), at(now), &ValidationConfig::default())
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let claims = alice(1_000);
        let token = encode_token(&claims, &secret()).unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(decode_at(&token, 1_100).unwrap(), claims);
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let token = encode_token(&alice(1_000), &secret()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();

        let mut payload: Vec<char> = parts[1].chars().collect();
        let mid = payload.len() / 2;
        payload[mid] = if payload[mid] == 'A' { 'B' } else { 'A' };
        let payload: String = payload.into_iter().collect();

        let tampered = format!("{}.{}.{}", parts[0], payload, parts[2]);
        assert_eq!(
            decode_at(&tampered, 1_100).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = encode_token(&alice(1_000), &secret()).unwrap();
        let other = SigningSecret::new("another-secret").unwrap();

        let result = decode_token_at(&token, &other, at(1_100), &ValidationConfig::default());
        assert_eq!(result.unwrap_err(), TokenError::InvalidSignature);
    }

    #[test]
    fn test_expired_token() {
        let token = encode_token(&alice(1_000), &secret()).unwrap();

        // exp == 1_300
        assert!(decode_at(&token, 1_300).is_ok());
        assert_eq!(decode_at(&token, 1_301).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_leeway_extends_acceptance() {
        let token = encode_token(&alice(1_000), &secret()).unwrap();
        let config = ValidationConfig::with_leeway(30);

        assert!(decode_token_at(&token, &secret(), at(1_330), &config).is_ok());
        assert_eq!(
            decode_token_at(&token, &secret(), at(1_331), &config).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_expired_with_bad_signature_reports_signature() {
        let token = encode_token(&alice(1_000), &secret()).unwrap();
        let other = SigningSecret::new("another-secret").unwrap();

        let result = decode_token_at(&token, &other, at(9_999), &ValidationConfig::default());
        assert!(result.unwrap_err().is_invalid_signature());
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["", "abc", "a.b", "not.a.token", "...."] {
            let err = decode_at(token, 1_100).unwrap_err();
            assert!(
                matches!(err, TokenError::MalformedToken(_)),
                "{token:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let claims = alice(1_000);
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        assert_eq!(
            decode_at(&token, 1_100).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn test_unknown_role_is_malformed() {
        let payload = serde_json::json!({
            "username": "mallory",
            "id": "9",
            "role": "OWNER",
            "iat": 1_000,
            "exp": 1_300,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        assert!(matches!(
            decode_at(&token, 1_100).unwrap_err(),
            TokenError::MalformedToken(_)
        ));
    }

    #[test]
    fn test_missing_exp_is_malformed() {
        let payload = serde_json::json!({
            "username": "alice",
            "id": "1",
            "role": "USER",
            "iat": 1_000,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(TEST_SECRET),
        )
        .unwrap();

        assert!(matches!(
            decode_at(&token, 1_100).unwrap_err(),
            TokenError::MalformedToken(_)
        ));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(
            SigningSecret::new(Vec::new()).unwrap_err(),
            TokenError::Signing(_)
        ));
    }

    #[test]
    fn test_secret_debug_redacted() {
        let debug = format!("{:?}", secret());
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("test-signing-secret"));
    }
}
