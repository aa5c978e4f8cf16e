//! Fuzz target for signed claims.
//!
//! Any claims that encode must decode back unchanged, and flipping a byte of
//! the payload must invalidate the token.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_claims_roundtrip -- -max_total_time=600

#![no_main]

use arbitrary::Arbitrary;
use chrono::{TimeZone, Utc};
use libfuzzer_sys::fuzz_target;
use setsisaw_auth::{decode_token_at, encode_token, Claims, SigningSecret, ValidationConfig};
use setsisaw_core::{Role, UserId};

#[derive(Arbitrary, Debug)]
struct ClaimsInput {
    username: String,
    id: String,
    role: u8,
    iat: i32,
    lifetime_secs: u16,
    flip_at: usize,
}

fuzz_target!(|input: ClaimsInput| {
    if input.username.len() > 1000 || input.id.len() > 1000 {
        return;
    }

    let Ok(secret) = SigningSecret::new("fuzz-secret") else {
        return;
    };

    let role = Role::ALL[usize::from(input.role) % Role::ALL.len()];
    let iat = i64::from(input.iat);
    let claims = Claims::builder()
        .username(&input.username)
        .user_id(UserId::from(input.id.as_str()))
        .role(role)
        .expiration(iat + i64::from(input.lifetime_secs))
        .build();
    let claims = Claims { iat, ..claims };

    let Ok(token) = encode_token(&claims, &secret) else {
        return;
    };
    let Some(now) = Utc.timestamp_opt(iat, 0).single() else {
        return;
    };
    let config = ValidationConfig::default();

    let decoded = decode_token_at(&token, &secret, now, &config);
    assert_eq!(decoded.as_ref().ok(), Some(&claims));

    // Flip one payload character
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 || parts[1].is_empty() {
        return;
    }
    let mut payload = parts[1].as_bytes().to_vec();
    let idx = input.flip_at % payload.len();
    payload[idx] = if payload[idx] == b'A' { b'B' } else { b'A' };
    let Ok(payload) = String::from_utf8(payload) else {
        return;
    };
    let tampered = format!("{}.{}.{}", parts[0], payload, parts[2]);

    assert!(decode_token_at(&tampered, &secret, now, &config).is_err());
});
