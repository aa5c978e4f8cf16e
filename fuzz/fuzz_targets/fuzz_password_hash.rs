//! Fuzz target for password hashing.
//!
//! Hashing and verification must never panic, and a password must always
//! verify against its own hash.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_password_hash -- -max_total_time=600

#![no_main]

use libfuzzer_sys::fuzz_target;
use setsisaw_auth::PasswordHasher;

fuzz_target!(|data: &[u8]| {
    let Ok(password) = std::str::from_utf8(data) else {
        return;
    };

    // Skip very long passwords to avoid excessive memory/time usage
    if password.len() > 10000 {
        return;
    }

    let Ok(hasher) = PasswordHasher::with_params(1024, 1, 1) else {
        return;
    };

    if let Ok(hash) = hasher.hash(password) {
        assert!(hasher.verify(password, &hash));

        if password != "definitely_wrong_password" {
            assert!(!hasher.verify("definitely_wrong_password", &hash));
        }
    }

    // Arbitrary input as a stored hash is a mismatch, never a panic
    let _ = hasher.verify("password", password);
});
