//! Generate an Argon2id password hash, e.g. to seed a credential store.
//!
//! Usage: cargo run -p setsisaw-auth --example gen_hash -- <password>

use setsisaw_auth::hash_password;

fn main() {
    let password = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Test123!".to_string());
    match hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(e) => eprintln!("Error: {e}"),
    }
}
