use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Compute HMAC-SHA256 of a token and return as hexadecimal string
///
/// Used to hash reset tokens before they touch the database, so a leaked
/// row never yields a usable token.
pub fn hmac_sha256_token(key: &str, token: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(key.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(token.as_bytes());
    let result = mac.finalize();
    format!("{:x}", result.into_bytes())
}

/// Generate a cryptographically secure reset token
///
/// 32 random bytes, base64url-encoded without padding (43 characters),
/// safe to embed in a query string without escaping.
pub fn generate_reset_token() -> String {
    let mut rng = rand::rng();
    let random_bytes: [u8; 32] = rng.random();
    general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

/// SHA-256 digest of a value, prefixed so readers know the encoding
///
/// Used in audit records where the raw value (e.g. an email from a failed
/// login attempt) should not be stored verbatim.
pub fn sha256_fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    format!("sha256:{:x}", digest)
}
