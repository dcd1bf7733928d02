//! Opaque single-use tokens for email verification and password reset.

use rand::RngCore;

/// Entropy in bytes; hex-encoding doubles the length.
const TOKEN_BYTES: usize = 32;

/// Generate a cryptographically random opaque token (64 hex chars).
///
/// These tokens are delivered out of band (email) and matched by exact
/// equality against a single nullable column, so they carry no structure.
pub fn generate_opaque_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let mut token = String::with_capacity(TOKEN_BYTES * 2);
    for byte in bytes {
        token.push_str(&format!("{byte:02x}"));
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_hex_of_expected_length() {
        let token = generate_opaque_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        let a = generate_opaque_token();
        let b = generate_opaque_token();
        assert_ne!(a, b);
    }
}
