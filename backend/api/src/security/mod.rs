pub mod jwt;
pub mod password;

use rand::RngCore;

const TOKEN_LENGTH: usize = 32;

/// Random hex token for email verification and password reset links.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_LENGTH];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_hex_of_expected_length() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }
}
