use anyhow::{Context, Result};
use rand::{TryRngCore, rngs::OsRng};

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
// 248 = 4 * 62; bytes at or above it are dropped to keep the draw uniform.
const ACCEPT_BELOW: u8 = 248;

/// Alphanumeric token drawn straight from the OS random source.
pub fn generate_random_string(length: usize) -> Result<String> {
    let mut token = String::with_capacity(length);
    let mut buf = [0u8; 64];

    while token.len() < length {
        OsRng
            .try_fill_bytes(&mut buf)
            .context("OS random source unavailable")?;
        let missing = length - token.len();
        token.extend(
            buf.iter()
                .filter(|b| **b < ACCEPT_BELOW)
                .map(|b| ALPHABET[usize::from(*b % 62)] as char)
                .take(missing),
        );
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn produces_alphanumeric_tokens_of_requested_length() {
        let token = generate_random_string(32).unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_random_string(32).unwrap());
    }
}
