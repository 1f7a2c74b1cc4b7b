//! Random short codes.

use rand::Rng;

/// Characters a short code is drawn from.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Default code length.
pub const DEFAULT_CODE_LENGTH: usize = 7;

/// Generates a code of `length` characters, each drawn uniformly from [`ALPHABET`].
pub fn generate_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Whether `code` could have been produced by [`generate_code`].
pub fn is_well_formed(code: &str) -> bool {
    !code.is_empty() && code.len() <= 64 && code.bytes().all(|b| b.is_ascii_alphanumeric())
}
