//! Temporary credential issuance
//!
//! New accounts get a random temporary password. The plaintext is returned
//! exactly once to the registering admin; only the argon2 hash is persisted.

use ring::rand::{SecureRandom, SystemRandom};

/// Temporary password length
const TEMP_PASSWORD_LEN: usize = 12;

const LETTERS: &str = "ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const DIGITS: &str = "23456789";
const SYMBOLS: &str = "!@#$%^&*-_=+?";

/// Generate a random temporary password.
///
/// 12 characters over letters, digits and symbols (ambiguous glyphs like
/// `0/O` and `1/l/I` excluded), re-drawn until all three classes are present.
pub fn generate_temp_password() -> String {
    let alphabet: Vec<char> = LETTERS
        .chars()
        .chain(DIGITS.chars())
        .chain(SYMBOLS.chars())
        .collect();

    let rng = SystemRandom::new();
    loop {
        let mut password = String::with_capacity(TEMP_PASSWORD_LEN);
        for _ in 0..TEMP_PASSWORD_LEN {
            let mut byte = [0u8; 1];
            if rng.fill(&mut byte).is_err() {
                continue;
            }
            let idx = (byte[0] as usize) % alphabet.len();
            password.push(alphabet[idx]);
        }

        let has_letter = password.chars().any(|c| LETTERS.contains(c));
        let has_digit = password.chars().any(|c| DIGITS.contains(c));
        let has_symbol = password.chars().any(|c| SYMBOLS.contains(c));
        if password.len() == TEMP_PASSWORD_LEN && has_letter && has_digit && has_symbol {
            return password;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::Employee;

    #[test]
    fn temp_password_has_length_and_diversity() {
        for _ in 0..20 {
            let password = generate_temp_password();
            assert_eq!(password.len(), TEMP_PASSWORD_LEN);
            assert!(password.chars().any(|c| LETTERS.contains(c)));
            assert!(password.chars().any(|c| DIGITS.contains(c)));
            assert!(password.chars().any(|c| SYMBOLS.contains(c)));
        }
    }

    #[test]
    fn temp_passwords_are_not_repeated() {
        let a = generate_temp_password();
        let b = generate_temp_password();
        assert_ne!(a, b);
    }

    #[test]
    fn hash_verify_roundtrip() {
        let password = generate_temp_password();
        let hash = Employee::hash_password(&password).unwrap();

        assert!(Employee::verify_hash(&password, &hash).unwrap());
        assert!(!Employee::verify_hash("wrong-password", &hash).unwrap());
    }

    #[test]
    fn hashing_is_salted() {
        let password = "correct horse battery staple";
        let first = Employee::hash_password(password).unwrap();
        let second = Employee::hash_password(password).unwrap();

        // Different salts, different hashes, both verify
        assert_ne!(first, second);
        assert!(Employee::verify_hash(password, &first).unwrap());
        assert!(Employee::verify_hash(password, &second).unwrap());
    }
}
