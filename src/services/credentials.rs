//! Password generation for new accounts

use rand::Rng;

const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

pub const PASSWORD_LENGTH: usize = 12;

/// Random password drawn uniformly from letters, digits and `!@#$%^&*`
pub fn generate_password() -> String {
    generate_password_with(&mut rand::rng())
}

pub fn generate_password_with<R: Rng>(rng: &mut R) -> String {
    (0..PASSWORD_LENGTH)
        .map(|_| PASSWORD_CHARSET[rng.random_range(0..PASSWORD_CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_password_length_and_charset() {
        for _ in 0..50 {
            let password = generate_password();
            assert_eq!(password.chars().count(), PASSWORD_LENGTH);
            assert!(password.bytes().all(|b| PASSWORD_CHARSET.contains(&b)));
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_password_with(&mut StdRng::seed_from_u64(7));
        let b = generate_password_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
