use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}

pub fn verify_password(password: &str, hashed: &str) -> Result<(), argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    // A malformed stored hash counts as a mismatch.
    let parsed = PasswordHash::new(hashed)?;

    argon2.verify_password(password.as_bytes(), &parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).is_ok());
    }

    #[test]
    fn wrong_password_fails_verification() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter3", &hash).is_err());
    }

    #[test]
    fn plaintext_stored_value_is_a_mismatch() {
        // Legacy rows that predate hashing must not authenticate.
        assert!(verify_password("password123", "password123").is_err());
    }
}
