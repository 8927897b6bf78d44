/// Password hashing with Argon2id
///
/// Parameters: 64 MB memory, 3 passes, 4 lanes, 32-byte output. The PHC
/// string stored in `users.password_hash` embeds all of them, so verification
/// needs no configuration.
///
/// # Example
///
/// ```
/// use budgetboard_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("Secr3t!pass")?;
///
/// assert!(verify_password("Secr3t!pass", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, ParamsBuilder, Version,
};

pub const PASSWORD_TOO_SHORT: &str = "Should be at least 8 characters long.";
pub const PASSWORD_NO_UPPERCASE: &str = "Should contain an uppercase letter.";
pub const PASSWORD_NO_LOWERCASE: &str = "Should contain a lowercase letter.";
pub const PASSWORD_NO_DIGIT: &str = "Should contain a digit.";
pub const PASSWORD_NO_SPECIAL: &str = "Should contain a special character.";

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashError(String),

    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// Hashes a password with a fresh 16-byte salt
///
/// # Errors
///
/// Returns `PasswordError::HashError` if the parameters are rejected or
/// hashing fails
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    let params = ParamsBuilder::new()
        .m_cost(65536)
        .t_cost(3)
        .p_cost(4)
        .output_len(32)
        .build()
        .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

    let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

    Ok(password_hash.to_string())
}

/// Checks a plaintext password against a stored PHC hash
///
/// `Ok(false)` means the password is wrong; `Err` means the stored hash is
/// unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

    if parsed_hash.hash.is_none() {
        return Err(PasswordError::InvalidHash("Hash has no output".to_string()));
    }

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
    }
}

/// Password strength rule for new accounts
///
/// At least 8 characters with an uppercase letter, a lowercase letter, a
/// digit and a special character. The error is the field message for
/// `password`.
///
/// ```
/// use budgetboard_shared::auth::password::validate_password_strength;
///
/// assert!(validate_password_strength("MyP@ssw0rd!").is_ok());
/// assert!(validate_password_strength("Password123").is_err());
/// ```
pub fn validate_password_strength(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < 8 {
        return Err(PASSWORD_TOO_SHORT);
    }
    if !password.chars().any(char::is_uppercase) {
        return Err(PASSWORD_NO_UPPERCASE);
    }
    if !password.chars().any(char::is_lowercase) {
        return Err(PASSWORD_NO_LOWERCASE);
    }
    if !password.chars().any(char::is_numeric) {
        return Err(PASSWORD_NO_DIGIT);
    }
    if !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err(PASSWORD_NO_SPECIAL);
    }
    Ok(())
}
