/// Password hashing and opaque bearer tokens
///
/// Passwords are hashed with Argon2id. Tokens are 32 random bytes rendered
/// as hex; only the SHA-256 digest of a token is stored, so a database leak
/// does not leak live credentials. Logout deletes the presenting row, which
/// makes revocation exact.
use crate::db::{token_repo, user_repo};
use crate::error::AppError;
use crate::models::User;
use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Argon2, PasswordHash, PasswordVerifier,
};
use rand::RngCore;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(rand::thread_rng());

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::Internal("Failed to hash password".to_string()))?
        .to_string();

    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash format".to_string()))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::Unauthorized("Invalid username or password.".to_string()))
}

/// Mint a fresh opaque token (hex of 32 random bytes).
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Digest stored at rest and used for lookups.
pub fn digest_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Create an account. Username and email are pre-checked for descriptive
/// errors; the unique constraints remain the authoritative guard, so a
/// lost race still reads as the same Conflict.
pub async fn register(
    pool: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    if user_repo::username_taken(pool, username).await? {
        return Err(AppError::Conflict("Username already taken.".to_string()));
    }
    if user_repo::email_taken(pool, email).await? {
        return Err(AppError::Conflict("Email already registered.".to_string()));
    }

    let password_hash = hash_password(password)?;

    user_repo::create_user(pool, username, email, &password_hash)
        .await?
        .ok_or_else(|| AppError::Conflict("Username already taken.".to_string()))
}

/// Verify credentials and mint a bearer token. The caller receives the
/// plaintext token exactly once.
pub async fn login(pool: &PgPool, username: &str, password: &str) -> Result<String, AppError> {
    let user = user_repo::get_user_by_username(pool, username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password.".to_string()))?;

    verify_password(password, &user.password_hash)?;

    let token = generate_token();
    token_repo::create_token(pool, user.id, &digest_token(&token)).await?;

    Ok(token)
}

/// Revoke the presenting token.
pub async fn logout(pool: &PgPool, token_hash: &str) -> Result<(), AppError> {
    if token_repo::delete_token(pool, token_hash).await? {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Invalid token.".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = hash_password("hunter2a").unwrap();
        assert!(verify_password("hunter2a", &hash).is_ok());
    }

    #[test]
    fn wrong_password_is_rejected() {
        let hash = hash_password("hunter2a").unwrap();
        let err = verify_password("hunter2b", &hash).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn tokens_are_unique_and_digestable() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(digest_token(&a).len(), 64);
        assert_eq!(digest_token(&a), digest_token(&a));
        assert_ne!(digest_token(&a), digest_token(&b));
    }
}
