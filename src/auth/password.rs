//! Password hashing.
//!
//! bcrypt is deliberately slow, so both hashing and verification run on
//! Tokio's blocking thread pool instead of the request task.

use tokio::task;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("Password hashing task failed: {0}")]
    Task(#[from] task::JoinError),
}

/// bcrypt hasher with a fixed work factor.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password. The plaintext is dropped once hashed.
    pub async fn hash(&self, password: String) -> Result<String, PasswordError> {
        let cost = self.cost;
        let hash = task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hash)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// A hash that bcrypt cannot parse is reported as an error, not a mismatch.
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, PasswordError> {
        let matches = task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Lowest cost bcrypt accepts; keeps the tests fast
    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hash_is_salted_and_verifiable() {
        let hasher = PasswordHasher::new(TEST_COST);

        let first = hasher.hash("secret".to_string()).await.unwrap();
        let second = hasher.hash("secret".to_string()).await.unwrap();

        assert_ne!(first, "secret");
        assert_ne!(first, second);
        assert!(hasher.verify("secret".to_string(), first).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_does_not_verify() {
        let hasher = PasswordHasher::new(TEST_COST);
        let hash = hasher.hash("secret".to_string()).await.unwrap();

        assert!(!hasher.verify("Secret".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn unparseable_hash_is_an_error() {
        let hasher = PasswordHasher::new(TEST_COST);

        assert!(
            hasher
                .verify("secret".to_string(), "plaintext".to_string())
                .await
                .is_err()
        );
    }
}
