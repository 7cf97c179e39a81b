//! One-way password hashing.
//!
//! bcrypt is salted and costed; both hashing and verification are CPU bound,
//! so they run on the blocking pool instead of an async worker.

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// `cost` is clamped to the range bcrypt accepts.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    pub async fn hash(&self, password: &str) -> ResultEngine<String> {
        let cost = self.cost;
        let password = password.to_string();
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|err| EngineError::TransactionFailed(format!("hash task failed: {err}")))?
            .map_err(|err| EngineError::Validation(format!("cannot hash password: {err}")))
    }

    /// Returns `false` for a mismatch and for a malformed stored hash alike.
    pub async fn verify(&self, password: &str, hash: &str) -> ResultEngine<bool> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash).unwrap_or(false))
            .await
            .map_err(|err| EngineError::TransactionFailed(format!("verify task failed: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hash_is_salted_and_verifies() {
        let hasher = PasswordHasher::with_cost(4);
        let first = hasher.hash("correct horse").await.unwrap();
        let second = hasher.hash("correct horse").await.unwrap();

        assert_ne!(first, second);
        assert!(hasher.verify("correct horse", &first).await.unwrap());
        assert!(!hasher.verify("battery staple", &first).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_hash_never_verifies() {
        let hasher = PasswordHasher::with_cost(4);
        assert!(!hasher.verify("anything", "not-a-bcrypt-hash").await.unwrap());
    }
}
