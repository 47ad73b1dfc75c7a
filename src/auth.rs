use bcrypt::{hash, verify, DEFAULT_COST};

use crate::config::AdminSecretSource;

/// Shared admin secret, held only as a bcrypt hash.
#[derive(Clone)]
pub struct AdminSecret {
    hash: String,
}

impl AdminSecret {
    pub fn from_source(source: &AdminSecretSource) -> anyhow::Result<Self> {
        match source {
            AdminSecretSource::Hash(hash) => Ok(Self { hash: hash.clone() }),
            AdminSecretSource::Plain(plain) => Self::from_plain(plain, DEFAULT_COST),
        }
    }

    pub fn from_plain(plain: &str, cost: u32) -> anyhow::Result<Self> {
        Ok(Self { hash: hash(plain, cost)? })
    }

    /// bcrypt compares digests in constant time; a malformed hash counts as a mismatch.
    /// Hashing runs on the blocking pool so request workers stay free.
    pub async fn verify(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }

        let candidate = candidate.to_string();
        let hash = self.hash.clone();
        match tokio::task::spawn_blocking(move || verify(candidate, &hash)).await {
            Ok(result) => result.unwrap_or(false),
            Err(e) => {
                tracing::error!("admin secret check panicked: {}", e);
                false
            }
        }
    }
}
