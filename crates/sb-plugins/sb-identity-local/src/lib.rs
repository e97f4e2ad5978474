//! # sb-identity-local
//! sphere-board/crates/sb-plugins/sb-identity-local/src/lib.rs
//! File-backed implementation of `IdentityProvider`.
//!
//! The identifier is created lazily on first access and then lives
//! forever: no expiry, no rotation. Deleting the file is the only way to
//! become someone new.

use std::path::PathBuf;

use async_trait::async_trait;
use rand::Rng;
use sb_core::traits::IdentityProvider;
use tokio::fs;

const ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

pub struct LocalIdentityProvider {
    /// Location of the identity file (e.g., "./data/user_id")
    path: PathBuf,
}

impl LocalIdentityProvider {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn get_or_create(&self) -> anyhow::Result<String> {
        match fs::read_to_string(&self.path).await {
            Ok(existing) => {
                let existing = existing.trim();
                if !existing.is_empty() {
                    return Ok(existing.to_string());
                }
                // Empty file: fall through and regenerate.
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => return Err(err.into()),
        }

        let id = generate_user_id();
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, &id).await?;
        Ok(id)
    }
}

/// "user_" plus 9 base-36 characters, roughly 46 bits of entropy. Enough
/// to make cross-device collisions a non-issue without authentication.
fn generate_user_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
        .collect();
    format!("user_{suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_have_the_expected_shape() {
        for _ in 0..50 {
            let id = generate_user_id();
            let suffix = id.strip_prefix("user_").expect("prefix");
            assert_eq!(suffix.len(), ID_SUFFIX_LEN);
            assert!(suffix
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        }
    }

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalIdentityProvider::new(dir.path().join("user_id"));

        let first = provider.get_or_create().await.unwrap();
        let second = provider.get_or_create().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn identity_survives_a_new_provider_on_the_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user_id");

        let first = LocalIdentityProvider::new(path.clone())
            .get_or_create()
            .await
            .unwrap();
        let second = LocalIdentityProvider::new(path)
            .get_or_create()
            .await
            .unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn distinct_paths_get_distinct_identities() {
        let dir = tempfile::tempdir().unwrap();

        let a = LocalIdentityProvider::new(dir.path().join("a"))
            .get_or_create()
            .await
            .unwrap();
        let b = LocalIdentityProvider::new(dir.path().join("b"))
            .get_or_create()
            .await
            .unwrap();
        assert_ne!(a, b);
    }
}
