//! Token Cache backends.
//!
//! The cache holds at most one [`TokenSet`], the current one. Readers never
//! observe a partially written token: the file backend writes a sibling
//! temp file and renames it over the target.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{io::AsyncWriteExt, sync::Mutex};
use tracing::debug;

use crate::{error::CacheError, types::TokenSet};

/// Narrow read/write contract for persisting the current token set.
#[async_trait]
pub trait TokenCache: Send + Sync {
    /// Returns the cached token set, `None` when nothing is cached.
    async fn load(&self) -> Result<Option<TokenSet>, CacheError>;

    /// Replaces whatever was cached with `token`.
    async fn store(&self, token: &TokenSet) -> Result<(), CacheError>;

    /// Forgets the cached token set. Clearing an empty cache is not an error.
    async fn clear(&self) -> Result<(), CacheError>;
}

/// JSON file backed cache, `.cache` in the working directory by default.
#[derive(Debug, Clone)]
pub struct FileTokenCache {
    path: PathBuf,
}

impl FileTokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenCache { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| ".cache".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> CacheError {
        CacheError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TokenCache for FileTokenCache {
    async fn load(&self) -> Result<Option<TokenSet>, CacheError> {
        let content = match async_fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| CacheError::Serialization {
                path: self.path.clone(),
                source,
            })
    }

    async fn store(&self, token: &TokenSet) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json =
            serde_json::to_string_pretty(token).map_err(|source| CacheError::Serialization {
                path: self.path.clone(),
                source,
            })?;

        // a leftover temp file would keep its old mode
        let temp_path = self.temp_path();
        match async_fs::remove_file(&temp_path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(self.io_error(e)),
        }

        let written = match write_private(&temp_path, json.as_bytes()).await {
            Ok(()) => async_fs::rename(&temp_path, &self.path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = async_fs::remove_file(&temp_path).await;
            return Err(self.io_error(e));
        }

        debug!(path = %self.path.display(), "token cache updated");
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        match async_fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "token cache cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Creates `path` readable by the owner only (on unix) and writes `contents`.
async fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(contents).await?;
    file.sync_all().await
}

/// In-memory cache for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryTokenCache {
    token: Mutex<Option<TokenSet>>,
}

impl MemoryTokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: TokenSet) -> Self {
        MemoryTokenCache {
            token: Mutex::new(Some(token)),
        }
    }
}

#[async_trait]
impl TokenCache for MemoryTokenCache {
    async fn load(&self) -> Result<Option<TokenSet>, CacheError> {
        Ok(self.token.lock().await.clone())
    }

    async fn store(&self, token: &TokenSet) -> Result<(), CacheError> {
        *self.token.lock().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.token.lock().await.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn token() -> TokenSet {
        TokenSet {
            access_token: "T1".into(),
            refresh_token: Some("R1".into()),
            expires_at: Utc::now() + Duration::seconds(3600),
            token_type: "Bearer".into(),
            scope: ["user-read-recently-played".to_string()].into_iter().collect(),
        }
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let cache = FileTokenCache::new(".cache");
        assert_eq!(cache.temp_path(), PathBuf::from(".cache.tmp"));

        let cache = FileTokenCache::new("/var/lib/rhythms/token.json");
        assert_eq!(
            cache.temp_path(),
            PathBuf::from("/var/lib/rhythms/token.json.tmp")
        );
    }

    #[tokio::test]
    async fn test_memory_cache_store_load_clear() {
        let cache = MemoryTokenCache::new();
        assert_eq!(cache.load().await.unwrap(), None);

        let t = token();
        cache.store(&t).await.unwrap();
        assert_eq!(cache.load().await.unwrap(), Some(t));

        cache.clear().await.unwrap();
        assert_eq!(cache.load().await.unwrap(), None);
    }
}
