//! Document fetching over HTTP and from the local static directory

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Raw bytes of a fetched document
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("document exceeds {limit} bytes")]
    TooLarge { limit: usize },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unsupported reference: {0}")]
    Unsupported(String),

    #[error("local read failed: {0}")]
    Local(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}

/// Source of remote documents
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// Fetch `url`, failing with [`FetchError::TooLarge`] once more than
    /// `max_bytes` have been announced or received
    async fn fetch(&self, url: &str, max_bytes: Option<usize>) -> Result<FetchedDocument, FetchError>;
}

/// reqwest-backed fetcher
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("autonomixd/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, max_bytes: Option<usize>) -> Result<FetchedDocument, FetchError> {
        let mut response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        if let (Some(limit), Some(announced)) = (max_bytes, response.content_length()) {
            if announced as usize > limit {
                return Err(FetchError::TooLarge { limit });
            }
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            bytes.extend_from_slice(&chunk);
            if let Some(limit) = max_bytes {
                if bytes.len() > limit {
                    return Err(FetchError::TooLarge { limit });
                }
            }
        }

        Ok(FetchedDocument {
            bytes,
            content_type,
        })
    }
}

/// Files under the daemon's static directory (`metadata/`, `images/`)
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a `/metadata/...` or `/images/...` path onto the store.
    /// Anything else, or any path that would escape the root, is `None`.
    pub fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let relative = url_path
            .strip_prefix("/metadata/")
            .map(|rest| ("metadata", rest))
            .or_else(|| url_path.strip_prefix("/images/").map(|rest| ("images", rest)))?;

        let rest = Path::new(relative.1);
        if rest.as_os_str().is_empty()
            || !rest.components().all(|c| matches!(c, Component::Normal(_)))
        {
            return None;
        }
        Some(self.root.join(relative.0).join(rest))
    }

    pub async fn read(&self, url_path: &str, max_bytes: Option<usize>) -> Result<FetchedDocument, FetchError> {
        let path = self
            .resolve(url_path)
            .ok_or_else(|| FetchError::Unsupported(url_path.to_string()))?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| FetchError::Local(e.to_string()))?;
        if let Some(limit) = max_bytes {
            if metadata.len() as usize > limit {
                return Err(FetchError::TooLarge { limit });
            }
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| FetchError::Local(e.to_string()))?;
        Ok(FetchedDocument {
            bytes,
            content_type: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_resolve() {
        let store = LocalStore::new("/srv/static");
        assert_eq!(
            store.resolve("/metadata/1.json"),
            Some(PathBuf::from("/srv/static/metadata/1.json"))
        );
        assert_eq!(
            store.resolve("/images/a/b.png"),
            Some(PathBuf::from("/srv/static/images/a/b.png"))
        );
        assert_eq!(store.resolve("/other/1.json"), None);
        assert_eq!(store.resolve("/metadata/../secret"), None);
        assert_eq!(store.resolve("/metadata/"), None);
    }

    #[tokio::test]
    async fn test_local_read_enforces_limit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/big.png"), vec![0u8; 32]).unwrap();

        let store = LocalStore::new(dir.path());
        assert!(matches!(
            store.read("/images/big.png", Some(16)).await,
            Err(FetchError::TooLarge { limit: 16 })
        ));
        let doc = store.read("/images/big.png", Some(64)).await.unwrap();
        assert_eq!(doc.bytes.len(), 32);
    }
}
