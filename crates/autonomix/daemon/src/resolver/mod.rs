//! Off-chain metadata resolution
//!
//! Agent records only carry a metadata reference. The resolver turns that
//! reference into the JSON document it points at and inlines the document's
//! image as a `data:` URI. Every failure degrades to an absent field: a
//! listing never fails because one agent's metadata host is down.

mod cache;
mod fetch;
mod image;

pub use cache::TtlCache;
pub use fetch::{DocumentFetcher, FetchError, FetchedDocument, HttpFetcher, LocalStore};
pub use image::{infer_mime, placeholder_data_uri, to_data_uri};

use crate::config::ResolverConfig;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Trait name (case-insensitive) dropped from surfaced attributes
const AGENT_ID_TRAIT: &str = "agent id";

/// Display fields extracted from an agent's metadata document
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "imageDataURI")]
    pub image_data_uri: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<Value>>,
}

pub struct MetadataResolver {
    config: ResolverConfig,
    fetcher: Arc<dyn DocumentFetcher>,
    local: Option<LocalStore>,
    documents: TtlCache<Value>,
    images: TtlCache<String>,
}

impl MetadataResolver {
    pub fn new(
        config: ResolverConfig,
        fetcher: Arc<dyn DocumentFetcher>,
        local: Option<LocalStore>,
    ) -> Self {
        let ttl = Duration::from_millis(config.cache_ttl_ms);
        Self {
            config,
            fetcher,
            local,
            documents: TtlCache::new(ttl),
            images: TtlCache::new(ttl),
        }
    }

    /// Resolver using reqwest for remote references
    pub fn from_config(config: ResolverConfig, static_dir: Option<PathBuf>) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
        Ok(Self::new(config, Arc::new(fetcher), static_dir.map(LocalStore::new)))
    }

    /// Rewrite `ipfs://` onto the configured gateway; other references pass
    /// through unchanged
    pub fn to_http(&self, uri: &str) -> Option<String> {
        if uri.is_empty() {
            return None;
        }
        match uri.strip_prefix("ipfs://") {
            Some(cid_path) => {
                let gateway = self.config.ipfs_gateway.trim_end_matches('/');
                Some(format!("{}/{}", gateway, cid_path))
            }
            None => Some(uri.to_string()),
        }
    }

    /// Path component that the local store should serve, if any
    fn local_path(&self, normalized: &str) -> Option<String> {
        let local = self.local.as_ref()?;
        let path = if normalized.starts_with('/') {
            normalized.to_string()
        } else {
            url::Url::parse(normalized).ok()?.path().to_string()
        };
        local.resolve(&path).map(|_| path)
    }

    async fn load(&self, reference: &str, max_bytes: Option<usize>) -> Result<FetchedDocument, FetchError> {
        let normalized = self
            .to_http(reference)
            .ok_or_else(|| FetchError::Unsupported(reference.to_string()))?;

        if let (Some(local), Some(path)) = (self.local.as_ref(), self.local_path(&normalized)) {
            return local.read(&path, max_bytes).await;
        }
        if normalized.starts_with("http://") || normalized.starts_with("https://") {
            return self.fetcher.fetch(&normalized, max_bytes).await;
        }
        Err(FetchError::Unsupported(normalized))
    }

    /// Fetch and parse the metadata document behind `uri`
    pub async fn load_metadata(&self, uri: &str) -> Option<Value> {
        if let Some(cached) = self.documents.get(uri) {
            return Some(cached);
        }

        let document = match self.load(uri, Some(self.config.max_metadata_bytes)).await {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(uri = %uri, error = %e, "Metadata fetch failed");
                return None;
            }
        };
        let value: Value = match serde_json::from_slice(&document.bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(uri = %uri, error = %e, "Metadata is not valid JSON");
                return None;
            }
        };

        self.documents.insert(uri, value.clone());
        Some(value)
    }

    /// Inline the image behind `image_ref` as a data URI
    pub async fn load_image_data_uri(&self, image_ref: &str) -> Option<String> {
        let normalized = self.to_http(image_ref)?;
        if let Some(cached) = self.images.get(&normalized) {
            return Some(cached);
        }

        let document = match self.load(image_ref, Some(self.config.max_image_bytes)).await {
            Ok(document) => document,
            Err(e) => {
                tracing::debug!(image = %image_ref, error = %e, "Image fetch failed");
                return None;
            }
        };

        let mime = document
            .content_type
            .unwrap_or_else(|| infer_mime(&normalized).to_string());
        let data_uri = to_data_uri(&document.bytes, &mime);
        self.images.insert(normalized, data_uri.clone());
        Some(data_uri)
    }

    /// Like [`load_image_data_uri`](Self::load_image_data_uri), falling back
    /// to the placeholder image
    pub async fn ensure_image_data_uri(&self, image_ref: Option<&str>) -> String {
        match image_ref {
            Some(image_ref) => self
                .load_image_data_uri(image_ref)
                .await
                .unwrap_or_else(placeholder_data_uri),
            None => placeholder_data_uri(),
        }
    }

    /// Display fields for an agent whose metadata reference is `uri`
    pub async fn summarize(&self, uri: &str) -> MetadataSummary {
        let metadata = self.load_metadata(uri).await;
        let field = |name: &str| {
            metadata
                .as_ref()
                .and_then(|m| m.get(name))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let name = field("name");
        let description = field("description");
        let image = field("image");
        let image_data_uri = self.ensure_image_data_uri(image.as_deref()).await;

        let attributes = metadata
            .as_ref()
            .and_then(|m| m.get("attributes"))
            .and_then(Value::as_array)
            .map(|attrs| {
                attrs
                    .iter()
                    .filter(|attr| !is_agent_id_trait(attr))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .filter(|attrs| !attrs.is_empty());

        MetadataSummary {
            name,
            description,
            image_data_uri,
            attributes,
        }
    }
}

fn is_agent_id_trait(attr: &Value) -> bool {
    attr.get("trait_type")
        .and_then(Value::as_str)
        .map(|t| t.eq_ignore_ascii_case(AGENT_ID_TRAIT))
        .unwrap_or(false)
}


#[cfg(test)]
mod tests {
    use super::testing::StaticFetcher;
    use super::*;

    fn resolver(fetcher: StaticFetcher) -> MetadataResolver {
        MetadataResolver::new(ResolverConfig::default(), Arc::new(fetcher), None)
    }

    #[test]
    fn test_to_http() {
        let resolver = resolver(StaticFetcher::default());
        assert_eq!(
            resolver.to_http("ipfs://QmHash/1.json").as_deref(),
            Some("https://ipfs.io/ipfs/QmHash/1.json")
        );
        assert_eq!(
            resolver.to_http("https://x/a.json").as_deref(),
            Some("https://x/a.json")
        );
        assert_eq!(resolver.to_http(""), None);
    }

    #[tokio::test]
    async fn test_summarize_merges_fields_and_drops_agent_id_trait() {
        let metadata = br#"{
            "name": "Athena",
            "description": "Research agent",
            "image": "ipfs://QmImg/logo.png",
            "attributes": [
                {"trait_type": "Agent ID", "value": 3},
                {"trait_type": "skill", "value": "search"}
            ]
        }"#;
        let fetcher = StaticFetcher::default()
            .with("https://ipfs.io/ipfs/QmMeta", metadata, None)
            .with("https://ipfs.io/ipfs/QmImg/logo.png", b"png", None);

        let summary = resolver(fetcher).summarize("ipfs://QmMeta").await;
        assert_eq!(summary.name.as_deref(), Some("Athena"));
        assert_eq!(summary.description.as_deref(), Some("Research agent"));
        assert_eq!(summary.image_data_uri, "data:image/png;base64,cG5n");
        let attributes = summary.attributes.unwrap();
        assert_eq!(attributes.len(), 1);
        assert_eq!(attributes[0]["trait_type"], "skill");
    }

    #[tokio::test]
    async fn test_unreachable_metadata_degrades() {
        let summary = resolver(StaticFetcher::default())
            .summarize("https://down.example/meta.json")
            .await;
        assert_eq!(summary.name, None);
        assert_eq!(summary.attributes, None);
        assert_eq!(summary.image_data_uri, placeholder_data_uri());
    }

    #[tokio::test]
    async fn test_oversized_image_falls_back_to_placeholder() {
        let config = ResolverConfig {
            max_image_bytes: 4,
            ..ResolverConfig::default()
        };
        let fetcher = StaticFetcher::default().with("https://x/big.gif", b"too large", Some("image/gif"));
        let resolver = MetadataResolver::new(config, Arc::new(fetcher), None);

        assert_eq!(resolver.load_image_data_uri("https://x/big.gif").await, None);
        assert_eq!(
            resolver.ensure_image_data_uri(Some("https://x/big.gif")).await,
            placeholder_data_uri()
        );
    }

    #[tokio::test]
    async fn test_oversized_metadata_degrades() {
        let config = ResolverConfig {
            max_metadata_bytes: 16,
            ..ResolverConfig::default()
        };
        let body = format!(r#"{{"name":"{}"}}"#, "x".repeat(64));
        let fetcher = StaticFetcher::default()
            .with("https://x/huge.json", body.as_bytes(), None)
            .with("https://x/small.json", br#"{"name":"ok"}"#, None);
        let resolver = MetadataResolver::new(config, Arc::new(fetcher), None);

        assert_eq!(resolver.load_metadata("https://x/huge.json").await, None);
        let summary = resolver.summarize("https://x/huge.json").await;
        assert_eq!(summary.name, None);
        assert_eq!(summary.image_data_uri, placeholder_data_uri());

        assert!(resolver.load_metadata("https://x/small.json").await.is_some());
    }

    #[tokio::test]
    async fn test_oversized_local_metadata_degrades() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("metadata")).unwrap();
        std::fs::write(dir.path().join("metadata/big.json"), vec![b' '; 64]).unwrap();

        let config = ResolverConfig {
            max_metadata_bytes: 16,
            ..ResolverConfig::default()
        };
        let resolver = MetadataResolver::new(
            config,
            Arc::new(StaticFetcher::default()),
            Some(LocalStore::new(dir.path())),
        );
        assert_eq!(resolver.load_metadata("/metadata/big.json").await, None);
    }

    #[tokio::test]
    async fn test_local_store_serves_static_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("metadata")).unwrap();
        std::fs::write(dir.path().join("metadata/1.json"), br#"{"name":"Local"}"#).unwrap();

        let resolver = MetadataResolver::new(
            ResolverConfig::default(),
            Arc::new(StaticFetcher::default()),
            Some(LocalStore::new(dir.path())),
        );
        let value = resolver
            .load_metadata("https://registry.example/metadata/1.json")
            .await
            .unwrap();
        assert_eq!(value["name"], "Local");
    }
}
