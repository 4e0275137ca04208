//! Manifest and version resolution with time-bounded caching
//!
//! Both upstream document types are cached for [`CACHE_TTL_SECS`] after a
//! successful fetch and validation. Failures are never cached, so a transient
//! upstream outage self-heals on the next call without an invalidation path.
//! No retries are performed; a failed fetch or failed validation is surfaced
//! immediately to the caller.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{CACHE_TTL_SECS, FETCH_TIMEOUT_SECS, MANIFEST_ENDPOINT};
use crate::version::cache::TtlCache;
use crate::version::error::ResolveError;
use crate::version::types::{Channel, VersionDetails, VersionManifest};

/// Cache key for the singleton manifest document
const MANIFEST_KEY: &str = "versionManifest";

/// Cache key for one resolved version id. The literal prefix keeps this key
/// space disjoint from [`MANIFEST_KEY`].
fn version_key(id: &str) -> String {
    format!("version:{id}")
}

/// Resolves version identifiers against the upstream manifest
///
/// Shared process-wide behind an [`Arc`]; the caches inside are safe for
/// concurrent access. Two callers that miss the cache at the same time both
/// fetch upstream, which is a benign race: the last insert for a key wins.
pub struct VersionResolver {
    client: reqwest::Client,
    manifest_url: String,
    ttl: Duration,
    manifests: TtlCache<Arc<VersionManifest>>,
    versions: TtlCache<Arc<VersionDetails>>,
}

impl VersionResolver {
    /// Creates a resolver against a custom manifest endpoint
    pub fn new(manifest_url: &str, ttl: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("version-gateway")
                .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            manifest_url: manifest_url.to_string(),
            ttl,
            manifests: TtlCache::new(),
            versions: TtlCache::new(),
        }
    }

    /// Returns the version manifest, contacting upstream at most once per
    /// TTL window
    pub async fn get_version_manifest(&self) -> Result<Arc<VersionManifest>, ResolveError> {
        if let Some(manifest) = self.manifests.get(MANIFEST_KEY) {
            debug!("version manifest served from cache");
            return Ok(manifest);
        }

        debug!(url = %self.manifest_url, "fetching version manifest");
        let body = self.fetch_text(&self.manifest_url).await?;
        let manifest: VersionManifest = parse_document(&body)?;

        let manifest = Arc::new(manifest);
        self.manifests
            .insert(MANIFEST_KEY, Arc::clone(&manifest), self.ttl);

        Ok(manifest)
    }

    /// Returns the full metadata record for a version id
    ///
    /// On a cache hit the manifest is not consulted at all. On a miss the
    /// manifest is resolved first (its errors propagate unchanged), the id is
    /// looked up in its version list, and the matched entry's URL is fetched
    /// and validated.
    pub async fn get_version_details(&self, id: &str) -> Result<Arc<VersionDetails>, ResolveError> {
        let key = version_key(id);
        if let Some(details) = self.versions.get(&key) {
            debug!(id, "version details served from cache");
            return Ok(details);
        }

        let manifest = self.get_version_manifest().await?;
        let Some(summary) = manifest.find(id) else {
            debug!(id, "version id not present in manifest");
            return Err(ResolveError::NotFound(id.to_string()));
        };

        debug!(id, url = %summary.url, "fetching version details");
        let body = self.fetch_text(&summary.url).await?;
        let details: VersionDetails = parse_document(&body)?;

        let details = Arc::new(details);
        self.versions.insert(key, Arc::clone(&details), self.ttl);

        Ok(details)
    }

    /// Resolves a channel to its current version's metadata record
    pub async fn get_latest(&self, channel: Channel) -> Result<Arc<VersionDetails>, ResolveError> {
        let manifest = self.get_version_manifest().await?;
        let id = manifest.latest_id(channel).to_string();

        self.get_version_details(&id).await
    }

    async fn fetch_text(&self, url: &str) -> Result<String, ResolveError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ResolveError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            warn!(url, %status, "upstream returned non-success status");
            return Err(ResolveError::Upstream {
                code: status.as_u16(),
                status: status.canonical_reason().unwrap_or("unknown").to_string(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        response.text().await.map_err(ResolveError::from_transport)
    }
}

impl Default for VersionResolver {
    fn default() -> Self {
        Self::new(MANIFEST_ENDPOINT, Duration::from_secs(CACHE_TTL_SECS))
    }
}

/// Parses an upstream document, reporting the offending field path on failure
fn parse_document<T: DeserializeOwned>(body: &str) -> Result<T, ResolveError> {
    let deserializer = &mut serde_json::Deserializer::from_str(body);

    serde_path_to_error::deserialize(deserializer).map_err(|err| {
        warn!("upstream document failed validation: {err}");
        ResolveError::Validation(err.to_string())
    })
}
