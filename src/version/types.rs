//! Data model for the upstream version documents
//!
//! These structs are the structural contract checked once at the trust
//! boundary, immediately after parsing upstream bytes. Downstream code can
//! rely on field presence and types exactly as modeled here. Unknown upstream
//! fields are ignored since the upstream schema grows over time.

use serde::{Deserialize, Serialize};

/// The upstream index document: every known version plus the current id of
/// each channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionManifest {
    pub latest: Latest,
    /// Order as delivered upstream, implicitly newest-first but not
    /// guaranteed. Lookups scan linearly by id.
    pub versions: Vec<VersionSummary>,
}

impl VersionManifest {
    /// Finds the summary entry whose id equals `id`
    pub fn find(&self, id: &str) -> Option<&VersionSummary> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Returns the current version id for a channel
    pub fn latest_id(&self, channel: Channel) -> &str {
        match channel {
            Channel::Release => &self.latest.release,
            Channel::Snapshot => &self.latest.snapshot,
        }
    }
}

/// Named pointers to the current version id of each channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Latest {
    pub release: String,
    pub snapshot: String,
}

/// One entry of the manifest's version list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionSummary {
    /// Unique version identifier, e.g. "1.20.1" or "23w31a"
    pub id: String,
    /// Free-form channel label: "release", "snapshot", "old_beta", ...
    #[serde(rename = "type")]
    pub version_type: String,
    /// Location of the detailed per-version record
    pub url: String,
    /// Opaque ISO-8601 timestamp, passed through unparsed
    pub time: String,
    #[serde(rename = "releaseTime")]
    pub release_time: String,
}

/// The per-version metadata record fetched from a [`VersionSummary::url`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionDetails {
    pub id: String,
    #[serde(rename = "type")]
    pub version_type: String,
    pub time: String,
    #[serde(rename = "releaseTime")]
    pub release_time: String,
    pub downloads: Downloads,
}

/// Download artifacts of a version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Downloads {
    pub client: DownloadArtifact,
    pub server: DownloadArtifact,
}

/// Location, size, and checksum of a single downloadable artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadArtifact {
    /// 40-hex-char SHA-1 checksum of the artifact
    pub sha1: String,
    /// Byte count
    pub size: u64,
    pub url: String,
}

/// A named pointer to "the current version"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Release,
    Snapshot,
}

impl Channel {
    /// Returns the string representation of the channel
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Release => "release",
            Channel::Snapshot => "snapshot",
        }
    }
}

impl std::str::FromStr for Channel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release" => Ok(Channel::Release),
            "snapshot" => Ok(Channel::Snapshot),
            _ => Err(()),
        }
    }
}
