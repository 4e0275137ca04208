use serde::Deserialize;
use std::net::SocketAddr;

// =============================================================================
// Time-related constants
// =============================================================================

/// How long a cached upstream document stays fresh (15 minutes)
pub const CACHE_TTL_SECS: u64 = 900;

/// Timeout for a single upstream fetch (10 seconds)
pub const FETCH_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Upstream endpoints
// =============================================================================

/// Default upstream endpoint for the version manifest
pub const MANIFEST_ENDPOINT: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Gateway configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Address the HTTP listener binds to
    pub bind: SocketAddr,
    /// Upstream manifest endpoint
    pub manifest_url: String,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            manifest_url: MANIFEST_ENDPOINT.to_string(),
            cache: CacheConfig::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Cache-related configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheConfig {
    /// Time-to-live for cached upstream documents in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: CACHE_TTL_SECS,
        }
    }
}

/// Per-client rate limiting configuration (token bucket)
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Maximum burst size of the bucket
    pub capacity: f64,
    /// Tokens restored per second
    pub refill_per_sec: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // 10 requests per minute per client
        Self {
            enabled: true,
            capacity: 10.0,
            refill_per_sec: 10.0 / 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gateway_config_from_partial_object_uses_defaults_for_missing_fields() {
        let result = serde_json::from_value::<GatewayConfig>(json!({
            "cache": {
                "ttlSecs": 60
            }
        }))
        .unwrap();

        assert_eq!(result.cache.ttl_secs, 60);
        assert_eq!(result.bind, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(result.manifest_url, MANIFEST_ENDPOINT);
        assert_eq!(result.rate_limit, RateLimitConfig::default());
    }

    #[test]
    fn gateway_config_from_full_object_parses_all_fields() {
        let result = serde_json::from_value::<GatewayConfig>(json!({
            "bind": "127.0.0.1:8080",
            "manifestUrl": "http://localhost:9999/manifest.json",
            "cache": {
                "ttlSecs": 30
            },
            "rateLimit": {
                "enabled": false,
                "capacity": 100.0,
                "refillPerSec": 5.0
            }
        }))
        .unwrap();

        assert_eq!(
            result,
            GatewayConfig {
                bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
                manifest_url: "http://localhost:9999/manifest.json".to_string(),
                cache: CacheConfig { ttl_secs: 30 },
                rate_limit: RateLimitConfig {
                    enabled: false,
                    capacity: 100.0,
                    refill_per_sec: 5.0,
                },
            }
        );
    }

    #[test]
    fn rate_limit_defaults_to_ten_requests_per_minute() {
        let config = RateLimitConfig::default();

        assert!(config.enabled);
        assert_eq!(config.capacity, 10.0);
        assert!((config.refill_per_sec - 10.0 / 60.0).abs() < f64::EPSILON);
    }
}
