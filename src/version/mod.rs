//! Version resolution layer
//!
//! This module provides the core functionality for fetching, validating, and
//! caching the two upstream document types: the version manifest (the index of
//! all known versions plus the current id of each channel) and the per-version
//! metadata record (artifact locations, sizes, checksums).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Routing   │────▶│   Resolver  │────▶│    Cache    │
//! │  (adapter)  │     │(fetch+check)│     │  (TTL map)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │
//!                            ▼
//!                     ┌─────────────┐
//!                     │  Upstream   │
//!                     │ (manifest + │
//!                     │  metadata)  │
//!                     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: in-memory key/value store with per-entry expiry
//! - [`resolver`]: manifest and version resolution with caching
//! - [`error`]: error taxonomy for resolution failures
//! - [`types`]: data model for the upstream documents

pub mod cache;
pub mod error;
pub mod resolver;
pub mod types;
