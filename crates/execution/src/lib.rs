//! Chain aggregator and provider synchronization.
//!
//! This crate provides:
//! - Network constants and startup configuration
//! - `DxMgnPoolApi`, the high-level reads and writes over the pool contracts
//! - The approve, wrap and deposit flow
//! - A polling watcher for the provider session

/// Prelude module for convenient imports.
pub mod prelude;

/// Chain aggregator.
pub mod api;
/// Network constants and configuration.
pub mod config;
/// Error types.
pub mod error;
/// Provider session synchronization.
pub mod sync;
