//! JSON-RPC provider over HTTP.
//!
//! Provides:
//! - Request/response framing
//! - Typed wrappers for the `eth_*` methods the client uses
//! - Transaction submission with receipt polling

mod config;
mod provider;
mod types;

pub use config::*;
pub use provider::*;
pub use types::*;
