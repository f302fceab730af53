//! Domain types for the DxMgnPool client.
//!
//! Plain values shared by the chain aggregator and the state store:
//! networks, pool numbering, token metadata, MGN balances and exact
//! conversion between raw token units and decimal display values.

pub mod entities;
pub mod enums;
pub mod error;
pub mod value_objects;

pub use error::DomainError;

/// An externally-owned or contract address.
pub type Address = primitive_types::H160;

/// Transaction or block hash.
pub type TxHash = primitive_types::H256;

pub use primitive_types::U256;
