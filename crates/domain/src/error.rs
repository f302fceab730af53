use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("pool number must be 1 or 2, got {0}")]
    InvalidPool(u8),

    #[error("amount must not be negative: {0}")]
    NegativeAmount(String),

    #[error("{value} has more than {decimals} decimal places")]
    TooPrecise { value: String, decimals: u8 },

    #[error("amount overflows 256 bits: {0}")]
    Overflow(String),

    #[error("value {0} does not fit a decimal")]
    NotRepresentable(String),

    #[error("unknown network name: {0}")]
    UnknownNetwork(String),
}
