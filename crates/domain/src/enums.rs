use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Network {
    Main,
    Morden,
    Ropsten,
    Rinkeby,
    Kovan,
    Unknown,
}

impl Network {
    pub const ALL: [Network; 6] = [
        Network::Main,
        Network::Morden,
        Network::Ropsten,
        Network::Rinkeby,
        Network::Kovan,
        Network::Unknown,
    ];

    /// Resolves a network from its numeric id. Unlisted ids map to `Unknown`.
    pub fn from_id(id: u64) -> Self {
        match id {
            1 => Network::Main,
            2 => Network::Morden,
            3 => Network::Ropsten,
            4 => Network::Rinkeby,
            42 => Network::Kovan,
            _ => Network::Unknown,
        }
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            Network::Main => Some(1),
            Network::Morden => Some(2),
            Network::Ropsten => Some(3),
            Network::Rinkeby => Some(4),
            Network::Kovan => Some(42),
            Network::Unknown => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Main => "MAIN",
            Network::Morden => "MORDEN",
            Network::Ropsten => "ROPSTEN",
            Network::Rinkeby => "RINKEBY",
            Network::Kovan => "KOVAN",
            Network::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::UnknownNetwork(s.to_string()))
    }
}

/// One of the two fixed DxMgnPool instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoolNumber {
    One,
    Two,
}

impl PoolNumber {
    pub fn as_u8(&self) -> u8 {
        match self {
            PoolNumber::One => 1,
            PoolNumber::Two => 2,
        }
    }
}

impl TryFrom<u8> for PoolNumber {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(PoolNumber::One),
            2 => Ok(PoolNumber::Two),
            other => Err(DomainError::InvalidPool(other)),
        }
    }
}

impl fmt::Display for PoolNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_from_id() {
        assert_eq!(Network::from_id(1), Network::Main);
        assert_eq!(Network::from_id(4), Network::Rinkeby);
        assert_eq!(Network::from_id(42), Network::Kovan);
        assert_eq!(Network::from_id(5), Network::Unknown);
        assert_eq!(Network::Kovan.id(), Some(42));
        assert_eq!(Network::Unknown.id(), None);
    }

    #[test]
    fn test_network_parse_and_serde() {
        assert_eq!("rinkeby".parse::<Network>().unwrap(), Network::Rinkeby);
        assert!("goerli".parse::<Network>().is_err());
        assert_eq!(serde_json::to_string(&Network::Main).unwrap(), "\"MAIN\"");
    }

    #[test]
    fn test_pool_number() {
        assert_eq!(PoolNumber::try_from(1).unwrap(), PoolNumber::One);
        assert_eq!(PoolNumber::try_from(2).unwrap(), PoolNumber::Two);
        assert_eq!(PoolNumber::try_from(3), Err(DomainError::InvalidPool(3)));
    }
}
