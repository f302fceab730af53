use crate::enums::PoolNumber;
use crate::error::DomainError;
use primitive_types::U256;
use serde::{Deserialize, Serialize};

/// A value held once per DxMgnPool instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolPair<T> {
    pub pool1: T,
    pub pool2: T,
}

impl<T> PoolPair<T> {
    pub fn new(pool1: T, pool2: T) -> Self {
        Self { pool1, pool2 }
    }

    pub fn get(&self, pool: PoolNumber) -> &T {
        match pool {
            PoolNumber::One => &self.pool1,
            PoolNumber::Two => &self.pool2,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> PoolPair<U> {
        PoolPair {
            pool1: f(self.pool1),
            pool2: f(self.pool2),
        }
    }

    pub fn into_tuple(self) -> (T, T) {
        (self.pool1, self.pool2)
    }
}

impl<T> From<(T, T)> for PoolPair<T> {
    fn from((pool1, pool2): (T, T)) -> Self {
        Self { pool1, pool2 }
    }
}

/// Sums a share array. Addition is commutative, so element order does not matter.
pub fn sum_shares<'a>(shares: impl IntoIterator<Item = &'a U256>) -> Result<U256, DomainError> {
    shares.into_iter().try_fold(U256::zero(), |acc, s| {
        acc.checked_add(*s)
            .ok_or_else(|| DomainError::Overflow(format!("{acc} + {s}")))
    })
}
