//! Solidity interfaces of the contracts the client calls.
//!
//! Calldata, selectors and return decoding come from `sol!`; the helpers
//! below convert between the alloy primitives and the `primitive-types`
//! values used across the workspace.

use crate::error::ChainError;
use alloy_primitives::{Address as SolAddress, FixedBytes, U256 as SolUint};
use alloy_sol_types::{SolCall, sol};
use primitive_types::{H160, U256};

sol! {
    /// ERC20 token.
    interface IERC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function balanceOf(address owner) external view returns (uint256);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function transfer(address to, uint256 amount) external returns (bool);
    }

    /// Tokens that return `bytes32` from the metadata getters.
    interface IERC20Bytes32 {
        function name() external view returns (bytes32);
        function symbol() external view returns (bytes32);
    }

    /// Wrapped ether.
    interface IWETH {
        function deposit() external payable;
    }

    /// Coordinator registering both pools.
    interface IDxMgnCoordinator {
        function dxMgnPool1() external view returns (address);
        function dxMgnPool2() external view returns (address);
    }

    interface IDxMgnPool {
        function depositToken() external view returns (address);
        function secondaryToken() external view returns (address);
        function mgnToken() external view returns (address);
        function totalPoolShares() external view returns (uint256);
        function poolSharesByAddress(address account) external view returns (uint256[]);
        function deposit(uint256 amount) external;
    }

    /// Magnolia token.
    interface ITokenMGN {
        function lockedTokenBalances(address account) external view returns (uint256);
        function unlockedTokens(address account)
            external
            view
            returns (uint256 amountUnlocked, uint256 withdrawalTime);
    }
}

pub fn to_sol_address(address: H160) -> SolAddress {
    SolAddress::new(address.0)
}

pub fn from_sol_address(address: SolAddress) -> H160 {
    H160(address.0.0)
}

pub fn to_sol_uint(value: U256) -> SolUint {
    let mut bytes = [0u8; 32];
    for (i, byte) in bytes.iter_mut().rev().enumerate() {
        *byte = value.byte(i);
    }
    SolUint::from_be_bytes(bytes)
}

pub fn from_sol_uint(value: SolUint) -> U256 {
    U256::from_big_endian(&value.to_be_bytes::<32>())
}

/// Decodes the return data of `C`, validating it strictly.
pub fn decode_returns<C: SolCall>(data: &[u8]) -> Result<C::Return, ChainError> {
    C::abi_decode_returns(data, true)
        .map_err(|e| ChainError::Decode(format!("{}: {e}", C::SIGNATURE)))
}

/// Decodes `name()` or `symbol()` return data. Empty data yields `None`;
/// a single word is read as right-padded `bytes32` text.
pub fn decode_text<S, B>(
    data: &[u8],
    text: impl FnOnce(S::Return) -> String,
    word: impl FnOnce(B::Return) -> FixedBytes<32>,
) -> Result<Option<String>, ChainError>
where
    S: SolCall,
    B: SolCall,
{
    if data.is_empty() {
        return Ok(None);
    }
    if data.len() == 32 {
        let word = word(decode_returns::<B>(data)?);
        let end = word.iter().position(|b| *b == 0).unwrap_or(32);
        return Ok(Some(String::from_utf8_lossy(&word[..end]).into_owned()));
    }
    Ok(Some(text(decode_returns::<S>(data)?)))
}
