// Pre-dispatch validation
// Address format checks, amount bounds and required-field guards run before
// any adapter is called
//
// Numan Thabit 2025 Nov

use crate::catalog::ChainFamily;
use crate::errors::{fail, ErrorKind, Result};
use alloy_primitives::Address;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

static EVM_ADDRESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap());
static STARKNET_ACCOUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{64}$").unwrap());

/// Length of a normalised Starknet address including the `0x` prefix.
pub const STARKNET_ADDRESS_LEN: usize = 66;
/// Shortest maker endpoint accepted on Starknet.
pub const MIN_STARKNET_ENDPOINT_LEN: usize = 60;

pub fn is_evm_address(address: &str) -> bool {
    EVM_ADDRESS.is_match(address)
}

/// Full-width Starknet account address.
pub fn is_starknet_account(address: &str) -> bool {
    STARKNET_ACCOUNT.is_match(address)
}

/// Left-pad a Starknet address to 64 hex digits.
pub fn starknet_hash_format(address: &str) -> String {
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    format!("0x{digits:0>64}")
}

pub fn is_valid_starknet_receiver(address: &str) -> bool {
    let formatted = starknet_hash_format(address);
    formatted.len() == STARKNET_ADDRESS_LEN
        && is_starknet_account(&formatted)
        && formatted[2..].bytes().any(|b| b != b'0')
}

pub fn is_valid_address(family: ChainFamily, address: &str) -> bool {
    match family {
        ChainFamily::Starknet => is_valid_starknet_receiver(address),
        ChainFamily::Evm | ChainFamily::ZkLite | ChainFamily::Loopring | ChainFamily::ImmutableX => {
            is_evm_address(address)
        }
    }
}

/// Parse an EVM address, failing with [`ErrorKind::InvalidAddress`].
pub fn parse_evm_address(address: &str, what: &str) -> Result<Address> {
    if !is_evm_address(address) {
        return fail(
            ErrorKind::InvalidAddress,
            format!("{what} {address} is not an EVM address"),
        );
    }
    address
        .parse()
        .map_or_else(|_| fail(ErrorKind::InvalidAddress, format!("{what} {address} is malformed")), Ok)
}

/// `min <= amount <= max`, and the amount must be positive.
pub fn check_bounds(amount: Decimal, min: Decimal, max: Option<Decimal>) -> Result<()> {
    if amount <= Decimal::ZERO {
        return fail(ErrorKind::OutOfBounds, format!("amount {amount} must be positive"));
    }
    if amount < min {
        return fail(
            ErrorKind::OutOfBounds,
            format!("amount {amount} is below the minimum {min}"),
        );
    }
    if let Some(max) = max {
        if amount > max {
            return fail(
                ErrorKind::OutOfBounds,
                format!("amount {amount} is above the maximum {max}"),
            );
        }
    }
    Ok(())
}

pub fn require<T>(value: Option<T>, kind: ErrorKind, message: &str) -> Result<T> {
    match value {
        Some(v) => Ok(v),
        None => fail(kind, message),
    }
}

/// Non-empty string or a [`ErrorKind::MissingField`] failure.
pub fn require_text<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    require(value.filter(|v| !v.trim().is_empty()), ErrorKind::MissingField, message)
}
