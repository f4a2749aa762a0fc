// Amount codec
// Decimal to smallest-unit conversion, trade fees and the routing code
// carried in the low-order digits of an on-chain amount
//
// Numan Thabit 2025 Nov

use crate::errors::{fail, BridgeError, ErrorKind, Result};
use alloy_primitives::U256;
use rust_decimal::Decimal;
use tracing::debug;

/// Routing codes are `ROUTING_CODE_BASE + internal_id`.
pub const ROUTING_CODE_BASE: u16 = 9000;
/// Highest internal id that fits in a routing code.
pub const MAX_INTERNAL_ID: u16 = 999;
/// The routing code occupies the low four decimal digits.
const ROUTING_CODE_MODULUS: u64 = 10_000;
const FEE_DENOMINATOR: u64 = 1_000_000;

fn pow10(exp: u32) -> Result<U256> {
    U256::from(10u64)
        .checked_pow(U256::from(exp))
        .map_or_else(|| fail(ErrorKind::Computation, "amount scale overflow"), Ok)
}

/// Convert a decimal amount into smallest units, truncating digits beyond
/// `decimals`.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<U256> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return fail(ErrorKind::Computation, format!("negative amount {amount}"));
    }
    let scale = amount.scale();
    let decimals = u32::from(decimals);
    let mantissa = amount.mantissa().unsigned_abs();

    if decimals >= scale {
        U256::from(mantissa)
            .checked_mul(pow10(decimals - scale)?)
            .map_or_else(|| fail(ErrorKind::Computation, "amount overflow"), Ok)
    } else {
        // scale <= 28, so the divisor fits in u128
        let divisor = 10u128.pow(scale - decimals);
        Ok(U256::from(mantissa / divisor))
    }
}

/// `floor(amount * fee_ppm / 1e6)`
pub fn trade_fee(amount: U256, fee_ppm: u64) -> Result<U256> {
    let scaled = amount
        .checked_mul(U256::from(fee_ppm))
        .map_or_else(|| fail(ErrorKind::Computation, "trade fee overflow"), Ok)?;
    Ok(scaled / U256::from(FEE_DENOMINATOR))
}

/// Routing code for a destination internal id.
pub fn routing_code(internal_id: &str) -> Result<u16> {
    match internal_id.trim().parse::<u16>() {
        Ok(id) if id <= MAX_INTERNAL_ID => Ok(ROUTING_CODE_BASE + id),
        _ => fail(
            ErrorKind::Computation,
            format!("internal id {internal_id} cannot be carried in a routing code"),
        ),
    }
}

/// Replace the low four decimal digits of `amount` with `code`.
pub fn embed_routing_code(amount: U256, code: u16) -> Result<U256> {
    let modulus = U256::from(ROUTING_CODE_MODULUS);
    if amount < modulus {
        return fail(
            ErrorKind::Computation,
            format!("amount {amount} is too small to carry routing code {code}"),
        );
    }
    Ok(amount / modulus * modulus + U256::from(code))
}

/// Internal id encoded in the low digits of `amount`, if any.
pub fn extract_internal_id(amount: U256) -> Option<u16> {
    let low = (amount % U256::from(ROUTING_CODE_MODULUS)).to::<u64>() as u16;
    (low >= ROUTING_CODE_BASE).then(|| low - ROUTING_CODE_BASE)
}

/// On-chain amount for a transfer of `value` source tokens: smallest units,
/// minus the trade fee, with the routing code embedded when given.
pub fn source_amount(
    value: Decimal,
    decimals: u8,
    fee_ppm: u64,
    code: Option<u16>,
) -> Result<U256> {
    let base = to_base_units(value, decimals)?;
    let fee = trade_fee(base, fee_ppm)?;
    let net = base
        .checked_sub(fee)
        .map_or_else(|| fail(ErrorKind::Computation, "trade fee exceeds amount"), Ok)?;
    if net.is_zero() {
        return fail(ErrorKind::Computation, format!("{value} is zero after fees"));
    }
    let amount = match code {
        Some(code) => embed_routing_code(net, code)?,
        None => net,
    };
    debug!(%value, decimals, fee_ppm, %fee, %amount, "computed source amount");
    Ok(amount)
}

/// Amount the destination should receive for a forward-and-convert:
/// `(amount - withholding_fee) * (1 - fee_ppm / 1e6) * rate`, in destination
/// smallest units.
pub fn expected_destination_amount(
    amount: Decimal,
    withholding_fee: Decimal,
    fee_ppm: u64,
    rate: Decimal,
    destination_decimals: u8,
) -> Result<U256> {
    let overflow = || BridgeError::new(ErrorKind::Computation, "expected amount overflow");
    let net = amount.checked_sub(withholding_fee).ok_or_else(overflow)?;
    if net <= Decimal::ZERO {
        return fail(
            ErrorKind::Computation,
            format!("amount {amount} does not cover withholding fee {withholding_fee}"),
        );
    }
    let fee_ratio = Decimal::from(fee_ppm)
        .checked_div(Decimal::from(FEE_DENOMINATOR))
        .ok_or_else(overflow)?;
    let expected = net
        .checked_mul(Decimal::ONE - fee_ratio)
        .and_then(|v| v.checked_mul(rate))
        .ok_or_else(overflow)?;
    if expected <= Decimal::ZERO {
        return fail(ErrorKind::Computation, "expected amount is not positive");
    }
    to_base_units(expected, destination_decimals)
}
