//! Parsers for the hex encodings used in JSON-RPC payloads.
//!
//! Two encodings show up: DATA (`0x`-prefixed, two hex digits per byte, fixed or variable
//! length) and QUANTITY (`0x`-prefixed big-endian integer without leading zeros). Every
//! parser takes the field name so errors point at the offending key.

use alloy_primitives::{hex, Bytes, FixedBytes, U256};

use crate::error::MalformedPayload;

/// Unwraps a field that must be present.
pub(crate) fn required<'a>(
    field: &'static str,
    value: Option<&'a String>,
) -> Result<&'a str, MalformedPayload> {
    value.map(String::as_str).ok_or(MalformedPayload::MissingField(field))
}

/// Decodes `0x`-prefixed hex, leaving it to the caller to name the value in errors.
pub(crate) fn prefixed_hex(raw: &str) -> Result<Bytes, String> {
    hex::decode(strip_prefix(raw)?).map(Bytes::from).map_err(|err| err.to_string())
}

/// Parses variable length DATA.
pub(crate) fn data(field: &'static str, raw: &str) -> Result<Bytes, MalformedPayload> {
    prefixed_hex(raw).map_err(|reason| MalformedPayload::InvalidHex { field, reason })
}

/// Parses DATA of exactly `N` bytes.
pub(crate) fn fixed<const N: usize>(
    field: &'static str,
    raw: &str,
) -> Result<FixedBytes<N>, MalformedPayload> {
    let bytes = data(field, raw)?;
    FixedBytes::try_from(&bytes[..]).map_err(|_| MalformedPayload::InvalidLength {
        field,
        expected: N,
        actual: bytes.len(),
    })
}

/// Parses a QUANTITY that fits in 64 bits.
pub(crate) fn quantity_u64(field: &'static str, raw: &str) -> Result<u64, MalformedPayload> {
    let digits = quantity_digits(field, raw)?;
    u64::from_str_radix(digits, 16)
        .map_err(|err| MalformedPayload::InvalidHex { field, reason: err.to_string() })
}

/// Parses a 256-bit QUANTITY.
pub(crate) fn quantity_u256(field: &'static str, raw: &str) -> Result<U256, MalformedPayload> {
    let digits = quantity_digits(field, raw)?;
    U256::from_str_radix(digits, 16)
        .map_err(|err| MalformedPayload::InvalidHex { field, reason: err.to_string() })
}

fn quantity_digits<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, MalformedPayload> {
    let digits =
        strip_prefix(raw).map_err(|reason| MalformedPayload::InvalidHex { field, reason })?;
    if digits.is_empty() {
        return Err(MalformedPayload::InvalidHex { field, reason: "empty quantity".to_string() });
    }
    Ok(digits)
}

fn strip_prefix(raw: &str) -> Result<&str, String> {
    raw.strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .ok_or_else(|| format!("missing 0x prefix in {raw:?}"))
}
