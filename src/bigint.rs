//! Base64 text encodings of the numeric fields of an `RSAKeyValue` document.
//!
//! Two conventions share the same textual form and must not be unified:
//!
//! - [`FieldKind::Magnitude`]: base64 of the minimal big-endian unsigned
//!   bytes of the integer. Used by `Modulus`, `D`, `P`, `Q`, `DP`, `DQ` and
//!   `InverseQ`. Zero is a single `0x00` byte.
//! - [`FieldKind::Decimal`]: base64 of the ASCII decimal digits of the
//!   integer. Used by `Exponent` only, so `65537` is `NjU1Mzc=`, not `AQAB`.

use alloc::string::String;
use alloc::vec::Vec;

use base64ct::{Base64, Encoding};
use num_bigint::BigUint;
use num_traits::Zero;
use zeroize::Zeroizing;

use crate::errors::{Error, Result};

/// Textual convention of a numeric field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Base64 of big-endian unsigned magnitude bytes.
    Magnitude,
    /// Base64 of ASCII decimal digits.
    Decimal,
}

/// Encode a big integer as base64 of its minimal big-endian bytes.
pub fn encode_uint(value: &BigUint) -> String {
    Base64::encode_string(&uint_to_bytes(value))
}

/// Decode base64 text into a big integer, reading the bytes as a big-endian
/// unsigned magnitude. Whitespace is ignored.
pub fn decode_uint(text: &str) -> Result<BigUint> {
    let bytes = decode_base64(text.as_bytes())?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Encode the public exponent as base64 of its ASCII decimal representation.
pub fn encode_exponent(value: u64) -> String {
    Base64::encode_string(value.to_string().as_bytes())
}

/// Decode base64 text holding ASCII decimal digits into the public exponent.
///
/// The decoded bytes are parsed as text, never reinterpreted as a binary
/// magnitude. Signs, spaces and anything else but `0`-`9` are rejected.
pub fn decode_exponent(text: &str) -> Result<u64> {
    let bytes = decode_base64(text.as_bytes())?;
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(Error::ExponentNotDecimal);
    }

    bytes.iter().try_fold(0u64, |acc, digit| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(u64::from(digit - b'0')))
            .ok_or(Error::ExponentTooLarge)
    })
}

/// Minimal big-endian bytes of `value`, or a single zero byte for zero.
pub(crate) fn uint_to_bytes(value: &BigUint) -> Zeroizing<Vec<u8>> {
    if value.is_zero() {
        Zeroizing::new(vec![0])
    } else {
        Zeroizing::new(value.to_bytes_be())
    }
}

/// Decode base64 text, skipping ASCII whitespace anywhere in it.
pub(crate) fn decode_base64(text: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    let compact: Zeroizing<Vec<u8>> = Zeroizing::new(
        text.iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect(),
    );
    let compact = core::str::from_utf8(&compact).map_err(|_| Error::Base64)?;
    Ok(Zeroizing::new(Base64::decode_vec(compact)?))
}
