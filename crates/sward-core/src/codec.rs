//! Fixed-precision decimal codec for the invocation boundary.
//!
//! Numeric fields cross the ledger invocation boundary as decimal strings
//! with exactly [`WIRE_FRACTION_DIGITS`] fractional digits. The core works
//! in typed numerics; this module is the only place those strings are
//! produced or consumed. The rounding rule is explicit so a value survives
//! any number of format/parse round trips without drift: round to the
//! nearest multiple of 10^-6, ties away from zero.

use thiserror::Error;

/// Fractional digits carried by wire-encoded decimals.
pub const WIRE_FRACTION_DIGITS: u32 = 6;

const WIRE_SCALE: f64 = 1_000_000.0;

/// Errors raised while decoding wire arguments.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum CodecError {
    /// The argument is not a decimal number.
    #[error("not a decimal number: {input:?}")]
    InvalidDecimal {
        /// The offending argument text.
        input: String,
    },

    /// The argument parsed to an infinity or NaN.
    #[error("decimal is not finite: {input:?}")]
    NonFinite {
        /// The offending argument text.
        input: String,
    },

    /// The argument is not an unsigned integer.
    #[error("not a count: {input:?}")]
    InvalidCount {
        /// The offending argument text.
        input: String,
    },
}

/// Rounds `value` to the wire precision.
///
/// This is the canonical representation every decimal takes on before it
/// is stored, compared, or encoded. `f64::round` rounds ties away from
/// zero, which matches the documented wire rule.
#[must_use]
pub fn round_to_wire(value: f64) -> f64 {
    (value * WIRE_SCALE).round() / WIRE_SCALE
}

/// Encodes `value` as a wire decimal string with six fractional digits.
#[must_use]
pub fn format_decimal(value: f64) -> String {
    format!("{:.6}", round_to_wire(value))
}

/// Decodes a wire decimal string into a typed value at wire precision.
///
/// # Errors
///
/// Returns [`CodecError::InvalidDecimal`] if the text is not a number and
/// [`CodecError::NonFinite`] if it denotes an infinity or NaN.
pub fn parse_decimal(input: &str) -> Result<f64, CodecError> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| CodecError::InvalidDecimal {
            input: input.to_owned(),
        })?;

    if !value.is_finite() {
        return Err(CodecError::NonFinite {
            input: input.to_owned(),
        });
    }

    Ok(round_to_wire(value))
}

/// Decodes an unsigned integer argument (job quantities).
///
/// # Errors
///
/// Returns [`CodecError::InvalidCount`] if the text is not an unsigned
/// integer.
pub fn parse_count(input: &str) -> Result<u32, CodecError> {
    input.trim().parse().map_err(|_| CodecError::InvalidCount {
        input: input.to_owned(),
    })
}
