//! Scalar value coercion.

use std::str::FromStr;

/// Coerce a raw stored string to any [`FromStr`] type.
///
/// Returns `None` when the value does not parse. Absence and malformation
/// are deliberately indistinguishable to callers: a typed read of a corrupt
/// value degrades to "no value" rather than an error.
///
/// Plain (non-flag) enumerations go through this path too, via their
/// `FromStr`/`Display` implementations; the encoded form is the single
/// member name.
pub fn decode_scalar<T: FromStr>(raw: &str) -> Option<T> {
    raw.parse().ok()
}
