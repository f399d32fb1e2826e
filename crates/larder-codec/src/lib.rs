//! Wire format and value coercion for larder configuration stores.
//!
//! A larder store persists its cache as UTF-8 text, one entry per line, in
//! the form `key="value"`. This crate owns that format and the rules for
//! turning raw stored strings into typed values:
//!
//! - [`Entry`] -- one key/value pair, one line in a backing file
//! - [`parse_line`] / [`format_line`] -- line-level decode/encode
//! - [`decode_scalar`] -- string to any [`FromStr`](std::str::FromStr) type
//! - [`decode_flags`] / [`encode_flags`] -- comma-joined member names for
//!   [`bitflags`] types
//!
//! # Design Rules
//!
//! 1. Coercion never fails loudly: a malformed value decodes to `None`,
//!    never to an error. Only the store layer has error conditions.
//! 2. The codec is pure text transformation -- it performs no I/O and knows
//!    nothing about files, caches, or key comparison rules.
//! 3. Values are logically unquoted: one layer of wrapping double quotes is
//!    the wire convention, stripped on decode and re-added on encode.

pub mod entry;
pub mod flags;
pub mod scalar;

pub use entry::{format_line, parse_line, trim_quotes, Entry};
pub use flags::{decode_flags, encode_flags, FlagBits};
pub use scalar::decode_scalar;
