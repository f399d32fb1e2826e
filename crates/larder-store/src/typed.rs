//! Typed accessors layered over the string-valued store API.
//!
//! Everything here delegates to the codec for coercion. A stored value that
//! does not coerce to the requested type reads as absent (`Ok(None)`) --
//! malformed data never surfaces as an error. The only error condition is
//! the store itself (not open, I/O on write).

use std::collections::BTreeMap;
use std::str::FromStr;

use bitflags::Flags;
use larder_codec::{decode_flags, decode_scalar, encode_flags, FlagBits};

use crate::error::Result;
use crate::store::Store;

impl Store {
    /// Look up a value and coerce it to `T` via [`FromStr`].
    ///
    /// Absent keys and values that fail to parse both read as `None`.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        Ok(self.get(key)?.and_then(|raw| decode_scalar(&raw)))
    }

    /// Look up a flag-enum value stored as comma-joined member names.
    ///
    /// Unrecognized member names within the list are skipped; a value with
    /// no recognized member at all reads as `None`.
    pub fn get_flags<F: Flags>(&self, key: &str) -> Result<Option<F>> {
        Ok(self.get(key)?.and_then(|raw| decode_flags(&raw)))
    }

    /// Store a flag-enum value as comma-joined member names.
    pub fn set_flags<F>(&self, key: &str, value: F) -> Result<()>
    where
        F: Flags,
        F::Bits: FlagBits,
    {
        self.set(key, &encode_flags(value))
    }

    /// Snapshot of the cache coerced to `T`; entries that fail coercion are
    /// left out.
    pub fn snapshot_parsed<T: FromStr>(&self) -> Result<BTreeMap<String, T>> {
        Ok(self
            .snapshot()?
            .into_iter()
            .filter_map(|(key, raw)| decode_scalar(&raw).map(|value| (key, value)))
            .collect())
    }
}
