//! Flag-enumeration coercion.
//!
//! A flag-enum value is persisted as a comma-joined list of member names,
//! e.g. `"Read,Write"`. Decoding ORs every recognized member name into the
//! result; encoding runs a greedy decomposition over the defined members in
//! descending numeric order. The greedy pass reproduces the historical wire
//! format exactly: for overlapping masks it prefers the largest covering
//! member and is not guaranteed to produce a minimal cover.

use bitflags::Flags;

/// Access to the raw bit pattern of a flag type's bits representation.
///
/// `bitflags` puts no common integer conversion on its bits types, so the
/// greedy encoder widens through this trait. Implemented for the unsigned
/// representations used by flag types in this workspace.
pub trait FlagBits: Copy {
    /// The bit pattern, widened to `u64`.
    fn to_u64(self) -> u64;
}

macro_rules! impl_flag_bits {
    ($($ty:ty),*) => {
        $(impl FlagBits for $ty {
            fn to_u64(self) -> u64 {
                u64::from(self)
            }
        })*
    };
}

impl_flag_bits!(u8, u16, u32, u64);

/// Decode a comma-separated list of member names into a flag value.
///
/// Tokens may carry arbitrary surrounding whitespace; empty tokens are
/// dropped. Unrecognized names are skipped, and the recognized ones are
/// combined with bitwise OR. Returns `None` when no token names a defined
/// member, including for an empty input.
pub fn decode_flags<F: Flags>(raw: &str) -> Option<F> {
    let mut result: Option<F> = None;
    for token in raw.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let Some(member) = F::from_name(token) else {
            continue;
        };
        result = Some(match result {
            Some(acc) => acc.union(member),
            None => member,
        });
    }
    result
}

/// Encode a flag value as a comma-joined list of member names.
///
/// Defined nonzero members are visited in descending numeric order; every
/// member whose mask is fully covered by the remaining bits contributes its
/// name and clears those bits. When nothing matches: a zero value encodes
/// as the zero member's name (or an empty string when no zero member is
/// defined), and a nonzero value falls back to the decimal string of its
/// raw bits.
pub fn encode_flags<F>(value: F) -> String
where
    F: Flags,
    F::Bits: FlagBits,
{
    let input = value.bits().to_u64();

    let mut defined: Vec<(&str, u64)> = F::FLAGS
        .iter()
        .map(|flag| (flag.name(), flag.value().bits().to_u64()))
        .filter(|(_, bits)| *bits != 0)
        .collect();
    defined.sort_by(|a, b| b.1.cmp(&a.1));

    let mut names = Vec::new();
    let mut remaining = input;
    for (name, bits) in defined {
        if remaining & bits == bits {
            names.push(name);
            remaining &= !bits;
        }
    }

    if names.is_empty() {
        if input == 0 {
            return F::FLAGS
                .iter()
                .find(|flag| flag.value().bits().to_u64() == 0)
                .map(|flag| flag.name().to_string())
                .unwrap_or_default();
        }
        return input.to_string();
    }

    names.join(",")
}
