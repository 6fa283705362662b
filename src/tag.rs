//! The packed type tag byte of the "any" encoding: a 3-bit type in the low bits and a 5-bit subtype above it.

pub const SHARED_STRING: u8 = 0;
pub const STRING: u8 = 1;
pub const LONG_STRING: u8 = 2;
pub const OBJECT: u8 = 3;
pub const ARRAY: u8 = 4;
pub const POSITIVE_INTEGER_BYTE: u8 = 5;
pub const NEGATIVE_INTEGER_BYTE: u8 = 6;
pub const OTHER: u8 = 7;

pub const FALSE: u8 = 0;
pub const TRUE: u8 = 1;
pub const NULL: u8 = 2;
pub const POSITIVE_INTEGER: u8 = 3;
pub const NEGATIVE_INTEGER: u8 = 4;
pub const NUMBER: u8 = 5;
pub const POSITIVE_REAL_INTEGER_BYTE: u8 = 6;
pub const LONG_STRING_BASE_EXPONENT_7: u8 = 7;
pub const LONG_STRING_BASE_EXPONENT_10: u8 = 10;

/// Subtypes carry values up to this bound inline.
pub const INLINE_LIMIT: u8 = 31;

/// Strings at least this long, and not in the exponent range, use a varint length prefix.
pub const LONG_STRING_LIMIT: u64 = 62;

#[inline]
pub fn tag(kind: u8, subtype: u8) -> u8 {
    debug_assert!(kind < 8 && subtype < 32);
    kind | subtype << 3
}

#[inline]
pub fn kind(tag: u8) -> u8 {
    tag & 0x07
}

#[inline]
pub fn subtype(tag: u8) -> u8 {
    tag >> 3
}
