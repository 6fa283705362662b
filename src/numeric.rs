//! Integer helpers shared by the mapper and the codec.

/// Returns `true` if the value fits in a single unsigned byte.
pub fn is_byte<T>(value: T) -> bool
where
    T: Into<i128>,
{
    let value = value.into();
    (0..=i128::from(u8::MAX)).contains(&value)
}

/// Integer division of a signed dividend by an unsigned divisor, rounding towards positive infinity.
pub fn divide_ceil(dividend: i64, divisor: u64) -> i64 {
    assert!(divisor > 0);
    let quotient = i128::from(dividend).div_euclid(i128::from(divisor));
    let remainder = i128::from(dividend).rem_euclid(i128::from(divisor));
    let result = if remainder == 0 { quotient } else { quotient + 1 };
    result as i64
}

/// Integer division of a signed dividend by an unsigned divisor, rounding towards negative infinity.
pub fn divide_floor(dividend: i64, divisor: u64) -> i64 {
    assert!(divisor > 0);
    i128::from(dividend).div_euclid(i128::from(divisor)) as i64
}

/// Maps a signed integer onto an unsigned one so that small magnitudes stay small.
#[inline]
pub fn zigzag_encode(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub fn zigzag_decode(value: u64) -> i64 {
    (value >> 1) as i64 ^ -((value & 1) as i64)
}

/// Returns the largest exponent `e` in `[lowest, highest]` such that `base^e <= value`, or `lowest` if there is none.
pub fn closest_smallest_exponent(value: u64, base: u64, lowest: u8, highest: u8) -> u8 {
    assert!(lowest <= highest);
    let mut exponent = lowest;
    while exponent < highest {
        match base.checked_pow(u32::from(exponent) + 1) {
            Some(power) if power <= value => exponent += 1,
            _ => break,
        }
    }
    exponent
}

/// Returns the smallest `f64` greater than `value`.
pub fn next_up(value: f64) -> f64 {
    if value.is_nan() || value == f64::INFINITY {
        return value;
    }
    if value == 0.0 {
        return f64::from_bits(1);
    }
    let bits = value.to_bits();
    if value > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Returns the largest `f64` less than `value`.
pub fn next_down(value: f64) -> f64 {
    -next_up(-value)
}
