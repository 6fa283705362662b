//! Encode JSON values into binpack data.
use crate::encoding::Encoding;
use crate::numeric::{divide_ceil, divide_floor, is_byte, zigzag_encode};
use crate::ser::context::{Context, Kind};
use crate::Error;
use byteorder::{LittleEndian, WriteBytesExt};
use serde_json::Value;
use std::io::Write;
use tracing::trace;

mod any;
mod context;

/// Encodes a JSON value into a byte vector.
///
/// # Panics
///
/// Panics if the value does not satisfy the schema the encoding was compiled from.
pub fn to_vec(value: &Value, encoding: &Encoding) -> Result<Vec<u8>, Error> {
    let mut buf = vec![];
    to_writer(&mut buf, value, encoding)?;
    Ok(buf)
}

/// Encodes a JSON value into the IO stream.
///
/// # Panics
///
/// Panics if the value does not satisfy the schema the encoding was compiled from.
pub fn to_writer<W>(writer: W, value: &Value, encoding: &Encoding) -> Result<(), Error>
where
    W: Write,
{
    Encoder::new(writer).encode(value, encoding)
}

enum LengthPrefix {
    Floor(u64),
    Roof(u64),
    Bounded(u64, u64),
}

/// A structure for encoding JSON values.
pub struct Encoder<W> {
    writer: W,
    position: usize,
    context: Context,
}

impl<W> Encoder<W>
where
    W: Write,
{
    /// Creates a new `Encoder`.
    pub fn new(writer: W) -> Self {
        Encoder {
            writer,
            position: 0,
            context: Context::new(),
        }
    }

    /// Returns a shared reference to the inner writer.
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Returns a mutable reference to the inner writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consumes the `Encoder`, returning the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Encodes a value.
    ///
    /// Strings are only shared within a single call.
    ///
    /// # Panics
    ///
    /// Panics if the value does not satisfy the schema the encoding was compiled from: a value of the wrong type, an
    /// integer outside of the bounds or not divisible by the multiplier, a string or array of the wrong length, or a
    /// value that is not one of the choices.
    pub fn encode(&mut self, value: &Value, encoding: &Encoding) -> Result<(), Error> {
        self.context = Context::new();
        self.encode_value(value, encoding)
    }

    fn encode_value(&mut self, value: &Value, encoding: &Encoding) -> Result<(), Error> {
        trace!(encoding = encoding.name(), position = self.position, "encoding value");

        match encoding {
            Encoding::BoundedMultiple8BitsEnumFixed {
                minimum,
                maximum,
                multiplier,
            } => {
                let value = integer(value);
                assert!(*minimum <= value && value <= *maximum, "{} is out of range", value);
                assert_multiple(value, *multiplier);
                let byte =
                    i128::from(divide_floor(value, *multiplier)) - i128::from(divide_ceil(*minimum, *multiplier));
                assert!(is_byte(byte));
                self.write_u8(byte as u8)
            }
            Encoding::FloorMultipleEnumVarint {
                minimum,
                multiplier,
            } => {
                let value = integer(value);
                assert!(*minimum <= value, "{} is below {}", value, minimum);
                assert_multiple(value, *multiplier);
                let offset = if *multiplier == 1 {
                    i128::from(value) - i128::from(*minimum)
                } else {
                    i128::from(divide_floor(value, *multiplier)) - i128::from(divide_ceil(*minimum, *multiplier))
                };
                self.write_varint(offset as u64)
            }
            Encoding::RoofMultipleMirrorEnumVarint {
                maximum,
                multiplier,
            } => {
                let value = integer(value);
                assert!(value <= *maximum, "{} is above {}", value, maximum);
                assert_multiple(value, *multiplier);
                let offset = if *multiplier == 1 {
                    i128::from(*maximum) - i128::from(value)
                } else {
                    i128::from(divide_floor(*maximum, *multiplier)) - i128::from(divide_floor(value, *multiplier))
                };
                self.write_varint(offset as u64)
            }
            Encoding::ArbitraryMultipleZigzagVarint { multiplier } => {
                let value = integer(value);
                assert_multiple(value, *multiplier);
                self.write_zigzag(divide_floor(value, *multiplier))
            }
            Encoding::DoubleVarintTuple => {
                let value = match value.as_f64() {
                    Some(value) => value,
                    None => panic!("expected a number, found {}", value),
                };
                self.write_real(value)
            }
            Encoding::ByteChoiceIndex { choices } => {
                let index = choice(value, choices);
                assert!(is_byte(index as u64));
                self.write_u8(index as u8)
            }
            Encoding::LargeChoiceIndex { choices } => {
                let index = choice(value, choices);
                self.write_varint(index as u64)
            }
            Encoding::TopLevelByteChoiceIndex { choices } => match choice(value, choices) {
                0 => Ok(()),
                index => {
                    assert!(is_byte(index as u64 - 1));
                    self.write_u8((index - 1) as u8)
                }
            },
            Encoding::ConstNone { value: constant } => {
                assert_eq!(value, constant);
                Ok(())
            }
            Encoding::Utf8StringNoLength { size } => {
                let value = string(value);
                assert_eq!(value.len() as u64, *size);
                self.write_all(value.as_bytes())
            }
            Encoding::FloorVarintPrefixUtf8StringShared { minimum } => {
                self.write_shared_string(string(value), LengthPrefix::Floor(*minimum))
            }
            Encoding::RoofVarintPrefixUtf8StringShared { maximum } => {
                self.write_shared_string(string(value), LengthPrefix::Roof(*maximum))
            }
            Encoding::Bounded8BitPrefixUtf8StringShared { minimum, maximum } => {
                self.write_shared_string(string(value), LengthPrefix::Bounded(*minimum, *maximum))
            }
            Encoding::Rfc3339DateIntegerTriplet => self.write_date(string(value)),
            Encoding::PrefixVarintLengthStringShared => self.write_prefixed_string(string(value)),
            Encoding::FixedTypedArray {
                size,
                encoding,
                prefix_encodings,
            } => {
                let elements = array(value);
                assert_eq!(elements.len() as u64, *size);
                self.write_elements(elements, encoding, prefix_encodings)
            }
            Encoding::Bounded8BitsTypedArray {
                minimum,
                maximum,
                encoding,
                prefix_encodings,
            } => {
                let elements = array(value);
                let len = elements.len() as u64;
                assert!(*minimum <= len && len <= *maximum, "array length {} is out of range", len);
                assert!(is_byte(len - minimum));
                self.write_u8((len - minimum) as u8)?;
                self.write_elements(elements, encoding, prefix_encodings)
            }
            Encoding::FloorTypedArray {
                minimum,
                encoding,
                prefix_encodings,
            } => {
                let elements = array(value);
                let len = elements.len() as u64;
                assert!(*minimum <= len, "array length {} is below {}", len, minimum);
                self.write_varint(len - minimum)?;
                self.write_elements(elements, encoding, prefix_encodings)
            }
            Encoding::RoofTypedArray {
                maximum,
                encoding,
                prefix_encodings,
            } => {
                let elements = array(value);
                let len = elements.len() as u64;
                assert!(len <= *maximum, "array length {} is above {}", len, maximum);
                self.write_varint(maximum - len)?;
                self.write_elements(elements, encoding, prefix_encodings)
            }
            Encoding::FixedTypedArbitraryObject {
                size,
                key_encoding,
                encoding,
            } => {
                let members = match value.as_object() {
                    Some(members) => members,
                    None => panic!("expected an object, found {}", value),
                };
                assert_eq!(members.len() as u64, *size);
                for (key, value) in members {
                    self.encode_value(&Value::String(key.clone()), key_encoding)?;
                    self.encode_value(value, encoding)?;
                }
                Ok(())
            }
            Encoding::VarintTypedArbitraryObject {
                key_encoding,
                encoding,
            } => {
                let members = match value.as_object() {
                    Some(members) => members,
                    None => panic!("expected an object, found {}", value),
                };
                self.write_varint(members.len() as u64)?;
                for (key, value) in members {
                    self.encode_value(&Value::String(key.clone()), key_encoding)?;
                    self.encode_value(value, encoding)?;
                }
                Ok(())
            }
            Encoding::AnyPackedTypeTagBytePrefix => self.write_any(value),
        }
    }

    fn write_elements(
        &mut self,
        elements: &[Value],
        encoding: &Encoding,
        prefix_encodings: &[Encoding],
    ) -> Result<(), Error> {
        for (i, element) in elements.iter().enumerate() {
            let encoding = prefix_encodings.get(i).unwrap_or(encoding);
            self.encode_value(element, encoding)?;
        }
        Ok(())
    }

    fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.writer.write_u8(value).map_err(Error::io)?;
        self.position += 1;
        Ok(())
    }

    fn write_all(&mut self, buf: &[u8]) -> Result<(), Error> {
        self.writer.write_all(buf).map_err(Error::io)?;
        self.position += buf.len();
        Ok(())
    }

    fn write_varint(&mut self, mut value: u64) -> Result<(), Error> {
        let mut buf = [0; 10];
        let mut len = 0;
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                buf[len] = byte;
                len += 1;
                break;
            }
            buf[len] = byte | 0x80;
            len += 1;
        }
        self.write_all(&buf[..len])
    }

    fn write_zigzag(&mut self, value: i64) -> Result<(), Error> {
        self.write_varint(zigzag_encode(value))
    }

    fn write_real(&mut self, value: f64) -> Result<(), Error> {
        let (digits, point) = real_digits(value)?;
        self.write_zigzag(digits)?;
        self.write_varint(point)
    }

    fn write_length_prefix(&mut self, len: u64, prefix: &LengthPrefix) -> Result<(), Error> {
        match *prefix {
            LengthPrefix::Floor(minimum) => {
                assert!(minimum <= len, "string length {} is below {}", len, minimum);
                self.write_varint(len - minimum + 1)
            }
            LengthPrefix::Roof(maximum) => {
                assert!(len <= maximum, "string length {} is above {}", len, maximum);
                self.write_varint(maximum - len + 1)
            }
            LengthPrefix::Bounded(minimum, maximum) => {
                assert!(minimum <= len && len <= maximum, "string length {} is out of range", len);
                assert!(is_byte(len - minimum + 1));
                self.write_u8((len - minimum + 1) as u8)
            }
        }
    }

    // A zero byte ahead of the length prefix marks a back-reference to an earlier copy of the string.
    fn write_shared_string(&mut self, value: &str, prefix: LengthPrefix) -> Result<(), Error> {
        let len = value.len() as u64;
        match self.context.find(value, Kind::Standalone) {
            Some(offset) => {
                self.write_u8(0)?;
                self.write_length_prefix(len, &prefix)?;
                self.write_varint((self.position - offset) as u64)
            }
            None => {
                self.write_length_prefix(len, &prefix)?;
                self.context.record(value, self.position, Kind::Standalone);
                self.write_all(value.as_bytes())
            }
        }
    }

    fn write_prefixed_string(&mut self, value: &str) -> Result<(), Error> {
        match self.context.find(value, Kind::PrefixLengthVarintPlusOne) {
            Some(offset) => {
                let start = self.position;
                self.write_u8(0)?;
                self.write_varint((self.position - offset) as u64)?;
                self.context.record(value, start, Kind::PrefixLengthVarintPlusOne);
                Ok(())
            }
            None => {
                self.context
                    .record(value, self.position, Kind::PrefixLengthVarintPlusOne);
                self.write_varint(value.len() as u64 + 1)?;
                self.context.record(value, self.position, Kind::Standalone);
                self.write_all(value.as_bytes())
            }
        }
    }

    fn write_date(&mut self, value: &str) -> Result<(), Error> {
        let bytes = value.as_bytes();
        assert!(
            bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-',
            "invalid date {:?}",
            value
        );
        let year = date_component(&value[..4]);
        let month = date_component(&value[5..7]);
        let day = date_component(&value[8..]);
        assert!((1..=12).contains(&month), "invalid month in {:?}", value);
        assert!((1..=31).contains(&day), "invalid day in {:?}", value);

        self.writer
            .write_u16::<LittleEndian>(year)
            .map_err(Error::io)?;
        self.position += 2;
        self.write_u8(month as u8)?;
        self.write_u8(day as u8)
    }
}

fn integer(value: &Value) -> i64 {
    if let Some(value) = value.as_i64() {
        return value;
    }
    match value.as_f64() {
        Some(real) if real.fract() == 0.0 && real >= i64::MIN as f64 && real < i64::MAX as f64 => real as i64,
        _ => panic!("expected an integer, found {}", value),
    }
}

fn assert_multiple(value: i64, multiplier: u64) {
    assert!(multiplier > 0);
    assert!(
        i128::from(value).rem_euclid(i128::from(multiplier)) == 0,
        "{} is not a multiple of {}",
        value,
        multiplier
    );
}

fn string(value: &Value) -> &str {
    match value.as_str() {
        Some(value) => value,
        None => panic!("expected a string, found {}", value),
    }
}

fn array(value: &Value) -> &[Value] {
    match value.as_array() {
        Some(value) => value,
        None => panic!("expected an array, found {}", value),
    }
}

fn choice(value: &Value, choices: &[Value]) -> usize {
    match choices.iter().position(|choice| choice == value) {
        Some(index) => index,
        None => panic!("{} is not one of the choices", value),
    }
}

fn date_component(digits: &str) -> u16 {
    assert!(digits.bytes().all(|b| b.is_ascii_digit()), "invalid date component {:?}", digits);
    digits
        .bytes()
        .fold(0, |acc, b| acc * 10 + u16::from(b - b'0'))
}

/// Splits a real into its significant digits and the number of digits after the decimal point, using the shortest
/// representation that round trips.
///
/// Reals whose integral part does not fit in an `i64` digit count cannot be represented.
fn real_digits(value: f64) -> Result<(i64, u64), Error> {
    assert!(value.is_finite(), "{} is not finite", value);

    let repr = format!("{:e}", value);
    let (mantissa, exponent) = match repr.find('e') {
        Some(index) => (&repr[..index], &repr[index + 1..]),
        None => (&repr[..], "0"),
    };

    let mut digits: i64 = 0;
    let mut fraction: i64 = 0;
    let mut seen_point = false;
    for b in mantissa.bytes() {
        match b {
            b'0'..=b'9' => {
                digits = digits * 10 + i64::from(b - b'0');
                if seen_point {
                    fraction += 1;
                }
            }
            b'.' => seen_point = true,
            _ => {}
        }
    }
    if mantissa.starts_with('-') {
        digits = -digits;
    }

    let (sign, magnitude) = match exponent.strip_prefix('-') {
        Some(magnitude) => (-1, magnitude),
        None => (1, exponent),
    };
    let exponent = sign
        * magnitude
            .bytes()
            .fold(0i64, |acc, b| acc * 10 + i64::from(b - b'0'));

    let point = fraction - exponent;
    if point >= 0 {
        return Ok((digits, point as u64));
    }

    10i64
        .checked_pow((-point) as u32)
        .and_then(|scale| digits.checked_mul(scale))
        .map(|digits| (digits, 0))
        .ok_or_else(Error::real_out_of_range)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn digits() {
        assert_eq!(real_digits(3.14).unwrap(), (314, 2));
        assert_eq!(real_digits(-5.0).unwrap(), (-5, 0));
        assert_eq!(real_digits(0.000123).unwrap(), (123, 6));
        assert_eq!(real_digits(100.0).unwrap(), (100, 0));
        assert_eq!(real_digits(0.0).unwrap(), (0, 0));
        assert_eq!(real_digits(-2.5).unwrap(), (-25, 1));
        assert_eq!(real_digits(1e18).unwrap(), (1_000_000_000_000_000_000, 0));
        assert!(real_digits(1e19).is_err());
        assert!(real_digits(-1e300).is_err());
    }

    #[test]
    fn dates() {
        assert_eq!(date_component("2024"), 2024);
        assert_eq!(date_component("07"), 7);
    }
}
