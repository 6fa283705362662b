use super::{Encoder, LengthPrefix};
use crate::numeric::{closest_smallest_exponent, is_byte};
use crate::ser::context::Kind;
use crate::tag::{self, tag};
use crate::Error;
use serde_json::{Number, Value};
use std::io::Write;

impl<W> Encoder<W>
where
    W: Write,
{
    pub(super) fn write_any(&mut self, value: &Value) -> Result<(), Error> {
        match value {
            Value::Null => self.write_u8(tag(tag::OTHER, tag::NULL)),
            Value::Bool(false) => self.write_u8(tag(tag::OTHER, tag::FALSE)),
            Value::Bool(true) => self.write_u8(tag(tag::OTHER, tag::TRUE)),
            Value::Number(number) => self.write_any_number(number),
            Value::String(value) => self.write_any_string(value),
            Value::Array(elements) => {
                self.write_any_size(tag::ARRAY, elements.len())?;
                for element in elements {
                    self.write_any(element)?;
                }
                Ok(())
            }
            Value::Object(members) => {
                self.write_any_size(tag::OBJECT, members.len())?;
                for (key, value) in members {
                    self.write_prefixed_string(key)?;
                    self.write_any(value)?;
                }
                Ok(())
            }
        }
    }

    fn write_any_number(&mut self, number: &Number) -> Result<(), Error> {
        match (number.as_u64(), number.as_i64(), number.as_f64()) {
            (Some(value), _, _) => {
                self.write_any_integer(tag::POSITIVE_INTEGER_BYTE, tag::POSITIVE_INTEGER, value)
            }
            // -1 maps to 0, so every negative value has a distinct absolute value
            (None, Some(value), _) => {
                self.write_any_integer(tag::NEGATIVE_INTEGER_BYTE, tag::NEGATIVE_INTEGER, !value as u64)
            }
            (None, None, Some(value)) => {
                if value.fract() == 0.0 && (0.0..=255.0).contains(&value) {
                    self.write_u8(tag(tag::OTHER, tag::POSITIVE_REAL_INTEGER_BYTE))?;
                    self.write_u8(value as u8)
                } else {
                    self.write_u8(tag(tag::OTHER, tag::NUMBER))?;
                    self.write_real(value)
                }
            }
            (None, None, None) => unreachable!(),
        }
    }

    fn write_any_integer(&mut self, byte_type: u8, varint_subtype: u8, absolute: u64) -> Result<(), Error> {
        if absolute < u64::from(tag::INLINE_LIMIT) {
            self.write_u8(tag(byte_type, absolute as u8 + 1))
        } else if is_byte(absolute) {
            self.write_u8(tag(byte_type, 0))?;
            self.write_u8(absolute as u8)
        } else {
            self.write_u8(tag(tag::OTHER, varint_subtype))?;
            self.write_varint(absolute)
        }
    }

    fn write_any_size(&mut self, kind: u8, size: usize) -> Result<(), Error> {
        if size >= usize::from(tag::INLINE_LIMIT) {
            self.write_u8(tag(kind, 0))?;
            self.write_varint((size - usize::from(tag::INLINE_LIMIT)) as u64)
        } else {
            self.write_u8(tag(kind, size as u8 + 1))
        }
    }

    fn write_any_string(&mut self, value: &str) -> Result<(), Error> {
        let size = value.len() as u64;
        let cached = self.context.find(value, Kind::Standalone);
        let inline_limit = u64::from(tag::INLINE_LIMIT);

        if size < inline_limit {
            match cached {
                Some(offset) => {
                    self.write_u8(tag(tag::SHARED_STRING, size as u8 + 1))?;
                    self.write_varint((self.position - offset) as u64)
                }
                None => {
                    self.write_u8(tag(tag::STRING, size as u8 + 1))?;
                    self.context.record(value, self.position, Kind::Standalone);
                    self.write_all(value.as_bytes())
                }
            }
        } else if size < tag::LONG_STRING_LIMIT {
            self.write_u8(tag(tag::LONG_STRING, (size - inline_limit) as u8))?;
            self.write_all(value.as_bytes())
        } else if size >= 1 << tag::LONG_STRING_BASE_EXPONENT_7 && cached.is_none() {
            let exponent = closest_smallest_exponent(
                size,
                2,
                tag::LONG_STRING_BASE_EXPONENT_7,
                tag::LONG_STRING_BASE_EXPONENT_10,
            );
            self.write_u8(tag(tag::OTHER, exponent))?;
            self.write_varint(size - (1 << exponent))?;
            self.context.record(value, self.position, Kind::Standalone);
            self.write_all(value.as_bytes())
        } else {
            // a cached string starts with the zero byte of the back-reference, which doubles as its tag
            if cached.is_none() {
                self.write_u8(tag(tag::STRING, 0))?;
            }
            self.write_shared_string(value, LengthPrefix::Floor(tag::LONG_STRING_LIMIT))
        }
    }
}
