use super::{Decoder, LengthPrefix, Read};
use crate::tag;
use crate::Error;
use serde_json::{Map, Value};

impl<R> Decoder<R>
where
    R: Read,
{
    pub(super) fn parse_any(&mut self) -> Result<Value, Error> {
        let byte = self.parse_u8()?;
        let subtype = tag::subtype(byte);

        match tag::kind(byte) {
            tag::SHARED_STRING => {
                let len = if subtype == 0 {
                    LengthPrefix::Floor(tag::LONG_STRING_LIMIT).length(self.parse_varint()?)?
                } else {
                    u64::from(subtype - 1)
                };
                self.parse_reference(len).map(Value::String)
            }
            tag::STRING => {
                if subtype == 0 {
                    self.parse_shared_string(&LengthPrefix::Floor(tag::LONG_STRING_LIMIT))
                } else {
                    self.parse_str(u64::from(subtype - 1)).map(Value::String)
                }
            }
            tag::LONG_STRING => self
                .parse_str(u64::from(subtype) + u64::from(tag::INLINE_LIMIT))
                .map(Value::String),
            tag::OBJECT => {
                let size = self.parse_any_size(subtype)?;
                self.recursion_checked(|de| {
                    let mut members = Map::new();
                    for _ in 0..size {
                        let key = match de.parse_prefixed_string()? {
                            Value::String(key) => key,
                            _ => return Err(Error::invalid_object_key()),
                        };
                        let value = de.parse_any()?;
                        members.insert(key, value);
                    }
                    Ok(Value::Object(members))
                })
            }
            tag::ARRAY => {
                let size = self.parse_any_size(subtype)?;
                self.recursion_checked(|de| {
                    let mut elements = vec![];
                    for _ in 0..size {
                        elements.push(de.parse_any()?);
                    }
                    Ok(Value::Array(elements))
                })
            }
            tag::POSITIVE_INTEGER_BYTE => {
                let absolute = if subtype == 0 {
                    self.parse_u8()?
                } else {
                    subtype - 1
                };
                Ok(Value::from(absolute))
            }
            tag::NEGATIVE_INTEGER_BYTE => {
                let absolute = if subtype == 0 {
                    self.parse_u8()?
                } else {
                    subtype - 1
                };
                Ok(Value::from(-i64::from(absolute) - 1))
            }
            _ => self.parse_other(byte, subtype),
        }
    }

    fn parse_other(&mut self, byte: u8, subtype: u8) -> Result<Value, Error> {
        match subtype {
            tag::FALSE => Ok(Value::Bool(false)),
            tag::TRUE => Ok(Value::Bool(true)),
            tag::NULL => Ok(Value::Null),
            tag::POSITIVE_INTEGER => self.parse_varint().map(Value::from),
            tag::NEGATIVE_INTEGER => {
                let absolute = self.parse_varint()?;
                if absolute > i64::MAX as u64 {
                    return Err(Error::integer_out_of_range());
                }
                Ok(Value::from(-(absolute as i64) - 1))
            }
            tag::NUMBER => self.parse_real(),
            tag::POSITIVE_REAL_INTEGER_BYTE => {
                let value = self.parse_u8()?;
                Ok(Value::from(f64::from(value)))
            }
            tag::LONG_STRING_BASE_EXPONENT_7..=tag::LONG_STRING_BASE_EXPONENT_10 => {
                let len = self
                    .parse_varint()?
                    .checked_add(1 << subtype)
                    .ok_or_else(Error::invalid_length)?;
                self.parse_str(len).map(Value::String)
            }
            _ => Err(Error::invalid_tag(byte)),
        }
    }

    fn parse_any_size(&mut self, subtype: u8) -> Result<u64, Error> {
        if subtype == 0 {
            self.parse_varint()?
                .checked_add(u64::from(tag::INLINE_LIMIT))
                .ok_or_else(Error::invalid_length)
        } else {
            Ok(u64::from(subtype - 1))
        }
    }
}
