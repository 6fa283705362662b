//! Decode binpack data into JSON values.
pub use crate::de::read::{IoRead, Read, SliceRead};
use crate::encoding::Encoding;
use crate::numeric::{divide_ceil, divide_floor, zigzag_decode};
use crate::Error;
use byteorder::{ByteOrder, LittleEndian};
use serde_json::{Map, Value};
use std::convert::TryFrom;
use std::io::BufRead;
use std::str;
use tracing::trace;

mod any;
mod read;

/// Decodes a JSON value from a slice of binpack data.
pub fn from_slice(slice: &[u8], encoding: &Encoding) -> Result<Value, Error> {
    let mut de = Decoder::from_slice(slice);
    let value = de.decode(encoding)?;
    de.end()?;
    Ok(value)
}

/// Decodes a JSON value from an IO stream of binpack data.
pub fn from_reader<R>(reader: R, encoding: &Encoding) -> Result<Value, Error>
where
    R: BufRead,
{
    let mut de = Decoder::from_reader(reader);
    let value = de.decode(encoding)?;
    de.end()?;
    Ok(value)
}

enum LengthPrefix {
    Floor(u64),
    Roof(u64),
    Bounded(u64, u64),
}

impl LengthPrefix {
    fn length(&self, raw: u64) -> Result<u64, Error> {
        let distance = raw.checked_sub(1).ok_or_else(Error::invalid_length)?;
        let len = match *self {
            LengthPrefix::Floor(minimum) => minimum.checked_add(distance),
            LengthPrefix::Roof(maximum) => maximum.checked_sub(distance),
            LengthPrefix::Bounded(minimum, maximum) => minimum
                .checked_add(distance)
                .filter(|len| *len <= maximum),
        };
        len.ok_or_else(Error::invalid_length)
    }
}

/// A structure that decodes binpack data into JSON values.
pub struct Decoder<R> {
    reader: R,
    remaining_depth: u8,
}

impl<'a> Decoder<SliceRead<'a>> {
    /// Creates a `Decoder` from a shared slice.
    pub fn from_slice(slice: &'a [u8]) -> Self {
        Decoder::new(SliceRead::new(slice))
    }
}

impl<R> Decoder<IoRead<R>>
where
    R: BufRead,
{
    /// Creates a `Decoder` from an IO stream.
    ///
    /// The consumed input is kept in memory until the decoder is dropped.
    pub fn from_reader(reader: R) -> Self {
        Decoder::new(IoRead::new(reader))
    }
}

impl<R> Decoder<R>
where
    R: Read,
{
    /// Creates a `Decoder` from a reader.
    pub fn new(reader: R) -> Self {
        Decoder {
            reader,
            remaining_depth: 128,
        }
    }

    /// Validates that the input stream is at the end.
    pub fn end(&mut self) -> Result<(), Error> {
        match self.reader.peek()? {
            Some(_) => Err(Error::trailing_data()),
            None => Ok(()),
        }
    }

    /// Decodes a value.
    pub fn decode(&mut self, encoding: &Encoding) -> Result<Value, Error> {
        trace!(
            encoding = encoding.name(),
            position = self.reader.position(),
            "decoding value"
        );

        match encoding {
            Encoding::BoundedMultiple8BitsEnumFixed {
                minimum,
                maximum,
                multiplier,
            } => {
                let byte = self.parse_u8()?;
                let value = (i128::from(byte) + i128::from(divide_ceil(*minimum, *multiplier)))
                    * i128::from(*multiplier);
                if value > i128::from(*maximum) {
                    return Err(Error::integer_out_of_range());
                }
                integer(value)
            }
            Encoding::FloorMultipleEnumVarint {
                minimum,
                multiplier,
            } => {
                let offset = i128::from(self.parse_varint()?);
                if *multiplier == 1 {
                    integer(i128::from(*minimum) + offset)
                } else {
                    integer((offset + i128::from(divide_ceil(*minimum, *multiplier))) * i128::from(*multiplier))
                }
            }
            Encoding::RoofMultipleMirrorEnumVarint {
                maximum,
                multiplier,
            } => {
                let offset = i128::from(self.parse_varint()?);
                if *multiplier == 1 {
                    integer(i128::from(*maximum) - offset)
                } else {
                    integer((i128::from(divide_floor(*maximum, *multiplier)) - offset) * i128::from(*multiplier))
                }
            }
            Encoding::ArbitraryMultipleZigzagVarint { multiplier } => {
                let value = zigzag_decode(self.parse_varint()?);
                integer(i128::from(value) * i128::from(*multiplier))
            }
            Encoding::DoubleVarintTuple => self.parse_real(),
            Encoding::ByteChoiceIndex { choices } => {
                let index = self.parse_u8()?;
                choice(choices, u64::from(index))
            }
            Encoding::LargeChoiceIndex { choices } => {
                let index = self.parse_varint()?;
                choice(choices, index)
            }
            Encoding::TopLevelByteChoiceIndex { choices } => match self.reader.next()? {
                Some(index) => choice(choices, u64::from(index) + 1),
                None => choice(choices, 0),
            },
            Encoding::ConstNone { value } => Ok(value.clone()),
            Encoding::Utf8StringNoLength { size } => self.parse_str(*size).map(Value::String),
            Encoding::FloorVarintPrefixUtf8StringShared { minimum } => {
                self.parse_shared_string(&LengthPrefix::Floor(*minimum))
            }
            Encoding::RoofVarintPrefixUtf8StringShared { maximum } => {
                self.parse_shared_string(&LengthPrefix::Roof(*maximum))
            }
            Encoding::Bounded8BitPrefixUtf8StringShared { minimum, maximum } => {
                self.parse_shared_string(&LengthPrefix::Bounded(*minimum, *maximum))
            }
            Encoding::Rfc3339DateIntegerTriplet => self.parse_date(),
            Encoding::PrefixVarintLengthStringShared => self.parse_prefixed_string(),
            Encoding::FixedTypedArray {
                size,
                encoding,
                prefix_encodings,
            } => self.parse_elements(*size, encoding, prefix_encodings),
            Encoding::Bounded8BitsTypedArray {
                minimum,
                maximum,
                encoding,
                prefix_encodings,
            } => {
                let len = u64::from(self.parse_u8()?)
                    .checked_add(*minimum)
                    .filter(|len| len <= maximum)
                    .ok_or_else(Error::invalid_length)?;
                self.parse_elements(len, encoding, prefix_encodings)
            }
            Encoding::FloorTypedArray {
                minimum,
                encoding,
                prefix_encodings,
            } => {
                let len = self
                    .parse_varint()?
                    .checked_add(*minimum)
                    .ok_or_else(Error::invalid_length)?;
                self.parse_elements(len, encoding, prefix_encodings)
            }
            Encoding::RoofTypedArray {
                maximum,
                encoding,
                prefix_encodings,
            } => {
                let distance = self.parse_varint()?;
                let len = maximum.checked_sub(distance).ok_or_else(Error::invalid_length)?;
                self.parse_elements(len, encoding, prefix_encodings)
            }
            Encoding::FixedTypedArbitraryObject {
                size,
                key_encoding,
                encoding,
            } => self.parse_members(*size, key_encoding, encoding),
            Encoding::VarintTypedArbitraryObject {
                key_encoding,
                encoding,
            } => {
                let size = self.parse_varint()?;
                self.parse_members(size, key_encoding, encoding)
            }
            Encoding::AnyPackedTypeTagBytePrefix => self.parse_any(),
        }
    }

    fn recursion_checked<F, T>(&mut self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Decoder<R>) -> Result<T, Error>,
    {
        self.remaining_depth -= 1;
        if self.remaining_depth == 0 {
            self.remaining_depth += 1;
            return Err(Error::recursion_limit_exceeded());
        }
        let r = f(self);
        self.remaining_depth += 1;
        r
    }

    fn parse_u8(&mut self) -> Result<u8, Error> {
        self.reader
            .next()?
            .ok_or_else(Error::eof_while_parsing_value)
    }

    fn parse_varint(&mut self) -> Result<u64, Error> {
        let mut value = 0;
        for i in 0..10 {
            let byte = self.parse_u8()?;
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                // the tenth byte only carries the top bit of a u64
                if i == 9 && byte > 1 {
                    return Err(Error::integer_out_of_range());
                }
                return Ok(value);
            }
        }

        Err(Error::unterminated_varint())
    }

    fn parse_real(&mut self) -> Result<Value, Error> {
        let digits = zigzag_decode(self.parse_varint()?);
        let point = self.parse_varint()?;
        let real = format!("{}e-{}", digits, point)
            .parse::<f64>()
            .map_err(|_| Error::integer_out_of_range())?;
        Ok(Value::from(real))
    }

    fn parse_str(&mut self, len: u64) -> Result<String, Error> {
        let len = usize::try_from(len).map_err(|_| Error::eof_while_parsing_value())?;
        let buf = self
            .reader
            .read(len)?
            .ok_or_else(Error::eof_while_parsing_value)?;
        let s = str::from_utf8(buf).map_err(|_| Error::invalid_utf8())?;
        Ok(s.to_string())
    }

    // Reads a relative offset and the string of `len` bytes it points back to.
    fn parse_reference(&mut self, len: u64) -> Result<String, Error> {
        let position = self.reader.position();
        let offset = self.parse_varint()?;
        let target = back_reference(position, offset)?;
        if !fits_before(target, len, position) {
            return Err(Error::invalid_offset());
        }

        let resume = self.reader.position();
        self.reader.seek(target);
        let value = self.parse_str(len);
        self.reader.seek(resume);
        value
    }

    fn parse_shared_string(&mut self, prefix: &LengthPrefix) -> Result<Value, Error> {
        let raw = self.parse_length_prefix(prefix)?;
        let value = if raw == 0 {
            let raw = self.parse_length_prefix(prefix)?;
            let len = prefix.length(raw)?;
            self.parse_reference(len)?
        } else {
            let len = prefix.length(raw)?;
            self.parse_str(len)?
        };
        Ok(Value::String(value))
    }

    fn parse_length_prefix(&mut self, prefix: &LengthPrefix) -> Result<u64, Error> {
        match prefix {
            LengthPrefix::Floor(_) | LengthPrefix::Roof(_) => self.parse_varint(),
            LengthPrefix::Bounded(_, _) => self.parse_u8().map(u64::from),
        }
    }

    // References can point at other references, so the chain is followed until a string is found. Every hop lands
    // strictly before the reference it came from.
    fn parse_prefixed_string(&mut self) -> Result<Value, Error> {
        let mut resume = None;
        let mut limit = None;
        loop {
            let start = self.reader.position();
            let prefix = self.parse_varint()?;
            if prefix != 0 {
                let len = prefix - 1;
                if let Some(limit) = limit {
                    if !fits_before(self.reader.position(), len, limit) {
                        return Err(Error::invalid_offset());
                    }
                }
                let value = self.parse_str(len)?;
                if let Some(resume) = resume {
                    self.reader.seek(resume);
                }
                return Ok(Value::String(value));
            }

            let position = self.reader.position();
            let offset = self.parse_varint()?;
            let target = back_reference(position, offset)?;
            if target >= start {
                return Err(Error::invalid_offset());
            }
            if resume.is_none() {
                resume = Some(self.reader.position());
            }
            limit = Some(start);
            self.reader.seek(target);
        }
    }

    fn parse_date(&mut self) -> Result<Value, Error> {
        let year = {
            let buf = self
                .reader
                .read(2)?
                .ok_or_else(Error::eof_while_parsing_value)?;
            LittleEndian::read_u16(buf)
        };
        let month = self.parse_u8()?;
        let day = self.parse_u8()?;

        if year > 9999 || !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(Error::invalid_date());
        }

        Ok(Value::String(format!("{:04}-{:02}-{:02}", year, month, day)))
    }

    fn parse_elements(
        &mut self,
        len: u64,
        encoding: &Encoding,
        prefix_encodings: &[Encoding],
    ) -> Result<Value, Error> {
        self.recursion_checked(|de| {
            let mut elements = vec![];
            for i in 0..len {
                let encoding = usize::try_from(i)
                    .ok()
                    .and_then(|i| prefix_encodings.get(i))
                    .unwrap_or(encoding);
                elements.push(de.decode(encoding)?);
            }
            Ok(Value::Array(elements))
        })
    }

    fn parse_members(&mut self, size: u64, key_encoding: &Encoding, encoding: &Encoding) -> Result<Value, Error> {
        self.recursion_checked(|de| {
            let mut members = Map::new();
            for _ in 0..size {
                let key = match de.decode(key_encoding)? {
                    Value::String(key) => key,
                    _ => return Err(Error::invalid_object_key()),
                };
                let value = de.decode(encoding)?;
                members.insert(key, value);
            }
            Ok(Value::Object(members))
        })
    }
}

fn integer(value: i128) -> Result<Value, Error> {
    i64::try_from(value)
        .map(Value::from)
        .map_err(|_| Error::integer_out_of_range())
}

fn choice(choices: &[Value], index: u64) -> Result<Value, Error> {
    usize::try_from(index)
        .ok()
        .and_then(|index| choices.get(index))
        .cloned()
        .ok_or_else(Error::invalid_choice)
}

// Returns `true` if `len` bytes starting at `offset` end at or before `limit`.
fn fits_before(offset: usize, len: u64, limit: usize) -> bool {
    limit.checked_sub(offset).map_or(false, |room| len <= room as u64)
}

// Resolves an offset relative to `position`, which must point somewhere at or after the start of the input.
fn back_reference(position: usize, offset: u64) -> Result<usize, Error> {
    match usize::try_from(offset) {
        Ok(offset) if offset > 0 && offset <= position => Ok(position - offset),
        _ => Err(Error::invalid_offset()),
    }
}
