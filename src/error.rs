use std::{error, fmt, io};

#[derive(Debug)]
enum ErrorKind {
    Io(io::Error),
    UnknownDialect,
    UnsupportedDialect(String),
    UnresolvedMetaschema(String),
    FixedPointNotReached { rule: &'static str, pointer: String },
    NotAnEncoding,
    UnknownEncoding(String),
    InvalidOptions { encoding: String, error: serde_json::Error },
    EofWhileParsingValue,
    UnterminatedVarint,
    InvalidOffset,
    InvalidTag(u8),
    InvalidUtf8,
    InvalidChoice,
    InvalidLength,
    InvalidDate,
    InvalidObjectKey,
    IntegerOutOfRange,
    RealOutOfRange,
    RecursionLimitExceeded,
    TrailingData,
}

/// An error encountered when compiling a schema, or when encoding or decoding an instance.
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            ErrorKind::Io(_) => f.write_str("IO error"),
            ErrorKind::UnknownDialect => f.write_str("could not determine the base dialect of the schema"),
            ErrorKind::UnsupportedDialect(dialect) => write!(
                f,
                "unsupported dialect `{}`: only JSON Schema 2020-12 is supported",
                dialect
            ),
            ErrorKind::UnresolvedMetaschema(id) => write!(f, "could not resolve metaschema `{}`", id),
            ErrorKind::FixedPointNotReached { rule, pointer } => write!(
                f,
                "rule `{}` did not reach a fixed point at `{}`",
                rule, pointer
            ),
            ErrorKind::NotAnEncoding => f.write_str("schema is not an encoding marker"),
            ErrorKind::UnknownEncoding(name) => write!(f, "unknown encoding `{}`", name),
            ErrorKind::InvalidOptions { encoding, error } => {
                write!(f, "invalid options for `{}`: {}", encoding, error)
            }
            ErrorKind::EofWhileParsingValue => f.write_str("EOF while parsing a value"),
            ErrorKind::UnterminatedVarint => f.write_str("unterminated varint"),
            ErrorKind::InvalidOffset => f.write_str("invalid string back-reference offset"),
            ErrorKind::InvalidTag(byte) => write!(f, "invalid tag byte 0x{:02x}", byte),
            ErrorKind::InvalidUtf8 => f.write_str("invalid UTF-8"),
            ErrorKind::InvalidChoice => f.write_str("choice index out of range"),
            ErrorKind::InvalidLength => f.write_str("invalid length prefix"),
            ErrorKind::InvalidDate => f.write_str("invalid date"),
            ErrorKind::InvalidObjectKey => f.write_str("object key must be a string"),
            ErrorKind::IntegerOutOfRange => f.write_str("integer out of range"),
            ErrorKind::RealOutOfRange => f.write_str("real number has too many integral digits"),
            ErrorKind::RecursionLimitExceeded => f.write_str("recursion limit exceeded"),
            ErrorKind::TrailingData => f.write_str("trailing data"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match &*self.0 {
            ErrorKind::Io(e) => Some(e),
            ErrorKind::InvalidOptions { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl Error {
    pub(crate) fn io(e: io::Error) -> Self {
        Error(Box::new(ErrorKind::Io(e)))
    }

    pub(crate) fn unknown_dialect() -> Self {
        Error(Box::new(ErrorKind::UnknownDialect))
    }

    pub(crate) fn unsupported_dialect(dialect: &str) -> Self {
        Error(Box::new(ErrorKind::UnsupportedDialect(dialect.to_string())))
    }

    pub(crate) fn unresolved_metaschema(id: &str) -> Self {
        Error(Box::new(ErrorKind::UnresolvedMetaschema(id.to_string())))
    }

    pub(crate) fn fixed_point_not_reached(rule: &'static str, pointer: &str) -> Self {
        Error(Box::new(ErrorKind::FixedPointNotReached {
            rule,
            pointer: pointer.to_string(),
        }))
    }

    pub(crate) fn not_an_encoding() -> Self {
        Error(Box::new(ErrorKind::NotAnEncoding))
    }

    pub(crate) fn unknown_encoding(name: &str) -> Self {
        Error(Box::new(ErrorKind::UnknownEncoding(name.to_string())))
    }

    pub(crate) fn invalid_options(encoding: &str, error: serde_json::Error) -> Self {
        Error(Box::new(ErrorKind::InvalidOptions {
            encoding: encoding.to_string(),
            error,
        }))
    }

    pub(crate) fn eof_while_parsing_value() -> Self {
        Error(Box::new(ErrorKind::EofWhileParsingValue))
    }

    pub(crate) fn unterminated_varint() -> Self {
        Error(Box::new(ErrorKind::UnterminatedVarint))
    }

    pub(crate) fn invalid_offset() -> Self {
        Error(Box::new(ErrorKind::InvalidOffset))
    }

    pub(crate) fn invalid_tag(byte: u8) -> Self {
        Error(Box::new(ErrorKind::InvalidTag(byte)))
    }

    pub(crate) fn invalid_utf8() -> Self {
        Error(Box::new(ErrorKind::InvalidUtf8))
    }

    pub(crate) fn invalid_choice() -> Self {
        Error(Box::new(ErrorKind::InvalidChoice))
    }

    pub(crate) fn invalid_length() -> Self {
        Error(Box::new(ErrorKind::InvalidLength))
    }

    pub(crate) fn invalid_date() -> Self {
        Error(Box::new(ErrorKind::InvalidDate))
    }

    pub(crate) fn invalid_object_key() -> Self {
        Error(Box::new(ErrorKind::InvalidObjectKey))
    }

    pub(crate) fn integer_out_of_range() -> Self {
        Error(Box::new(ErrorKind::IntegerOutOfRange))
    }

    pub(crate) fn real_out_of_range() -> Self {
        Error(Box::new(ErrorKind::RealOutOfRange))
    }

    pub(crate) fn recursion_limit_exceeded() -> Self {
        Error(Box::new(ErrorKind::RecursionLimitExceeded))
    }

    pub(crate) fn trailing_data() -> Self {
        Error(Box::new(ErrorKind::TrailingData))
    }
}
