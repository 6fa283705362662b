//! A schema-driven binary serialization format for JSON.
//!
//! A [JSON Schema] 2020-12 document is compiled into an [`Encoding`]: a tree of concrete binary layouts specialized
//! for the values the schema admits. Values that satisfy the schema are then encoded with much less overhead than
//! a self-describing format needs. The wire format has no framing, magic number, or version byte, so the same schema
//! is required to decode the data again.
//!
//! # Compilation
//!
//! Compilation happens in three stages, each available on its own:
//!
//! * [`canonicalize`] rewrites the schema into a smaller, explicit form: syntax sugar is expanded, implicit
//!     defaults are spelled out, and keywords that cannot apply are removed.
//! * [`compile`] then maps every canonical subschema to an encoding marker, working from the leaves up.
//! * [`parse`] turns the resulting root marker into an [`Encoding`].
//!
//! [`load`] runs all of them. Metaschemas are looked up through a [`SchemaResolver`]; [`OfficialResolver`] knows
//! the 2020-12 metaschema.
//!
//! Subschemas that the mapper does not specialize fall back to a self-describing encoding, so every schema
//! compiles.
//!
//! # Examples
//!
//! ```rust
//! use binpack::{Error, OfficialResolver};
//! use serde_json::json;
//!
//! fn main() -> Result<(), Error> {
//!     let schema = json!({
//!         "$schema": "https://json-schema.org/draft/2020-12/schema",
//!         "type": "integer",
//!         "minimum": 1,
//!         "maximum": 19,
//!         "multipleOf": 5,
//!     });
//!     let encoding = binpack::load(&schema, &OfficialResolver, None)?;
//!
//!     let bytes = binpack::to_vec(&json!(15), &encoding)?;
//!     assert_eq!(bytes, [0x02]);
//!
//!     let value = binpack::from_slice(&bytes, &encoding)?;
//!     assert_eq!(value, json!(15));
//!
//!     Ok(())
//! }
//! ```
//!
//! [JSON Schema]: https://json-schema.org
#![warn(missing_docs)]

#[doc(inline)]
pub use crate::bundle::{Bundle, Rule, RuleContext};
pub use crate::canonicalizer::Canonicalizer;
pub use crate::compiler::{canonicalize, compile, load};
#[doc(inline)]
pub use crate::de::{from_reader, from_slice, Decoder};
pub use crate::encoding::{is_encoding, Encoding};
pub use crate::error::Error;
pub use crate::mapper::Mapper;
pub use crate::parser::parse;
pub use crate::resolver::{OfficialResolver, SchemaResolver};
#[doc(inline)]
pub use crate::ser::{to_vec, to_writer, Encoder};

pub mod bundle;
pub mod canonicalizer;
mod compiler;
pub mod de;
pub mod encoding;
mod error;
pub mod mapper;
mod numeric;
mod parser;
mod resolver;
pub mod schema;
pub mod ser;
mod tag;
#[cfg(test)]
mod test;
