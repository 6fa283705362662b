use crate::{parse, Canonicalizer, Encoding, Error, Mapper, SchemaResolver};
use serde_json::Value;
use tracing::debug;

/// Canonicalizes a schema in place.
///
/// See [`Canonicalizer::apply`].
pub fn canonicalize(schema: &mut Value, resolver: &dyn SchemaResolver, default_dialect: Option<&str>) -> Result<(), Error> {
    Canonicalizer::new().apply(schema, resolver, default_dialect)?;
    debug!("canonicalized schema");
    Ok(())
}

/// Compiles a schema into an encoding marker in place.
///
/// The schema is canonicalized, then mapped. The result is a root encoding marker that [`parse`] accepts.
pub fn compile(schema: &mut Value, resolver: &dyn SchemaResolver, default_dialect: Option<&str>) -> Result<(), Error> {
    canonicalize(schema, resolver, default_dialect)?;
    Mapper::new().apply(schema, resolver, default_dialect)?;
    debug!("mapped schema");
    Ok(())
}

/// Compiles a schema and parses the resulting marker.
pub fn load(schema: &Value, resolver: &dyn SchemaResolver, default_dialect: Option<&str>) -> Result<Encoding, Error> {
    let mut compiled = schema.clone();
    compile(&mut compiled, resolver, default_dialect)?;
    let encoding = parse(&compiled)?;
    debug!(encoding = encoding.name(), "loaded encoding");
    Ok(encoding)
}
