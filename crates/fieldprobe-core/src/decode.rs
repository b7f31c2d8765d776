//! Generic message decoding against a [`SchemaCatalog`].
//!
//! Documents come in two formats:
//!
//! - [`Format::Binary`]: protobuf wire encoding. Unknown field numbers are
//!   kept as unknown fields and never fail the decode.
//! - [`Format::Text`]: protobuf JSON. Unknown keys are rejected as
//!   [`Error::SchemaMismatch`].
//!
//! Nested, extension and `Any` types resolve through the descriptor pool
//! behind the catalog, never through compiled-in types.

use crate::catalog::SchemaCatalog;
use crate::error::{Error, Result};
use prost_reflect::{DeserializeOptions, DynamicMessage, MessageDescriptor};
use serde_json::error::Category;
use std::fmt;
use tracing::{trace, warn};

/// Encoding of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Protobuf binary wire format
    Binary,
    /// Protobuf JSON mapping
    #[default]
    Text,
}

impl Format {
    /// Names that select [`Format::Text`]
    pub const TEXT_NAMES: &'static [&'static str] = &["json", "text"];

    /// Names that select [`Format::Binary`]
    pub const BINARY_NAMES: &'static [&'static str] = &["binary", "proto", "protobuf"];

    /// Maps a format name to a format, case-insensitively.
    ///
    /// Any name that is not a text name selects [`Format::Binary`], including
    /// names that are not recognized at all.
    pub fn from_name(name: &str) -> Self {
        if Self::TEXT_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
            return Format::Text;
        }
        if !Self::is_known_name(name) {
            warn!("Unrecognized format '{}', decoding as binary", name);
        }
        Format::Binary
    }

    /// Returns true if `name` is one of the documented format names
    pub fn is_known_name(name: &str) -> bool {
        let lower = name.to_ascii_lowercase();
        Self::TEXT_NAMES.contains(&lower.as_str()) || Self::BINARY_NAMES.contains(&lower.as_str())
    }

    /// Returns the canonical name of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Binary => "binary",
            Format::Text => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes `data` as a message of type `type_name`.
///
/// The type is resolved before any bytes are looked at, so an unknown name
/// fails with [`Error::UnknownType`] regardless of the payload.
pub fn decode(
    type_name: &str,
    data: &[u8],
    format: Format,
    catalog: &SchemaCatalog,
) -> Result<DynamicMessage> {
    let desc = catalog.get_message(type_name)?;
    trace!("Decoding {} bytes of {} as {}", data.len(), desc.full_name(), format);

    match format {
        Format::Binary => decode_binary(desc, data),
        Format::Text => decode_text(desc, data),
    }
}

/// Decodes protobuf wire-format bytes
pub fn decode_binary(desc: MessageDescriptor, data: &[u8]) -> Result<DynamicMessage> {
    let type_name = desc.full_name().to_string();
    DynamicMessage::decode(desc, data).map_err(|e| Error::message_decode(type_name, e.to_string()))
}

/// Decodes protobuf JSON, rejecting unknown keys
pub fn decode_text(desc: MessageDescriptor, data: &[u8]) -> Result<DynamicMessage> {
    let type_name = desc.full_name().to_string();
    let options = DeserializeOptions::new().deny_unknown_fields(true);

    let mut deserializer = serde_json::Deserializer::from_slice(data);
    let message = DynamicMessage::deserialize_with_options(desc, &mut deserializer, &options)
        .map_err(|e| text_error(&type_name, e))?;
    deserializer.end().map_err(|e| text_error(&type_name, e))?;

    Ok(message)
}

/// Messages prost-reflect uses for names the schema does not define
const UNDEFINED_NAME_ERRORS: &[&str] = &[
    "unrecognized field name",
    "unrecognized enum value",
    "' not found",
];

/// Only references to undefined fields, enum values or `@type` messages are
/// schema mismatches; any other failure means the JSON is not a valid
/// encoding of the type.
fn text_error(type_name: &str, err: serde_json::Error) -> Error {
    let details = err.to_string();
    let undefined = UNDEFINED_NAME_ERRORS.iter().any(|m| details.contains(m));

    match err.classify() {
        Category::Data if undefined => Error::schema_mismatch(type_name, details),
        _ => Error::message_decode(type_name, details),
    }
}
