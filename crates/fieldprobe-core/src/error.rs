//! Error types for the fieldprobe-core library.
//!
//! Every failure is terminal for the run that produced it: a broken catalog
//! or a malformed document aborts processing, there is no partial result.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fieldprobe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all fieldprobe operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Failed to read an input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The descriptor bundle is not a valid `FileDescriptorSet`
    #[error("failed to decode descriptor set: {0}")]
    CatalogDecode(#[from] prost::DecodeError),

    /// The descriptor bundle decoded but its files do not link together
    #[error("failed to resolve descriptor set: {0}")]
    CatalogResolve(String),

    /// Two descriptors in the bundle share a fully-qualified name
    #[error("'{name}' declared in '{file}' is already registered")]
    RegistrationConflict {
        /// The duplicated fully-qualified name
        name: String,
        /// File that attempted the second registration
        file: String,
    },

    /// The requested message type is not in the catalog
    #[error("message type '{name}' not found in catalog")]
    UnknownType {
        /// The name that failed to resolve
        name: String,
    },

    /// The document bytes are malformed for the declared format
    #[error("failed to decode '{type_name}' document: {details}")]
    MessageDecode {
        /// Message type being decoded
        type_name: String,
        /// Decoder diagnostic
        details: String,
    },

    /// The document references fields or values the schema does not declare
    #[error("document does not match schema of '{type_name}': {details}")]
    SchemaMismatch {
        /// Message type being decoded
        type_name: String,
        /// Decoder diagnostic
        details: String,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new catalog resolution error
    pub fn catalog_resolve(msg: impl Into<String>) -> Self {
        Self::CatalogResolve(msg.into())
    }

    /// Creates a new registration conflict error
    pub fn registration_conflict(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self::RegistrationConflict {
            name: name.into(),
            file: file.into(),
        }
    }

    /// Creates a new unknown type error
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::UnknownType { name: name.into() }
    }

    /// Creates a new message decode error
    pub fn message_decode(type_name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::MessageDecode {
            type_name: type_name.into(),
            details: details.into(),
        }
    }

    /// Creates a new schema mismatch error
    pub fn schema_mismatch(type_name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            type_name: type_name.into(),
            details: details.into(),
        }
    }

    /// Returns true if this error comes from building the catalog rather
    /// than from processing a document
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            Self::CatalogDecode(_) | Self::CatalogResolve(_) | Self::RegistrationConflict { .. }
        )
    }
}
