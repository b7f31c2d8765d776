//! Runtime schema catalog.
//!
//! A [`SchemaCatalog`] maps fully-qualified type names to reflective
//! descriptors. It is built once per run, either from a serialized
//! `FileDescriptorSet` bundle or from an existing [`DescriptorPool`] (such as
//! the process-wide global pool), and is read-only afterwards.
//!
//! ## Building from a bundle
//!
//! 1. Decode the bytes as a `FileDescriptorSet`
//! 2. Register every name per file (enums, extensions, messages), failing on
//!    the first duplicate
//! 3. Link the files into a [`DescriptorPool`] with prost-reflect
//! 4. Resolve each registered name to its descriptor
//!
//! Descriptors reference each other through the pool by name, so cyclic
//! schemas (a message containing itself) need no special handling.

mod registrar;

use crate::error::{Error, Result};
use prost::Message;
use prost_reflect::{DescriptorPool, EnumDescriptor, ExtensionDescriptor, MessageDescriptor};
use prost_types::FileDescriptorSet;
use registrar::{EntryKind, Registrar};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, trace};

/// A descriptor registered in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    /// A message type
    Message(MessageDescriptor),
    /// An enum type
    Enum(EnumDescriptor),
    /// An extension field
    Extension(ExtensionDescriptor),
}

impl CatalogEntry {
    /// Returns the fully-qualified name of the descriptor
    pub fn full_name(&self) -> &str {
        match self {
            CatalogEntry::Message(desc) => desc.full_name(),
            CatalogEntry::Enum(desc) => desc.full_name(),
            CatalogEntry::Extension(desc) => desc.full_name(),
        }
    }

    /// Returns the message descriptor if this entry is a message
    pub fn as_message(&self) -> Option<&MessageDescriptor> {
        match self {
            CatalogEntry::Message(desc) => Some(desc),
            _ => None,
        }
    }
}

/// Lookup table from fully-qualified name to descriptor
#[derive(Debug, Clone)]
pub struct SchemaCatalog {
    pool: DescriptorPool,
    entries: HashMap<String, CatalogEntry>,
}

impl SchemaCatalog {
    /// Builds a catalog from the serialized bytes of a `FileDescriptorSet`
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let set = FileDescriptorSet::decode(data)?;
        Self::from_file_descriptor_set(set)
    }

    /// Reads a `FileDescriptorSet` file (a "protoset") and builds a catalog from it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
        trace!("Read {} bytes of descriptors from {}", data.len(), path.display());
        Self::from_bytes(&data)
    }

    /// Builds a catalog from a decoded `FileDescriptorSet`
    pub fn from_file_descriptor_set(set: FileDescriptorSet) -> Result<Self> {
        let mut registrar = Registrar::new();
        let mut unique = Vec::with_capacity(set.file.len());

        for file in &set.file {
            if registrar.register_file(file)? {
                unique.push(file.clone());
            }
        }

        debug!(
            "Registered {} names from {} descriptor files",
            registrar.entries().len(),
            unique.len()
        );

        let pool = DescriptorPool::from_file_descriptor_set(FileDescriptorSet { file: unique })
            .map_err(|e| Error::catalog_resolve(e.to_string()))?;

        let mut entries = HashMap::with_capacity(registrar.entries().len());
        for (name, kind) in registrar.entries() {
            let entry = match kind {
                EntryKind::Enum => pool.get_enum_by_name(name).map(CatalogEntry::Enum),
                EntryKind::Extension => {
                    pool.get_extension_by_name(name).map(CatalogEntry::Extension)
                }
                EntryKind::Message => pool.get_message_by_name(name).map(CatalogEntry::Message),
            }
            .ok_or_else(|| {
                Error::catalog_resolve(format!("'{}' missing from linked descriptor pool", name))
            })?;

            entries.insert(name.clone(), entry);
        }

        Ok(Self { pool, entries })
    }

    /// Wraps an existing descriptor pool
    ///
    /// Every enum, extension and message in the pool is registered.
    pub fn from_pool(pool: DescriptorPool) -> Self {
        let mut entries = HashMap::new();

        for desc in pool.all_enums() {
            entries.insert(desc.full_name().to_string(), CatalogEntry::Enum(desc));
        }
        for desc in pool.all_extensions() {
            entries.insert(desc.full_name().to_string(), CatalogEntry::Extension(desc));
        }
        for desc in pool.all_messages() {
            entries.insert(desc.full_name().to_string(), CatalogEntry::Message(desc));
        }

        debug!("Catalog wraps pool with {} names", entries.len());
        Self { pool, entries }
    }

    /// Catalog over the process-wide global descriptor pool
    ///
    /// This holds whatever schemas were registered with
    /// [`DescriptorPool::decode_global_file_descriptor_set`] before the call.
    pub fn global() -> Self {
        Self::from_pool(DescriptorPool::global())
    }

    /// Looks up any descriptor by fully-qualified name
    ///
    /// A leading `.` (as used in descriptor type references) is accepted.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries.get(name.strip_prefix('.').unwrap_or(name))
    }

    /// Looks up a message descriptor by fully-qualified name
    pub fn get_message(&self, name: &str) -> Result<MessageDescriptor> {
        self.get(name)
            .and_then(CatalogEntry::as_message)
            .cloned()
            .ok_or_else(|| Error::unknown_type(name))
    }

    /// Resolves a `google.protobuf.Any` type URL to a message descriptor
    ///
    /// Only the part after the last `/` is significant.
    pub fn resolve_type_url(&self, type_url: &str) -> Option<MessageDescriptor> {
        let name = type_url.rsplit('/').next().unwrap_or(type_url);
        self.get(name).and_then(CatalogEntry::as_message).cloned()
    }

    /// Returns the underlying descriptor pool
    pub fn pool(&self) -> &DescriptorPool {
        &self.pool
    }

    /// Returns the number of registered names
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_bytes() {
        let bytes = fixtures::shop_set().encode_to_vec();
        let catalog = SchemaCatalog::from_bytes(&bytes).unwrap();

        assert_eq!(
            catalog.names(),
            vec!["shop.Item", "shop.Order", "shop.Order.LabelsEntry", "shop.Status"]
        );
        assert!(matches!(catalog.get("shop.Status"), Some(CatalogEntry::Enum(_))));
        assert_eq!(catalog.get_message(".shop.Order").unwrap().full_name(), "shop.Order");
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.protoset");
        std::fs::write(&path, fixtures::shop_set().encode_to_vec()).unwrap();

        let catalog = SchemaCatalog::from_file(&path).unwrap();
        assert_eq!(catalog.len(), 4);

        let missing = SchemaCatalog::from_file(dir.path().join("missing.protoset"));
        assert!(matches!(missing, Err(Error::FileRead { .. })));
    }

    #[test]
    fn test_malformed_bundle() {
        let err = SchemaCatalog::from_bytes(&[0xFF, 0xFF, 0xFF]).unwrap_err();
        assert!(matches!(err, Error::CatalogDecode(_)));
    }

    #[test]
    fn test_duplicate_message_is_conflict() {
        let set = FileDescriptorSet {
            file: vec![
                fixtures::single_message_file("a.proto", "pkg", "Foo"),
                fixtures::single_message_file("b.proto", "pkg", "Foo"),
            ],
        };

        let err = SchemaCatalog::from_bytes(&set.encode_to_vec()).unwrap_err();
        assert!(matches!(err, Error::RegistrationConflict { ref name, .. } if name == "pkg.Foo"));
        assert!(err.is_catalog_error());
    }

    #[test]
    fn test_repeated_identical_file() {
        let set = FileDescriptorSet {
            file: vec![fixtures::shop_file(), fixtures::shop_file()],
        };

        let catalog = SchemaCatalog::from_file_descriptor_set(set).unwrap();
        assert_eq!(catalog.len(), 4);
    }

    #[test]
    fn test_unresolved_import() {
        let mut file = fixtures::single_message_file("a.proto", "pkg", "Foo");
        file.message_type[0].field.push(fixtures::message_field(
            "other",
            1,
            fixtures::Label::Optional,
            ".elsewhere.Missing",
        ));
        let set = FileDescriptorSet { file: vec![file] };

        let err = SchemaCatalog::from_file_descriptor_set(set).unwrap_err();
        assert!(matches!(err, Error::CatalogResolve(_)));
    }

    #[test]
    fn test_unknown_and_non_message_names() {
        let catalog = fixtures::shop_catalog();

        assert!(matches!(
            catalog.get_message("pkg.DoesNotExist"),
            Err(Error::UnknownType { .. })
        ));
        // Enums are registered but are not messages
        assert!(matches!(
            catalog.get_message("shop.Status"),
            Err(Error::UnknownType { .. })
        ));
    }

    #[test]
    fn test_resolve_type_url() {
        let catalog = fixtures::shop_catalog();

        let desc = catalog
            .resolve_type_url("type.googleapis.com/shop.Item")
            .unwrap();
        assert_eq!(desc.full_name(), "shop.Item");
        assert!(catalog.resolve_type_url("shop.Item").is_some());
        assert!(catalog.resolve_type_url("example.com/shop.Nope").is_none());
    }

    #[test]
    fn test_from_pool() {
        let catalog = fixtures::shop_catalog();
        let wrapped = SchemaCatalog::from_pool(catalog.pool().clone());

        for name in catalog.names() {
            assert_eq!(wrapped.get(name), catalog.get(name));
        }
    }
}
