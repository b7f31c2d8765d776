//! Name registration for descriptor bundles.
//!
//! Walks the raw `FileDescriptorProto`s of a bundle and assigns every enum,
//! extension and message a fully-qualified name. Within each file the order
//! is fixed: enums, then extensions, then message types (each message
//! followed by its own nested enums, extensions and messages). The first
//! name seen twice stops registration.

use crate::error::{Error, Result};
use prost_types::{DescriptorProto, FileDescriptorProto};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Kind of schema element a registered name refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryKind {
    Enum,
    Extension,
    Message,
}

/// Collects fully-qualified names in registration order
#[derive(Debug, Default)]
pub(crate) struct Registrar<'a> {
    /// Registered names with their kind, in registration order
    entries: Vec<(String, EntryKind)>,
    /// Name -> file that registered it
    owners: HashMap<String, &'a str>,
    /// Files accepted so far, by file name
    files: HashMap<&'a str, &'a FileDescriptorProto>,
}

impl<'a> Registrar<'a> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Register every element of `file`.
    ///
    /// Returns `false` when the file is an exact repeat of one already
    /// registered; such files are skipped.
    pub(crate) fn register_file(&mut self, file: &'a FileDescriptorProto) -> Result<bool> {
        if let Some(existing) = self.files.get(file.name()) {
            if *existing == file {
                trace!("Skipping repeated file {}", file.name());
                return Ok(false);
            }
        }
        self.files.insert(file.name(), file);

        let package = file.package();
        let origin = file.name();

        for enum_type in &file.enum_type {
            self.register(qualify(package, enum_type.name()), EntryKind::Enum, origin)?;
        }
        for extension in &file.extension {
            self.register(qualify(package, extension.name()), EntryKind::Extension, origin)?;
        }
        for message in &file.message_type {
            self.register_message(package, message, origin)?;
        }

        Ok(true)
    }

    fn register_message(
        &mut self,
        scope: &str,
        message: &DescriptorProto,
        origin: &'a str,
    ) -> Result<()> {
        let name = qualify(scope, message.name());

        self.register(name.clone(), EntryKind::Message, origin)?;

        for enum_type in &message.enum_type {
            self.register(qualify(&name, enum_type.name()), EntryKind::Enum, origin)?;
        }
        for extension in &message.extension {
            self.register(qualify(&name, extension.name()), EntryKind::Extension, origin)?;
        }
        for nested in &message.nested_type {
            self.register_message(&name, nested, origin)?;
        }

        Ok(())
    }

    fn register(&mut self, name: String, kind: EntryKind, origin: &'a str) -> Result<()> {
        if let Some(owner) = self.owners.get(&name) {
            debug!("{} from {} was first registered by {}", name, origin, owner);
            return Err(Error::registration_conflict(name, origin));
        }

        trace!("Registering {:?} {}", kind, name);
        self.owners.insert(name.clone(), origin);
        self.entries.push((name, kind));
        Ok(())
    }

    /// Registered names in registration order
    pub(crate) fn entries(&self) -> &[(String, EntryKind)] {
        &self.entries
    }
}

/// Join a package or parent scope with a simple name
fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", scope, name)
    }
}
