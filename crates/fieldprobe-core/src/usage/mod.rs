//! Field usage collection.
//!
//! A [`Collector`] decodes documents, walks them, and folds every populated
//! path into a single [`UsageTrie`]. Documents processed by the same
//! collector accumulate: a path seen in any document appears once.
//!
//! ## Example
//!
//! ```no_run
//! use fieldprobe_core::{render, Collector, CollectorConfig, Format, IndentWriter, SchemaCatalog};
//!
//! let catalog = SchemaCatalog::from_file("schema.protoset")?;
//! let mut collector = Collector::new(CollectorConfig::new());
//!
//! for path in ["a.json", "b.json"] {
//!     collector.process_file("pkg.Order", path, Format::Text, &catalog)?;
//! }
//!
//! let mut out = String::new();
//! render(collector.trie(), &mut IndentWriter::new(&mut out))?;
//! print!("{}", out);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod trie;

use crate::catalog::SchemaCatalog;
use crate::decode::{decode, Format};
use crate::error::{Error, Result};
use crate::walk::{walk, PathStep, Visitor};
use prost_reflect::{DynamicMessage, ReflectMessage};
use std::path::Path;
use tracing::{debug, trace};

pub use trie::{UsageNode, UsageTrie};

/// Configuration for a [`Collector`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorConfig {
    /// Drop repeated-element index steps so all elements share one path
    pub elide_list_index: bool,
    /// Keep the root message step as the top node of the trie
    pub include_root: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            elide_list_index: true,
            include_root: false,
        }
    }
}

impl CollectorConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether list index steps are elided
    pub fn elide_list_index(mut self, elide: bool) -> Self {
        self.elide_list_index = elide;
        self
    }

    /// Sets whether the root message step is recorded
    pub fn include_root(mut self, include: bool) -> Self {
        self.include_root = include;
        self
    }
}

/// Folds the populated paths of many documents into one trie
#[derive(Debug, Clone, Default)]
pub struct Collector {
    config: CollectorConfig,
    trie: UsageTrie,
    documents: usize,
}

impl Collector {
    /// Creates a collector with an empty trie
    pub fn new(config: CollectorConfig) -> Self {
        Self {
            config,
            trie: UsageTrie::new(),
            documents: 0,
        }
    }

    /// Returns the configuration
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Decodes `data` as `type_name` and records its populated paths.
    ///
    /// On error the trie may hold some paths of the failed document; callers
    /// treat any error as the end of the run.
    pub fn process(
        &mut self,
        type_name: &str,
        data: &[u8],
        format: Format,
        catalog: &SchemaCatalog,
    ) -> Result<()> {
        let message = decode(type_name, data, format, catalog)?;
        self.process_message(&message, catalog)
    }

    /// Reads a document from disk and processes it
    pub fn process_file(
        &mut self,
        type_name: &str,
        path: impl AsRef<Path>,
        format: Format,
        catalog: &SchemaCatalog,
    ) -> Result<()> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|e| Error::file_read(path, e))?;
        trace!("Read {} bytes from {}", data.len(), path.display());
        self.process(type_name, &data, format, catalog)
    }

    /// Records the populated paths of an already decoded message
    pub fn process_message(
        &mut self,
        message: &DynamicMessage,
        catalog: &SchemaCatalog,
    ) -> Result<()> {
        let mut stack = PathStack::new(&self.config, &mut self.trie);
        walk(message, catalog, &mut stack)?;
        let added = stack.created;

        self.documents += 1;
        debug!(
            "Document {} ({}) added {} paths",
            self.documents,
            message.descriptor().full_name(),
            added
        );
        Ok(())
    }

    /// Adds everything another collector has recorded
    pub fn merge(&mut self, other: &Collector) {
        self.trie.merge(&other.trie);
        self.documents += other.documents;
    }

    /// Returns the trie built so far
    pub fn trie(&self) -> &UsageTrie {
        &self.trie
    }

    /// Consumes the collector, returning its trie
    pub fn into_trie(self) -> UsageTrie {
        self.trie
    }

    /// Returns the number of documents processed successfully
    pub fn documents(&self) -> usize {
        self.documents
    }
}

/// Mirrors the walker's path as strings, minus the steps the config elides
struct PathStack<'a> {
    config: &'a CollectorConfig,
    trie: &'a mut UsageTrie,
    stack: Vec<String>,
    /// Nodes added to the trie during this walk
    created: usize,
}

impl<'a> PathStack<'a> {
    fn new(config: &'a CollectorConfig, trie: &'a mut UsageTrie) -> Self {
        Self {
            config,
            trie,
            stack: Vec::new(),
            created: 0,
        }
    }

    fn skips(&self, step: &PathStep) -> bool {
        (self.config.elide_list_index && step.is_list_index())
            || (!self.config.include_root && step.is_root())
    }
}

impl Visitor for PathStack<'_> {
    fn enter(&mut self, path: &[PathStep]) {
        let Some(step) = path.last() else {
            return;
        };
        if self.skips(step) {
            return;
        }

        self.stack.push(step.to_string());
        self.created += self.trie.insert(self.stack.as_slice());
    }

    fn leave(&mut self, path: &[PathStep]) {
        let Some(step) = path.last() else {
            return;
        };
        if self.skips(step) {
            return;
        }

        self.stack.pop();
    }
}
