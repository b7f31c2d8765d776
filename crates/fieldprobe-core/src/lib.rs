//! # fieldprobe-core
//!
//! A library for finding out which fields of a protobuf schema a corpus of
//! messages actually populates.
//!
//! The schema is not known at build time. It is loaded at runtime from a
//! `FileDescriptorSet`, documents are decoded reflectively against it, and
//! every populated field path is folded into one deduplicated tree.
//!
//! ## Architecture
//!
//! The library is organized into several modules, leaves first:
//!
//! - [`catalog`]: Runtime type registry built from descriptor bundles
//! - [`decode`]: Binary and JSON decoding into dynamic messages
//! - [`walk`]: Depth-first traversal of populated fields
//! - [`usage`]: Folding traversal paths into a usage trie
//! - [`render`]: Sorted rendering of the trie
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use fieldprobe_core::{render, Collector, CollectorConfig, Format, IndentWriter, SchemaCatalog};
//! use std::fs;
//!
//! // Build the catalog from a protoset (`protoc --descriptor_set_out`)
//! let catalog = SchemaCatalog::from_bytes(&fs::read("schema.protoset")?)?;
//!
//! // Fold documents into one trie
//! let mut collector = Collector::new(CollectorConfig::new());
//! let data = fs::read("order.bin")?;
//! collector.process("shop.Order", &data, Format::Binary, &catalog)?;
//!
//! // Print the sorted, indented tree
//! let mut out = String::new();
//! render(collector.trie(), &mut IndentWriter::new(&mut out))?;
//! print!("{}", out);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Extensibility
//!
//! - [`Visitor`]: Consume walk events directly
//! - [`TreeSink`]: Customize how the trie is rendered
//!

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod catalog;
pub mod decode;
pub mod error;
pub mod render;
pub mod usage;
pub mod walk;

#[cfg(test)]
mod fixtures;

// Re-export primary types for convenience
pub use catalog::{CatalogEntry, SchemaCatalog};
pub use decode::{decode, Format};
pub use error::{Error, Result};
pub use render::{render, render_with, IndentWriter, NullSink, PathWriter, StatsSink, TreeSink};
pub use usage::{Collector, CollectorConfig, UsageNode, UsageTrie};
pub use walk::{walk, walk_with, PathStep, StepKind, Visitor};

// Re-exported so callers use the same reflection types as this crate
pub use prost_reflect;

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
