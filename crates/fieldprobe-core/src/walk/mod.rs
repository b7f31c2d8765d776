//! Schema-agnostic traversal of decoded messages.
//!
//! [`walk`] visits every populated value of a [`DynamicMessage`] depth-first
//! and reports it to a [`Visitor`] as a pair of `enter`/`leave` calls
//! carrying the full path from the root.
//!
//! ## Visiting rules
//!
//! - The root message is visited first, as a [`PathStep::Root`] step
//! - Regular fields are visited in declaration order, and only when present:
//!   unset fields, implicit-presence scalars at their default value and empty
//!   repeated or map fields are skipped
//! - Extension fields follow the regular fields
//! - Repeated elements are visited in order, map entries in map order
//! - A `google.protobuf.Any` whose type resolves in the catalog is expanded
//!   into its packed message instead of its raw `type_url`/`value` fields
//!
//! `enter` and `leave` nest like parentheses: between the `enter` and the
//! `leave` for a path, only paths extending it are reported. This holds even
//! when the walk stops on an error.
//!
//! The walker applies no filtering of its own; consumers decide which steps
//! they care about.

mod path;

use crate::catalog::SchemaCatalog;
use crate::decode::decode_binary;
use crate::error::Result;
use prost_reflect::{DynamicMessage, ReflectMessage, Value};
use tracing::trace;

pub use path::{PathStep, StepKind};

/// Full name of the well-known `Any` type
const ANY_TYPE: &str = "google.protobuf.Any";

/// Receiver of walk events.
///
/// `path` is never empty; its last element is the step being entered or
/// left.
pub trait Visitor {
    /// Called before the children of `path` are visited
    fn enter(&mut self, path: &[PathStep]);

    /// Called after the children of `path` are visited
    fn leave(&mut self, path: &[PathStep]);
}

/// Adapts a pair of closures into a [`Visitor`]
pub struct FnVisitor<E, L> {
    on_enter: E,
    on_leave: L,
}

impl<E, L> FnVisitor<E, L>
where
    E: FnMut(&[PathStep]),
    L: FnMut(&[PathStep]),
{
    /// Creates a visitor from enter and leave callbacks
    pub fn new(on_enter: E, on_leave: L) -> Self {
        Self { on_enter, on_leave }
    }
}

impl<E, L> Visitor for FnVisitor<E, L>
where
    E: FnMut(&[PathStep]),
    L: FnMut(&[PathStep]),
{
    fn enter(&mut self, path: &[PathStep]) {
        (self.on_enter)(path)
    }

    fn leave(&mut self, path: &[PathStep]) {
        (self.on_leave)(path)
    }
}

/// Walks the populated values of `message`.
///
/// `catalog` resolves the packed types of `Any` fields. Fails only when a
/// resolvable `Any` carries bytes that do not decode as its type.
pub fn walk<V: Visitor + ?Sized>(
    message: &DynamicMessage,
    catalog: &SchemaCatalog,
    visitor: &mut V,
) -> Result<()> {
    let mut walker = Walker {
        catalog,
        path: Vec::new(),
    };
    let root = PathStep::Root(message.descriptor());
    walker.step(root, |w, v| w.walk_message(message, v), visitor)
}

/// Walks `message` reporting events to a pair of closures
pub fn walk_with(
    message: &DynamicMessage,
    catalog: &SchemaCatalog,
    on_enter: impl FnMut(&[PathStep]),
    on_leave: impl FnMut(&[PathStep]),
) -> Result<()> {
    walk(message, catalog, &mut FnVisitor::new(on_enter, on_leave))
}

struct Walker<'a> {
    catalog: &'a SchemaCatalog,
    path: Vec<PathStep>,
}

impl Walker<'_> {
    /// Push `step`, report it, visit its children, report leaving, pop
    fn step<V, F>(&mut self, step: PathStep, children: F, visitor: &mut V) -> Result<()>
    where
        V: Visitor + ?Sized,
        F: FnOnce(&mut Self, &mut V) -> Result<()>,
    {
        self.path.push(step);
        visitor.enter(&self.path);
        let result = children(self, visitor);
        visitor.leave(&self.path);
        self.path.pop();
        result
    }

    fn walk_message<V: Visitor + ?Sized>(
        &mut self,
        message: &DynamicMessage,
        visitor: &mut V,
    ) -> Result<()> {
        let desc = message.descriptor();

        if desc.full_name() == ANY_TYPE {
            if let Some(packed) = self.unpack_any(message)? {
                let step = PathStep::AnyExpand(packed.descriptor());
                return self.step(step, |w, v| w.walk_message(&packed, v), visitor);
            }
        }

        for field in desc.fields() {
            if !message.has_field(&field) {
                continue;
            }
            let value = message.get_field(&field);
            self.step(
                PathStep::Field(field),
                |w, v| w.walk_value(&value, v),
                visitor,
            )?;
        }

        for (extension, value) in message.extensions() {
            self.step(
                PathStep::Extension(extension),
                |w, v| w.walk_value(value, v),
                visitor,
            )?;
        }

        Ok(())
    }

    fn walk_value<V: Visitor + ?Sized>(&mut self, value: &Value, visitor: &mut V) -> Result<()> {
        match value {
            Value::Message(message) => self.walk_message(message, visitor),
            Value::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.step(
                        PathStep::ListIndex(index),
                        |w, v| w.walk_value(item, v),
                        visitor,
                    )?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                for (key, item) in entries {
                    self.step(
                        PathStep::MapKey(key.clone()),
                        |w, v| w.walk_value(item, v),
                        visitor,
                    )?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Decode the message packed in an `Any`, if its type is in the catalog
    fn unpack_any(&self, any: &DynamicMessage) -> Result<Option<DynamicMessage>> {
        let type_url = any.get_field_by_name("type_url");
        let Some(type_url) = type_url.as_deref().and_then(Value::as_str) else {
            return Ok(None);
        };
        let Some(desc) = self.catalog.resolve_type_url(type_url) else {
            trace!("Any type '{}' not in catalog, walking raw fields", type_url);
            return Ok(None);
        };

        let payload = any.get_field_by_name("value");
        let data = payload
            .as_deref()
            .and_then(Value::as_bytes)
            .map(|bytes| bytes.as_ref())
            .unwrap_or_default();

        decode_binary(desc, data).map(Some)
    }
}
