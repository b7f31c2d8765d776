//! Path steps emitted by the walker.

use prost_reflect::{ExtensionDescriptor, FieldDescriptor, MapKey, MessageDescriptor};
use std::fmt;

/// One segment of a path from the root message to a populated value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// The top-level message being walked
    Root(MessageDescriptor),
    /// A regular field of the enclosing message
    Field(FieldDescriptor),
    /// An extension field set on the enclosing message
    Extension(ExtensionDescriptor),
    /// Position of an element in a repeated field
    ListIndex(usize),
    /// Key of an entry in a map field
    MapKey(MapKey),
    /// The message packed inside a `google.protobuf.Any`
    AnyExpand(MessageDescriptor),
}

/// Discriminant of a [`PathStep`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// See [`PathStep::Root`]
    Root,
    /// See [`PathStep::Field`]
    Field,
    /// See [`PathStep::Extension`]
    Extension,
    /// See [`PathStep::ListIndex`]
    ListIndex,
    /// See [`PathStep::MapKey`]
    MapKey,
    /// See [`PathStep::AnyExpand`]
    AnyExpand,
}

impl PathStep {
    /// Returns the kind of this step
    pub fn kind(&self) -> StepKind {
        match self {
            PathStep::Root(_) => StepKind::Root,
            PathStep::Field(_) => StepKind::Field,
            PathStep::Extension(_) => StepKind::Extension,
            PathStep::ListIndex(_) => StepKind::ListIndex,
            PathStep::MapKey(_) => StepKind::MapKey,
            PathStep::AnyExpand(_) => StepKind::AnyExpand,
        }
    }

    /// Returns true for repeated-element index steps
    pub fn is_list_index(&self) -> bool {
        matches!(self, PathStep::ListIndex(_))
    }

    /// Returns true for the root step
    pub fn is_root(&self) -> bool {
        matches!(self, PathStep::Root(_))
    }
}

/// Field steps print the bare field name. Steps that name a type print it in
/// parentheses, index and key steps print in brackets with string keys
/// quoted, so two steps of different kinds never print the same.
impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Root(desc) | PathStep::AnyExpand(desc) => write!(f, "({})", desc.full_name()),
            PathStep::Field(desc) => f.write_str(desc.name()),
            PathStep::Extension(desc) => write!(f, "({})", desc.full_name()),
            PathStep::ListIndex(index) => write!(f, "[{}]", index),
            PathStep::MapKey(key) => match key {
                MapKey::String(s) => write!(f, "[{:?}]", s),
                MapKey::Bool(b) => write!(f, "[{}]", b),
                MapKey::I32(n) => write!(f, "[{}]", n),
                MapKey::I64(n) => write!(f, "[{}]", n),
                MapKey::U32(n) => write!(f, "[{}]", n),
                MapKey::U64(n) => write!(f, "[{}]", n),
            },
        }
    }
}
