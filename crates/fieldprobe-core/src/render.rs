//! Sorted rendering of a [`UsageTrie`].
//!
//! [`render`] walks the trie depth-first, visiting the children of each node
//! in ascending byte-wise key order, and reports each node to a
//! [`TreeSink`] as a `push` before its children and a `pop` after them. The
//! output depends only on the set of paths, never on insertion order.
//!
//! Sinks provided here:
//!
//! - [`IndentWriter`]: one key per line, indented by depth
//! - [`PathWriter`]: one full path per line (`items.name`, `labels["env"]`)
//! - [`StatsSink`]: node, leaf and depth counts

use crate::usage::{UsageNode, UsageTrie};
use std::fmt::{self, Result, Write};

/// Receiver of rendering events.
///
/// The default implementations do nothing.
pub trait TreeSink {
    /// Called before the children of `key` are rendered
    fn push(&mut self, key: &str) -> Result {
        let _ = key;
        Ok(())
    }

    /// Called after the children of `key` are rendered
    fn pop(&mut self, key: &str) -> Result {
        let _ = key;
        Ok(())
    }
}

/// Renders `trie` into `sink` in sorted depth-first order
pub fn render<S: TreeSink + ?Sized>(trie: &UsageTrie, sink: &mut S) -> Result {
    render_node(trie.root(), sink)
}

fn render_node<S: TreeSink + ?Sized>(node: &UsageNode, sink: &mut S) -> Result {
    for key in node.sorted_keys() {
        sink.push(key)?;
        if let Some(child) = node.child(key) {
            render_node(child, sink)?;
        }
        sink.pop(key)?;
    }
    Ok(())
}

/// Renders `trie` reporting each key to a pair of closures
pub fn render_with(trie: &UsageTrie, push: impl FnMut(&str), pop: impl FnMut(&str)) {
    let mut sink = FnSink { push, pop };
    // FnSink never fails
    let _ = render(trie, &mut sink);
}

struct FnSink<P, Q> {
    push: P,
    pop: Q,
}

impl<P: FnMut(&str), Q: FnMut(&str)> TreeSink for FnSink<P, Q> {
    fn push(&mut self, key: &str) -> Result {
        (self.push)(key);
        Ok(())
    }

    fn pop(&mut self, key: &str) -> Result {
        (self.pop)(key);
        Ok(())
    }
}

/// A sink that discards all events
pub struct NullSink;

impl TreeSink for NullSink {}

/// Writes one key per line, indented by depth
pub struct IndentWriter<'a, W: Write> {
    writer: &'a mut W,
    indent_str: String,
    indent_level: usize,
}

impl<'a, W: Write> IndentWriter<'a, W> {
    /// Default indentation per level (three spaces)
    pub const DEFAULT_INDENT: &'static str = "   ";

    /// Creates a writer using [`Self::DEFAULT_INDENT`]
    pub fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            indent_str: Self::DEFAULT_INDENT.to_string(),
            indent_level: 0,
        }
    }

    /// Sets the indentation string
    pub fn indent_str(mut self, s: impl Into<String>) -> Self {
        self.indent_str = s.into();
        self
    }
}

impl<W: Write> TreeSink for IndentWriter<'_, W> {
    fn push(&mut self, key: &str) -> Result {
        for _ in 0..self.indent_level {
            self.writer.write_str(&self.indent_str)?;
        }
        writeln!(self.writer, "{}", key)?;
        self.indent_level += 1;
        Ok(())
    }

    fn pop(&mut self, _key: &str) -> Result {
        self.indent_level = self.indent_level.saturating_sub(1);
        Ok(())
    }
}

/// Writes the full path of every node, one per line.
///
/// Keys are joined with `.`, except that `[..]` index and key steps attach
/// directly to their parent.
pub struct PathWriter<'a, W: Write> {
    writer: &'a mut W,
    /// Length of `current` before each open key was appended
    marks: Vec<usize>,
    current: String,
}

impl<'a, W: Write> PathWriter<'a, W> {
    /// Creates a new path writer
    pub fn new(writer: &'a mut W) -> Self {
        Self {
            writer,
            marks: Vec::new(),
            current: String::new(),
        }
    }
}

impl<W: Write> TreeSink for PathWriter<'_, W> {
    fn push(&mut self, key: &str) -> Result {
        self.marks.push(self.current.len());
        if !self.current.is_empty() && !key.starts_with('[') {
            self.current.push('.');
        }
        self.current.push_str(key);
        writeln!(self.writer, "{}", self.current)
    }

    fn pop(&mut self, _key: &str) -> Result {
        if let Some(mark) = self.marks.pop() {
            self.current.truncate(mark);
        }
        Ok(())
    }
}

/// Collects statistics about a rendered trie
#[derive(Debug, Default)]
pub struct StatsSink {
    /// Number of nodes
    pub nodes: usize,
    /// Number of nodes without children
    pub leaves: usize,
    /// Length of the longest path
    pub max_depth: usize,
    depth: usize,
    last_was_push: bool,
}

impl TreeSink for StatsSink {
    fn push(&mut self, _key: &str) -> Result {
        self.nodes += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.last_was_push = true;
        Ok(())
    }

    fn pop(&mut self, _key: &str) -> Result {
        if self.last_was_push {
            self.leaves += 1;
        }
        self.depth = self.depth.saturating_sub(1);
        self.last_was_push = false;
        Ok(())
    }
}

impl fmt::Display for StatsSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result {
        write!(
            f,
            "{} paths, {} leaves, depth {}",
            self.nodes, self.leaves, self.max_depth
        )
    }
}
