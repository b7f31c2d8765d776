//! Deduplicated prefix tree of observed paths.

use std::collections::HashMap;

/// A node of a [`UsageTrie`]
///
/// A node records only its name and its children; being in the tree is the
/// whole fact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageNode {
    name: String,
    children: HashMap<String, UsageNode>,
}

impl UsageNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: HashMap::new(),
        }
    }

    /// Returns the path element this node stands for (empty for the root)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the child with the given key
    pub fn child(&self, key: &str) -> Option<&UsageNode> {
        self.children.get(key)
    }

    /// Returns the children of this node in unspecified order
    pub fn children(&self) -> impl Iterator<Item = &UsageNode> {
        self.children.values()
    }

    /// Returns the child keys in ascending byte-wise order
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.children.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Returns true if the node has no children
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn count(&self) -> usize {
        self.children.values().map(|c| 1 + c.count()).sum()
    }

    fn merge(&mut self, other: &UsageNode) {
        for (key, theirs) in &other.children {
            self.children
                .entry(key.clone())
                .or_insert_with(|| UsageNode::new(key.as_str()))
                .merge(theirs);
        }
    }
}

/// Rooted tree of every path element sequence observed so far.
///
/// Insertion is additive and idempotent: inserting a path that is already
/// present leaves the tree unchanged. Nodes are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageTrie {
    root: UsageNode,
}

impl UsageTrie {
    /// Creates an empty trie
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensures a chain of nodes exists for `path`, creating missing ones.
    ///
    /// Returns the number of nodes created.
    pub fn insert<S: AsRef<str>>(&mut self, path: &[S]) -> usize {
        let mut node = &mut self.root;
        let mut created = 0;

        for element in path {
            let element = element.as_ref();
            node = node
                .children
                .entry(element.to_string())
                .or_insert_with(|| {
                    created += 1;
                    UsageNode::new(element)
                });
        }

        created
    }

    /// Returns true if `path` is in the trie
    pub fn contains<S: AsRef<str>>(&self, path: &[S]) -> bool {
        self.get(path).is_some()
    }

    /// Returns the node at `path`
    pub fn get<S: AsRef<str>>(&self, path: &[S]) -> Option<&UsageNode> {
        path.iter()
            .try_fold(&self.root, |node, element| node.child(element.as_ref()))
    }

    /// Returns the unnamed root node
    pub fn root(&self) -> &UsageNode {
        &self.root
    }

    /// Returns the number of nodes, not counting the root
    pub fn len(&self) -> usize {
        self.root.count()
    }

    /// Returns true if nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.root.is_leaf()
    }

    /// Adds every path of `other` to this trie
    pub fn merge(&mut self, other: &UsageTrie) {
        self.root.merge(&other.root);
    }

    /// Returns every path in the trie, in sorted depth-first order
    pub fn paths(&self) -> Vec<Vec<String>> {
        let mut paths = Vec::new();
        let mut current = Vec::new();
        collect_paths(&self.root, &mut current, &mut paths);
        paths
    }
}

fn collect_paths(node: &UsageNode, current: &mut Vec<String>, paths: &mut Vec<Vec<String>>) {
    for key in node.sorted_keys() {
        current.push(key.to_string());
        paths.push(current.clone());
        if let Some(child) = node.child(key) {
            collect_paths(child, current, paths);
        }
        current.pop();
    }
}
