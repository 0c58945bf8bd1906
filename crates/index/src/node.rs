use oaslint_types::Position;
use std::sync::Arc;

/// Shared, immutable handle to a node in the parse tree.
pub type NodeRef = Arc<Node>;

/// Structural kind of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

/// A node of the parsed document.
///
/// Mapping content alternates key and value nodes: `[k0, v0, k1, v1, ...]`.
/// Sequence content holds the elements in order. Scalars carry their text
/// in `value` and have no content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub value: String,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
    pub content: Vec<NodeRef>,
}

impl Node {
    /// Create a scalar node.
    #[must_use]
    pub fn scalar(value: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            kind: NodeKind::Scalar,
            value: value.into(),
            line,
            column,
            content: Vec::new(),
        }
    }

    /// Create a mapping node from alternating key/value content.
    #[must_use]
    pub fn mapping(line: u32, column: u32, content: Vec<NodeRef>) -> Self {
        Self {
            kind: NodeKind::Mapping,
            value: String::new(),
            line,
            column,
            content,
        }
    }

    /// Create a sequence node.
    #[must_use]
    pub fn sequence(line: u32, column: u32, content: Vec<NodeRef>) -> Self {
        Self {
            kind: NodeKind::Sequence,
            value: String::new(),
            line,
            column,
            content,
        }
    }

    #[must_use]
    pub fn is_mapping(&self) -> bool {
        self.kind == NodeKind::Mapping
    }

    #[must_use]
    pub fn is_sequence(&self) -> bool {
        self.kind == NodeKind::Sequence
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.kind == NodeKind::Scalar
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Key/value pairs of a mapping. Empty for other kinds.
    pub fn entries(&self) -> impl Iterator<Item = (&NodeRef, &NodeRef)> {
        let pairs: &[NodeRef] = if self.is_mapping() { &self.content } else { &[] };
        pairs.chunks_exact(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Value stored under `key`, if this is a mapping that has it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&NodeRef> {
        self.entries()
            .find(|(k, _)| k.value == key)
            .map(|(_, value)| value)
    }

    /// The deepest, last descendant of this node; the node itself for leaves.
    ///
    /// Used as the end anchor of a finding that spans a whole section.
    #[must_use]
    pub fn last_child(self: &NodeRef) -> NodeRef {
        let mut current = Arc::clone(self);
        while let Some(last) = current.content.last() {
            let next = Arc::clone(last);
            current = next;
        }
        current
    }

    /// Whether the scalar reads as an explicit null (`~`, `null`, or empty).
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.is_scalar() && matches!(self.value.as_str(), "" | "~" | "null" | "Null" | "NULL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NodeRef {
        Arc::new(Node::mapping(
            1,
            1,
            vec![
                Arc::new(Node::scalar("name", 1, 1)),
                Arc::new(Node::scalar("pets", 1, 7)),
                Arc::new(Node::scalar("tags", 2, 1)),
                Arc::new(Node::sequence(
                    3,
                    3,
                    vec![
                        Arc::new(Node::scalar("a", 3, 5)),
                        Arc::new(Node::scalar("b", 4, 5)),
                    ],
                )),
            ],
        ))
    }

    #[test]
    fn test_entries_pairs_keys_and_values() {
        let node = sample();
        let keys: Vec<&str> = node.entries().map(|(k, _)| k.value.as_str()).collect();
        assert_eq!(keys, vec!["name", "tags"]);
    }

    #[test]
    fn test_get() {
        let node = sample();
        assert_eq!(node.get("name").unwrap().value, "pets");
        assert!(node.get("tags").unwrap().is_sequence());
        assert!(node.get("missing").is_none());
    }

    #[test]
    fn test_entries_empty_for_sequences() {
        let node = sample();
        let tags = node.get("tags").unwrap();
        assert_eq!(tags.entries().count(), 0);
    }

    #[test]
    fn test_last_child_descends() {
        let node = sample();
        let last = node.last_child();
        assert_eq!(last.value, "b");
        assert_eq!(last.position(), Position::new(4, 5));
    }

    #[test]
    fn test_last_child_of_leaf_is_itself() {
        let leaf = Arc::new(Node::scalar("x", 9, 2));
        assert!(Arc::ptr_eq(&leaf.last_child(), &leaf));
    }

    #[test]
    fn test_is_null() {
        assert!(Node::scalar("~", 1, 1).is_null());
        assert!(Node::scalar("", 1, 1).is_null());
        assert!(!Node::scalar("0", 1, 1).is_null());
        assert!(!Node::mapping(1, 1, vec![]).is_null());
    }
}
