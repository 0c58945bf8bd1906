//! Resolution of rule target paths (`given`) against a document.
//!
//! Only the subset of JSONPath that rules need is supported:
//!
//! ```text
//! $                 the document root
//! .name  ['name']   child property
//! .*  [*]           every child value (mapping) or element (sequence)
//! [3]               sequence element
//! ..name  ..*       recursive descent
//! ```

pub use oaslint_index::child_path;

use oaslint_index::{DocumentIndex, Node, NodeRef};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// A malformed path expression. Always a ruleset authoring error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path '{path}' must start with '$'")]
    MissingRoot { path: String },

    #[error("path '{path}': expected a property name at offset {offset}")]
    EmptyName { path: String, offset: usize },

    #[error("path '{path}': unterminated '[' at offset {offset}")]
    UnterminatedBracket { path: String, offset: usize },

    #[error("path '{path}': unterminated quote at offset {offset}")]
    UnterminatedQuote { path: String, offset: usize },

    #[error("path '{path}': invalid index '{index}' at offset {offset}")]
    InvalidIndex {
        path: String,
        index: String,
        offset: usize,
    },

    #[error("path '{path}': unexpected character '{found}' at offset {offset}")]
    UnexpectedChar {
        path: String,
        found: char,
        offset: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Child(String),
    Wildcard,
    Index(usize),
    Descendant(String),
    DescendantWildcard,
}

/// A node matched by a path, together with the concrete path that reached it.
#[derive(Debug, Clone)]
pub struct ResolvedNode {
    pub node: NodeRef,
    /// Concrete path, e.g. `$.servers[0]` for the template `$.servers[*]`
    pub path: String,
}

impl ResolvedNode {
    /// The document root, at path `$`.
    #[must_use]
    pub fn root(node: &NodeRef) -> Self {
        Self {
            node: Arc::clone(node),
            path: "$".to_string(),
        }
    }

    /// A property of this node.
    #[must_use]
    pub fn child(&self, key: &str, node: &NodeRef) -> Self {
        Self {
            node: Arc::clone(node),
            path: child_path(&self.path, key),
        }
    }

    /// An element of this sequence node.
    #[must_use]
    pub fn element(&self, index: usize, node: &NodeRef) -> Self {
        Self {
            node: Arc::clone(node),
            path: format!("{}[{index}]", self.path),
        }
    }

    /// Direct children in document order, with their paths.
    fn children(&self) -> Vec<Self> {
        if self.node.is_mapping() {
            self.node
                .entries()
                .map(|(key, value)| self.child(&key.value, value))
                .collect()
        } else {
            self.node
                .content
                .iter()
                .enumerate()
                .map(|(i, element)| self.element(i, element))
                .collect()
        }
    }
}

/// A compiled path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    source: String,
    segments: Vec<Segment>,
}

impl JsonPath {
    /// Compile a path expression.
    pub fn parse(expression: &str) -> Result<Self, PathError> {
        let source = expression.trim();
        let segments = PathParser { source, pos: 0 }.parse()?;
        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    /// The expression this path was compiled from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Resolve against the root of a document.
    #[must_use]
    pub fn resolve(&self, index: &DocumentIndex) -> Vec<ResolvedNode> {
        self.resolve_from(index.root_node())
    }

    /// Resolve against an arbitrary node, treated as `$`.
    #[must_use]
    pub fn resolve_from(&self, root: &NodeRef) -> Vec<ResolvedNode> {
        let mut current = vec![ResolvedNode::root(root)];
        for segment in &self.segments {
            let mut next = Vec::new();
            for matched in &current {
                apply_segment(segment, matched, &mut next);
            }
            tracing::trace!(path = %self.source, ?segment, matches = next.len(), "Resolved segment");
            current = next;
            if current.is_empty() {
                break;
            }
        }
        current
    }
}

impl std::fmt::Display for JsonPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Convenience wrapper: compile `expression` and resolve it against `index`.
pub fn resolve(index: &DocumentIndex, expression: &str) -> Result<Vec<ResolvedNode>, PathError> {
    Ok(JsonPath::parse(expression)?.resolve(index))
}

fn apply_segment(segment: &Segment, matched: &ResolvedNode, out: &mut Vec<ResolvedNode>) {
    match segment {
        Segment::Child(name) => {
            if let Some(value) = matched.node.get(name) {
                out.push(matched.child(name, value));
            }
        }
        Segment::Wildcard => out.extend(matched.children()),
        Segment::Index(index) => {
            if matched.node.is_sequence() {
                if let Some(element) = matched.node.content.get(*index) {
                    out.push(matched.element(*index, element));
                }
            }
        }
        Segment::Descendant(name) => {
            let mut visited = HashSet::new();
            descend(matched, &mut visited, &mut |node: &ResolvedNode| {
                if let Some(value) = node.node.get(name) {
                    out.push(node.child(name, value));
                }
            });
        }
        Segment::DescendantWildcard => {
            let mut visited = HashSet::new();
            descend(matched, &mut visited, &mut |node: &ResolvedNode| {
                out.extend(node.children());
            });
        }
    }
}

/// Pre-order walk over `start` and its descendants, visiting each node once.
fn descend(
    start: &ResolvedNode,
    visited: &mut HashSet<*const Node>,
    visit: &mut dyn FnMut(&ResolvedNode),
) {
    if !visited.insert(Arc::as_ptr(&start.node)) {
        return;
    }
    visit(start);
    for child in start.children() {
        descend(&child, visited, visit);
    }
}

struct PathParser<'a> {
    source: &'a str,
    pos: usize,
}

impl PathParser<'_> {
    fn parse(mut self) -> Result<Vec<Segment>, PathError> {
        if !self.source.starts_with('$') {
            return Err(PathError::MissingRoot {
                path: self.source.to_string(),
            });
        }
        self.pos = 1;

        let mut segments = Vec::new();
        while let Some(c) = self.peek() {
            match c {
                '.' => {
                    self.pos += 1;
                    let recursive = self.eat('.');
                    let segment = if self.eat('*') {
                        if recursive {
                            Segment::DescendantWildcard
                        } else {
                            Segment::Wildcard
                        }
                    } else {
                        let name = self.name()?;
                        if recursive {
                            Segment::Descendant(name)
                        } else {
                            Segment::Child(name)
                        }
                    };
                    segments.push(segment);
                }
                '[' => segments.push(self.bracket()?),
                found => {
                    return Err(PathError::UnexpectedChar {
                        path: self.source.to_string(),
                        found,
                        offset: self.pos,
                    })
                }
            }
        }
        Ok(segments)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn name(&mut self) -> Result<String, PathError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if matches!(c, '.' | '[' | ']' | '\'' | '"') || c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
        if self.pos == start {
            return Err(PathError::EmptyName {
                path: self.source.to_string(),
                offset: start,
            });
        }
        Ok(self.source[start..self.pos].to_string())
    }

    fn bracket(&mut self) -> Result<Segment, PathError> {
        let open = self.pos;
        self.pos += 1;

        if let Some(quote @ ('\'' | '"')) = self.peek() {
            self.pos += 1;
            let Some(len) = self.source[self.pos..].find(quote) else {
                return Err(PathError::UnterminatedQuote {
                    path: self.source.to_string(),
                    offset: open,
                });
            };
            let name = self.source[self.pos..self.pos + len].to_string();
            self.pos += len + 1;
            if !self.eat(']') {
                return Err(PathError::UnterminatedBracket {
                    path: self.source.to_string(),
                    offset: open,
                });
            }
            if name.is_empty() {
                return Err(PathError::EmptyName {
                    path: self.source.to_string(),
                    offset: open + 1,
                });
            }
            return Ok(Segment::Child(name));
        }

        let Some(len) = self.source[self.pos..].find(']') else {
            return Err(PathError::UnterminatedBracket {
                path: self.source.to_string(),
                offset: open,
            });
        };
        let inner = self.source[self.pos..self.pos + len].trim();
        self.pos += len + 1;

        if inner == "*" {
            return Ok(Segment::Wildcard);
        }
        inner
            .parse::<usize>()
            .map(Segment::Index)
            .map_err(|_| PathError::InvalidIndex {
                path: self.source.to_string(),
                index: inner.to_string(),
                offset: open + 1,
            })
    }
}
