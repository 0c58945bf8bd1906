//! Document index for oaslint.
//!
//! Parses a YAML or JSON document once into an immutable tree of
//! [`Node`]s annotated with 1-based line/column positions, and precomputes
//! the lookups rule functions need (root node, root servers, operation
//! servers). Nodes are shared behind [`NodeRef`] so a single index can be
//! read from many rule workers at once.

mod error;
mod index;
mod node;
mod parser;

pub use error::ParseError;
pub use index::{child_path, find_key_node, DocumentIndex, OperationServers, HTTP_METHODS};
pub use node::{Node, NodeKind, NodeRef};
