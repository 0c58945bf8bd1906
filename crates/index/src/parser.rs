//! Event-driven tree building on top of `yaml-rust2`.

use crate::error::ParseError;
use crate::node::{Node, NodeKind, NodeRef};
use std::collections::HashMap;
use std::sync::Arc;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::Marker;

/// Parse the first document of `source` into a positioned tree.
///
/// Returns `None` when the stream holds no document at all.
pub(crate) fn parse_tree(source: &str) -> Result<Option<NodeRef>, ParseError> {
    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new_from_str(source);
    parser
        .load(&mut builder, false)
        .map_err(|err| ParseError::Syntax {
            line: to_line(err.marker()),
            column: to_column(err.marker()),
            message: err.info().to_string(),
        })?;

    if let Some(error) = builder.error {
        return Err(error);
    }
    Ok(builder.root)
}

fn to_line(mark: &Marker) -> u32 {
    u32::try_from(mark.line()).unwrap_or(u32::MAX).max(1)
}

fn to_column(mark: &Marker) -> u32 {
    u32::try_from(mark.col() + 1).unwrap_or(u32::MAX)
}

/// A collection that has started but not yet ended.
struct OpenNode {
    node: Node,
    anchor: usize,
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<OpenNode>,
    anchors: HashMap<usize, NodeRef>,
    root: Option<NodeRef>,
    error: Option<ParseError>,
}

impl TreeBuilder {
    fn open(&mut self, kind: NodeKind, anchor: usize, mark: Marker) {
        let (line, column) = (to_line(&mark), to_column(&mark));
        let node = match kind {
            NodeKind::Mapping => Node::mapping(line, column, Vec::new()),
            NodeKind::Sequence => Node::sequence(line, column, Vec::new()),
            NodeKind::Scalar => Node::scalar(String::new(), line, column),
        };
        self.stack.push(OpenNode { node, anchor });
    }

    fn close(&mut self) {
        if let Some(open) = self.stack.pop() {
            let node = Arc::new(open.node);
            self.finish(node, open.anchor);
        }
    }

    /// Attach a completed node to its parent, or make it the root.
    fn finish(&mut self, node: NodeRef, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, Arc::clone(&node));
        }
        match self.stack.last_mut() {
            Some(parent) => parent.node.content.push(node),
            None => {
                if self.root.is_none() {
                    self.root = Some(node);
                }
            }
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        match event {
            Event::Scalar(value, _, anchor, _) => {
                let node = Arc::new(Node::scalar(value, to_line(&mark), to_column(&mark)));
                self.finish(node, anchor);
            }
            Event::SequenceStart(anchor, ..) => self.open(NodeKind::Sequence, anchor, mark),
            Event::MappingStart(anchor, ..) => self.open(NodeKind::Mapping, anchor, mark),
            Event::SequenceEnd | Event::MappingEnd => self.close(),
            Event::Alias(id) => match self.anchors.get(&id).cloned() {
                Some(node) => self.finish(node, 0),
                None => {
                    self.error = Some(ParseError::UnknownAlias {
                        line: to_line(&mark),
                        column: to_column(&mark),
                    });
                }
            },
            _ => {}
        }
    }
}
