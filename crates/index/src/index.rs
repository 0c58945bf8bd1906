use crate::error::ParseError;
use crate::node::{Node, NodeRef};
use crate::parser::parse_tree;
use std::sync::Arc;

/// HTTP methods that introduce an operation under a path item.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// A `servers` list declared below the document root.
#[derive(Debug, Clone)]
pub struct OperationServers {
    /// Concrete path of the `servers` value, e.g. `$.paths['/pets'].get.servers`
    pub path: String,
    /// The `servers` value node
    pub node: NodeRef,
    /// Entries of the list (empty when `node` is not a sequence)
    pub servers: Vec<NodeRef>,
}

/// Immutable, position-annotated view of one parsed document.
///
/// Built once per lint run and shared read-only by every rule.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    root: NodeRef,
    root_servers_node: Option<NodeRef>,
    root_servers: Vec<NodeRef>,
    operation_servers: Vec<OperationServers>,
}

impl DocumentIndex {
    /// Parse raw document bytes and build the index.
    ///
    /// An empty document indexes as an empty mapping at line 1, column 1.
    #[tracing::instrument(skip(bytes), fields(size = bytes.len()))]
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let source =
            std::str::from_utf8(bytes).map_err(|err| ParseError::InvalidUtf8(err.to_string()))?;
        let root = parse_tree(source)?.unwrap_or_else(|| Arc::new(Node::mapping(1, 1, Vec::new())));
        let index = Self::from_root(root);
        tracing::debug!(
            root_servers = index.root_servers.len(),
            operation_servers = index.operation_servers.len(),
            "Document indexed"
        );
        Ok(index)
    }

    /// Build an index over an already constructed tree.
    #[must_use]
    pub fn from_root(root: NodeRef) -> Self {
        let root_servers_node = root.get("servers").cloned();
        let root_servers = root_servers_node
            .as_ref()
            .filter(|node| node.is_sequence())
            .map(|node| node.content.clone())
            .unwrap_or_default();
        let operation_servers = collect_operation_servers(&root);

        Self {
            root,
            root_servers_node,
            root_servers,
            operation_servers,
        }
    }

    /// The top-level node of the document.
    #[must_use]
    pub fn root_node(&self) -> &NodeRef {
        &self.root
    }

    /// The value of the root `servers` key, if the key is present.
    #[must_use]
    pub fn root_servers_node(&self) -> Option<&NodeRef> {
        self.root_servers_node.as_ref()
    }

    /// Entries of the root `servers` list; empty if absent or not a list.
    #[must_use]
    pub fn all_root_servers(&self) -> &[NodeRef] {
        &self.root_servers
    }

    /// Every `servers` list declared on a path item or an operation.
    #[must_use]
    pub fn operation_servers(&self) -> &[OperationServers] {
        &self.operation_servers
    }

    /// Deepest last descendant of `node`.
    #[must_use]
    pub fn find_last_child_node(node: &NodeRef) -> NodeRef {
        node.last_child()
    }
}

/// Find `key` in alternating mapping content, returning the key and value nodes.
///
/// The search is shallow: only the direct entries of `content` are examined.
#[must_use]
pub fn find_key_node(key: &str, content: &[NodeRef]) -> Option<(NodeRef, NodeRef)> {
    content
        .chunks_exact(2)
        .find(|pair| pair[0].value == key)
        .map(|pair| (Arc::clone(&pair[0]), Arc::clone(&pair[1])))
}

/// Append a property to a concrete path, bracket-quoting keys that are not
/// plain identifiers.
#[must_use]
pub fn child_path(parent: &str, key: &str) -> String {
    let plain = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '$');
    if plain {
        format!("{parent}.{key}")
    } else {
        format!("{parent}['{}']", key.replace('\'', "\\'"))
    }
}

fn collect_operation_servers(root: &Node) -> Vec<OperationServers> {
    let mut found = Vec::new();
    let Some(paths) = root.get("paths") else {
        return found;
    };

    for (path_key, path_item) in paths.entries() {
        let item_path = child_path("$.paths", &path_key.value);
        if let Some(servers) = path_item.get("servers") {
            found.push(OperationServers::new(format!("{item_path}.servers"), servers));
        }
        for method in HTTP_METHODS {
            if let Some(servers) = path_item.get(method).and_then(|op| op.get("servers")) {
                found.push(OperationServers::new(
                    format!("{item_path}.{method}.servers"),
                    servers,
                ));
            }
        }
    }
    found
}

impl OperationServers {
    fn new(path: String, node: &NodeRef) -> Self {
        let servers = if node.is_sequence() {
            node.content.clone()
        } else {
            Vec::new()
        };
        Self {
            path,
            node: Arc::clone(node),
            servers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(source: &str) -> DocumentIndex {
        DocumentIndex::parse(source.as_bytes()).unwrap()
    }

    #[test]
    fn test_empty_document_has_mapping_root() {
        let index = index("");
        assert!(index.root_node().is_mapping());
        assert_eq!(index.root_node().line, 1);
        assert_eq!(index.root_node().column, 1);
        assert!(index.root_servers_node().is_none());
        assert!(index.all_root_servers().is_empty());
    }

    #[test]
    fn test_root_servers() {
        let index = index("servers:\n  - url: https://api.example.com\n  - description: none\n");
        assert!(index.root_servers_node().is_some());
        assert_eq!(index.all_root_servers().len(), 2);
    }

    #[test]
    fn test_empty_servers_list() {
        let index = index("servers: []\n");
        assert!(index.root_servers_node().is_some());
        assert!(index.all_root_servers().is_empty());
    }

    #[test]
    fn test_servers_not_a_list() {
        let index = index("servers: nope\n");
        assert!(index.root_servers_node().is_some());
        assert!(index.all_root_servers().is_empty());
    }

    #[test]
    fn test_operation_servers() {
        let index = index(
            "paths:\n  /pets:\n    servers:\n      - url: /a\n    get:\n      servers:\n        - url: /b\n        - url: /c\n    post:\n      summary: no servers\n",
        );
        let found = index.operation_servers();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].path, "$.paths['/pets'].servers");
        assert_eq!(found[0].servers.len(), 1);
        assert_eq!(found[1].path, "$.paths['/pets'].get.servers");
        assert_eq!(found[1].servers.len(), 2);
    }

    #[test]
    fn test_operation_server_paths_are_quoted() {
        let index = index(
            "paths:\n  it's:\n    servers:\n      - url: /a\n  plain:\n    get:\n      servers:\n        - url: /b\n",
        );
        let paths: Vec<&str> = index
            .operation_servers()
            .iter()
            .map(|found| found.path.as_str())
            .collect();
        assert_eq!(
            paths,
            vec!["$.paths['it\\'s'].servers", "$.paths.plain.get.servers"]
        );
    }

    #[test]
    fn test_find_key_node() {
        let index = index("servers:\n  - url: /v1\n    description: main\n");
        let server = &index.all_root_servers()[0];
        let (key, value) = find_key_node("url", &server.content).unwrap();
        assert_eq!(key.value, "url");
        assert_eq!(value.value, "/v1");
        assert!(find_key_node("variables", &server.content).is_none());
    }

    #[test]
    fn test_find_last_child_node() {
        let index = index("info:\n  title: Pets\n  version: 1.0.0\n");
        let last = DocumentIndex::find_last_child_node(index.root_node());
        assert_eq!(last.value, "1.0.0");
        assert_eq!(last.line, 3);
    }

    #[test]
    fn test_invalid_utf8() {
        let err = DocumentIndex::parse(&[0x66, 0x6f, 0xff]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidUtf8(_)));
    }
}
