use super::span;
use crate::path::ResolvedNode;
use crate::results::RuleFunctionResult;
use crate::schema::RuleFunctionSchema;
use crate::traits::{RuleFunction, RuleFunctionContext};
use oaslint_index::{find_key_node, NodeRef};
use url::Url;

/// The document must declare servers, and every server needs a usable URL.
///
/// Works from the document index alone; the resolved nodes are ignored.
/// Root servers are checked for presence and emptiness. Every server entry,
/// at the root or overriding it on a path item or operation, needs a `url`
/// that parses and names a host or a path. Server variables (`{region}`)
/// are substituted with their defaults before parsing.
pub struct ApiServersFunctionImpl;

#[derive(Debug, PartialEq, Eq)]
enum UrlProblem {
    Unparseable(String),
    Unusable,
}

impl RuleFunction for ApiServersFunctionImpl {
    fn schema(&self) -> RuleFunctionSchema {
        RuleFunctionSchema::named("api_servers")
    }

    fn run_rule(
        &self,
        _nodes: &[ResolvedNode],
        context: &RuleFunctionContext<'_>,
    ) -> Vec<RuleFunctionResult> {
        let index = context.index;
        let mut results = Vec::new();

        match index.root_servers_node() {
            None => {
                let (start, end) = span(index.root_node());
                results.push(context.result(
                    "No servers defined for the specification",
                    &start,
                    &end,
                    "$.servers",
                ));
            }
            Some(servers) if index.all_root_servers().is_empty() => {
                results.push(context.result(
                    "Servers definition is empty, contains no servers!",
                    servers,
                    servers,
                    "$.servers",
                ));
            }
            Some(_) => {}
        }

        check_entries(index.all_root_servers(), "$.servers", context, &mut results);
        for declared in index.operation_servers() {
            check_entries(&declared.servers, &declared.path, context, &mut results);
        }
        results
    }
}

fn check_entries(
    servers: &[NodeRef],
    base_path: &str,
    context: &RuleFunctionContext<'_>,
    results: &mut Vec<RuleFunctionResult>,
) {
    for (i, server) in servers.iter().enumerate() {
        let entry_path = format!("{base_path}[{i}]");
        let Some((url_key, url_value)) = find_key_node("url", &server.content) else {
            let (start, end) = span(server);
            results.push(context.result(
                "Server definition is missing a URL",
                &start,
                &end,
                entry_path,
            ));
            continue;
        };

        let message = match inspect_url(&expand_variables(&url_value.value, server)) {
            None => continue,
            Some(UrlProblem::Unparseable(err)) => format!("Server URL cannot be parsed: {err}"),
            Some(UrlProblem::Unusable) => {
                "Server URL is not valid: no hostname or path provided".to_string()
            }
        };
        results.push(context.result(message, &url_key, &url_value, format!("{entry_path}.url")));
    }
}

/// Substitute `{name}` placeholders with the default of the matching server
/// variable, or with the bare name when no default is declared.
fn expand_variables(raw: &str, server: &NodeRef) -> String {
    if !raw.contains('{') {
        return raw.to_string();
    }
    let variables = server.get("variables");
    let mut expanded = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}').map(|offset| open + offset) else {
            break;
        };
        let name = &rest[open + 1..close];
        let value = variables
            .and_then(|vars| vars.get(name))
            .and_then(|var| var.get("default"))
            .map_or(name, |default| default.value.as_str());
        expanded.push_str(&rest[..open]);
        expanded.push_str(value);
        rest = &rest[close + 1..];
    }
    expanded.push_str(rest);
    expanded
}

fn inspect_url(raw: &str) -> Option<UrlProblem> {
    match Url::parse(raw) {
        Ok(url) => {
            // `localhost:8080` parses as scheme `localhost` with an opaque `8080`
            let no_host = url.host_str().map_or(true, str::is_empty);
            let no_path = url.cannot_be_a_base() || url.path().is_empty();
            (no_host && no_path).then_some(UrlProblem::Unusable)
        }
        Err(url::ParseError::EmptyHost) => Some(UrlProblem::Unusable),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = raw.split(['?', '#']).next().unwrap_or_default();
            path.trim().is_empty().then_some(UrlProblem::Unusable)
        }
        Err(err) => Some(UrlProblem::Unparseable(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::test_support::{messages, paths, run};
    use crate::rule::RuleAction;
    use std::sync::Arc;

    fn check(source: &str) -> Vec<RuleFunctionResult> {
        run(
            &ApiServersFunctionImpl,
            source,
            "$",
            RuleAction::function("api_servers"),
        )
    }

    #[test]
    fn test_valid_servers() {
        let results = check(
            "servers:\n  - url: https://api.example.com/v1\n  - url: /relative\n  - url: https://{region}.example.com\n    variables:\n      region:\n        default: eu\n",
        );
        assert!(results.is_empty());
    }

    #[test]
    fn test_no_servers() {
        let results = check("openapi: 3.1.0\ninfo:\n  title: Pets\n");
        assert_eq!(
            messages(&results),
            vec!["No servers defined for the specification"]
        );
        assert_eq!(paths(&results), vec!["$.servers"]);
        assert_eq!(results[0].end_node.value, "Pets");
    }

    #[test]
    fn test_empty_servers() {
        let results = check("servers: []\n");
        assert_eq!(
            messages(&results),
            vec!["Servers definition is empty, contains no servers!"]
        );
        assert_eq!(paths(&results), vec!["$.servers"]);
    }

    #[test]
    fn test_missing_url() {
        let results = check("servers:\n  - url: https://api.example.com\n  - description: no url\n");
        assert_eq!(messages(&results), vec!["Server definition is missing a URL"]);
        assert_eq!(paths(&results), vec!["$.servers[1]"]);
    }

    #[test]
    fn test_unparseable_url() {
        let results = check("servers:\n  - url: 'http://[::1'\n");
        assert_eq!(paths(&results), vec!["$.servers[0].url"]);
        assert!(results[0]
            .message
            .starts_with("Server URL cannot be parsed: "));
        assert_eq!(results[0].start_node.value, "url");
        assert_eq!(results[0].end_node.value, "http://[::1");
    }

    #[test]
    fn test_url_without_host_or_path() {
        let results = check(
            "servers:\n  - url: ''\n  - url: '?query=1'\n  - url: 'localhost:8080'\n  - url: 'api.example.com:443'\n  - url: 'https://'\n",
        );
        assert_eq!(
            messages(&results),
            vec!["Server URL is not valid: no hostname or path provided"; 5]
        );
        assert_eq!(
            paths(&results),
            vec![
                "$.servers[0].url",
                "$.servers[1].url",
                "$.servers[2].url",
                "$.servers[3].url",
                "$.servers[4].url",
            ]
        );
    }

    #[test]
    fn test_findings_are_independent() {
        let results = check(
            "servers:\n  - description: first\n  - url: ''\n  - url: https://ok.example.com\n",
        );
        assert_eq!(paths(&results), vec!["$.servers[0]", "$.servers[1].url"]);
    }

    #[test]
    fn test_operation_servers() {
        let results = check(
            "servers:\n  - url: https://api.example.com\npaths:\n  /pets:\n    servers:\n      - description: none\n    get:\n      servers: []\n    post:\n      servers:\n        - url: ''\n",
        );
        assert_eq!(
            paths(&results),
            vec!["$.paths['/pets'].servers[0]", "$.paths['/pets'].post.servers[0].url"]
        );
    }

    #[test]
    fn test_ignores_resolved_nodes() {
        let results = run(
            &ApiServersFunctionImpl,
            "servers: []\n",
            "$.nothing.here",
            RuleAction::function("api_servers"),
        );
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_expand_variables() {
        let server = Arc::new(oaslint_index::Node::mapping(1, 1, Vec::new()));
        assert_eq!(
            expand_variables("https://{region}.example.com/{v}", &server),
            "https://region.example.com/v"
        );
        assert_eq!(expand_variables("https://{open", &server), "https://{open");
    }

    #[test]
    fn test_inspect_url() {
        assert_eq!(inspect_url("https://example.com"), None);
        assert_eq!(inspect_url("/v1"), None);
        assert_eq!(inspect_url("v1?x=1"), None);
        assert_eq!(inspect_url(""), Some(UrlProblem::Unusable));
        assert_eq!(inspect_url("localhost:8080"), Some(UrlProblem::Unusable));
        assert_eq!(inspect_url("api.example.com:443"), Some(UrlProblem::Unusable));
        assert_eq!(inspect_url("https://"), Some(UrlProblem::Unusable));
        assert_eq!(inspect_url("http://localhost:8080"), None);
        assert!(matches!(
            inspect_url("https://exa mple.com"),
            Some(UrlProblem::Unparseable(_))
        ));
    }
}
