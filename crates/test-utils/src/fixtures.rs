//! Sample OpenAPI documents shared by tests.

use oaslint_index::DocumentIndex;

/// A complete document that passes the recommended ruleset.
pub const PETSTORE: &str = r"openapi: 3.1.0
info:
  title: Petstore
  version: 1.0.0
  description: A sample pet store.
  contact:
    name: Store team
    url: https://example.com/contact
  license:
    name: MIT
    url: https://opensource.org/licenses/MIT
servers:
  - url: https://api.example.com/v1
tags:
  - name: pets
  - name: stores
paths:
  /pets:
    get:
      summary: List pets
      responses:
        '200':
          description: A list of pets.
          content:
            application/json:
              examples:
                cat:
                  value:
                    name: Tom
";

/// A document that breaks most recommended rules.
pub const BROKEN_PETSTORE: &str = r"openapi: 3.1.0
info:
  title: Terrible API
  description: calls eval('alert(1)') and <script>alert('x')</script>
  contact:
    name: nobody
servers:
  - description: missing url
  - url: ''
tags:
  - name: zebra
  - name: chicken
paths:
  /pets:
    get:
      servers:
        - url: 'http://[::1'
      responses:
        '200':
          description: A list of pets.
          content:
            application/json:
              examples:
                both:
                  value: 1
                  externalValue: https://example.com/pet.json
                neither:
                  summary: nothing here
";

/// A document without a `servers` section.
pub const NO_SERVERS: &str = r"openapi: 3.1.0
info:
  title: Serverless
  version: 1.0.0
";

/// Parse a fixture, panicking on malformed input.
#[must_use]
pub fn index(source: &str) -> DocumentIndex {
    DocumentIndex::parse(source.as_bytes())
        .unwrap_or_else(|err| panic!("fixture failed to parse: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_parse() {
        for source in [PETSTORE, BROKEN_PETSTORE, NO_SERVERS] {
            assert!(index(source).root_node().is_mapping());
        }
    }

    #[test]
    fn test_fixture_servers() {
        assert_eq!(index(PETSTORE).all_root_servers().len(), 1);
        assert!(index(NO_SERVERS).root_servers_node().is_none());
        assert_eq!(index(BROKEN_PETSTORE).operation_servers().len(), 1);
    }
}
