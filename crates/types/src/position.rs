//! Position and range types for source locations.

use serde::{Deserialize, Serialize};

/// Position in a source document (1-indexed).
///
/// Unlike editor coordinates, both `line` and `column` start at 1, matching
/// the line/column annotations of the parsed document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column within the line (1-indexed)
    pub column: u32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Create a position, raising zero coordinates to 1.
    ///
    /// Synthetic nodes may carry a zero line or column; serialized ranges
    /// never do.
    #[must_use]
    pub const fn clamped(line: u32, column: u32) -> Self {
        Self {
            line: if line == 0 { 1 } else { line },
            column: if column == 0 { 1 } else { column },
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            ord => ord,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Range in a source document, from `start` to `end` (both inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Range {
    /// Start position
    pub start: Position,
    /// End position
    pub end: Position,
}

impl Range {
    /// Create a new range.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Returns `true` if start and end are the same position.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.line == self.end.line && self.start.column == self.end.column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::new(10, 5);
        assert_eq!(pos.line, 10);
        assert_eq!(pos.column, 5);
    }

    #[test]
    fn test_position_clamped() {
        assert_eq!(Position::clamped(0, 0), Position::new(1, 1));
        assert_eq!(Position::clamped(8_989_899, 0), Position::new(8_989_899, 1));
        assert_eq!(Position::clamped(3, 7), Position::new(3, 7));
    }

    #[test]
    fn test_position_ordering() {
        let p1 = Position::new(1, 5);
        let p2 = Position::new(1, 10);
        let p3 = Position::new(2, 1);

        assert!(p1 < p2);
        assert!(p2 < p3);
        assert!(p1 < p3);
        assert_eq!(p1.cmp(&p1), std::cmp::Ordering::Equal);
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 14).to_string(), "3:14");
    }

    #[test]
    fn test_range_is_empty() {
        let pos = Position::new(5, 10);
        assert!(Range::new(pos, pos).is_empty());
        assert!(!Range::new(pos, Position::new(5, 11)).is_empty());
    }

    #[test]
    fn test_range_serialization_shape() {
        let range = Range::new(Position::new(1, 2), Position::new(3, 4));
        let json = serde_json::to_value(range).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "start": { "line": 1, "column": 2 },
                "end": { "line": 3, "column": 4 }
            })
        );
    }
}
