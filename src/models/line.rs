use serde::{Deserialize, Serialize};

/// Catalog entry for one line: identity, display attributes, and the
/// topology configuration the position mapper depends on.
///
/// `inverted_direction` marks a loop whose running directions are
/// physically laid out opposite to every other line's convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineInfo {
    pub id: String,
    pub name: String,
    pub color: String,
    pub is_circular: bool,
    pub inverted_direction: bool,
}

impl LineInfo {
    #[must_use]
    pub fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            is_circular: false,
            inverted_direction: false,
        }
    }

    #[must_use]
    pub fn circular(mut self, inverted_direction: bool) -> Self {
        self.is_circular = true;
        self.inverted_direction = inverted_direction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_line_defaults() {
        let line = LineInfo::new("red", "Red Line", "#D93A2B");
        assert!(!line.is_circular);
        assert!(!line.inverted_direction);
    }

    #[test]
    fn test_circular_builder() {
        let line = LineInfo::new("loop", "Loop Line", "#1E9E54").circular(true);
        assert!(line.is_circular);
        assert!(line.inverted_direction);
    }
}
