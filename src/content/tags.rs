//! Tag values attached to content definitions.
use std::fmt;

use serde::Deserialize;

/// Identity-only tag. Two tags are the same tag iff their names match after
/// trimming and lowercasing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(from = "String")]
pub struct TagRef(String);

impl TagRef {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_ascii_lowercase())
    }

    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for TagRef {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for TagRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_normalise_case_and_whitespace() {
        assert_eq!(TagRef::new("  Settler "), TagRef::from("settler"));
        assert_eq!(TagRef::new("Tool").to_string(), "#tool");
        assert!(TagRef::new("   ").is_blank());
    }
}
