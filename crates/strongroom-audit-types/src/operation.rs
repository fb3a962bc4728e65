//! Audited operation types.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The kind of change an audited operation performs.
///
/// The set is open: anything that is not one of the well-known kinds is
/// carried verbatim in [`OperationType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum OperationType {
    /// Entity was created.
    Save,
    /// Entity was changed.
    Update,
    /// Entity was removed.
    Delete,
    /// Any other operation kind.
    Other(String),
}

impl OperationType {
    /// Textual form stored with each record.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Save => "save",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for OperationType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "save" => Self::Save,
            "update" => Self::Update,
            "delete" => Self::Delete,
            _ => Self::Other(value),
        }
    }
}

impl FromStr for OperationType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl From<&str> for OperationType {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<OperationType> for String {
    fn from(value: OperationType) -> Self {
        match value {
            OperationType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}
