use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of listing categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Lifestyle,
    Work,
    Mobile,
    Motor,
}

impl Tag {
    pub const ALL: [Tag; 4] = [Tag::Lifestyle, Tag::Work, Tag::Mobile, Tag::Motor];

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lifestyle" => Some(Self::Lifestyle),
            "work" => Some(Self::Work),
            "mobile" => Some(Self::Mobile),
            "motor" => Some(Self::Motor),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lifestyle => "lifestyle",
            Self::Work => "work",
            Self::Mobile => "mobile",
            Self::Motor => "motor",
        }
    }

    /// `"lifestyle, work, mobile, motor"`, for error messages.
    pub fn allowed() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
