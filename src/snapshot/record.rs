use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Semantic category inferred from a snapshot line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Button,
    Input,
    Link,
    Heading,
    Text,
    Unknown,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Button => "button",
            Role::Input => "input",
            Role::Link => "link",
            Role::Heading => "heading",
            Role::Text => "text",
            Role::Unknown => "unknown",
        }
    }
}

/// Screen coordinate in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        // Widen before subtracting: coordinates span the full i32 range
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

/// One parsed entry of a snapshot.
///
/// Records are rebuilt on every snapshot and never mutated afterwards.
/// `raw_line` is kept for diagnostics; matching reads the structured fields,
/// except for quoted-text containment which also looks at the raw line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    pub identifier: Option<String>,
    pub role: Role,
    /// Role word exactly as the transport wrote it (`menuitem`, `EditText`, ...).
    pub role_name: String,
    pub text: String,
    pub attributes: BTreeMap<String, String>,
    pub position: Option<Position>,
    pub raw_line: String,
}

impl ElementRecord {
    /// A record for a line no format understood.
    pub fn unknown(raw_line: &str) -> Self {
        Self {
            identifier: None,
            role: Role::Unknown,
            role_name: String::new(),
            text: String::new(),
            attributes: BTreeMap::new(),
            position: None,
            raw_line: raw_line.to_string(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Heading level, when the line carried one (`level="1"` is an h1).
    pub fn heading_level(&self) -> Option<u8> {
        if self.role != Role::Heading {
            return None;
        }
        self.attribute("level").and_then(|l| l.trim().parse().ok())
    }
}
