use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::snapshot::record::{ElementRecord, Position, Role};

// ============================================================================
// Line patterns
// ============================================================================

/// `Button 'Checkout' at (240, 880) [enabled=true, name="checkout"]`
static MOBILE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*([A-Za-z][\w.\-]*)\s+(?:'(.*)'|"(.*)")\s+at\s+\(\s*(-?\d+)(?:\.\d+)?\s*,\s*(-?\d+)(?:\.\d+)?\s*\)\s*(?:\[(.*)\])?\s*$"#,
    )
    .expect("mobile line pattern")
});

/// `name=value`, `name: value`, `name="value"` or `name='value'` inside brackets.
static MOBILE_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w\-]*)\s*[=:]\s*(?:"([^"]*)"|'([^']*)'|([^,\s\]]+))"#)
        .expect("mobile attribute pattern")
});

/// One token of a web accessibility-tree line: `key="value"`, `key=value`, or a
/// bare `"accessible name"`. Matching left to right keeps `=` inside a quoted
/// name from being read as an attribute.
static WEB_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w\-]*)=(?:"([^"]*)"|([^\s"]+))|"([^"]*)""#)
        .expect("web token pattern")
});

const IDENTIFIER_KEYS: [&str; 2] = ["uid", "identifier"];

// ============================================================================
// LineFormat: one matcher per snapshot dialect
// ============================================================================

/// Turns a single snapshot line into a record, or declines it.
///
/// Implementations never fail: a line they cannot read is `None`, and the
/// index falls through to the next format.
pub trait LineFormat {
    fn name(&self) -> &'static str;
    fn parse_line(&self, line: &str) -> Option<ElementRecord>;
}

/// Coordinate-annotated element lists produced by mobile drivers.
pub struct MobileLineFormat;

impl LineFormat for MobileLineFormat {
    fn name(&self) -> &'static str {
        "mobile"
    }

    fn parse_line(&self, line: &str) -> Option<ElementRecord> {
        let caps = MOBILE_LINE.captures(line)?;

        let role_name = caps.get(1)?.as_str().to_string();
        let text = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let x = caps.get(4)?.as_str().parse::<i32>().ok()?;
        let y = caps.get(5)?.as_str().parse::<i32>().ok()?;

        let mut attributes = BTreeMap::new();
        if let Some(block) = caps.get(6) {
            for attr in MOBILE_ATTRIBUTE.captures_iter(block.as_str()) {
                let value = attr
                    .get(2)
                    .or_else(|| attr.get(3))
                    .or_else(|| attr.get(4))
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                attributes.insert(attr[1].to_string(), value);
            }
        }

        Some(ElementRecord {
            identifier: None,
            role: mobile_role(&role_name),
            role_name,
            text,
            attributes,
            position: Some(Position::new(x, y)),
            raw_line: line.to_string(),
        })
    }
}

fn mobile_role(role_name: &str) -> Role {
    match role_name.to_lowercase().as_str() {
        "button" | "imagebutton" | "togglebutton" => Role::Button,
        "textfield" | "edittext" | "securetextfield" | "searchfield" | "input" | "textbox" => {
            Role::Input
        }
        "link" => Role::Link,
        "statictext" | "text" | "textview" | "label" => Role::Text,
        "heading" | "header" => Role::Heading,
        _ => Role::Unknown,
    }
}

/// Accessibility-tree dumps from the web transport (`uid=1_3 button "Buscar"`).
pub struct WebLineFormat;

impl LineFormat for WebLineFormat {
    fn name(&self) -> &'static str {
        "web"
    }

    fn parse_line(&self, line: &str) -> Option<ElementRecord> {
        // Unterminated quote: nothing on this line can be trusted
        if line.matches('"').count() % 2 != 0 {
            return None;
        }

        let mut identifier = None;
        let mut accessible_name = None;
        let mut attributes = BTreeMap::new();
        for token in WEB_TOKEN.captures_iter(line) {
            if let Some(name) = token.get(4) {
                accessible_name.get_or_insert_with(|| name.as_str().to_string());
                continue;
            }

            let key = token[1].to_string();
            let value = token
                .get(2)
                .or_else(|| token.get(3))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            if IDENTIFIER_KEYS.contains(&key.as_str()) {
                identifier.get_or_insert(value);
            } else {
                attributes.insert(key, value);
            }
        }
        let identifier = identifier?;

        let text = attributes
            .get("text")
            .cloned()
            .or(accessible_name)
            .unwrap_or_default();

        // What remains once attributes and names are gone: the role words
        let bare = WEB_TOKEN.replace_all(line, " ");
        let role_name = bare
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .find(|w| !w.is_empty())
            .unwrap_or_default()
            .to_string();

        Some(ElementRecord {
            identifier: Some(identifier),
            role: web_role(&bare.to_lowercase()),
            role_name,
            text,
            attributes,
            position: None,
            raw_line: line.to_string(),
        })
    }
}

/// Keyword presence on the unquoted part of the line. Order matters:
/// `textbox` must be seen as an input before the bare `text` check.
fn web_role(bare: &str) -> Role {
    if bare.contains("heading") {
        Role::Heading
    } else if bare.contains("button") {
        Role::Button
    } else if ["input", "textbox", "searchbox", "combobox"]
        .iter()
        .any(|k| bare.contains(k))
    {
        Role::Input
    } else if bare.contains("link") {
        Role::Link
    } else if bare.contains("statictext") || bare.contains("text") {
        Role::Text
    } else {
        Role::Unknown
    }
}

// ============================================================================
// SnapshotIndex
// ============================================================================

/// Structured view over one raw snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotIndex {
    records: Vec<ElementRecord>,
    fingerprint: String,
}

impl SnapshotIndex {
    /// Parse with the default formats: mobile first, then web.
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, &[&MobileLineFormat, &WebLineFormat])
    }

    /// Parse with an explicit, ordered list of line formats.
    ///
    /// Never fails. Blank lines are skipped; every other line yields exactly
    /// one record, `Role::Unknown` when no format accepts it.
    pub fn parse_with(raw: &str, formats: &[&dyn LineFormat]) -> Self {
        let records = raw
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                for format in formats {
                    if let Some(record) = format.parse_line(line) {
                        trace!(format = format.name(), line, "snapshot line parsed");
                        return record;
                    }
                }
                trace!(line, "no line format matched, keeping as unknown");
                ElementRecord::unknown(line)
            })
            .collect();

        Self {
            records,
            fingerprint: snapshot_fingerprint(raw),
        }
    }

    pub fn records(&self) -> &[ElementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Coordinates of every record that has one, in snapshot order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.records.iter().filter_map(|r| r.position)
    }

    pub fn has_identifiers(&self) -> bool {
        self.records.iter().any(|r| r.identifier.is_some())
    }

    pub fn find_identifier(&self, identifier: &str) -> Option<&ElementRecord> {
        self.records
            .iter()
            .find(|r| r.identifier.as_deref() == Some(identifier))
    }

    /// SHA-1 of the raw snapshot text, used to correlate trace entries.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

pub fn snapshot_fingerprint(raw: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}
