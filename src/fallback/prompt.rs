use serde::Deserialize;

use crate::matching::description::{ActionKind, Description};

/// Structured answer expected back from the language model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FallbackAnswer {
    #[serde(alias = "uid")]
    pub identifier: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

/// Build the element-lookup prompt around an already reduced snapshot.
pub fn build_prompt(desc: &Description, snapshot_lines: &[String]) -> String {
    let action = match desc.action {
        ActionKind::Fill => "fill in",
        ActionKind::Click => "click",
        ActionKind::Verify => "verify",
        ActionKind::Other => "interact with",
    };

    let snapshot = if snapshot_lines.is_empty() {
        "(empty)".to_string()
    } else {
        snapshot_lines.join("\n")
    };

    format!(
        r#"You locate UI elements in an accessibility snapshot for a test automation tool.

The test wants to {action} this element:
"{description}"

SNAPSHOT (one element per line, identifiers appear as uid=... or ref=...):
{snapshot}

Pick the single element that best matches the description.
Respond with ONLY valid JSON, no explanation:
{{"identifier":"<uid or ref of the element, or null if none matches>","reasoning":"<one short sentence>"}}"#,
        action = action,
        description = desc.raw,
        snapshot = snapshot,
    )
}

/// Parse a raw model reply. Anything unusable (not JSON, wrong shape, empty
/// identifier) is `None`, which the engine treats exactly like no answer.
pub fn parse_answer(raw: &str) -> Option<FallbackAnswer> {
    let body = strip_code_fence(raw.trim());
    let mut answer: FallbackAnswer = serde_json::from_str(body).ok()?;

    let identifier = answer
        .identifier
        .as_deref()
        .map(str::trim)
        .map(|id| id.strip_prefix("uid=").unwrap_or(id))
        .filter(|id| !id.is_empty() && !id.eq_ignore_ascii_case("null"))?
        .to_string();

    answer.identifier = Some(identifier);
    Some(answer)
}

/// Models like to wrap JSON in ```json fences.
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
