use std::fmt;

use serde::Serialize;

use crate::matching::description::Description;
use crate::snapshot::record::{ElementRecord, Role};

// ============================================================================
// Weights: every check is additive and independent
// ============================================================================

pub const WEIGHT_QUOTED_TEXT: u32 = 15;
pub const WEIGHT_ROLE_BUTTON: u32 = 8;
pub const WEIGHT_ROLE_INPUT: u32 = 8;
pub const WEIGHT_SEARCH_INTENT: u32 = 10;
pub const WEIGHT_ROLE_LINK: u32 = 8;
pub const WEIGHT_NAME_ATTRIBUTE: u32 = 12;
pub const WEIGHT_PLACEHOLDER: u32 = 10;
pub const WEIGHT_KEYWORD: u32 = 3;
pub const WEIGHT_MENU_LIST: u32 = 7;

const BUTTON_WORDS: &[&str] = &["botón", "boton", "button"];
const INPUT_WORDS: &[&str] = &["campo", "input"];
const LINK_WORDS: &[&str] = &["enlace", "link"];
const SEARCH_WORDS: &[&str] = &["búsqueda", "busqueda", "buscar", "search"];
const MENU_LIST_WORDS: &[&str] = &["menú", "menu", "lista"];

/// Why a record earned points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", content = "value", rename_all = "kebab-case")]
pub enum MatchSignal {
    ExactText(String),
    Role(Role),
    SearchIntent,
    NameAttribute(String),
    Placeholder(String),
    Keyword(String),
    MenuList(&'static str),
}

impl fmt::Display for MatchSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchSignal::ExactText(text) => write!(f, "exact-text:\"{}\"", text),
            MatchSignal::Role(role) => write!(f, "role:{}", role.as_str()),
            MatchSignal::SearchIntent => write!(f, "search-intent"),
            MatchSignal::NameAttribute(name) => write!(f, "name:\"{}\"", name),
            MatchSignal::Placeholder(placeholder) => write!(f, "placeholder:\"{}\"", placeholder),
            MatchSignal::Keyword(keyword) => write!(f, "keyword:\"{}\"", keyword),
            MatchSignal::MenuList(kind) => write!(f, "role:{}", kind),
        }
    }
}

/// Total score of one record plus the signals that produced it, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub score: u32,
    pub signals: Vec<MatchSignal>,
}

impl ScoreBreakdown {
    fn add(&mut self, weight: u32, signal: MatchSignal) {
        self.score += weight;
        self.signals.push(signal);
    }
}

/// Score a record against a free-text description.
pub fn score(record: &ElementRecord, description: &str) -> ScoreBreakdown {
    score_description(record, &Description::parse(description))
}

/// Score against an already-parsed description (one parse per snapshot scan).
pub fn score_description(record: &ElementRecord, desc: &Description) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    let text_lower = record.text.to_lowercase();
    let role_lower = record.role_name.to_lowercase();

    // ---- Quoted text: the strongest intent signal ----
    if let Some(quoted) = &desc.quoted {
        let needle = quoted.to_lowercase();
        if record.raw_line.to_lowercase().contains(&needle) || text_lower.contains(&needle) {
            breakdown.add(WEIGHT_QUOTED_TEXT, MatchSignal::ExactText(quoted.clone()));
        }
    }

    // ---- Role intents ----
    if desc.mentions(BUTTON_WORDS) && record.role == Role::Button {
        breakdown.add(WEIGHT_ROLE_BUTTON, MatchSignal::Role(Role::Button));
    }

    if desc.mentions(INPUT_WORDS) && record.role == Role::Input {
        breakdown.add(WEIGHT_ROLE_INPUT, MatchSignal::Role(Role::Input));
    }

    if desc.mentions(SEARCH_WORDS)
        && SEARCH_WORDS
            .iter()
            .any(|w| text_lower.contains(w) || role_lower.contains(w))
    {
        breakdown.add(WEIGHT_SEARCH_INTENT, MatchSignal::SearchIntent);
    }

    if desc.mentions(LINK_WORDS) && record.role == Role::Link {
        breakdown.add(WEIGHT_ROLE_LINK, MatchSignal::Role(Role::Link));
    }

    // ---- Attributes ----
    if let Some(name) = non_blank(record.attribute("name")) {
        if desc.lowered.contains(&name.to_lowercase()) {
            breakdown.add(WEIGHT_NAME_ATTRIBUTE, MatchSignal::NameAttribute(name.to_string()));
        }
    }

    if let Some(placeholder) = non_blank(record.attribute("placeholder")) {
        if desc.lowered.contains(&placeholder.to_lowercase()) {
            breakdown.add(
                WEIGHT_PLACEHOLDER,
                MatchSignal::Placeholder(placeholder.to_string()),
            );
        }
    }

    // ---- Keywords: 3 points per long token found in the text ----
    if !text_lower.is_empty() {
        for keyword in &desc.keywords {
            if text_lower.contains(keyword.as_str()) {
                breakdown.add(WEIGHT_KEYWORD, MatchSignal::Keyword(keyword.clone()));
            }
        }
    }

    // ---- Menus and lists ----
    if desc.mentions(MENU_LIST_WORDS) {
        let haystack = format!("{} {}", role_lower, text_lower);
        if haystack.contains("menu") || haystack.contains("menú") {
            breakdown.add(WEIGHT_MENU_LIST, MatchSignal::MenuList("menu"));
        } else if haystack.contains("list") {
            breakdown.add(WEIGHT_MENU_LIST, MatchSignal::MenuList("list"));
        }
    }

    breakdown
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
