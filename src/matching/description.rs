use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Double, single or typographic quotes around an explicit target text.
static QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""([^"]+)"|'([^']+)'|“([^”]+)”"#).expect("quoted description pattern")
});

/// Tokens at or below this length are too noisy for keyword matching.
pub const MIN_KEYWORD_CHARS: usize = 4;

const FILL_VERBS: &[&str] = &[
    "escribe", "escribir", "ingresa", "ingresar", "introduce", "llena", "llenar", "rellena",
    "completa", "fill", "type", "enter", "write",
];

const CLICK_VERBS: &[&str] = &[
    "click", "clic", "clickea", "toca", "tocar", "tap", "pulsa", "presiona", "press",
    "selecciona", "select", "abre", "open",
];

const VERIFY_VERBS: &[&str] = &[
    "verifica", "verificar", "comprueba", "valida", "confirma", "verify", "check", "assert",
    "expect",
];

/// What the caller is about to do with the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fill,
    Click,
    Verify,
    Other,
}

/// A human-written element description, pre-digested once per resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub raw: String,
    pub lowered: String,
    /// Every whitespace token, lower-cased, surrounding punctuation trimmed.
    pub tokens: Vec<String>,
    /// Tokens long enough for keyword matching, deduplicated, in order.
    pub keywords: Vec<String>,
    /// First quoted substring, verbatim.
    pub quoted: Option<String>,
    pub action: ActionKind,
}

impl Description {
    pub fn parse(text: &str) -> Self {
        let lowered = text.to_lowercase();

        let tokens: Vec<String> = lowered
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
            .filter(|t| !t.is_empty())
            .collect();

        let mut keywords: Vec<String> = Vec::new();
        for token in &tokens {
            if token.chars().count() >= MIN_KEYWORD_CHARS && !keywords.contains(token) {
                keywords.push(token.clone());
            }
        }

        let quoted = QUOTED.captures(text).and_then(|caps| {
            caps.get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str().trim().to_string())
                .filter(|q| !q.is_empty())
        });

        let action = infer_action(&tokens, &lowered);

        Self {
            raw: text.to_string(),
            lowered,
            tokens,
            keywords,
            quoted,
            action,
        }
    }

    /// True when any of `words` occurs in the lower-cased description.
    pub fn mentions(&self, words: &[&str]) -> bool {
        words.iter().any(|w| self.lowered.contains(w))
    }
}

/// The first verb wins; without one, the element noun decides.
fn infer_action(tokens: &[String], lowered: &str) -> ActionKind {
    for token in tokens {
        let t = token.as_str();
        if FILL_VERBS.contains(&t) {
            return ActionKind::Fill;
        }
        if CLICK_VERBS.contains(&t) {
            return ActionKind::Click;
        }
        if VERIFY_VERBS.contains(&t) {
            return ActionKind::Verify;
        }
    }

    if ["campo", "input", "field"].iter().any(|w| lowered.contains(w)) {
        ActionKind::Fill
    } else if ["botón", "boton", "button", "enlace", "link"]
        .iter()
        .any(|w| lowered.contains(w))
    {
        ActionKind::Click
    } else {
        ActionKind::Other
    }
}
