use element_resolution::engine::config::SnapshotBudgets;
use element_resolution::engine::filter::{reduce_snapshot, render_line};
use element_resolution::fallback::ollama::OllamaBackend;
use element_resolution::fallback::prompt::{FallbackAnswer, build_prompt, parse_answer};
use element_resolution::fallback::{LanguageModel, MockLanguageModel};
use element_resolution::matching::description::{ActionKind, Description};
use element_resolution::snapshot::parser::SnapshotIndex;
use element_resolution::snapshot::record::{ElementRecord, Role};

use crate::common::utils::{fixture, mobile_record, web_record};

mod common;

fn many(role: Role, count: usize) -> Vec<ElementRecord> {
    (0..count)
        .map(|i| web_record(&format!("9_{}", i), role, &format!("Elemento {}", i)))
        .collect()
}

// ============================================================================
// Answer parsing
// ============================================================================

#[test]
fn parses_plain_json_answer() {
    let answer = parse_answer(r#"{"identifier":"5_3","reasoning":"only link"}"#);
    assert_eq!(
        answer,
        Some(FallbackAnswer {
            identifier: Some("5_3".into()),
            reasoning: Some("only link".into()),
        })
    );
}

#[test]
fn parses_fenced_answer() {
    let raw = "```json\n{\"identifier\": \"1_4\"}\n```";
    let answer = parse_answer(raw).expect("fenced JSON should parse");
    assert_eq!(answer.identifier.as_deref(), Some("1_4"));
    assert_eq!(answer.reasoning, None);
}

#[test]
fn accepts_uid_key_and_prefix() {
    let answer = parse_answer(r#"{"uid":"uid=2_7"}"#).expect("uid alias should parse");
    assert_eq!(answer.identifier.as_deref(), Some("2_7"));
}

#[test]
fn rejects_missing_or_null_identifiers() {
    assert_eq!(parse_answer(r#"{"identifier":null}"#), None);
    assert_eq!(parse_answer(r#"{"identifier":"  "}"#), None);
    assert_eq!(parse_answer(r#"{"identifier":"null"}"#), None);
    assert_eq!(parse_answer(r#"{"reasoning":"nothing fits"}"#), None);
}

#[test]
fn rejects_non_json() {
    assert_eq!(parse_answer("The answer is 5_3."), None);
    assert_eq!(parse_answer(""), None);
    assert_eq!(parse_answer(r#"["5_3"]"#), None);
}

// ============================================================================
// Prompt
// ============================================================================

#[test]
fn prompt_carries_action_description_and_lines() {
    let desc = Description::parse("toca el botón de pago");
    let lines = vec![
        "uid=1_4 button \"Pagar\"".to_string(),
        "uid=1_5 link \"Ayuda\"".to_string(),
    ];

    let prompt = build_prompt(&desc, &lines);

    assert!(prompt.contains("wants to click this element"));
    assert!(prompt.contains("\"toca el botón de pago\""));
    assert!(prompt.contains("uid=1_4 button \"Pagar\"\nuid=1_5 link \"Ayuda\""));
    assert!(prompt.contains("\"identifier\""));
}

#[test]
fn prompt_marks_empty_snapshot() {
    let prompt = build_prompt(&Description::parse("escribe tu correo"), &[]);
    assert!(prompt.contains("wants to fill in"));
    assert!(prompt.contains("(empty)"));
}

// ============================================================================
// Snapshot reduction
// ============================================================================

#[test]
fn budgets_follow_action_kind() {
    let budgets = SnapshotBudgets::default();

    let buttons = many(Role::Button, 200);
    let click = Description::parse("toca el botón");
    assert_eq!(click.action, ActionKind::Click);
    assert_eq!(reduce_snapshot(&buttons, &click, &budgets).len(), 60);

    let inputs = many(Role::Input, 200);
    let fill = Description::parse("escribe en el campo");
    assert_eq!(reduce_snapshot(&inputs, &fill, &budgets).len(), 50);

    let headings = many(Role::Heading, 200);
    let verify = Description::parse("verifica el título");
    assert_eq!(reduce_snapshot(&headings, &verify, &budgets).len(), 75);

    let other = Description::parse("el logo de la tienda");
    assert_eq!(other.action, ActionKind::Other);
    assert_eq!(reduce_snapshot(&buttons, &other, &budgets).len(), 100);
}

#[test]
fn reduction_keeps_relevant_roles_in_order() {
    let index = SnapshotIndex::parse(&fixture("web_store.txt"));
    let desc = Description::parse("escribe en el campo de búsqueda");

    let reduced = reduce_snapshot(index.records(), &desc, &SnapshotBudgets::default());
    let picked: Vec<(usize, &str)> = reduced
        .iter()
        .map(|(i, r)| (*i, r.identifier.as_deref().unwrap_or("")))
        .collect();

    assert_eq!(picked, vec![(4, "1_3"), (8, "1_7")]);
}

#[test]
fn reduction_keeps_keyword_mentions() {
    let index = SnapshotIndex::parse(&fixture("web_store.txt"));
    let desc = Description::parse("verifica la camiseta");

    let reduced = reduce_snapshot(index.records(), &desc, &SnapshotBudgets::default());
    let ids: Vec<&str> = reduced
        .iter()
        .filter_map(|(_, r)| r.identifier.as_deref())
        .collect();

    // heading, static text, and the textbox whose role name contains "text"
    assert_eq!(ids, vec!["1_1", "1_5", "1_7"]);
}

#[test]
fn reduction_falls_back_to_leading_lines() {
    let index = SnapshotIndex::parse("### one\n### two\n### three");
    let budgets = SnapshotBudgets {
        other: 2,
        ..SnapshotBudgets::default()
    };

    let reduced = reduce_snapshot(index.records(), &Description::parse("algo raro"), &budgets);

    let indices: Vec<usize> = reduced.iter().map(|(i, _)| *i).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn reduction_of_empty_snapshot_is_empty() {
    let reduced = reduce_snapshot(&[], &Description::parse("toca"), &SnapshotBudgets::default());
    assert!(reduced.is_empty());
}

#[test]
fn rendered_lines_tag_records_without_uid() {
    let web = web_record("1_6", Role::Button, "Pagar");
    assert_eq!(render_line(7, &web), "uid=1_6 button \"Pagar\"");

    let mobile = mobile_record(Role::Button, "Checkout", 240, 880);
    assert_eq!(render_line(2, &mobile), "ref=2 button 'Checkout' at (240, 880)");
}

// ============================================================================
// Backends
// ============================================================================

#[test]
fn mock_model_returns_canned_text() {
    assert_eq!(
        MockLanguageModel::answering("{}").complete("anything"),
        Some("{}".to_string())
    );
    assert_eq!(MockLanguageModel::silent().complete("anything"), None);
}

#[test]
fn unreachable_ollama_gives_no_answer() {
    let backend = OllamaBackend::new("http://127.0.0.1:9/api/generate", "tiny");
    assert_eq!(backend.complete("hola"), None);
}
