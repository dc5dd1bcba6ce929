use crate::engine::config::SnapshotBudgets;
use crate::matching::description::{ActionKind, Description};
use crate::snapshot::record::{ElementRecord, Role};

/// Role words worth showing the model for each kind of action.
fn relevant_role_words(action: ActionKind) -> &'static [&'static str] {
    match action {
        ActionKind::Fill => &["textbox", "searchbox", "combobox", "input", "textfield", "edittext"],
        ActionKind::Click => &["button", "link", "menuitem", "tab", "checkbox", "radio", "option"],
        ActionKind::Verify => &["heading", "statictext", "text", "alert", "status", "label"],
        ActionKind::Other => &["button", "link", "textbox", "searchbox", "input", "heading"],
    }
}

fn is_role_relevant(record: &ElementRecord, action: ActionKind) -> bool {
    let role_matches = match action {
        ActionKind::Fill => record.role == Role::Input,
        ActionKind::Click => matches!(record.role, Role::Button | Role::Link),
        ActionKind::Verify => matches!(record.role, Role::Heading | Role::Text),
        ActionKind::Other => record.role != Role::Unknown,
    };
    if role_matches {
        return true;
    }

    let role_name = record.role_name.to_lowercase();
    !role_name.is_empty()
        && relevant_role_words(action)
            .iter()
            .any(|w| role_name.contains(w))
}

fn mentions_keyword(record: &ElementRecord, desc: &Description) -> bool {
    let line = record.raw_line.to_lowercase();
    desc.keywords.iter().any(|k| line.contains(k.as_str()))
        || desc
            .quoted
            .as_ref()
            .is_some_and(|q| line.contains(&q.to_lowercase()))
}

/// The subset of snapshot records sent to the language model, with their
/// position in the snapshot.
///
/// Keeps role-relevant records and records mentioning description keywords,
/// in snapshot order, capped by the action's budget. When nothing qualifies
/// the first `budget` records are sent instead of an empty snapshot.
pub fn reduce_snapshot<'a>(
    records: &'a [ElementRecord],
    desc: &Description,
    budgets: &SnapshotBudgets,
) -> Vec<(usize, &'a ElementRecord)> {
    let budget = budgets.for_action(desc.action);

    let selected: Vec<(usize, &ElementRecord)> = records
        .iter()
        .enumerate()
        .filter(|(_, r)| is_role_relevant(r, desc.action) || mentions_keyword(r, desc))
        .take(budget)
        .collect();

    if !selected.is_empty() {
        return selected;
    }

    records.iter().enumerate().take(budget).collect()
}

/// Prompt line for one record. Records without a transport identifier get a
/// `ref=<index>` tag so the model can still point at them.
pub fn render_line(index: usize, record: &ElementRecord) -> String {
    match record.identifier {
        Some(_) => record.raw_line.trim().to_string(),
        None => format!("ref={} {}", index, record.raw_line.trim()),
    }
}
