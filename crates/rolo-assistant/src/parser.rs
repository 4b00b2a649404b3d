//! Extracts structured actions from raw model output.
//!
//! Total by construction: any malformed, action-less, or unclassifiable
//! output degrades to a smaller (possibly empty) action list with a
//! `warn!` diagnostic, never an error. The JSON extraction uses a
//! stack-based balanced-delimiter scan, so action payloads embedded in
//! surrounding prose — including nested objects — are matched correctly.

use rolo_core::{Action, ErrorParams};
use serde_json::Value;
use tracing::{debug, warn};

/// Parse the gateway's raw response text into an ordered action list.
///
/// 1. The first well-formed JSON array literal in the text is the action
///    list; failing that, the first well-formed object is a single action.
/// 2. Items without an explicit `action` tag are classified by field
///    shape; unclassifiable items are dropped with a diagnostic.
pub fn parse_actions(raw: &str) -> Vec<Action> {
    let Some(value) = extract_json(raw) else {
        warn!(preview = preview(raw), "no JSON found in model response");
        return Vec::new();
    };

    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        other => {
            warn!(preview = preview(&other.to_string()), "model response JSON is not an array or object");
            return Vec::new();
        }
    };

    let actions: Vec<Action> = items.into_iter().filter_map(normalize_item).collect();
    debug!(count = actions.len(), "parsed actions");
    actions
}

/// Find the first well-formed JSON value in the text, arrays preferred.
fn extract_json(text: &str) -> Option<Value> {
    extract_first(text, '[').or_else(|| extract_first(text, '{'))
}

/// Scan for the first balanced literal starting with `open` that parses
/// as JSON. Candidates that are balanced but invalid JSON are skipped in
/// favor of later starts.
fn extract_first(text: &str, open: char) -> Option<Value> {
    for (start, c) in text.char_indices() {
        if c != open {
            continue;
        }
        if let Some(end) = scan_balanced(&text[start..]) {
            if let Ok(value) = serde_json::from_str(&text[start..start + end]) {
                return Some(value);
            }
        }
    }
    None
}

/// Return the byte length of the balanced JSON delimiter span starting at
/// the first character of `text` (which must be `[` or `{`), or `None`
/// when delimiters never balance or mismatch.
///
/// String contents and escape sequences are skipped, so braces inside
/// quoted values do not confuse the scan.
fn scan_balanced(text: &str) -> Option<usize> {
    let mut stack: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => stack.push(c),
            ']' | '}' => {
                let open = stack.pop()?;
                let matches = (open == '[' && c == ']') || (open == '{' && c == '}');
                if !matches {
                    return None;
                }
                if stack.is_empty() {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }
    None
}

/// Normalize one parsed item into an [`Action`].
///
/// Tagged items deserialize directly (params default to the item's own
/// fields when no `params` object is present; unknown tags become error
/// actions). Untagged items are classified by precedence: name/email →
/// add_or_update, identifier alone → delete_contact, question →
/// query_contacts, anything else is dropped.
fn normalize_item(item: Value) -> Option<Action> {
    let Value::Object(mut fields) = item else {
        warn!("dropping non-object action item");
        return None;
    };

    if let Some(tag) = fields.get("action").and_then(Value::as_str) {
        let tag = tag.to_lowercase();
        let params = match fields.remove("params") {
            Some(params @ Value::Object(_)) => params,
            // Flat items carry their params beside the tag.
            _ => {
                let _ = fields.remove("action");
                Value::Object(fields)
            }
        };
        let tagged = serde_json::json!({ "action": tag, "params": params });
        return match serde_json::from_value::<Action>(tagged) {
            Ok(action) => Some(action),
            Err(e) => {
                warn!(tag = %tag, error = %e, "unrecognized action item");
                Some(Action::Error(ErrorParams {
                    message: "Unknown action".into(),
                }))
            }
        };
    }

    // No tag: infer one from the field shape.
    let inferred = if has_string(&fields, "name") || has_string(&fields, "email") {
        "add_or_update"
    } else if has_string(&fields, "identifier") {
        "delete_contact"
    } else if has_string(&fields, "question") {
        "query_contacts"
    } else {
        warn!("dropping unclassifiable action item");
        return None;
    };
    debug!(action = inferred, "inferred action tag from params");

    let tagged = serde_json::json!({ "action": inferred, "params": Value::Object(fields) });
    match serde_json::from_value::<Action>(tagged) {
        Ok(action) => Some(action),
        Err(e) => {
            warn!(error = %e, "dropping malformed inferred action");
            None
        }
    }
}

/// Non-empty string field check (null and `""` count as absent).
fn has_string(fields: &serde_json::Map<String, Value>, key: &str) -> bool {
    fields
        .get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

/// First 100 characters, for log previews.
fn preview(text: &str) -> String {
    text.chars().take(100).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rolo_core::{AddOrUpdateParams, DeleteParams};

    #[test]
    fn parses_tagged_array() {
        let raw = r#"[{"action":"delete_contact","params":{"identifier":"Jon"}}]"#;
        let actions = parse_actions(raw);
        assert_eq!(
            actions,
            vec![Action::DeleteContact(DeleteParams {
                identifier: "Jon".into()
            })]
        );
    }

    #[test]
    fn parses_array_embedded_in_prose() {
        let raw = r#"Sure! Here you go:
[{"action":"add_or_update","params":{"identifier":null,"name":"Jon","email":null,"company":null,"phone":null}}]
Let me know if you need anything else."#;
        let actions = parse_actions(raw);
        assert_eq!(actions.len(), 1);
        let Action::AddOrUpdate(params) = &actions[0] else {
            panic!("wrong variant");
        };
        assert_eq!(params.name.as_deref(), Some("Jon"));
    }

    #[test]
    fn wraps_single_object() {
        let raw = r#"{"action":"query_contacts","params":{"question":"who is Jon?"}}"#;
        let actions = parse_actions(raw);
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::QueryContacts(_)));
    }

    #[test]
    fn infers_add_or_update_from_name() {
        let actions = parse_actions(r#"{"name":"Jon Smith"}"#);
        assert_eq!(
            actions,
            vec![Action::AddOrUpdate(AddOrUpdateParams {
                name: Some("Jon Smith".into()),
                ..Default::default()
            })]
        );
    }

    #[test]
    fn infers_delete_from_bare_identifier() {
        let actions = parse_actions(r#"{"identifier":"Jon"}"#);
        assert_eq!(
            actions,
            vec![Action::DeleteContact(DeleteParams {
                identifier: "Jon".into()
            })]
        );
    }

    #[test]
    fn name_beats_identifier_in_inference() {
        let actions = parse_actions(r#"{"identifier":"jsmith","name":"Jon Smith"}"#);
        assert!(matches!(actions[0], Action::AddOrUpdate(_)));
    }

    #[test]
    fn infers_query_from_question() {
        let actions = parse_actions(r#"{"question":"когда I met Jon?"}"#);
        assert!(matches!(actions[0], Action::QueryContacts(_)));
    }

    #[test]
    fn drops_unclassifiable_items_but_keeps_rest() {
        let raw = r#"[{"company":"Acme"},{"action":"delete_contact","params":{"identifier":"Jon"}}]"#;
        let actions = parse_actions(raw);
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::DeleteContact(_)));
    }

    #[test]
    fn unknown_tag_becomes_error_action() {
        let actions = parse_actions(r#"[{"action":"merge_contacts","params":{}}]"#);
        assert_eq!(
            actions,
            vec![Action::Error(ErrorParams {
                message: "Unknown action".into()
            })]
        );
    }

    #[test]
    fn flat_tagged_item_uses_own_fields_as_params() {
        let actions = parse_actions(r#"{"action":"add_or_update","name":"Jon"}"#);
        let Action::AddOrUpdate(params) = &actions[0] else {
            panic!("wrong variant");
        };
        assert_eq!(params.name.as_deref(), Some("Jon"));
    }

    #[test]
    fn no_json_returns_empty() {
        assert!(parse_actions("I'm sorry, I can't help with that.").is_empty());
        assert!(parse_actions("").is_empty());
    }

    #[test]
    fn invalid_json_returns_empty() {
        assert!(parse_actions(r#"[{"action": "delete_contact",]"#).is_empty());
    }

    // ── balanced scanner ─────────────────────────────────────────────

    #[test]
    fn scanner_handles_nested_objects() {
        let raw = r#"Result: {"action":"add_or_update","params":{"name":"Jon"}} done"#;
        let actions = parse_actions(raw);
        let Action::AddOrUpdate(params) = &actions[0] else {
            panic!("wrong variant");
        };
        assert_eq!(params.name.as_deref(), Some("Jon"));
    }

    #[test]
    fn scanner_ignores_braces_inside_strings() {
        let raw = r#"{"question":"what does {weird} mean?"}"#;
        let actions = parse_actions(raw);
        let Action::QueryContacts(params) = &actions[0] else {
            panic!("wrong variant");
        };
        assert_eq!(params.question, "what does {weird} mean?");
    }

    #[test]
    fn scanner_handles_escaped_quotes() {
        let raw = r#"{"name":"Jon \"Big J\" Smith"}"#;
        let actions = parse_actions(raw);
        let Action::AddOrUpdate(params) = &actions[0] else {
            panic!("wrong variant");
        };
        assert_eq!(params.name.as_deref(), Some(r#"Jon "Big J" Smith"#));
    }

    #[test]
    fn scanner_skips_unbalanced_candidate_for_later_valid_one() {
        let raw = r#"broken { "a": 1  ... and then {"name":"Jon"}"#;
        let actions = parse_actions(raw);
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn scan_balanced_rejects_mismatched_delimiters() {
        assert!(scan_balanced("[1, 2}").is_none());
        assert!(scan_balanced("{\"a\": [1}]").is_none());
    }

    #[test]
    fn scan_balanced_returns_span_length() {
        assert_eq!(scan_balanced("[1, 2] trailing"), Some(6));
        assert_eq!(scan_balanced(r#"{"a":{"b":1}}"#), Some(13));
    }

    #[test]
    fn array_preferred_over_earlier_object() {
        // An object appears first, but a well-formed array anywhere in the
        // text wins, matching the array-first search order.
        let raw = r#"{"name":"Decoy"} [{"action":"delete_contact","params":{"identifier":"Jon"}}]"#;
        let actions = parse_actions(raw);
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::DeleteContact(_)));
    }
}
