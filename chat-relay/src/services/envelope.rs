//! Upstream response envelope normalization.
//!
//! The generate endpoint has shipped several incompatible response shapes over
//! its API versions. Each known shape is a variant of [`Envelope`]; variants
//! are tried in a fixed priority order and the first one yielding non-empty
//! text wins.

use serde_json::{Map, Value};

/// A recognized response shape, borrowing from the decoded document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope<'a> {
    /// `{ "candidates": [ { "content" | "output": ... }, ... ] }`
    Candidates(&'a Value),
    /// `{ "output": [ { "content" | "text": ... } | "...", ... ] }`
    Output(&'a [Value]),
    /// `{ "response": "..." }` or `{ "text": "..." }`
    Direct(&'a Map<String, Value>),
}

impl<'a> Envelope<'a> {
    /// Every shape the document could be read as, highest priority first.
    pub fn shapes_of(document: &'a Value) -> Vec<Envelope<'a>> {
        let Some(object) = document.as_object() else {
            return Vec::new();
        };

        let mut shapes = Vec::with_capacity(3);
        if let Some(first) = object
            .get("candidates")
            .and_then(Value::as_array)
            .and_then(|list| list.first())
        {
            shapes.push(Envelope::Candidates(first));
        }
        if let Some(pieces) = object.get("output").and_then(Value::as_array) {
            if !pieces.is_empty() {
                shapes.push(Envelope::Output(pieces));
            }
        }
        shapes.push(Envelope::Direct(object));
        shapes
    }

    /// Text carried by this shape, trimmed; `None` when empty.
    pub fn text(&self) -> Option<String> {
        match self {
            Envelope::Candidates(candidate) => candidate
                .get("content")
                .and_then(content_text)
                .and_then(non_empty)
                .or_else(|| {
                    candidate
                        .get("output")
                        .and_then(content_text)
                        .and_then(non_empty)
                }),
            Envelope::Output(pieces) => {
                let parts: Vec<&str> = pieces.iter().filter_map(output_piece).collect();
                non_empty(parts.join(" "))
            }
            Envelope::Direct(object) => ["response", "text"]
                .iter()
                .filter_map(|field| object.get(*field).and_then(Value::as_str))
                .find_map(|s| non_empty(s.to_string())),
        }
    }
}

/// First non-empty text across the document's shapes, in priority order.
pub fn extract_text(document: &Value) -> Option<String> {
    Envelope::shapes_of(document)
        .iter()
        .find_map(|shape| shape.text())
}

/// A candidate's `content`/`output`: a plain string, or a Gemini-style
/// `{ "parts": [ { "text": ... } ] }` object.
fn content_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(object) => {
            let parts = object.get("parts")?.as_array()?;
            let text: String = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect();
            Some(text)
        }
        _ => None,
    }
}

fn output_piece(piece: &Value) -> Option<&str> {
    match piece {
        Value::String(s) => Some(s.as_str()),
        Value::Object(entry) => entry
            .get("content")
            .and_then(Value::as_str)
            .or_else(|| entry.get("text").and_then(Value::as_str)),
        _ => None,
    }
}

fn non_empty(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_candidates_content() {
        let doc = json!({ "candidates": [{ "content": "X" }] });
        assert_eq!(extract_text(&doc), Some("X".to_string()));
    }

    #[test]
    fn test_candidates_output_when_content_absent() {
        let doc = json!({ "candidates": [{ "output": "  from output  " }] });
        assert_eq!(extract_text(&doc), Some("from output".to_string()));
    }

    #[test]
    fn test_candidates_content_beats_output() {
        let doc = json!({ "candidates": [{ "content": "content", "output": "output" }] });
        assert_eq!(extract_text(&doc), Some("content".to_string()));
    }

    #[test]
    fn test_candidates_only_first_element_is_read() {
        let doc = json!({ "candidates": [{ "content": "first" }, { "content": "second" }] });
        assert_eq!(extract_text(&doc), Some("first".to_string()));
    }

    #[test]
    fn test_candidates_gemini_parts() {
        let doc = json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Hello, " }, { "text": "world" }] }
            }]
        });
        assert_eq!(extract_text(&doc), Some("Hello, world".to_string()));
    }

    #[test]
    fn test_output_list_is_space_joined_and_trimmed() {
        let doc = json!({ "output": [{ "content": "A" }, { "text": "B" }] });
        assert_eq!(extract_text(&doc), Some("A B".to_string()));
    }

    #[test]
    fn test_output_list_accepts_bare_strings() {
        let doc = json!({ "output": ["one", { "content": "two" }, 3, " three "] });
        assert_eq!(extract_text(&doc), Some("one two  three".to_string()));
    }

    #[test]
    fn test_output_entry_content_wins_over_text() {
        let doc = json!({ "output": [{ "content": "c", "text": "t" }] });
        assert_eq!(extract_text(&doc), Some("c".to_string()));
    }

    #[test]
    fn test_direct_response_then_text() {
        assert_eq!(
            extract_text(&json!({ "response": "r", "text": "t" })),
            Some("r".to_string())
        );
        assert_eq!(extract_text(&json!({ "text": "t" })), Some("t".to_string()));
        assert_eq!(
            extract_text(&json!({ "response": "", "text": "t" })),
            Some("t".to_string())
        );
    }

    #[test]
    fn test_falls_through_when_higher_priority_shape_is_empty() {
        let doc = json!({
            "candidates": [{ "content": "   " }],
            "output": ["fallback"]
        });
        assert_eq!(extract_text(&doc), Some("fallback".to_string()));

        let doc = json!({ "candidates": [], "response": "direct" });
        assert_eq!(extract_text(&doc), Some("direct".to_string()));
    }

    #[test]
    fn test_unrecognized_documents_yield_nothing() {
        assert_eq!(extract_text(&json!({})), None);
        assert_eq!(extract_text(&json!([])), None);
        assert_eq!(extract_text(&json!("bare string")), None);
        assert_eq!(extract_text(&json!({ "candidates": [{ "content": 42 }] })), None);
        assert_eq!(extract_text(&json!({ "output": [{ "other": "x" }] })), None);
    }

    #[test]
    fn test_shape_priority_order() {
        let doc = json!({
            "candidates": [{ "content": "c" }],
            "output": ["o"],
            "response": "r"
        });
        let shapes = Envelope::shapes_of(&doc);
        assert!(matches!(shapes[0], Envelope::Candidates(_)));
        assert!(matches!(shapes[1], Envelope::Output(_)));
        assert!(matches!(shapes[2], Envelope::Direct(_)));
    }
}
