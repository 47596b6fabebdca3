//! Column-name translation.
//!
//! Records are canonically camelCase JSON; the hosted store's tables use
//! snake_case column names. Only top-level keys are translated; nested
//! payloads (quiz questions, result answers) are opaque columns and keep
//! the canonical shape on both sides.

use serde_json::Value;

/// `userId` → `user_id`
pub fn to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('_');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `user_id` → `userId`
pub fn to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Rewrite a row's top-level keys to column names before sending.
pub fn row_to_columns(row: Value) -> Value {
    map_keys(row, to_snake)
}

/// Rewrite a fetched row's column names back to the record shape.
pub fn row_from_columns(row: Value) -> Value {
    map_keys(row, to_camel)
}

fn map_keys(row: Value, f: impl Fn(&str) -> String) -> Value {
    match row {
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (f(&k), v)).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_translation_roundtrips() {
        for (camel, snake) in [
            ("userId", "user_id"),
            ("createdAt", "created_at"),
            ("totalQuestions", "total_questions"),
            ("completedAt", "completed_at"),
            ("title", "title"),
        ] {
            assert_eq!(to_snake(camel), snake);
            assert_eq!(to_camel(snake), camel);
        }
    }

    #[test]
    fn test_row_translation_is_top_level_only() {
        let row = json!({
            "id": "q1",
            "userId": "u1",
            "questions": [{"correctAnswer": 1, "options": ["a", "b"]}],
        });

        let columns = row_to_columns(row);
        assert_eq!(columns["user_id"], "u1");
        assert!(columns.get("userId").is_none());
        // The nested payload keeps its canonical shape.
        assert_eq!(columns["questions"][0]["correctAnswer"], 1);

        let back = row_from_columns(columns);
        assert_eq!(back["userId"], "u1");
        assert_eq!(back["questions"][0]["correctAnswer"], 1);
    }

    #[test]
    fn test_non_objects_pass_through() {
        assert_eq!(row_to_columns(json!("x")), json!("x"));
        assert_eq!(row_from_columns(json!([1, 2])), json!([1, 2]));
    }
}
