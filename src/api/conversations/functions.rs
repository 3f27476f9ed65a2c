use serde_json::Value;

use super::structures::ConversationMessageView;

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";

const MAX_CONTENT_LEN: usize = 2000;

/// Проверяет вложение в диалог перед сохранением
pub fn validate_append(role: &str, content: &str) -> Result<(), &'static str> {
    if role != ROLE_USER && role != ROLE_ASSISTANT {
        return Err("Role must be either \"user\" or \"assistant\"");
    }
    if content.trim().is_empty() {
        return Err("Content must not be empty");
    }
    if content.len() > MAX_CONTENT_LEN {
        return Err("Content must be at most 2000 characters");
    }
    Ok(())
}

/// Превращает документ бекенда в элемент ответа. Документы без ожидаемых
/// полей пропускаются, а не валят всю выдачу.
pub fn document_to_message_view(document: &Value) -> Option<ConversationMessageView> {
    let id = document.get("$id")?.as_str()?.to_string();
    let role = document.get("role")?.as_str()?.to_string();
    let content = document.get("content")?.as_str()?.to_string();
    let created_at = document
        .get("$createdAt")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(ConversationMessageView {
        id,
        role,
        content,
        created_at,
    })
}

/// Запросы выборки по сессии в порядке появления сообщений
pub fn session_filter_queries(session_id: &str, limit: u64) -> Vec<String> {
    vec![
        serde_json::json!({
            "method": "equal",
            "attribute": "sessionId",
            "values": [session_id],
        })
        .to_string(),
        serde_json::json!({
            "method": "orderAsc",
            "attribute": "$createdAt",
        })
        .to_string(),
        serde_json::json!({
            "method": "limit",
            "values": [limit],
        })
        .to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn append_accepts_both_roles() {
        assert!(validate_append("user", "hello there").is_ok());
        assert!(validate_append("assistant", "hi, how can I help?").is_ok());
    }

    #[test]
    fn append_rejects_unknown_role_and_bad_content() {
        assert!(validate_append("system", "hello").is_err());
        assert!(validate_append("user", "   ").is_err());
        assert!(validate_append("user", &"a".repeat(2001)).is_err());
    }

    #[test]
    fn maps_complete_documents() {
        let document = json!({
            "$id": "doc-1",
            "$createdAt": "2025-05-01T10:00:00.000+00:00",
            "sessionId": "sess-1",
            "role": "user",
            "content": "hello",
        });
        let view = document_to_message_view(&document).unwrap();
        assert_eq!(view.id, "doc-1");
        assert_eq!(view.role, "user");
        assert_eq!(view.content, "hello");
        assert_eq!(view.created_at, "2025-05-01T10:00:00.000+00:00");
    }

    #[test]
    fn skips_documents_with_missing_or_mistyped_fields() {
        assert!(document_to_message_view(&json!({"$id": "doc-1"})).is_none());
        assert!(
            document_to_message_view(&json!({
                "$id": "doc-1",
                "role": 42,
                "content": "hello",
            }))
            .is_none()
        );
    }

    #[test]
    fn filter_queries_target_the_session() {
        let queries = session_filter_queries("sess-1", 100);
        assert_eq!(queries.len(), 3);
        assert!(queries[0].contains("sess-1"));
        assert!(queries[1].contains("orderAsc"));
    }
}
