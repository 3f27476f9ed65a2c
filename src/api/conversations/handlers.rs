use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;

use crate::{app_state::AppState, errors::AppError};

use super::functions::{document_to_message_view, session_filter_queries, validate_append};
use super::structures::{AppendMessageRequest, AppendMessageResponse, ConversationResponse};

const CONVERSATION_PAGE_SIZE: u64 = 100;

#[utoipa::path(
    get,
    path = "/api/conversations/{sessionId}",
    tag = "Conversations",
    params(
        ("sessionId" = String, Path, description = "Chatbot session identifier")
    ),
    responses(
        (status = 200, description = "Conversation history", body = ConversationResponse),
        (status = 400, description = "Blank session id")
    )
)]
#[get("/{sessionId}")]
pub async fn get_conversation(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let session_id = parse_session_id(&path.into_inner())?;

    let config = &app_state.config;
    let list = app_state
        .appwrite
        .list_documents(
            config.effective_database_id(),
            config.effective_conversations_collection_id(),
            &session_filter_queries(&session_id, CONVERSATION_PAGE_SIZE),
        )
        .await?;

    let messages: Vec<_> = list
        .documents
        .iter()
        .filter_map(document_to_message_view)
        .collect();

    Ok(HttpResponse::Ok().json(ConversationResponse {
        session_id,
        messages,
        total: list.total,
    }))
}

#[utoipa::path(
    post,
    path = "/api/conversations/{sessionId}/messages",
    tag = "Conversations",
    params(
        ("sessionId" = String, Path, description = "Chatbot session identifier")
    ),
    request_body = AppendMessageRequest,
    responses(
        (status = 200, description = "Message appended", body = AppendMessageResponse),
        (status = 400, description = "Invalid payload")
    )
)]
#[post("/{sessionId}/messages")]
pub async fn append_message(
    app_state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<AppendMessageRequest>,
) -> Result<HttpResponse, AppError> {
    let session_id = parse_session_id(&path.into_inner())?;
    let payload = body.into_inner();
    validate_append(&payload.role, &payload.content)
        .map_err(|reason| AppError::Validation(reason.to_string()))?;

    let data = serde_json::json!({
        "sessionId": session_id,
        "role": payload.role,
        "content": payload.content.trim(),
    });

    let document = app_state
        .appwrite
        .create_document(
            app_state.config.effective_database_id(),
            app_state.config.effective_conversations_collection_id(),
            &data,
        )
        .await?;

    let id = document
        .get("$id")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let created_at = document
        .get("$createdAt")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| Utc::now().to_rfc3339());

    Ok(HttpResponse::Ok().json(AppendMessageResponse { id, created_at }))
}

fn parse_session_id(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Session id is required".to_string()));
    }
    Ok(trimmed.to_string())
}

// Функция для регистрации всех маршрутов этого модуля
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/conversations")
            .service(append_message)
            .service(get_conversation),
    );
}
