use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Схема запроса для Swagger. Фактический разбор тела идёт через
/// `api::validation::validate`, чтобы неверные типы полей превращались в
/// ошибки валидации, а не в отказ десериализации.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    pub session_id: String,
}

#[derive(Serialize, ToSchema, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LeadCapturedResponse {
    pub success: bool,
    pub message: String,
    pub lead_id: String,
    pub session_id: String,
}

#[derive(Serialize, ToSchema, Clone)]
pub struct LeadHealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}
