use actix_web::http::StatusCode;
use reqwest::Client;
use serde::Serialize;

use crate::api::validation::SanitizedLead;
use crate::errors::AppError;

/// Краткая сводка заявки для внешнего hook'а. Текст сообщения наружу не уходит.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadNotification<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub session_id: &'a str,
}

#[derive(Clone)]
pub struct NotifyService {
    client: Client,
}

impl NotifyService {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Отправляет POST запрос на hook URL со сводкой заявки
    pub async fn send_lead_notification(
        &self,
        hook_url: &str,
        lead: &SanitizedLead,
    ) -> Result<(), AppError> {
        let payload = LeadNotification {
            name: &lead.name,
            email: &lead.email,
            session_id: &lead.session_id,
        };

        let response = self
            .client
            .post(hook_url)
            .json(&payload)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Backend {
                status: StatusCode::from_u16(response.status().as_u16())
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                message: format!(
                    "notification hook returned error status: {}",
                    response.status()
                ),
            });
        }

        Ok(())
    }
}
