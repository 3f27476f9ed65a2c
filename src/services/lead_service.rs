use chrono::Utc;
use futures_util::future::BoxFuture;
use serde_json::json;

use crate::api::validation::SanitizedLead;
use crate::config::Config;
use crate::errors::AppError;

use super::appwrite_api::AppwriteApiService;
use super::notify_service::NotifyService;

/// Результат попытки сохранить заявку.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureOutcome {
    /// Документ записан в бекенд
    Stored,
    /// Бекенд отказал в записи; повтор с теми же данными не поможет
    Rejected,
    /// Временный сбой бекенда; имеет смысл повторить позже
    Unavailable,
}

impl CaptureOutcome {
    /// Двоичный взгляд на результат для кода, которому не нужны детали
    pub fn succeeded(&self) -> bool {
        matches!(self, CaptureOutcome::Stored)
    }
}

/// Приёмник заявок. HTTP-обработчик знает только этот контракт, поэтому в
/// тестах его подменяет заглушка.
pub trait LeadSink: Send + Sync {
    fn capture_lead_info<'a>(
        &'a self,
        lead: &'a SanitizedLead,
    ) -> BoxFuture<'a, Result<CaptureOutcome, AppError>>;
}

#[derive(Clone)]
pub struct LeadService {
    api: AppwriteApiService,
    notifier: NotifyService,
    database_id: String,
    collection_id: String,
    notify_hook_url: Option<String>,
}

impl LeadService {
    pub fn new(api: AppwriteApiService, config: &Config) -> Self {
        Self {
            api,
            notifier: NotifyService::new(),
            database_id: config.effective_database_id().to_string(),
            collection_id: config.effective_leads_collection_id().to_string(),
            notify_hook_url: config.lead_notify_hook_url.clone(),
        }
    }

    async fn store(&self, lead: &SanitizedLead) -> Result<CaptureOutcome, AppError> {
        let mut data = serde_json::to_value(lead)?;
        if let Some(record) = data.as_object_mut() {
            record.insert("capturedAt".to_string(), json!(Utc::now().to_rfc3339()));
        }

        match self
            .api
            .create_document(&self.database_id, &self.collection_id, &data)
            .await
        {
            Ok(_) => {
                log::info!("captured lead for session {}", lead.session_id);
                self.notify(lead).await;
                Ok(CaptureOutcome::Stored)
            }
            Err(AppError::Backend { status, message }) => {
                log::warn!("lead document was not stored ({}): {}", status, message);
                if status.is_client_error() {
                    Ok(CaptureOutcome::Rejected)
                } else {
                    Ok(CaptureOutcome::Unavailable)
                }
            }
            Err(other) => Err(other),
        }
    }

    /// Сбой уведомления не влияет на судьбу заявки
    async fn notify(&self, lead: &SanitizedLead) {
        let Some(hook_url) = &self.notify_hook_url else {
            return;
        };
        if let Err(err) = self.notifier.send_lead_notification(hook_url, lead).await {
            log::warn!("lead notification hook failed: {}", err);
        }
    }
}

impl LeadSink for LeadService {
    fn capture_lead_info<'a>(
        &'a self,
        lead: &'a SanitizedLead,
    ) -> BoxFuture<'a, Result<CaptureOutcome, AppError>> {
        Box::pin(self.store(lead))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_stored_counts_as_success() {
        assert!(CaptureOutcome::Stored.succeeded());
        assert!(!CaptureOutcome::Rejected.succeeded());
        assert!(!CaptureOutcome::Unavailable.succeeded());
    }
}
