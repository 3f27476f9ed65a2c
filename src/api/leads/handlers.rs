use actix_web::{HttpResponse, get, post, web};
use chrono::Utc;

use crate::{
    api::validation::{sanitize, validate},
    app_state::AppState,
    errors::AppError,
};

use super::functions::generate_lead_id;
use super::structures::{LeadCapturedResponse, LeadHealthResponse, LeadSubmission};

/// Приём заявки из чат-бота: разбор -> валидация -> нормализация -> запись
#[utoipa::path(
    post,
    path = "/api/lead",
    tag = "Leads",
    request_body = LeadSubmission,
    responses(
        (status = 200, description = "Lead captured", body = LeadCapturedResponse),
        (status = 400, description = "Malformed body or failed validation"),
        (status = 500, description = "Lead was not persisted")
    )
)]
#[post("")]
pub async fn capture_lead(
    app_state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let raw: serde_json::Value =
        serde_json::from_slice(&body).map_err(|_| AppError::InvalidBody)?;

    let lead = validate(&raw).map_err(|reason| AppError::Validation(reason.to_string()))?;
    let lead = sanitize(lead);

    let outcome = match app_state.leads.capture_lead_info(&lead).await {
        Ok(outcome) => outcome,
        Err(err) => {
            // Сбой коллаборатора гасится здесь; наружу уходит только общий текст
            log::error!(
                "lead capture fault for session {}: {}",
                lead.session_id,
                err
            );
            return Err(AppError::Internal);
        }
    };

    if !outcome.succeeded() {
        log::warn!(
            "lead for session {} was not stored: {:?}",
            lead.session_id,
            outcome
        );
        return Err(AppError::CaptureFailed);
    }

    let response = LeadCapturedResponse {
        success: true,
        message: "Thank you! Your information has been received and our team will contact you shortly."
            .to_string(),
        lead_id: generate_lead_id(),
        session_id: lead.session_id,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Проверка живости сервиса
#[utoipa::path(
    get,
    path = "/api/lead",
    tag = "Leads",
    responses(
        (status = 200, description = "Service is up", body = LeadHealthResponse)
    )
)]
#[get("")]
pub async fn lead_health() -> HttpResponse {
    HttpResponse::Ok().json(LeadHealthResponse {
        status: "ok".to_string(),
        service: "lead-capture-api".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

// Функция для регистрации всех маршрутов этого модуля
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lead")
            .service(capture_lead)
            .service(lead_health),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::middleware::permissive_cors;
    use crate::api::validation::SanitizedLead;
    use crate::config::Config;
    use crate::services::appwrite_api::AppwriteApiService;
    use crate::services::lead_service::{CaptureOutcome, LeadSink};
    use actix_web::http::{Method, StatusCode, header};
    use actix_web::{App, test};
    use futures_util::future::BoxFuture;
    use serde_json::{Value, json};
    use std::sync::Arc;

    enum StubBehavior {
        Outcome(CaptureOutcome),
        Fault,
    }

    struct StubSink(StubBehavior);

    impl LeadSink for StubSink {
        fn capture_lead_info<'a>(
            &'a self,
            _lead: &'a SanitizedLead,
        ) -> BoxFuture<'a, Result<CaptureOutcome, AppError>> {
            Box::pin(async move {
                match &self.0 {
                    StubBehavior::Outcome(outcome) => Ok(*outcome),
                    StubBehavior::Fault => Err(AppError::Backend {
                        status: StatusCode::INTERNAL_SERVER_ERROR,
                        message: "secret backend detail".to_string(),
                    }),
                }
            })
        }
    }

    fn test_state(sink: StubSink) -> web::Data<AppState> {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            appwrite_endpoint: "http://localhost/v1".to_string(),
            appwrite_project_id: "test".to_string(),
            appwrite_api_key: "test".to_string(),
            appwrite_database_id: None,
            leads_collection_id: None,
            conversations_collection_id: None,
            lead_notify_hook_url: None,
            max_body_bytes: None,
            workers: None,
        };
        let appwrite = AppwriteApiService::new(
            config.appwrite_endpoint.clone(),
            config.appwrite_project_id.clone(),
            config.appwrite_api_key.clone(),
        );
        web::Data::new(AppState {
            config,
            appwrite,
            leads: Arc::new(sink),
        })
    }

    fn valid_body() -> Value {
        json!({
            "name": "Jane Doe",
            "email": " Jane@Example.COM ",
            "message": "I would like a quote please",
            "sessionId": "sess-1",
        })
    }

    #[actix_web::test]
    async fn capture_returns_lead_reference() {
        let app = test::init_service(
            App::new()
                .app_data(test_state(StubSink(StubBehavior::Outcome(
                    CaptureOutcome::Stored,
                ))))
                .service(web::scope("/api").configure(init_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["sessionId"], json!("sess-1"));
        let lead_id = body["leadId"].as_str().unwrap();
        assert!(lead_id.starts_with("lead_"));
        assert!(!body["message"].as_str().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn unavailable_backend_maps_to_retry_error() {
        let app = test::init_service(
            App::new()
                .app_data(test_state(StubSink(StubBehavior::Outcome(
                    CaptureOutcome::Unavailable,
                ))))
                .service(web::scope("/api").configure(init_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("try again"));
        assert!(body.get("leadId").is_none());
    }

    #[actix_web::test]
    async fn collaborator_fault_is_contained() {
        let app = test::init_service(
            App::new()
                .app_data(test_state(StubSink(StubBehavior::Fault)))
                .service(web::scope("/api").configure(init_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(valid_body())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        let error = body["error"].as_str().unwrap();
        assert!(!error.contains("secret backend detail"));
        assert!(!error.is_empty());
        assert_eq!(body["success"], json!(false));
    }

    #[actix_web::test]
    async fn malformed_body_is_rejected_before_validation() {
        let app = test::init_service(
            App::new()
                .app_data(test_state(StubSink(StubBehavior::Outcome(
                    CaptureOutcome::Stored,
                ))))
                .service(web::scope("/api").configure(init_routes)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/lead")
            .insert_header(header::ContentType::json())
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], json!("Invalid request body"));
    }

    #[actix_web::test]
    async fn validation_error_names_the_field() {
        let app = test::init_service(
            App::new()
                .app_data(test_state(StubSink(StubBehavior::Outcome(
                    CaptureOutcome::Stored,
                ))))
                .service(web::scope("/api").configure(init_routes)),
        )
        .await;

        let mut payload = valid_body();
        payload.as_object_mut().unwrap().remove("email");
        let req = test::TestRequest::post()
            .uri("/api/lead")
            .set_json(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], json!("Email is required"));
        assert!(body.get("success").is_none());
    }

    #[actix_web::test]
    async fn health_always_reports_ok() {
        let app = test::init_service(
            App::new()
                .app_data(test_state(StubSink(StubBehavior::Fault)))
                .service(web::scope("/api").configure(init_routes)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/lead").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], json!("ok"));
        assert_eq!(body["service"], json!("lead-capture-api"));
        assert!(!body["timestamp"].as_str().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn preflight_is_answered_for_any_origin() {
        let app = test::init_service(
            App::new()
                .wrap(permissive_cors())
                .app_data(test_state(StubSink(StubBehavior::Outcome(
                    CaptureOutcome::Stored,
                ))))
                .service(web::scope("/api").configure(init_routes)),
        )
        .await;

        let req = test::TestRequest::with_uri("/api/lead")
            .method(Method::OPTIONS)
            .insert_header((header::ORIGIN, "https://example.com"))
            .insert_header((header::ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
        let allowed = resp
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(allowed.contains("POST"));
        assert!(allowed.contains("GET"));
    }
}
