use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod api;
mod app_state;
mod config;
mod errors;
mod services;

use crate::api::{conversations, leads};
use crate::app_state::AppState;
use crate::config::Config;
use crate::services::appwrite_api::AppwriteApiService;
use crate::services::lead_service::{LeadService, LeadSink};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().expect("Failed to load configuration");

    let appwrite = AppwriteApiService::new(
        config.appwrite_endpoint.clone(),
        config.appwrite_project_id.clone(),
        config.appwrite_api_key.clone(),
    );
    let leads: Arc<dyn LeadSink> = Arc::new(LeadService::new(appwrite.clone(), &config));

    #[derive(OpenApi)]
    #[openapi(
        paths(
            // Leads
            leads::capture_lead,
            leads::lead_health,
            // Conversations
            conversations::get_conversation,
            conversations::append_message,
        ),
        components(
            schemas(
                // --- Leads ---
                leads::LeadSubmission,
                leads::LeadCapturedResponse,
                leads::LeadHealthResponse,

                // --- Conversations ---
                conversations::AppendMessageRequest,
                conversations::AppendMessageResponse,
                conversations::ConversationMessageView,
                conversations::ConversationResponse,
            )
        ),
        tags(
            (name = "Leads", description = "Lead capture endpoints"),
            (name = "Conversations", description = "Chatbot conversation log endpoints")
        )
    )]
    struct ApiDoc;

    let host = config.host.clone();
    let port = config.port;
    let workers = config.effective_workers();
    let max_body_bytes = config.effective_max_body_bytes();

    log::info!("Starting server at http://{}:{}", host, port);
    log::info!("Swagger UI available at http://{}:{}/swagger-ui/", host, port);

    let app_state = AppState {
        config,
        appwrite,
        leads,
    };

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::NormalizePath::trim())
            .wrap(api::middleware::RequestId)
            .wrap(api::middleware::permissive_cors())
            .app_data(web::PayloadConfig::new(max_body_bytes))
            .app_data(web::Data::new(app_state.clone()))
            .service(
                web::scope("/api")
                    .configure(leads::init_routes)
                    .configure(conversations::init_routes),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
