use crate::errors::AppError;
use actix_web::http::StatusCode;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

/// Клиент документного бекенда (Appwrite-совместимый REST API).
#[derive(Clone)]
pub struct AppwriteApiService {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentList {
    pub total: u64,
    pub documents: Vec<Value>,
}

// Generic request helpers
impl AppwriteApiService {
    pub fn new(endpoint: String, project_id: String, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id,
            api_key,
        }
    }

    async fn request<T: Serialize, R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&T>,
    ) -> Result<R, AppError> {
        let url = format!("{}{}", self.endpoint, path);
        let mut request_builder = self
            .client
            .request(method, &url)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key);

        if !query.is_empty() {
            request_builder = request_builder.query(query);
        }
        if let Some(body_data) = body {
            request_builder = request_builder.json(body_data);
        }

        let response = request_builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error reading response body".to_string());
            log::error!(
                "Document API error on path {}: {} - {}",
                path,
                status,
                error_text
            );
            // reqwest и actix используют разные версии http, поэтому код переносим через u16
            return Err(AppError::Backend {
                status: StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY),
                message: error_text,
            });
        }

        let result = response.json::<R>().await?;
        Ok(result)
    }
}

// API method implementations
impl AppwriteApiService {
    /// Лёгкая проверка доступности бекенда
    pub async fn ping(&self) -> Result<(), AppError> {
        let _: Value = self
            .request(Method::GET, "/health/version", &[], None::<&()>)
            .await?;
        Ok(())
    }

    pub async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        data: &Value,
    ) -> Result<Value, AppError> {
        let path = format!(
            "/databases/{}/collections/{}/documents",
            database_id, collection_id
        );
        // Идентификатор документа назначает бекенд
        let body = serde_json::json!({
            "documentId": "unique()",
            "data": data,
        });
        self.request(Method::POST, &path, &[], Some(&body)).await
    }

    pub async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[String],
    ) -> Result<DocumentList, AppError> {
        let path = format!(
            "/databases/{}/collections/{}/documents",
            database_id, collection_id
        );
        let query: Vec<(&str, String)> = queries.iter().map(|q| ("queries[]", q.clone())).collect();
        self.request(Method::GET, &path, &query, None::<&()>).await
    }

    pub async fn get_collection(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> Result<Value, AppError> {
        let path = format!("/databases/{}/collections/{}", database_id, collection_id);
        self.request(Method::GET, &path, &[], None::<&()>).await
    }

    pub async fn create_database(&self, database_id: &str, name: &str) -> Result<Value, AppError> {
        let body = serde_json::json!({ "databaseId": database_id, "name": name });
        self.request(Method::POST, "/databases", &[], Some(&body))
            .await
    }

    pub async fn create_collection(
        &self,
        database_id: &str,
        collection_id: &str,
        name: &str,
    ) -> Result<Value, AppError> {
        let path = format!("/databases/{}/collections", database_id);
        let body = serde_json::json!({
            "collectionId": collection_id,
            "name": name,
            "documentSecurity": false,
        });
        self.request(Method::POST, &path, &[], Some(&body)).await
    }

    pub async fn create_string_attribute(
        &self,
        database_id: &str,
        collection_id: &str,
        key: &str,
        size: u32,
        required: bool,
    ) -> Result<Value, AppError> {
        let path = format!(
            "/databases/{}/collections/{}/attributes/string",
            database_id, collection_id
        );
        let body = serde_json::json!({ "key": key, "size": size, "required": required });
        self.request(Method::POST, &path, &[], Some(&body)).await
    }

    pub async fn create_datetime_attribute(
        &self,
        database_id: &str,
        collection_id: &str,
        key: &str,
        required: bool,
    ) -> Result<Value, AppError> {
        let path = format!(
            "/databases/{}/collections/{}/attributes/datetime",
            database_id, collection_id
        );
        let body = serde_json::json!({ "key": key, "required": required });
        self.request(Method::POST, &path, &[], Some(&body)).await
    }
}
