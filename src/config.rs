use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub appwrite_endpoint: String,
    pub appwrite_project_id: String,
    pub appwrite_api_key: String,
    pub appwrite_database_id: Option<String>,
    pub leads_collection_id: Option<String>,
    pub conversations_collection_id: Option<String>,
    pub lead_notify_hook_url: Option<String>,
    pub max_body_bytes: Option<usize>,
    pub workers: Option<usize>,
}

impl Config {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()?;

        let config: Config = cfg.try_deserialize()?;

        // Валидация конфигурации
        config.validate()?;

        Ok(config)
    }

    /// Валидирует конфигурацию на наличие потенциальных проблем безопасности
    fn validate(&self) -> Result<(), config::ConfigError> {
        // Проверяем, что host не содержит подозрительных символов
        if !self
            .host
            .chars()
            .all(|c| c.is_alphanumeric() || ".:-_".contains(c))
        {
            return Err(config::ConfigError::Message(
                "Invalid host format".to_string(),
            ));
        }

        // Проверяем разумные ограничения для порта (u16 максимум 65535)
        if self.port < 1024 {
            return Err(config::ConfigError::Message(
                "Port must be 1024 or higher for security reasons".to_string(),
            ));
        }

        // Endpoint бекенда обязан быть валидным http(s) URL
        let endpoint = Url::parse(&self.appwrite_endpoint).map_err(|_| {
            config::ConfigError::Message(format!(
                "Invalid backend endpoint: {}",
                self.appwrite_endpoint
            ))
        })?;
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(config::ConfigError::Message(
                "Backend endpoint must use http or https".to_string(),
            ));
        }

        if self.appwrite_project_id.trim().is_empty() || self.appwrite_api_key.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "Backend project id and API key must be set".to_string(),
            ));
        }

        if let Some(hook_url) = &self.lead_notify_hook_url {
            if Url::parse(hook_url).is_err() {
                return Err(config::ConfigError::Message(format!(
                    "Invalid notify hook URL: {}",
                    hook_url
                )));
            }
        }

        // Валидируем лимит тела (если указан): 1KB..10MB
        if let Some(limit) = self.max_body_bytes {
            let min = 1024; // 1KB
            let max = 10 * 1024 * 1024; // 10MB
            if limit < min || limit > max {
                return Err(config::ConfigError::Message(format!(
                    "max_body_bytes must be between {} and {} bytes",
                    min, max
                )));
            }
        }

        Ok(())
    }
}

impl Config {
    pub fn effective_max_body_bytes(&self) -> usize {
        self.max_body_bytes.unwrap_or(64 * 1024)
    }

    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    pub fn effective_database_id(&self) -> &str {
        self.appwrite_database_id.as_deref().unwrap_or("crm")
    }

    pub fn effective_leads_collection_id(&self) -> &str {
        self.leads_collection_id.as_deref().unwrap_or("leads")
    }

    pub fn effective_conversations_collection_id(&self) -> &str {
        self.conversations_collection_id.as_deref().unwrap_or("conversations")
    }
}
