use clap::{Parser, Subcommand};
use serde_json::Value;

use leadflow::config::Config;
use leadflow::errors::AppError;
use leadflow::services::appwrite_api::AppwriteApiService;

// Определяем структуру команд CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, verbatim_doc_comment)]
/// Утилита командной строки для администрирования документного бекенда.
/// Позволяет создавать коллекции, проверять схему и просматривать документы.
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Команды для работы с документной базой.
    Db {
        #[command(subcommand)]
        db_command: DbCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DbCommand {
    /// Создаёт базу, коллекции leads/conversations и их атрибуты.
    /// Повторный запуск безопасен: существующие объекты пропускаются.
    Setup,
    /// Проверяет доступность бекенда и наличие обеих коллекций.
    Validate,
    /// Выполняет запрос к коллекции и выводит документы в формате JSON.
    Query {
        /// Имя коллекции: 'leads' или 'conversations'.
        #[arg(short, long)]
        collection: String,

        /// Фильтр по sessionId (опционально).
        #[arg(short, long)]
        session_id: Option<String>,

        /// Максимальное число документов.
        #[arg(short, long, default_value_t = 25)]
        limit: u64,
    },
}

#[derive(Debug)]
enum AttributeSpec {
    Text {
        key: &'static str,
        size: u32,
        required: bool,
    },
    Timestamp {
        key: &'static str,
        required: bool,
    },
}

const LEAD_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::Text { key: "name", size: 100, required: true },
    AttributeSpec::Text { key: "email", size: 254, required: true },
    AttributeSpec::Text { key: "phone", size: 32, required: false },
    AttributeSpec::Text { key: "message", size: 1000, required: true },
    AttributeSpec::Text { key: "sessionId", size: 128, required: true },
    AttributeSpec::Timestamp { key: "capturedAt", required: false },
];

const CONVERSATION_ATTRIBUTES: &[AttributeSpec] = &[
    AttributeSpec::Text { key: "sessionId", size: 128, required: true },
    AttributeSpec::Text { key: "role", size: 16, required: true },
    AttributeSpec::Text { key: "content", size: 2000, required: true },
];

/// Выполняет создание объекта, пропуская его, если он уже существует (HTTP 409)
async fn ensure<F>(label: &str, op: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: std::future::Future<Output = Result<Value, AppError>>,
{
    match op.await {
        Ok(_) => {
            println!("Создано: {}", label);
            Ok(())
        }
        Err(AppError::Backend { status, .. }) if status.as_u16() == 409 => {
            println!("{} уже существует, пропускаем", label);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

async fn ensure_attributes(
    api: &AppwriteApiService,
    database_id: &str,
    collection_id: &str,
    specs: &[AttributeSpec],
) -> Result<(), Box<dyn std::error::Error>> {
    for spec in specs {
        match spec {
            AttributeSpec::Text { key, size, required } => {
                ensure(
                    &format!("атрибут {}.{}", collection_id, key),
                    api.create_string_attribute(database_id, collection_id, key, *size, *required),
                )
                .await?;
            }
            AttributeSpec::Timestamp { key, required } => {
                ensure(
                    &format!("атрибут {}.{}", collection_id, key),
                    api.create_datetime_attribute(database_id, collection_id, key, *required),
                )
                .await?;
            }
        }
    }
    Ok(())
}

async fn setup(
    api: &AppwriteApiService,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let database_id = config.effective_database_id();
    ensure(
        &format!("база {}", database_id),
        api.create_database(database_id, "CRM"),
    )
    .await?;

    let leads_id = config.effective_leads_collection_id();
    ensure(
        &format!("коллекция {}", leads_id),
        api.create_collection(database_id, leads_id, "Leads"),
    )
    .await?;
    ensure_attributes(api, database_id, leads_id, LEAD_ATTRIBUTES).await?;

    let conversations_id = config.effective_conversations_collection_id();
    ensure(
        &format!("коллекция {}", conversations_id),
        api.create_collection(database_id, conversations_id, "Conversations"),
    )
    .await?;
    ensure_attributes(api, database_id, conversations_id, CONVERSATION_ATTRIBUTES).await?;

    println!("Схема успешно подготовлена.");
    Ok(())
}

async fn validate_schema(
    api: &AppwriteApiService,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    api.ping()
        .await
        .map_err(|e| format!("Бекенд недоступен: {}", e))?;
    println!("Бекенд доступен.");

    let database_id = config.effective_database_id();
    let mut missing = Vec::new();
    for collection_id in [
        config.effective_leads_collection_id(),
        config.effective_conversations_collection_id(),
    ] {
        match api.get_collection(database_id, collection_id).await {
            Ok(_) => println!("Коллекция {} на месте.", collection_id),
            Err(AppError::Backend { status, .. }) if status.as_u16() == 404 => {
                println!("Коллекция {} НЕ найдена.", collection_id);
                missing.push(collection_id.to_string());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if missing.is_empty() {
        println!("Схема валидна.");
        Ok(())
    } else {
        Err(format!("Отсутствуют коллекции: {}", missing.join(", ")).into())
    }
}

async fn query(
    api: &AppwriteApiService,
    config: &Config,
    collection: &str,
    session_id: Option<&str>,
    limit: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let collection_id = match collection {
        "leads" => config.effective_leads_collection_id(),
        "conversations" => config.effective_conversations_collection_id(),
        _ => return Err("Неверная коллекция. Используйте 'leads' или 'conversations'".into()),
    };

    let mut queries = vec![
        serde_json::json!({ "method": "limit", "values": [limit] }).to_string(),
    ];
    if let Some(session_id) = session_id {
        queries.push(
            serde_json::json!({
                "method": "equal",
                "attribute": "sessionId",
                "values": [session_id],
            })
            .to_string(),
        );
    }

    let list = api
        .list_documents(config.effective_database_id(), collection_id, &queries)
        .await?;

    println!("{}", serde_json::to_string_pretty(&list.documents)?);
    println!("Всего документов: {}", list.total);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Не удалось загрузить конфигурацию");
    let cli = Cli::parse();

    let api = AppwriteApiService::new(
        config.appwrite_endpoint.clone(),
        config.appwrite_project_id.clone(),
        config.appwrite_api_key.clone(),
    );

    match &cli.command {
        Commands::Db { db_command } => match db_command {
            DbCommand::Setup => setup(&api, &config).await?,
            DbCommand::Validate => validate_schema(&api, &config).await?,
            DbCommand::Query {
                collection,
                session_id,
                limit,
            } => query(&api, &config, collection, session_id.as_deref(), *limit).await?,
        },
    }

    Ok(())
}
