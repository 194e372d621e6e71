//! Application state wiring services together.
//!
//! AppState holds the concrete service instances used by the REST API.
//! The chat service is generic over the repository trait, pinned here to
//! the SQLite implementation. The model registry and configuration are
//! built once at startup and immutable afterwards.

use std::sync::Arc;

use tidechat_core::chat::service::ChatService;
use tidechat_core::llm::registry::ModelRegistry;
use tidechat_infra::config::{build_registry, load_app_config, resolve_data_dir};
use tidechat_infra::sqlite::chat::SqliteChatRepository;
use tidechat_infra::sqlite::pool::DatabasePool;
use tidechat_types::config::AppConfig;

/// Concrete type alias pinning the service generic to the infra implementation.
pub type ConcreteChatService = ChatService<SqliteChatRepository>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub models: Arc<ModelRegistry>,
    pub config: Arc<AppConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the DB, load config,
    /// build the model registry, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("tidechat.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let config = load_app_config(&data_dir).await;
        let models = build_registry(&config);

        let chat_repo = SqliteChatRepository::new(db_pool.clone());
        let chat_service = ChatService::new(chat_repo);

        Ok(Self {
            chat_service: Arc::new(chat_service),
            models: Arc::new(models),
            config: Arc::new(config),
            db_pool,
        })
    }
}
