//! Application state wiring all services together.
//!
//! `Services` is the storage-layer wiring shared by the server and the
//! maintenance commands (cleanup, status). `AppState` adds the provider
//! singleton on top and is what the HTTP handlers see: the provider is
//! constructed once at startup with explicit configuration and injected,
//! never constructed per request.

use std::path::PathBuf;
use std::sync::Arc;

use parley_core::chat::service::ChatService;
use parley_core::llm::box_provider::BoxLlmProvider;
use parley_infra::sqlite::chat::SqliteChatRepository;
use parley_infra::sqlite::pool::{DatabasePool, resolve_data_dir};
use parley_types::config::ChatConfig;

/// Concrete service type pinned to the SQLite repository implementation.
pub type ConcreteChatService = ChatService<SqliteChatRepository>;

/// Storage-layer wiring: database pool, configuration, chat service.
pub struct Services {
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
    pub config: ChatConfig,
    pub chat_service: Arc<ConcreteChatService>,
}

impl Services {
    /// Initialize storage: resolve the data directory, connect to the
    /// database (running migrations), and load `config.toml` if present.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("parley.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;

        let config_path = data_dir.join("config.toml");
        let config = match tokio::fs::read_to_string(&config_path).await {
            Ok(raw) => toml::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid {}: {e}", config_path.display()))?,
            Err(_) => ChatConfig::default(),
        };

        let chat_service = Arc::new(ChatService::new(SqliteChatRepository::new(db_pool.clone())));

        Ok(Self {
            data_dir,
            db_pool,
            config,
            chat_service,
        })
    }
}

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub provider: Arc<BoxLlmProvider>,
    pub config: Arc<ChatConfig>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Combine the storage wiring with the provider singleton.
    pub fn new(services: &Services, provider: BoxLlmProvider) -> Self {
        Self {
            chat_service: services.chat_service.clone(),
            provider: Arc::new(provider),
            config: Arc::new(services.config.clone()),
            db_pool: services.db_pool.clone(),
        }
    }
}
