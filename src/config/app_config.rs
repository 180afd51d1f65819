use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{ChunkIdScheme, ChunkingConfig, DomainError, IngestionConfig, QueryConfig};
use crate::infrastructure::llm::{ProviderKind, ProviderSettings};
use crate::infrastructure::vector_store::StoreSettings;

/// Flat environment variables and the configuration keys they override.
///
/// Later entries win when several variables target the same key.
const FLAT_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("UPLOAD_DIR", "storage.upload_dir"),
    ("CHROMA_PATH", "storage.vector_store_path"),
    ("VECTOR_STORE_PATH", "storage.vector_store_path"),
    ("VECTOR_STORE_URL", "storage.vector_store_url"),
    ("COLLECTION_NAME", "storage.collection"),
    ("EMBED_MODEL", "providers.embedding_model"),
    ("EMBEDDING_MODEL", "providers.embedding_model"),
    ("GENERATION_MODEL", "providers.generation_model"),
    ("GOOGLE_API_KEY", "providers.api_key"),
    ("LLM_PROVIDER", "providers.kind"),
];

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub providers: ProvidersConfig,
    pub ingestion: IngestionSection,
    pub query: QueryConfig,
    pub conversation: ConversationConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// File locations and the vector store backend
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Uploaded PDFs are kept here indefinitely
    pub upload_dir: PathBuf,
    /// Directory of the local SQLite store
    pub vector_store_path: PathBuf,
    /// Chroma server URL; selects the Chroma backend when set
    pub vector_store_url: Option<String>,
    pub collection: String,
}

/// Embedding and generation provider settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub base_url: Option<String>,
    pub embedding_model: String,
    pub generation_model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestionSection {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub max_chunks: usize,
    pub id_scheme: ChunkIdScheme,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConversationConfig {
    /// Turns kept per session; 0 keeps all of them
    pub max_turns: usize,
    /// Sessions kept in memory; the least recently used one is dropped
    /// when a new session would exceed it. 0 disables the cap
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("data/uploads"),
            vector_store_path: PathBuf::from("book_db"),
            vector_store_url: None,
            collection: "book_knowledge".to_string(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            api_key: String::new(),
            base_url: None,
            embedding_model: "models/text-embedding-004".to_string(),
            generation_model: "gemini-2.0-flash".to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl Default for IngestionSection {
    fn default() -> Self {
        let defaults = IngestionConfig::default();
        Self {
            chunk_size: defaults.chunking.chunk_size,
            chunk_overlap: defaults.chunking.chunk_overlap,
            max_chunks: defaults.max_chunks,
            id_scheme: defaults.id_scheme,
        }
    }
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_turns: 20,
            max_sessions: 1000,
        }
    }
}

impl IngestionSection {
    pub fn to_ingestion_config(&self) -> IngestionConfig {
        IngestionConfig::default()
            .with_chunking(ChunkingConfig::new(self.chunk_size, self.chunk_overlap))
            .with_max_chunks(self.max_chunks)
            .with_id_scheme(self.id_scheme)
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local`, `APP__` variables and
    /// the flat variables, in increasing precedence. `.env` is read first.
    pub fn load() -> Result<Self, config::ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load_from_env(std::env::vars().collect())
    }

    /// Same as [`AppConfig::load`] with an explicit environment
    pub fn load_from_env(env: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env.clone())),
            );

        for (var, key) in FLAT_ENV_OVERRIDES {
            let value = env.get(*var).filter(|v| !v.trim().is_empty()).cloned();
            if value.is_some() {
                builder = builder.set_override_option(*key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Reject settings the pipelines cannot run with
    pub fn validate(&self) -> Result<(), DomainError> {
        self.ingestion
            .to_ingestion_config()
            .validate()
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        self.query
            .validate()
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        if self.storage.collection.trim().is_empty() {
            return Err(DomainError::configuration("collection name must not be empty"));
        }

        if self.providers.embedding_model.trim().is_empty()
            || self.providers.generation_model.trim().is_empty()
        {
            return Err(DomainError::configuration("model names must not be empty"));
        }

        Ok(())
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            kind: self.providers.kind,
            api_key: self.providers.api_key.clone(),
            base_url: self.providers.base_url.clone(),
            timeout: Duration::from_secs(self.providers.request_timeout_secs),
        }
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            path: self.storage.vector_store_path.clone(),
            url: self.storage.vector_store_url.clone(),
            collection: self.storage.collection.clone(),
            timeout: Duration::from_secs(self.providers.request_timeout_secs),
        }
    }
}
