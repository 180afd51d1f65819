//! Layered application configuration

mod app_config;

pub use app_config::{
    AppConfig, ConversationConfig, IngestionSection, LogFormat, LoggingConfig, ProvidersConfig,
    ServerConfig, StorageConfig,
};
