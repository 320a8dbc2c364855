use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub queue: QueueConfig,
    pub kafka: KafkaConfig,
    pub chapa: ChapaConfig,
    pub email: EmailConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 { 5 }

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QueueBackend {
    Kafka,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct QueueConfig {
    pub backend: QueueBackend,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub email_topic: String,
    pub group_id: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChapaConfig {
    pub base_url: String,
    pub callback_url: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Unset means payment initialization answers 500 until configured.
    pub secret_key: Option<String>,
}

fn default_timeout_seconds() -> u64 { 30 }

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub from_address: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allow_all_origins: bool,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment and local overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // VOYAGE__CHAPA__BASE_URL=... sets chapa.base_url
            .add_source(config::Environment::with_prefix("VOYAGE").separator("__"));

        Self::finish(builder, env::var("CHAPA_SECRET_KEY").ok())
    }

    /// The gateway secret conventionally lives in `CHAPA_SECRET_KEY`; it wins over file values.
    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        secret_key: Option<String>,
    ) -> Result<Self, config::ConfigError> {
        let secret_key = secret_key.filter(|k| !k.trim().is_empty());
        builder
            .set_override_option("chapa.secret_key", secret_key)?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder().add_source(config::File::from_str(
            include_str!("../../config/default.toml"),
            config::FileFormat::Toml,
        ))
    }

    #[test]
    fn test_default_file_deserializes() {
        let config = Config::finish(defaults(), None).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(config.queue.backend, QueueBackend::Kafka);
        assert_eq!(config.chapa.timeout_seconds, 30);
        assert!(config.chapa.secret_key.is_none());
        assert!(!config.cors.allow_all_origins);
        assert_eq!(config.cors.allowed_origins, vec!["http://localhost:3000".to_string()]);
    }

    #[test]
    fn test_secret_key_override() {
        let config = Config::finish(defaults(), Some("CHASECK_TEST-abc".to_string())).unwrap();
        assert_eq!(config.chapa.secret_key.as_deref(), Some("CHASECK_TEST-abc"));

        let blank = Config::finish(defaults(), Some("  ".to_string())).unwrap();
        assert!(blank.chapa.secret_key.is_none());
    }

    #[test]
    fn test_memory_backends() {
        let builder = defaults()
            .set_override("storage.backend", "memory")
            .unwrap()
            .set_override("queue.backend", "memory")
            .unwrap();
        let config = Config::finish(builder, None).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.queue.backend, QueueBackend::Memory);
    }
}
