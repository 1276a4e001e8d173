use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Maintenance connection used by `sync-schema` to create the target
    /// database when it does not exist yet.
    pub admin_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Token and cookie lifetime in hours.
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Entry lifetime in seconds for the single-entity response cache.
    pub ttl_secs: u64,
}

/// S3-compatible object storage settings.
#[derive(Debug, Deserialize, Clone)]
pub struct OssConfig {
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    /// Public domain prefix for uploaded objects. When absent, presigned
    /// GET URLs are handed out instead.
    pub domain: Option<String>,
    pub presign_ttl_secs: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cache: CacheConfig,
    pub oss: OssConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_hours", 24)?
            .set_default("cache.ttl_secs", 600)?
            .set_default("oss.presign_ttl_secs", 86400)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., SITE__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("SITE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
