use config::Config;

use crate::related::{DEFAULT_CANDIDATE_MULTIPLIER, DEFAULT_LIMIT};

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub related: RelatedConfig,
}

impl Settings {
    /// Loads the given files in order, later ones overriding earlier ones,
    /// then applies `APP_` environment variables (`APP_SERVER__PORT=9000`).
    pub fn try_load(paths: &[&str]) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder();
        for path in paths {
            builder = builder.add_source(config::File::with_name(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize::<Self>()
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct DatabaseConfig {
    /// Without a url the service runs on the in-memory store.
    pub url: Option<String>,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct RelatedConfig {
    #[serde(default = "default_related_limit")]
    pub default_limit: usize,
    #[serde(default = "default_related_max_limit")]
    pub max_limit: usize,
    #[serde(default = "default_candidate_multiplier")]
    pub candidate_multiplier: usize,
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            default_limit: default_related_limit(),
            max_limit: default_related_max_limit(),
            candidate_multiplier: default_candidate_multiplier(),
        }
    }
}

fn default_related_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_related_max_limit() -> usize {
    20
}

fn default_candidate_multiplier() -> usize {
    DEFAULT_CANDIDATE_MULTIPLIER
}
