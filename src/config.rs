use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Redis connection URL (prediction cache)
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Rating-prediction service base URL
    #[serde(default = "default_prediction_api_url")]
    pub prediction_api_url: String,

    /// Upper bound on a single prediction call, in milliseconds
    #[serde(default = "default_prediction_timeout_ms")]
    pub prediction_timeout_ms: u64,

    /// Path to the movie catalog JSON file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
}

fn default_database_url() -> String {
    "sqlite:moodrec.db".to_string()
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_prediction_api_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_prediction_timeout_ms() -> u64 {
    2_000
}

fn default_catalog_path() -> String {
    "data/catalog.json".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
