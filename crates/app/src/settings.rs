//! Handles settings for the application. Configuration is written in
//! `settings.toml`.
use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

/// External tool paths are configuration-injected; an unavailable tool is a
/// request-time error, never a crash at startup.
#[derive(Debug, Deserialize)]
pub struct Tools {
    #[serde(default = "default_tesseract")]
    pub tesseract: String,
    #[serde(default = "default_wkhtmltopdf")]
    pub wkhtmltopdf: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            tesseract: default_tesseract(),
            wkhtmltopdf: default_wkhtmltopdf(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    #[serde(default)]
    pub tools: Tools,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .build()?;

        settings.try_deserialize()
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_tesseract() -> String {
    "tesseract".to_string()
}

fn default_wkhtmltopdf() -> String {
    "wkhtmltopdf".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}
