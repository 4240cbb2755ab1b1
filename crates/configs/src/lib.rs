//! # configs
//!
//! Layered settings: built-in defaults, then an optional `clipforge.toml`,
//! then `CLIPFORGE__SECTION__KEY` environment variables (a `.env` file is
//! loaded first when present).

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::debug;

pub const ENV_PREFIX: &str = "CLIPFORGE";
pub const CONFIG_FILE: &str = "clipforge";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Directory holding one JSON file per storage key
    pub dir: String,
    /// Key the project list lives under
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub upload_interval_ms: u64,
    pub upload_max_increment: f64,
    pub processing_interval_ms: u64,
    pub processing_max_increment: f64,
    pub min_increment: f64,
    #[serde(default)]
    pub seed: Option<u64>,
    /// Empty means shorts carry no media reference
    pub placeholder_video_url: String,
}

impl PipelineSettings {
    pub fn video_url(&self) -> Option<String> {
        let url = self.placeholder_video_url.trim();
        (!url.is_empty()).then(|| url.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    pub dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive, e.g. "info,cf_pipeline=debug"
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Deserialize)]
pub struct AccountSettings {
    pub email: String,
    #[serde(deserialize_with = "secret")]
    pub password: SecretString,
}

fn secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub storage: StorageSettings,
    pub pipeline: PipelineSettings,
    pub report: ReportSettings,
    pub log: LogSettings,
    pub account: AccountSettings,
}

impl Settings {
    /// Reads `.env`, `clipforge.toml` and the process environment.
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    /// Same layering as `load`, with the environment source supplied by the caller.
    pub fn from_env(env: Environment) -> Result<Self, SettingsError> {
        let settings = Config::builder()
            .set_default("storage.dir", "./data")?
            .set_default("storage.key", "videoProjects")?
            .set_default("pipeline.upload_interval_ms", 200)?
            .set_default("pipeline.upload_max_increment", 15.0)?
            .set_default("pipeline.processing_interval_ms", 300)?
            .set_default("pipeline.processing_max_increment", 8.0)?
            .set_default("pipeline.min_increment", 0.5)?
            .set_default(
                "pipeline.placeholder_video_url",
                "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
            )?
            .set_default("report.dir", "./reports")?
            .set_default("log.filter", "info")?
            .set_default("log.json", false)?
            .set_default("account.email", "demo@clipforge.local")?
            .set_default("account.password", "clipforge-demo")?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(env.prefix_separator("__").separator("__").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
