//! Handles settings for the application.
//!
//! Sources, lowest priority first: `settings.toml` (or the file given with
//! `--config`), `DOMPET__*` environment variables, then the plain
//! `DATABASE_URL`, `JWT_SECRET`, `PORT` and `CORS_ORIGINS` variables.

use clap::Parser;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Parser)]
#[command(name = "dompet", about = "Personal finance bookkeeping API")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Server {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
    pub password_cost: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Server,
}

fn default_level() -> String {
    "info".to_string()
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let args = Args::parse();
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);

        let mut builder = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("DOMPET")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins")
                    .try_parsing(true),
            )
            .set_override_option("server.database_url", env_var("DATABASE_URL"))?
            .set_override_option("server.jwt_secret", env_var("JWT_SECRET"))?
            .set_override_option("server.port", env_var("PORT"))?;
        if let Some(origins) = env_var("CORS_ORIGINS") {
            let origins: Vec<String> = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(ToString::to_string)
                .collect();
            builder = builder.set_override("server.cors_origins", origins)?;
        }

        let settings: Settings = builder.build()?.try_deserialize()?;
        if settings.server.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "server.jwt_secret must not be empty".to_string(),
            ));
        }
        Ok(settings)
    }
}
