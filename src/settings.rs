use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Looked up in the working directory; missing is fine.
pub const CONFIG_FILE: &str = "class-schedule.toml";
/// `CLASS_SCHEDULE__HTTP__ADDR=127.0.0.1:8080` overrides `http.addr`.
pub const ENV_PREFIX: &str = "CLASS_SCHEDULE";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid http.addr '{addr}': {source}")]
    InvalidAddr {
        addr: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub log: LogSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_addr")]
    pub addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageSettings {
    /// Catalog file the CLI opens on start, `.json` or `.csv`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Settings {
    /// `.env`, then [`CONFIG_FILE`], then `CLASS_SCHEDULE__*` variables; later sources win.
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::build(Path::new(CONFIG_FILE), true)
    }

    /// Reads one TOML file only, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        Self::build(path, false)
    }

    fn build(path: &Path, with_env: bool) -> Result<Self, SettingsError> {
        let mut builder = config::Config::builder().add_source(
            config::File::from(path)
                .format(config::FileFormat::Toml)
                .required(false),
        );
        if with_env {
            builder = builder.add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            );
        }
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.http_addr()?;
        Ok(settings)
    }

    pub fn http_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.http
            .addr
            .parse()
            .map_err(|source| SettingsError::InvalidAddr {
                addr: self.http.addr.clone(),
                source,
            })
    }
}
