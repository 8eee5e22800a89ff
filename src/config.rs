//! Layered configuration.
//!
//! Built-in defaults, then `newsverify.toml` (or the file given on the command
//! line), then `NEWSVERIFY_*` environment variables with `__` separating
//! nested keys, e.g. `NEWSVERIFY_SERVER__PORT=8080`.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "newsverify.toml";
pub const ENV_PREFIX: &str = "NEWSVERIFY_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body cap; unlimited when unset.
    pub max_body_bytes: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_owned(),
            port: 5000,
            max_body_bytes: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// How the two artifact files are found inside the model directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactLayout {
    /// Search the whole directory tree for the file names.
    Walk,
    /// Both files directly inside the model directory. Deprecated.
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    pub model_dir: PathBuf,
    pub model_file: String,
    pub vectorizer_file: String,
    pub layout: ArtifactLayout,
    /// Zip archive fetched when `model_dir` is absent.
    pub archive_url: Option<String>,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        ArtifactConfig {
            model_dir: PathBuf::from("models"),
            model_file: "fake_news_model.msgpack.gz".to_owned(),
            vectorizer_file: "vectorizer.msgpack.gz".to_owned(),
            layout: ArtifactLayout::Walk,
            archive_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub artifacts: ArtifactConfig,
}

impl Config {
    /// Merges defaults, the TOML file and the environment. A missing file is
    /// not an error.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let file = file.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
        let config: Config = Self::figment(file).extract()?;
        Ok(config)
    }

    pub fn figment(file: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Fails fast on settings that can only break later.
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::InvalidConfig("server.host is empty".into()));
        }
        if self.server.port == 0 {
            return Err(Error::InvalidConfig("server.port must be > 0".into()));
        }
        if self.server.max_body_bytes == Some(0) {
            return Err(Error::InvalidConfig("server.max_body_bytes must be > 0".into()));
        }

        let a = &self.artifacts;
        if a.model_dir.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("artifacts.model_dir is empty".into()));
        }
        validate_file_name("artifacts.model_file", &a.model_file)?;
        validate_file_name("artifacts.vectorizer_file", &a.vectorizer_file)?;
        if a.model_file == a.vectorizer_file {
            return Err(Error::InvalidConfig(
                "artifacts.model_file and artifacts.vectorizer_file must differ".into(),
            ));
        }
        if let Some(url) = &a.archive_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::InvalidConfig(format!(
                    "artifacts.archive_url must be http(s), got `{url}`"
                )));
            }
        }
        Ok(())
    }
}

fn validate_file_name(key: &str, name: &str) -> Result<()> {
    if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(Error::InvalidConfig(format!(
            "{key} must be a plain file name, got `{name}`"
        )));
    }
    Ok(())
}
