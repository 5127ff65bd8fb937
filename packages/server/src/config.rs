//! Server configuration.
//!
//! Optional TOML file; every field has a default and CLI flags override the file.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8080
//!
//! [answerer]
//! search_url = "http://localhost:8900"
//! repository = "default"
//! top_k = 1
//! timeout_secs = 30
//!
//! [contexts]
//! cs50 = "cs50.embedding"
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;

use crate::{
    domain::{AnswerContext, ClassId, ValueObjectError},
    infrastructure::answerer::search::{DEFAULT_REPOSITORY, DEFAULT_TOP_K},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid class id in [contexts]: {0}")]
    InvalidClassId(#[from] ValueObjectError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub answerer: AnswererConfig,
    /// Answer contexts attached at startup, keyed by class id.
    #[serde(default)]
    pub contexts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AnswererConfig {
    /// Base URL of the search service. Unset disables answering.
    #[serde(default)]
    pub search_url: Option<String>,
    #[serde(default = "default_repository")]
    pub repository: String,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_repository() -> String {
    DEFAULT_REPOSITORY.to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for AnswererConfig {
    fn default() -> Self {
        Self {
            search_url: None,
            repository: default_repository(),
            top_k: default_top_k(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AnswererConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load config from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => Ok(Self::default()),
        }
    }

    /// Validated `[contexts]` table.
    pub fn answer_contexts(&self) -> Result<HashMap<ClassId, AnswerContext>, ConfigError> {
        self.contexts
            .iter()
            .map(|(class_id, index)| -> Result<_, ConfigError> {
                Ok((ClassId::new(class_id.clone())?, AnswerContext::new(index.as_str())))
            })
            .collect()
    }
}
