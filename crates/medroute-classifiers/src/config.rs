//! Runtime configuration for classifier construction
//!
//! Everything here is resolved once, when the facade is built; nothing is
//! consulted per call. Loadable from YAML with the same shape a caller
//! would assemble programmatically.

use medroute_core::{Error, Result, Taxonomy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which classification strategy to construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Hosted chat-completions endpoint
    Remote,
    /// Local generative inference endpoint
    Local,
    /// TF-IDF + logistic regression, trained at startup
    #[default]
    Supervised,
    /// Embedding-similarity zero-shot model
    ZeroShot,
}

impl std::str::FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "remote" => Ok(Self::Remote),
            "local" => Ok(Self::Local),
            "supervised" => Ok(Self::Supervised),
            "zero-shot" | "zero_shot" | "zeroshot" => Ok(Self::ZeroShot),
            other => Err(Error::config(format!(
                "unknown backend '{other}' (expected remote, local, supervised, or zero-shot)"
            ))),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Remote => "remote",
            Self::Local => "local",
            Self::Supervised => "supervised",
            Self::ZeroShot => "zero-shot",
        };
        write!(f, "{name}")
    }
}

/// Configuration for the message classifier
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RouterConfig {
    /// Classification strategy
    #[serde(default)]
    pub backend: BackendKind,

    /// Model identifier; each backend has its own default
    pub model: Option<String>,

    /// Endpoint base URL for the generative backends
    pub base_url: Option<String>,

    /// Bearer token for the remote backend
    pub api_key: Option<String>,

    /// Intent labels in priority order; stock taxonomy when absent
    pub labels: Option<Vec<String>>,

    /// Safe-default label; must be one of `labels` when both are given
    pub safe_default: Option<String>,

    /// Instructional template file for the remote backend
    pub prompt_template: Option<PathBuf>,

    /// Training corpus file for the supervised backend
    pub corpus: Option<PathBuf>,

    /// Request timeout override, in seconds
    pub timeout_secs: Option<u64>,
}

impl RouterConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("failed to parse configuration: {e}")))
    }

    /// Load from file, or defaults when the file does not exist
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Build the taxonomy this configuration describes
    pub fn taxonomy(&self) -> Result<Taxonomy> {
        match &self.labels {
            Some(labels) => {
                let safe_default = self
                    .safe_default
                    .clone()
                    .or_else(|| labels.last().cloned())
                    .ok_or_else(|| Error::config("taxonomy requires at least one label"))?;
                Taxonomy::new(labels.clone(), safe_default)
            }
            None => match &self.safe_default {
                Some(safe_default) => Taxonomy::new(
                    medroute_core::DEFAULT_LABELS.iter().map(|l| l.to_string()),
                    safe_default.clone(),
                ),
                None => Ok(Taxonomy::default()),
            },
        }
    }
}
