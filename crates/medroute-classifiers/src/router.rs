//! Message classifier facade: the single entry point for callers
//!
//! Holds exactly one backend, chosen at construction, and funnels every
//! raw response through the core normalizer. Callers never see
//! backend-specific behavior beyond latency.

use crate::backend::Backend;
use crate::config::{BackendKind, RouterConfig};
use crate::corpus;
use crate::local::{LocalConfig, LocalGenerativeBackend};
use crate::remote::{RemoteConfig, RemoteGenerativeBackend};
use crate::supervised::SupervisedBackend;
use medroute_core::{normalize, Classification, Error, Result, Taxonomy};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Facade over one configured classification backend
pub struct MessageClassifier {
    backend: Arc<dyn Backend>,
    taxonomy: Taxonomy,
}

impl MessageClassifier {
    /// Wrap an already-constructed backend
    pub fn new(backend: Arc<dyn Backend>, taxonomy: Taxonomy) -> Self {
        Self { backend, taxonomy }
    }

    /// Build the backend a configuration describes and wrap it.
    ///
    /// Model-holding backends do their one-time training or model load
    /// here; this is the expensive step, `classify` is not.
    pub fn from_config(config: &RouterConfig) -> Result<Self> {
        let taxonomy = config.taxonomy()?;
        let labels: Vec<String> = taxonomy.labels().to_vec();

        let backend: Arc<dyn Backend> = match config.backend {
            BackendKind::Remote => {
                let mut remote = RemoteConfig {
                    labels,
                    api_key: config.api_key.clone(),
                    ..Default::default()
                };
                if let Some(model) = &config.model {
                    remote.model = model.clone();
                }
                if let Some(base_url) = &config.base_url {
                    remote.base_url = base_url.clone();
                }
                if let Some(secs) = config.timeout_secs {
                    remote.timeout = Duration::from_secs(secs);
                }
                if let Some(path) = &config.prompt_template {
                    remote.prompt_template = Some(std::fs::read_to_string(path)?);
                }
                Arc::new(RemoteGenerativeBackend::new(remote)?)
            }
            BackendKind::Local => {
                let mut local = LocalConfig {
                    labels,
                    ..Default::default()
                };
                if let Some(model) = &config.model {
                    local.model = model.clone();
                }
                if let Some(base_url) = &config.base_url {
                    local.base_url = base_url.clone();
                }
                if let Some(secs) = config.timeout_secs {
                    local.timeout = Duration::from_secs(secs);
                }
                Arc::new(LocalGenerativeBackend::new(local)?)
            }
            BackendKind::Supervised => {
                let samples = match &config.corpus {
                    Some(path) => corpus::load_corpus(path)?,
                    None => corpus::default_corpus(),
                };
                for sample in &samples {
                    if !taxonomy.contains(&sample.label) {
                        warn!(label = %sample.label, "corpus label is not in the taxonomy");
                    }
                }
                Arc::new(SupervisedBackend::new(&samples)?)
            }
            BackendKind::ZeroShot => {
                #[cfg(feature = "ml-models")]
                {
                    let mut zero_shot = crate::zero_shot::ZeroShotConfig {
                        labels,
                        ..Default::default()
                    };
                    if let Some(model) = &config.model {
                        zero_shot.model_repo = model.clone();
                    }
                    Arc::new(crate::zero_shot::ZeroShotBackend::new(zero_shot)?)
                }
                #[cfg(not(feature = "ml-models"))]
                {
                    return Err(Error::config(
                        "zero-shot backend requires the 'ml-models' feature",
                    ));
                }
            }
        };

        info!(backend = backend.name(), "message classifier ready");
        Ok(Self { backend, taxonomy })
    }

    /// Name of the configured backend
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// The taxonomy this classifier routes into
    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Classify a single message.
    ///
    /// Empty or whitespace-only input is rejected before any backend call;
    /// backend failures surface as `Err`, never as a defaulted category.
    pub async fn classify(&self, message: &str) -> Result<Classification> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::validation("message must not be empty"));
        }

        let raw = self.backend.invoke(message).await?;
        debug!(backend = self.backend.name(), raw = %raw.text, "backend responded");

        Ok(normalize(raw, &self.taxonomy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_supervised_default() {
        let classifier = MessageClassifier::from_config(&RouterConfig::default()).unwrap();
        assert_eq!(classifier.backend_name(), "supervised");
        assert_eq!(classifier.taxonomy().safe_default(), "unknown");
    }

    #[test]
    fn test_from_config_remote_and_local() {
        let mut config = RouterConfig {
            backend: BackendKind::Remote,
            ..Default::default()
        };
        let classifier = MessageClassifier::from_config(&config).unwrap();
        assert_eq!(classifier.backend_name(), "remote-generative");

        config.backend = BackendKind::Local;
        let classifier = MessageClassifier::from_config(&config).unwrap();
        assert_eq!(classifier.backend_name(), "local-generative");
    }

    #[tokio::test]
    async fn test_supervised_end_to_end() {
        let classifier = MessageClassifier::from_config(&RouterConfig::default()).unwrap();
        let result = classifier.classify("I need to check my bill").await.unwrap();

        assert_eq!(result.category, "billing");
        assert_eq!(
            result.routing_message,
            "I am redirecting you to billing experts."
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_validation_error() {
        let classifier = MessageClassifier::from_config(&RouterConfig::default()).unwrap();

        assert!(matches!(
            classifier.classify("").await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            classifier.classify("   \n\t").await,
            Err(Error::Validation(_))
        ));
    }
}
