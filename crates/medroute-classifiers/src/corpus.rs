//! Labeled training corpus for the supervised backend

use medroute_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One labeled example message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingSample {
    /// Example message text
    pub text: String,

    /// Intent label
    pub label: String,
}

impl TrainingSample {
    fn new(text: &str, label: &str) -> Self {
        Self {
            text: text.to_string(),
            label: label.to_string(),
        }
    }
}

/// Built-in starter corpus covering the four routed intents.
///
/// Production deployments load a larger corpus from file; this set exists
/// so the supervised backend works out of the box.
pub fn default_corpus() -> Vec<TrainingSample> {
    vec![
        TrainingSample::new("I need to check my bill", "billing"),
        TrainingSample::new("There's a charge I don't recognize", "billing"),
        TrainingSample::new("My insurance claim was denied", "billing"),
        TrainingSample::new("I have chest pain", "clinical_advice"),
        TrainingSample::new(
            "What are the side effects of this medication?",
            "clinical_advice",
        ),
        TrainingSample::new("I need to see a doctor", "clinical_advice"),
        TrainingSample::new("Can I reschedule my appointment?", "scheduling"),
        TrainingSample::new("I need to cancel my visit", "scheduling"),
        TrainingSample::new("When is my next appointment?", "scheduling"),
        TrainingSample::new("The app won't load", "technical_support"),
        TrainingSample::new("I can't log into my account", "technical_support"),
        TrainingSample::new("The website is down", "technical_support"),
    ]
}

/// Load a corpus from a YAML file (a sequence of `{text, label}` entries)
pub fn load_corpus(path: impl AsRef<Path>) -> Result<Vec<TrainingSample>> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let samples: Vec<TrainingSample> = serde_yaml::from_str(&content)
        .map_err(|e| Error::config(format!("failed to parse training corpus: {e}")))?;

    if samples.is_empty() {
        return Err(Error::config("training corpus is empty"));
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_corpus_covers_four_labels() {
        let corpus = default_corpus();
        let labels: std::collections::HashSet<_> =
            corpus.iter().map(|s| s.label.as_str()).collect();

        assert_eq!(corpus.len(), 12);
        assert_eq!(labels.len(), 4);
        assert!(labels.contains("billing"));
        assert!(labels.contains("technical_support"));
    }

    #[test]
    fn test_load_corpus_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "- text: \"my bill is wrong\"\n  label: billing\n- text: \"the portal crashed\"\n  label: technical_support"
        )
        .unwrap();

        let samples = load_corpus(file.path()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].label, "billing");
    }

    #[test]
    fn test_load_empty_corpus_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[]").unwrap();

        let result = load_corpus(file.path());
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
