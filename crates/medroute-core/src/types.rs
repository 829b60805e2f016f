//! Shared types for backend responses and classification results

use serde::ser::Serializer;
use serde::Serialize;

/// Raw output of a backend call, before normalization.
///
/// `text` is the fragment expected to contain the label; structured
/// backends may additionally supply reasoning, a suggested routing
/// message, and a per-label score table.
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    /// Verbatim textual output expected to contain a label
    pub text: String,

    /// Backend-supplied explanation, if any
    pub reasoning: Option<String>,

    /// Backend-supplied routing message, if any
    pub message: Option<String>,

    /// Per-label scores in [0,1], for backends that produce them
    pub scores: Option<Vec<(String, f32)>>,
}

impl RawResponse {
    /// Create a plain-text response
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Attach a per-label score table
    pub fn with_scores(mut self, scores: Vec<(String, f32)>) -> Self {
        self.scores = Some(scores);
        self
    }
}

/// Confidence attached to a classification.
///
/// Score-producing backends yield a normalized value; generative backends
/// run at temperature 0 are treated as qualitatively confident by policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Confidence {
    /// Normalized score in [0,1]
    Score(f32),
    /// Qualitative level for backends without measurable confidence
    High,
}

impl Serialize for Confidence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Score(score) => serializer.serialize_f32(*score),
            Self::High => serializer.serialize_str("high"),
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Score(score) => write!(f, "{score:.3}"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Uniform classification record returned to callers regardless of backend
#[derive(Debug, Clone, Serialize)]
pub struct Classification {
    /// Resolved intent label, guaranteed to belong to the taxonomy
    pub category: String,

    /// Confidence in the resolved label
    pub confidence: Confidence,

    /// Human-readable redirect sentence
    pub routing_message: String,

    /// Free-text explanation, empty when the backend supplied none
    pub reasoning: String,

    /// Full per-label score table, when the backend produced one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<(String, f32)>>,

    /// Original backend text, retained for audit
    pub raw_response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_serializes_untagged() {
        assert_eq!(
            serde_json::to_string(&Confidence::Score(0.873)).unwrap(),
            "0.873"
        );
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"high\"");
    }

    #[test]
    fn test_confidence_display() {
        assert_eq!(Confidence::Score(0.5).to_string(), "0.500");
        assert_eq!(Confidence::High.to_string(), "high");
    }

    #[test]
    fn test_classification_json_shape() {
        let classification = Classification {
            category: "billing".to_string(),
            confidence: Confidence::High,
            routing_message: "I am redirecting you to billing experts.".to_string(),
            reasoning: String::new(),
            scores: None,
            raw_response: "billing".to_string(),
        };

        let json = serde_json::to_value(&classification).unwrap();
        assert_eq!(json["category"], "billing");
        assert_eq!(json["confidence"], "high");
        assert!(json.get("scores").is_none());
    }
}
