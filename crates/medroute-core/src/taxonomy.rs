//! Intent taxonomy: the closed label set and safe-default fallback
//!
//! Generative backends frequently wrap the label in extra prose, so label
//! resolution is a case-insensitive substring scan over the candidate text.
//! When several labels appear, declaration order decides; when none appears,
//! the taxonomy's safe default wins.

use crate::error::{Error, Result};
use aho_corasick::AhoCorasick;

/// The stock label set used by the patient message router
pub const DEFAULT_LABELS: [&str; 5] = [
    "billing",
    "clinical_advice",
    "scheduling",
    "technical_support",
    "unknown",
];

/// The stock safe-default label
pub const DEFAULT_SAFE_LABEL: &str = "unknown";

/// Closed set of intent labels with a designated safe default.
///
/// Constructed once at process start; immutable afterward.
pub struct Taxonomy {
    labels: Vec<String>,
    safe_default: String,
    matcher: AhoCorasick,
}

impl Taxonomy {
    /// Create a taxonomy from an ordered label set and a safe default.
    ///
    /// The safe default must be a member of the label set.
    pub fn new(
        labels: impl IntoIterator<Item = impl Into<String>>,
        safe_default: impl Into<String>,
    ) -> Result<Self> {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let safe_default = safe_default.into();

        if labels.is_empty() {
            return Err(Error::config("taxonomy requires at least one label"));
        }
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(Error::config("taxonomy labels must be non-empty"));
            }
            if labels[..i].contains(label) {
                return Err(Error::config(format!("duplicate taxonomy label: {label}")));
            }
        }
        if !labels.contains(&safe_default) {
            return Err(Error::config(format!(
                "safe default '{safe_default}' is not a taxonomy label"
            )));
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&labels)
            .map_err(|e| Error::config(format!("failed to build label matcher: {e}")))?;

        Ok(Self {
            labels,
            safe_default,
            matcher,
        })
    }

    /// Labels in declaration order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// The label assigned when no known label can be found
    pub fn safe_default(&self) -> &str {
        &self.safe_default
    }

    /// Check whether a label belongs to the taxonomy
    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Resolve a backend's textual output to a taxonomy label.
    ///
    /// Scans for every label occurrence, including overlapping ones, and
    /// picks the earliest-declared label found. Falls back to the safe
    /// default when the text contains no known label.
    pub fn coerce<'a>(&'a self, candidate: &str) -> &'a str {
        self.matcher
            .find_overlapping_iter(candidate)
            .map(|m| m.pattern().as_usize())
            .min()
            .map(|idx| self.labels[idx].as_str())
            .unwrap_or(&self.safe_default)
    }

    /// Canned redirect sentence for a label.
    ///
    /// The stock labels keep the product's original wording; custom labels
    /// get a generic redirect built from the label itself.
    pub fn routing_message(&self, label: &str) -> String {
        match label {
            "billing" => "I am redirecting you to billing experts.".to_string(),
            "clinical_advice" => "I am redirecting you to clinical experts.".to_string(),
            "scheduling" => "I am redirecting you to scheduling experts.".to_string(),
            "technical_support" => {
                "I am redirecting you to technical support experts.".to_string()
            }
            "unknown" => "Can you elaborate more?".to_string(),
            other => format!("I am redirecting you to {} experts.", other.replace('_', " ")),
        }
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::new(DEFAULT_LABELS, DEFAULT_SAFE_LABEL)
            .expect("stock taxonomy is valid")
    }
}

impl std::fmt::Debug for Taxonomy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Taxonomy")
            .field("labels", &self.labels)
            .field("safe_default", &self.safe_default)
            .finish()
    }
}
