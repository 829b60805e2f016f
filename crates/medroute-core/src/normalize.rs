//! Response normalization: raw backend output to a uniform classification
//!
//! Every adapter funnels through [`normalize`], which owns category
//! validation, confidence resolution, and routing-message synthesis. The
//! adapters themselves never decide the final label.

use crate::taxonomy::Taxonomy;
use crate::types::{Classification, Confidence, RawResponse};
use tracing::debug;

/// Normalize a raw backend response against a taxonomy.
///
/// The category is always resolved by coercing the raw text, even when the
/// backend supplied a score table whose argmax disagrees; the verbatim text
/// is the more failure-tolerant signal. A text that contains no known label
/// silently resolves to the taxonomy's safe default.
pub fn normalize(raw: RawResponse, taxonomy: &Taxonomy) -> Classification {
    let category = taxonomy.coerce(&raw.text).to_string();

    let confidence = match &raw.scores {
        Some(scores) => {
            let score = scores
                .iter()
                .find(|(label, _)| *label == category)
                .map(|(_, score)| *score)
                .unwrap_or_else(|| {
                    debug!(%category, "coerced category missing from backend score table");
                    0.0
                });
            Confidence::Score(score)
        }
        None => Confidence::High,
    };

    let routing_message = match raw.message {
        Some(message) if !message.trim().is_empty() => message,
        _ => taxonomy.routing_message(&category),
    };

    Classification {
        category,
        confidence,
        routing_message,
        reasoning: raw.reasoning.unwrap_or_default(),
        scores: raw.scores,
        raw_response: raw.text,
    }
}
