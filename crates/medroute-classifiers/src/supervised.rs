//! Supervised backend: TF-IDF features + multinomial logistic regression
//!
//! The model is fitted once at construction from a labeled corpus and
//! never mutated afterward. Training is full-batch gradient descent from
//! zero-initialized weights with a fixed epoch count, so a fixed corpus
//! always produces the same model.

use crate::backend::Backend;
use crate::corpus::TrainingSample;
use crate::tfidf::TfIdfVectorizer;
use async_trait::async_trait;
use medroute_core::{Error, RawResponse, Result};
use tracing::info;

const EPOCHS: usize = 500;
const LEARNING_RATE: f32 = 0.5;

/// Backend that classifies with a linear model trained at initialization
pub struct SupervisedBackend {
    name: String,
    vectorizer: TfIdfVectorizer,
    /// Class labels in first-seen corpus order
    classes: Vec<String>,
    /// Per-class weight vector; the trailing element is the bias
    weights: Vec<Vec<f32>>,
}

impl SupervisedBackend {
    /// Fit a classifier on a labeled corpus
    pub fn new(samples: &[TrainingSample]) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::config("supervised backend requires training samples"));
        }

        let documents: Vec<String> = samples.iter().map(|s| s.text.clone()).collect();
        let vectorizer = TfIdfVectorizer::fit(&documents);

        let mut classes: Vec<String> = Vec::new();
        let mut targets: Vec<usize> = Vec::with_capacity(samples.len());
        for sample in samples {
            let idx = match classes.iter().position(|c| *c == sample.label) {
                Some(idx) => idx,
                None => {
                    classes.push(sample.label.clone());
                    classes.len() - 1
                }
            };
            targets.push(idx);
        }

        let features: Vec<Vec<f32>> = documents.iter().map(|d| vectorizer.transform(d)).collect();
        let weights = train(&features, &targets, classes.len());

        info!(
            samples = samples.len(),
            classes = classes.len(),
            features = vectorizer.vocabulary_size(),
            "trained supervised classifier"
        );

        Ok(Self {
            name: "supervised".to_string(),
            vectorizer,
            classes,
            weights,
        })
    }

    /// Probability distribution over the trained classes
    fn predict_proba(&self, message: &str) -> Vec<f32> {
        let features = self.vectorizer.transform(message);
        predict_with(&self.weights, &features)
    }
}

#[async_trait]
impl Backend for SupervisedBackend {
    async fn invoke(&self, message: &str) -> Result<RawResponse> {
        let probs = self.predict_proba(message);

        let predicted = probs
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx)
            .ok_or_else(|| Error::backend("classifier produced no distribution"))?;

        let scores: Vec<(String, f32)> = self
            .classes
            .iter()
            .zip(&probs)
            .map(|(class, &p)| (class.clone(), round3(p)))
            .collect();

        Ok(RawResponse::from_text(self.classes[predicted].clone()).with_scores(scores))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Full-batch gradient descent on the softmax cross-entropy objective
fn train(features: &[Vec<f32>], targets: &[usize], n_classes: usize) -> Vec<Vec<f32>> {
    let n_features = features.first().map(|f| f.len()).unwrap_or(0);
    let n_samples = features.len() as f32;
    let mut weights = vec![vec![0.0f32; n_features + 1]; n_classes];

    for _ in 0..EPOCHS {
        let mut gradients = vec![vec![0.0f32; n_features + 1]; n_classes];

        for (x, &y) in features.iter().zip(targets) {
            let probs = predict_with(&weights, x);
            for (k, gradient) in gradients.iter_mut().enumerate() {
                let err = probs[k] - if k == y { 1.0 } else { 0.0 };
                for (j, &xj) in x.iter().enumerate() {
                    gradient[j] += err * xj;
                }
                gradient[n_features] += err;
            }
        }

        for (w, gradient) in weights.iter_mut().zip(&gradients) {
            for (wj, gj) in w.iter_mut().zip(gradient) {
                *wj -= LEARNING_RATE * gj / n_samples;
            }
        }
    }

    weights
}

/// Softmax over per-class linear scores; the last weight is the bias
fn predict_with(weights: &[Vec<f32>], x: &[f32]) -> Vec<f32> {
    let logits: Vec<f32> = weights
        .iter()
        .map(|w| {
            let bias = w[w.len() - 1];
            x.iter().zip(w.iter()).map(|(xi, wi)| xi * wi).sum::<f32>() + bias
        })
        .collect();
    softmax(&logits)
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

fn round3(value: f32) -> f32 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::default_corpus;

    #[tokio::test]
    async fn test_billing_message_routes_to_billing() {
        let backend = SupervisedBackend::new(&default_corpus()).unwrap();
        let raw = backend.invoke("I need to check my bill").await.unwrap();

        assert_eq!(raw.text, "billing");

        let scores = raw.scores.unwrap();
        assert_eq!(scores.len(), 4);
        let billing = scores.iter().find(|(l, _)| l == "billing").unwrap().1;
        assert!(billing >= 0.5, "expected confident billing, got {billing}");
        assert!(scores.iter().all(|(_, p)| (0.0..=1.0).contains(p)));

        let total: f32 = scores.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 0.01, "scores sum to {total}");
    }

    #[tokio::test]
    async fn test_scheduling_message_routes_to_scheduling() {
        let backend = SupervisedBackend::new(&default_corpus()).unwrap();
        let raw = backend
            .invoke("Can I reschedule my appointment?")
            .await
            .unwrap();

        assert_eq!(raw.text, "scheduling");
    }

    #[tokio::test]
    async fn test_deterministic_across_calls() {
        let backend = SupervisedBackend::new(&default_corpus()).unwrap();
        let first = backend.invoke("the website is down").await.unwrap();
        let second = backend.invoke("the website is down").await.unwrap();

        assert_eq!(first.text, second.text);
        assert_eq!(first.scores, second.scores);
    }

    #[tokio::test]
    async fn test_deterministic_across_trainings() {
        let a = SupervisedBackend::new(&default_corpus()).unwrap();
        let b = SupervisedBackend::new(&default_corpus()).unwrap();

        let ra = a.invoke("my insurance claim was denied").await.unwrap();
        let rb = b.invoke("my insurance claim was denied").await.unwrap();

        assert_eq!(ra.text, rb.text);
        assert_eq!(ra.scores, rb.scores);
    }

    #[test]
    fn test_empty_corpus_rejected() {
        let result = SupervisedBackend::new(&[]);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_softmax_is_a_distribution() {
        let probs = softmax(&[1.0, 2.0, 3.0]);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(probs[2] > probs[1] && probs[1] > probs[0]);
    }
}
