//! Zero-shot backend: sentence-embedding similarity against label hypotheses
//!
//! Loads a general-purpose sentence-embedding BERT once at construction
//! and pre-embeds one hypothesis per taxonomy label ("This message is
//! about {label}."). Classification embeds the incoming message and ranks
//! labels by cosine similarity; no task-specific training step exists.

use crate::backend::Backend;
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use medroute_core::{Error, RawResponse, Result, DEFAULT_LABELS};
use std::path::PathBuf;
use tokenizers::Tokenizer;
use tracing::info;

/// Default sentence-embedding model repository
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Softmax temperature applied to cosine similarities; cosine values live
/// in a narrow band, so they are sharpened before ranking.
const SIMILARITY_SCALE: f32 = 10.0;

/// Configuration for the zero-shot backend
#[derive(Debug, Clone)]
pub struct ZeroShotConfig {
    /// Hugging Face model repository for the embedding model
    pub model_repo: String,

    /// Candidate labels, in taxonomy declaration order
    pub labels: Vec<String>,
}

impl Default for ZeroShotConfig {
    fn default() -> Self {
        Self {
            model_repo: DEFAULT_MODEL_REPO.to_string(),
            labels: DEFAULT_LABELS.iter().map(|l| l.to_string()).collect(),
        }
    }
}

/// Backend that classifies by embedding similarity to label hypotheses
pub struct ZeroShotBackend {
    name: String,
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    labels: Vec<String>,
    /// One pre-computed hypothesis embedding per label
    hypothesis_embeddings: Vec<Vec<f32>>,
}

impl ZeroShotBackend {
    /// Download (or reuse from cache) and load the embedding model, then
    /// pre-embed the label hypotheses.
    pub fn new(config: ZeroShotConfig) -> Result<Self> {
        if config.labels.is_empty() {
            return Err(Error::config("zero-shot backend requires candidate labels"));
        }

        info!(model = %config.model_repo, "loading zero-shot embedding model");

        let (model, tokenizer, device) = load_embedding_model(&config.model_repo)?;

        let mut backend = Self {
            name: "zero-shot".to_string(),
            model,
            tokenizer,
            device,
            labels: config.labels,
            hypothesis_embeddings: Vec::new(),
        };

        backend.hypothesis_embeddings = backend
            .labels
            .iter()
            .map(|label| {
                let hypothesis =
                    format!("This message is about {}.", label.replace('_', " "));
                backend.embed(&hypothesis)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(labels = backend.labels.len(), "zero-shot backend ready");
        Ok(backend)
    }

    /// Mean-pooled token embeddings for a text
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| Error::backend(format!("tokenization failed: {e}")))?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::backend(format!("failed to build input tensor: {e}")))?;

        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)
            .and_then(|t| t.unsqueeze(0))
            .map_err(|e| Error::backend(format!("failed to build token type tensor: {e}")))?;

        let output = self
            .model
            .forward(&input_ids, &token_type_ids, None)
            .map_err(|e| Error::backend(format!("model forward pass failed: {e}")))?;

        // [1, seq, hidden] -> mean over the sequence axis -> [hidden]
        output
            .squeeze(0)
            .and_then(|t| t.mean(0))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| Error::backend(format!("failed to pool embeddings: {e}")))
    }

    /// Ranked `(label, score)` pairs for a message, scores summing to 1
    fn rank_labels(&self, message: &str) -> Result<Vec<(String, f32)>> {
        let message_embedding = self.embed(message)?;

        let similarities: Vec<f32> = self
            .hypothesis_embeddings
            .iter()
            .map(|h| cosine_similarity(&message_embedding, h))
            .collect();

        let scores = scaled_softmax(&similarities);

        let mut ranked: Vec<(String, f32)> = self
            .labels
            .iter()
            .cloned()
            .zip(scores)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(ranked)
    }
}

#[async_trait]
impl Backend for ZeroShotBackend {
    async fn invoke(&self, message: &str) -> Result<RawResponse> {
        let ranked = self.rank_labels(message)?;
        let top = ranked
            .first()
            .ok_or_else(|| Error::backend("zero-shot ranking produced no labels"))?;

        Ok(RawResponse::from_text(top.0.clone()).with_scores(ranked))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Fetch model files from the Hub and load them onto the CPU
fn load_embedding_model(repo_id: &str) -> Result<(BertModel, Tokenizer, Device)> {
    let api = hf_hub::api::sync::Api::new()
        .map_err(|e| Error::config(format!("failed to initialize HF API: {e}")))?;
    let repo = api.repo(hf_hub::Repo::model(repo_id.to_string()));

    let fetch = |filename: &str| -> Result<PathBuf> {
        repo.get(filename)
            .map_err(|e| Error::config(format!("failed to download {filename}: {e}")))
    };

    let config_path = fetch("config.json")?;
    let tokenizer_path = fetch("tokenizer.json")?;
    let weights_path = fetch("model.safetensors")?;

    let bert_config: BertConfig =
        serde_json::from_str(&std::fs::read_to_string(&config_path)?)
            .map_err(|e| Error::config(format!("failed to parse model config: {e}")))?;

    let tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| Error::config(format!("failed to load tokenizer: {e}")))?;

    let device = Device::Cpu;
    let vb = unsafe {
        VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
            .map_err(|e| Error::config(format!("failed to load weights: {e}")))?
    };

    let model = BertModel::load(vb, &bert_config)
        .map_err(|e| Error::config(format!("failed to load BERT model: {e}")))?;

    Ok((model, tokenizer, device))
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn scaled_softmax(values: &[f32]) -> Vec<f32> {
    let max = values
        .iter()
        .copied()
        .fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = values
        .iter()
        .map(|v| ((v - max) * SIMILARITY_SCALE).exp())
        .collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}
