//! Zero-shot backend integration tests
//!
//! These exercise the real embedding model and therefore download weights
//! from the Hugging Face Hub on first run. They require the `ml-models`
//! feature and are ignored by default; run with `cargo test -- --ignored`.

#![cfg(feature = "ml-models")]

use medroute_classifiers::{Backend, ZeroShotBackend, ZeroShotConfig};

#[tokio::test]
#[ignore = "downloads the embedding model from the Hugging Face Hub"]
async fn test_zero_shot_scores_cover_all_labels() {
    let backend = ZeroShotBackend::new(ZeroShotConfig::default()).unwrap();
    let raw = backend.invoke("I need to check my bill").await.unwrap();

    let scores = raw.scores.expect("zero-shot backend returns scores");
    assert_eq!(scores.len(), 5);

    let total: f32 = scores.iter().map(|(_, s)| s).sum();
    assert!((total - 1.0).abs() < 0.01, "scores sum to {total}");

    // Ranked: the top label is the reported text
    assert_eq!(raw.text, scores[0].0);
    assert!(scores.windows(2).all(|w| w[0].1 >= w[1].1));
}

#[tokio::test]
#[ignore = "downloads the embedding model from the Hugging Face Hub"]
async fn test_zero_shot_is_deterministic() {
    let backend = ZeroShotBackend::new(ZeroShotConfig::default()).unwrap();

    let first = backend.invoke("the app won't load on my phone").await.unwrap();
    let second = backend.invoke("the app won't load on my phone").await.unwrap();

    assert_eq!(first.text, second.text);
    assert_eq!(first.scores, second.scores);
}

#[tokio::test]
#[ignore = "downloads the embedding model from the Hugging Face Hub"]
async fn test_zero_shot_custom_labels() {
    let config = ZeroShotConfig {
        labels: vec!["billing".to_string(), "scheduling".to_string()],
        ..Default::default()
    };
    let backend = ZeroShotBackend::new(config).unwrap();
    let raw = backend.invoke("can I move my appointment?").await.unwrap();

    let scores = raw.scores.unwrap();
    assert_eq!(scores.len(), 2);
}
