//! MedRoute Classifiers
//!
//! Interchangeable classification backends for routing patient messages:
//! - Remote generative (hosted chat-completions endpoint)
//! - Local generative (self-hosted inference endpoint)
//! - Supervised (TF-IDF + logistic regression, trained at startup)
//! - Zero-shot (embedding similarity, `ml-models` feature)
//!
//! All backends implement the [`Backend`] trait and are consumed through
//! the [`MessageClassifier`] facade, which owns input validation and
//! response normalization. Backends hold only initialize-once, read-only
//! resources and are safe for concurrent callers.

pub mod backend;
pub mod config;
pub mod corpus;
pub mod local;
pub mod remote;
pub mod router;
pub mod supervised;
pub mod tfidf;

#[cfg(feature = "ml-models")]
pub mod zero_shot;

pub use backend::Backend;
pub use config::{BackendKind, RouterConfig};
pub use corpus::{default_corpus, load_corpus, TrainingSample};
pub use local::{LocalConfig, LocalGenerativeBackend};
pub use remote::{RemoteConfig, RemoteGenerativeBackend, DEFAULT_PROMPT_TEMPLATE};
pub use router::MessageClassifier;
pub use supervised::SupervisedBackend;

#[cfg(feature = "ml-models")]
pub use zero_shot::{ZeroShotBackend, ZeroShotConfig};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::backend::Backend;
    pub use crate::config::{BackendKind, RouterConfig};
    pub use crate::router::MessageClassifier;
    pub use medroute_core::{Classification, Confidence, Error, Result, Taxonomy};

    #[cfg(feature = "ml-models")]
    pub use crate::zero_shot::ZeroShotBackend;
}
