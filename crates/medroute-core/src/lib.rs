//! MedRoute Core
//!
//! Core types shared across MedRoute components:
//! - The intent taxonomy (closed label set + safe-default fallback)
//! - Raw backend response and normalized classification records
//! - Response normalization
//! - Error types and result handling
//!
//! This crate performs no I/O and knows nothing about any concrete
//! classification backend.

pub mod error;
pub mod normalize;
pub mod taxonomy;
pub mod types;

pub use error::{Error, Result};
pub use normalize::normalize;
pub use taxonomy::{Taxonomy, DEFAULT_LABELS, DEFAULT_SAFE_LABEL};
pub use types::{Classification, Confidence, RawResponse};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::normalize::normalize;
    pub use crate::taxonomy::Taxonomy;
    pub use crate::types::{Classification, Confidence, RawResponse};
}
