//! AI input classification
//!
//! Turns free text or a captured image into structured nutrition or exercise
//! data. The trait is the seam the rest of the crate depends on; the Gemini
//! implementation lives in [`gemini`].

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ClassifiedInput;

pub use gemini::GeminiClassifier;

/// Classifier error types
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("classifier returned a malformed payload: {0}")]
    Malformed(String),

    #[error("{0}")]
    Service(String),

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,
}

/// Outcome of one classification submission
///
/// `Loading` is the transient phase surfaced through session state while a
/// submission is in flight; each submission resolves to exactly one terminal
/// `Success` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingResult {
    Loading,
    Success(ClassifiedInput),
    Error(String),
}

/// External service that understands free text and food photos
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a free-text description of food eaten or exercise done
    async fn classify_text(&self, input: &str) -> Result<ClassifiedInput, ClassifierError>;

    /// Classify a captured food image
    async fn classify_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ClassifiedInput, ClassifierError>;
}
