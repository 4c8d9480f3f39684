//! # contract: service boundaries of the pipeline
//!
//! The pipeline talks to two external language-model services:
//! - a structured-output **scoring** service, one request per collected document ([`Scorer`]);
//! - a free-text **synthesis** service, one request per run ([`Synthesizer`]).
//!
//! Both are plain traits so callers construct a concrete client once and pass it
//! in explicitly. Nothing in this crate holds a global client.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall` (`MockScorer`, `MockSynthesizer`), exported
//!   behind the `test-export-mocks` feature so downstream crates can use them in tests.
//!
//! ## Structured output
//! A scoring response is either a validated [`Assessment`] or a schema violation,
//! modeled as the tagged [`ScoreOutcome`]. Callers match on it; they never probe fields.

use async_trait::async_trait;
#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;
use serde::Serialize;

use crate::assess::Assessment;
use crate::select::SelectedItem;

/// Bounded payload sent to the scoring service for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentRequest {
    /// Relative path of the document.
    pub path: String,
    /// Lowercased extension including the dot, empty when there is none.
    pub extension: String,
    /// Byte length of the full (collected) content.
    pub size: usize,
    /// Content clipped to the sample character limit.
    pub sample: String,
}

/// What came back from the scoring service.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreOutcome {
    /// The response conformed to the assessment schema.
    Valid(Assessment),
    /// The response could not be read as an assessment.
    SchemaViolation { raw: String, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode service response: {0}")]
    Decode(String),
    #[error("{0}")]
    Other(String),
}

/// Structured-output scoring service.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Scorer: Send + Sync {
    /// Rate one document for README relevance.
    async fn score(&self, request: &AssessmentRequest) -> Result<ScoreOutcome, ServiceError>;
}

/// Free-text README synthesis service.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Produce the README text from the selected items, in the given order,
    /// answering `question`.
    async fn synthesize(
        &self,
        items: &[SelectedItem],
        question: &str,
    ) -> Result<String, ServiceError>;
}
