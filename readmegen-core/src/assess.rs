//! Relevance Assessor: one structured [`Assessment`] per collected document.
//!
//! Each document becomes a bounded [`AssessmentRequest`] (path, extension, size and
//! a clipped content sample). Requests are independent and dispatched to the
//! [`Scorer`] with at most `concurrency` in flight; results are recombined in input
//! order. A schema violation, a service failure or a timeout on any request fails
//! the whole batch, since a corrupted assessment could select the wrong content.

use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::collect::Document;
use crate::contract::{AssessmentRequest, ScoreOutcome, Scorer, ServiceError};
use crate::filter::extension_of;
use crate::sanitize::TRUNCATION_MARKER;

/// Character limit of the content sample sent for scoring.
pub const SAMPLE_CHARS: usize = 4000;
/// Upper bound on simultaneous scoring requests.
pub const MAX_CONCURRENCY: usize = 8;
/// Highest relevance score a service may return.
pub const MAX_SCORE: u8 = 5;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Relevance judgment for one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assessment {
    pub path: String,
    pub score: u8,
    pub include: bool,
    pub reason: String,
    pub summary: String,
}

#[derive(Debug, Clone, Copy)]
pub struct AssessOptions {
    pub concurrency: usize,
    pub request_timeout: Duration,
}

impl Default for AssessOptions {
    fn default() -> Self {
        Self {
            concurrency: MAX_CONCURRENCY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessError {
    #[error("assessment for {path} violates the schema: {reason}")]
    Schema {
        path: String,
        reason: String,
        raw: String,
    },
    #[error("assessment for {path} timed out after {after:?}")]
    Timeout { path: String, after: Duration },
    #[error("scoring service failed for {path}: {source}")]
    Service {
        path: String,
        #[source]
        source: ServiceError,
    },
}

/// Clip `text` to `limit` characters, appending the truncation marker when clipped.
pub fn clip(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
    }
}

pub fn build_request(document: &Document) -> AssessmentRequest {
    let name = document
        .source_path
        .rsplit('/')
        .next()
        .unwrap_or(&document.source_path);
    AssessmentRequest {
        path: document.source_path.clone(),
        extension: extension_of(name).to_lowercase(),
        size: document.content.len(),
        sample: clip(&document.content, SAMPLE_CHARS),
    }
}

#[derive(Deserialize)]
struct RawAssessment {
    path: String,
    score: i64,
    include: bool,
    reason: String,
    summary: String,
}

/// Validate a raw structured-output payload against the assessment schema.
///
/// Nothing is coerced: a missing field, a non-integer or out-of-range score, or a
/// non-boolean `include` all produce [`ScoreOutcome::SchemaViolation`].
pub fn parse_assessment(raw: &str) -> ScoreOutcome {
    let parsed: RawAssessment = match serde_json::from_str(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            return ScoreOutcome::SchemaViolation {
                raw: raw.to_string(),
                reason: e.to_string(),
            }
        }
    };
    let score = match u8::try_from(parsed.score) {
        Ok(score) if score <= MAX_SCORE => score,
        _ => {
            return ScoreOutcome::SchemaViolation {
                raw: raw.to_string(),
                reason: format!("score {} outside 0..={MAX_SCORE}", parsed.score),
            }
        }
    };
    ScoreOutcome::Valid(Assessment {
        path: parsed.path,
        score,
        include: parsed.include,
        reason: parsed.reason,
        summary: parsed.summary,
    })
}

/// JSON schema handed to structured-output services.
pub fn assessment_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "path": { "type": "string", "description": "Relative file path within the repo" },
            "score": {
                "type": "integer",
                "minimum": 0,
                "maximum": MAX_SCORE,
                "description": "0-5 relevance for README"
            },
            "include": { "type": "boolean", "description": "True if this file should influence the README" },
            "reason": { "type": "string", "description": "1-2 sentence rationale" },
            "summary": { "type": "string", "description": "1-3 sentence README-ready summary, no code dumps" }
        },
        "required": ["path", "score", "include", "reason", "summary"],
        "additionalProperties": false
    })
}

/// Assess every document, returning assessments in input order.
pub async fn assess<S>(
    scorer: &S,
    documents: &[Document],
    options: &AssessOptions,
) -> Result<Vec<Assessment>, AssessError>
where
    S: Scorer + ?Sized,
{
    let concurrency = options.concurrency.max(1);
    let timeout = options.request_timeout;
    info!(documents = documents.len(), concurrency, "Assessing documents");

    let assessments: Vec<Assessment> = stream::iter(documents.iter().map(build_request))
        .map(|request| score_one(scorer, request, timeout))
        .buffered(concurrency)
        .try_collect()
        .await
        .map_err(|e| {
            error!(error = %e, "Assessment batch failed");
            e
        })?;

    info!(
        assessed = assessments.len(),
        included = assessments.iter().filter(|a| a.include).count(),
        "Assessment finished"
    );
    Ok(assessments)
}

async fn score_one<S>(
    scorer: &S,
    request: AssessmentRequest,
    timeout: Duration,
) -> Result<Assessment, AssessError>
where
    S: Scorer + ?Sized,
{
    debug!(path = %request.path, size = request.size, "Scoring document");
    match tokio::time::timeout(timeout, scorer.score(&request)).await {
        Err(_) => Err(AssessError::Timeout {
            path: request.path,
            after: timeout,
        }),
        Ok(Err(source)) => Err(AssessError::Service {
            path: request.path,
            source,
        }),
        Ok(Ok(ScoreOutcome::SchemaViolation { raw, reason })) => Err(AssessError::Schema {
            path: request.path,
            reason,
            raw,
        }),
        Ok(Ok(ScoreOutcome::Valid(assessment))) => {
            debug!(path = %request.path, score = assessment.score, include = assessment.include, "Scored document");
            Ok(assessment)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_counts_characters_not_bytes() {
        let text = "é".repeat(10);
        assert_eq!(clip(&text, 10), text);
        let clipped = clip(&text, 4);
        assert_eq!(clipped, format!("éééé{TRUNCATION_MARKER}"));
    }

    #[test]
    fn request_carries_lowercased_extension_and_byte_size() {
        let doc = Document {
            source_path: "src/Main.PY".into(),
            content: "print('hé')".into(),
        };
        let req = build_request(&doc);
        assert_eq!(req.extension, ".py");
        assert_eq!(req.size, "print('hé')".len());
        assert_eq!(req.sample, doc.content);
    }

    #[test]
    fn env_file_has_no_extension() {
        let doc = Document {
            source_path: ".env".into(),
            content: String::new(),
        };
        assert_eq!(build_request(&doc).extension, "");
    }

    #[test]
    fn parse_accepts_conforming_payload() {
        let raw = r#"{"path":"app.py","score":4,"include":true,"reason":"entrypoint","summary":"Flask app"}"#;
        match parse_assessment(raw) {
            ScoreOutcome::Valid(a) => {
                assert_eq!(a.path, "app.py");
                assert_eq!(a.score, 4);
                assert!(a.include);
            }
            other => panic!("expected valid outcome, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_out_of_range_and_mistyped_fields() {
        for raw in [
            r#"{"path":"a","score":6,"include":true,"reason":"r","summary":"s"}"#,
            r#"{"path":"a","score":-1,"include":true,"reason":"r","summary":"s"}"#,
            r#"{"path":"a","score":2.5,"include":true,"reason":"r","summary":"s"}"#,
            r#"{"path":"a","score":3,"include":"yes","reason":"r","summary":"s"}"#,
            r#"{"path":"a","score":3,"include":true,"reason":"r"}"#,
            "not json",
        ] {
            assert!(
                matches!(parse_assessment(raw), ScoreOutcome::SchemaViolation { .. }),
                "expected schema violation for {raw}"
            );
        }
    }
}
