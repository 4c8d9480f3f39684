//! Selection Policy: reduce (document, assessment) pairs to the items handed to synthesis.
//!
//! An item is kept iff its assessment says `include` and its score reaches the
//! threshold. Problems with a single pair are logged and that pair is dropped; they
//! never abort the selection. When nothing qualifies, every collected document is
//! used verbatim instead, so synthesis always gets input when anything was collected.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::assess::{Assessment, MAX_SCORE};
use crate::collect::Document;

/// Relevance threshold used when the caller does not pick one.
pub const DEFAULT_RELEVANCE: u8 = 3;

/// One document as passed to synthesis.
///
/// Items chosen by score carry the assessment metadata; fallback items only carry
/// `path` and `content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedItem {
    pub path: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl SelectedItem {
    /// Build an item from a paired assessment, dropping the summary.
    pub fn from_pair(document: &Document, assessment: &Assessment) -> Result<Self, SelectError> {
        if assessment.score > MAX_SCORE {
            return Err(SelectError::ScoreOutOfRange {
                path: document.source_path.clone(),
                score: assessment.score,
            });
        }
        let path = if assessment.path.is_empty() {
            document.source_path.clone()
        } else {
            assessment.path.clone()
        };
        Ok(Self {
            path,
            content: document.content.clone(),
            score: Some(assessment.score),
            include: Some(assessment.include),
            reason: Some(assessment.reason.clone()),
        })
    }

    /// Fallback item: the document verbatim, no assessment metadata.
    pub fn verbatim(document: &Document) -> Self {
        Self {
            path: document.source_path.clone(),
            content: document.content.clone(),
            score: None,
            include: None,
            reason: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("assessment for {path} has score {score} outside 0..=5")]
    ScoreOutOfRange { path: String, score: u8 },
    #[error("no assessment paired with {path}")]
    MissingAssessment { path: String },
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub items: Vec<SelectedItem>,
    /// No item qualified, so every document was used instead.
    pub used_fallback: bool,
    pub logs: Vec<String>,
}

impl Selection {
    pub fn paths(&self) -> Vec<String> {
        self.items.iter().map(|item| item.path.clone()).collect()
    }
}

pub fn qualifies(assessment: &Assessment, threshold: u8) -> bool {
    assessment.include && assessment.score >= threshold
}

/// Apply the threshold to position-paired documents and assessments.
pub fn select(documents: &[Document], assessments: &[Assessment], threshold: u8) -> Selection {
    let mut logs = Vec::new();
    let mut items = Vec::new();

    for (idx, document) in documents.iter().enumerate() {
        let outcome = match assessments.get(idx) {
            None => Err(SelectError::MissingAssessment {
                path: document.source_path.clone(),
            }),
            Some(assessment) if qualifies(assessment, threshold) => {
                SelectedItem::from_pair(document, assessment).map(Some)
            }
            Some(_) => Ok(None),
        };
        match outcome {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Skipping item during selection");
                logs.push(format!("Skipped one file due to error: {e}"));
            }
        }
    }
    if assessments.len() > documents.len() {
        let extra = assessments.len() - documents.len();
        warn!(extra, "Ignoring assessments without a paired document");
        logs.push(format!("Ignored {extra} assessment(s) without a paired document"));
    }

    let used_fallback = items.is_empty() && !documents.is_empty();
    if used_fallback {
        warn!(threshold, "No files selected, falling back to all collected files");
        logs.push(format!(
            "No files selected with score>={threshold} & include=true; using all files instead."
        ));
        items = documents.iter().map(SelectedItem::verbatim).collect();
    } else {
        info!(selected = items.len(), collected = documents.len(), threshold, "Selection finished");
    }

    Selection {
        items,
        used_fallback,
        logs,
    }
}
