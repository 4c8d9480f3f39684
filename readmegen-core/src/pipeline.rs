//! High-level pipeline: collect → assess → select → synthesize → write.
//!
//! This module strings the stages together for one project directory:
//!   - Collects the project tree into a bounded document set ([`crate::collect`])
//!   - Rates every document through the injected [`Scorer`] ([`crate::assess`])
//!   - Applies the relevance threshold with its fallback ([`crate::select`])
//!   - Hands the selection to the injected [`Synthesizer`] and writes the result
//!
//! Each stage returns a new value; nothing is mutated in place. Alongside `tracing`
//! events, every run accumulates a human-readable log trail that ends up in the
//! report, so skipped files and fallback selections are visible to the caller.
//!
//! # Error Handling
//! An invalid root fails before any work. Unreadable files and per-item selection
//! problems are recovered and logged. Assessment and synthesis failures abort the
//! run with a [`PipelineError`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::assess::{assess, AssessError, Assessment};
use crate::collect::{collect_with, resolve_root, CollectError, CollectOptions, Collection};
use crate::config::GenerateConfig;
use crate::contract::{Scorer, ServiceError, Synthesizer};
use crate::select::{select, Selection};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error("No documents collected under {} (check ignore rules / path)", .0.display())]
    NoDocuments(PathBuf),
    #[error("Assessment failed: {0}")]
    Assess(#[from] AssessError),
    #[error("README synthesis failed: {0}")]
    Synthesize(#[source] ServiceError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of collecting and assessing without generating anything.
#[derive(Debug, Clone)]
pub struct AssessReport {
    pub collection: Collection,
    pub assessments: Vec<Assessment>,
    pub selection: Selection,
    pub logs: Vec<String>,
}

/// Outcome of a full generation run.
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub out_path: PathBuf,
    pub readme: String,
    pub selected_paths: Vec<String>,
    pub count_collected: usize,
    pub count_selected: usize,
    pub used_fallback: bool,
    pub logs: Vec<String>,
}

/// Collect the project described by `config`, logging into `logs`.
pub fn collect_stage(
    config: &GenerateConfig,
    logs: &mut Vec<String>,
) -> Result<Collection, PipelineError> {
    let root = resolve_root(&config.root)?;
    logs.push(format!("Project: {}", root.display()));

    let options = CollectOptions {
        include_readme: config.include_readme,
        limits: config.limits,
    };
    let collection = collect_with(&root, &options)?;
    logs.push(format!("Collected {} files", collection.documents.len()));
    for skipped in &collection.skipped {
        logs.push(format!("Skipped unreadable path: {skipped}"));
    }
    if collection.truncated_by_budget {
        logs.push(format!(
            "Collection stopped at the {} byte budget",
            config.limits.max_total_bytes
        ));
    }
    if collection.documents.is_empty() {
        error!(root = %root.display(), "No documents collected");
        return Err(PipelineError::NoDocuments(root));
    }
    Ok(collection)
}

/// Collect, assess and select, without synthesis or output.
pub async fn assess_only<S>(config: &GenerateConfig, scorer: &S) -> Result<AssessReport, PipelineError>
where
    S: Scorer + ?Sized,
{
    let mut logs = Vec::new();
    let collection = collect_stage(config, &mut logs)?;
    let assessments = assess(scorer, &collection.documents, &config.assess).await?;
    let selection = select(&collection.documents, &assessments, config.relevance);

    logs.push(format!(
        "Assessed {} files -> selected {} for README",
        assessments.len(),
        if selection.used_fallback { 0 } else { selection.items.len() }
    ));
    logs.extend(selection.logs.iter().cloned());

    Ok(AssessReport {
        collection,
        assessments,
        selection,
        logs,
    })
}

/// Run the full pipeline and write the README next to the project.
pub async fn generate<S, Y>(
    config: &GenerateConfig,
    scorer: &S,
    synthesizer: &Y,
) -> Result<GenerateReport, PipelineError>
where
    S: Scorer + ?Sized,
    Y: Synthesizer + ?Sized,
{
    config.trace_loaded();
    let report = assess_only(config, scorer).await?;
    let mut logs = report.logs;
    let selection = report.selection;

    if !selection.used_fallback {
        logs.push("Selected files:".to_string());
        for path in selection.paths() {
            logs.push(format!("   - {path}"));
        }
    }

    info!(items = selection.items.len(), "Synthesizing README");
    let readme = synthesizer
        .synthesize(&selection.items, &config.question)
        .await
        .map_err(|e| {
            error!(error = %e, "README synthesis failed");
            PipelineError::Synthesize(e)
        })?;

    let out_path = write_output(&report.collection.root, &config.output_file, &readme)?;
    logs.push(format!("README written: {}", out_path.display()));
    info!(out_path = %out_path.display(), "README written");

    Ok(GenerateReport {
        out_path,
        readme,
        selected_paths: selection.paths(),
        count_collected: report.collection.documents.len(),
        count_selected: selection.items.len(),
        used_fallback: selection.used_fallback,
        logs,
    })
}

/// Write `text` as UTF-8 with `\n` line endings to `root/file_name`.
pub fn write_output(root: &Path, file_name: &str, text: &str) -> Result<PathBuf, PipelineError> {
    let path = root.join(file_name);
    let normalized = text.replace("\r\n", "\n");
    fs::write(&path, normalized).map_err(|source| {
        error!(error = %source, path = %path.display(), "Failed to write README");
        PipelineError::Write {
            path: path.clone(),
            source,
        }
    })?;
    Ok(path)
}
