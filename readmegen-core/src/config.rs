use std::path::PathBuf;

use tracing::{debug, info};

use crate::assess::AssessOptions;
use crate::collect::CollectLimits;
use crate::select::DEFAULT_RELEVANCE;

/// Name of the file written at the project root.
pub const OUTPUT_FILE_NAME: &str = "README.generated.md";

/// Everything one generation run needs besides its service handles.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub root: PathBuf,
    pub relevance: u8,
    pub include_readme: bool,
    pub output_file: String,
    pub question: String,
    pub limits: CollectLimits,
    pub assess: AssessOptions,
}

impl GenerateConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            relevance: DEFAULT_RELEVANCE,
            include_readme: false,
            output_file: OUTPUT_FILE_NAME.to_string(),
            question: crate::synthesize::DEFAULT_QUESTION.to_string(),
            limits: CollectLimits::default(),
            assess: AssessOptions::default(),
        }
    }

    pub fn trace_loaded(&self) {
        info!(
            root = %self.root.display(),
            relevance = self.relevance,
            include_readme = self.include_readme,
            output_file = %self.output_file,
            concurrency = self.assess.concurrency,
            "Loaded GenerateConfig"
        );
        debug!(?self, "GenerateConfig loaded (full debug)");
    }
}
