///
/// This module implements the CLI interface for readmegen: command parsing,
/// argument validation, and user-visible output.
///
/// All collection, assessment and selection logic lives in the [`readmegen-core`] crate.
/// This module is strictly CLI glue: it resolves configuration, constructs the
/// language-model client and prints what the core reports.
///
/// ## Subcommands
/// - `generate`: full pipeline, writes `README.generated.md` at the project root.
/// - `collect`: dry run of the collector, lists what would be sent for scoring.
/// - `assess`: collects and scores, prints assessments and the would-be selection.
///
/// ## How To Use
/// - For command-line users: use the installed `readmegen` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`readmegen-core`]: ../../readmegen-core/
use crate::llm::LLMClient;
use crate::load_config::{build_generate_config, load_optional, Overrides};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use readmegen_core::collect::{collect_with, resolve_root, CollectOptions};
use readmegen_core::pipeline::{assess_only, generate};
use std::path::PathBuf;

/// CLI for readmegen: generate a README from a project's most relevant files.
#[derive(Parser)]
#[clap(
    name = "readmegen",
    version,
    about = "Collect a project's key files, rate them with a language model and synthesize a README"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline and write the README next to the project
    Generate {
        #[clap(flatten)]
        project: ProjectArgs,
        /// Output file name, relative to the project root
        #[clap(long)]
        output: Option<String>,
    },
    /// List the files that would be collected, without calling any model
    Collect {
        /// Project root directory
        path: PathBuf,
        /// Also collect README files
        #[clap(long)]
        include_readme: bool,
        /// Print the collected documents as JSON
        #[clap(long)]
        json: bool,
    },
    /// Collect and score files, printing the assessments and the resulting selection
    Assess {
        #[clap(flatten)]
        project: ProjectArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Project root directory
    pub path: PathBuf,
    /// Minimum score (0-5) a file needs to be selected
    #[clap(long)]
    pub relevance: Option<u8>,
    /// Also collect README files
    #[clap(long)]
    pub include_readme: bool,
    /// Path to the YAML config file
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Maximum number of scoring requests in flight
    #[clap(long)]
    pub concurrency: Option<usize>,
}

impl ProjectArgs {
    fn overrides(&self, output_file: Option<String>) -> Overrides {
        Overrides {
            relevance: self.relevance,
            include_readme: self.include_readme,
            concurrency: self.concurrency,
            output_file,
        }
    }
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Collect {
            path,
            include_readme,
            json,
        } => {
            tracing::info!(command = "collect", path = %path.display(), "Collecting project files");
            let options = CollectOptions {
                include_readme,
                ..CollectOptions::default()
            };
            let collection = collect_with(&path, &options)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&collection.documents)?);
            } else {
                for doc in &collection.documents {
                    println!(" - {}", doc.source_path);
                }
                println!(
                    "\nLoaded {} docs ({} bytes; lock files truncated, env values sanitized).",
                    collection.documents.len(),
                    collection.total_bytes
                );
                for skipped in &collection.skipped {
                    println!("Skipped unreadable path: {skipped}");
                }
            }
            Ok(())
        }
        Commands::Assess { project } => {
            let root = resolve_root(&project.path)?;
            let file = load_optional(project.config.as_ref())?;
            let config = build_generate_config(&root, &file, &project.overrides(None));
            let client = LLMClient::new_from_env(&file.model)
                .map_err(|e| anyhow::anyhow!(e))
                .context("Failed to construct language-model client")?;
            tracing::info!(command = "assess", model = client.model(), "Starting assessment");

            let report = assess_only(&config, &client).await?;
            for line in &report.logs {
                println!("{line}");
            }
            for assessment in &report.assessments {
                println!(
                    "[{}] {} {}: {}",
                    assessment.score,
                    if assessment.include { "include" } else { "skip   " },
                    assessment.path,
                    assessment.reason
                );
            }
            let selected = if report.selection.used_fallback {
                0
            } else {
                report.selection.items.len()
            };
            println!("\nSelected {} / {} files.", selected, report.assessments.len());
            Ok(())
        }
        Commands::Generate { project, output } => {
            let root = resolve_root(&project.path)?;
            let file = load_optional(project.config.as_ref())?;
            let config = build_generate_config(&root, &file, &project.overrides(output));
            let client = LLMClient::new_from_env(&file.model)
                .map_err(|e| anyhow::anyhow!(e))
                .context("Failed to construct language-model client")?;
            tracing::info!(command = "generate", model = client.model(), "Starting README generation");

            match generate(&config, &client, &client).await {
                Ok(report) => {
                    for line in &report.logs {
                        println!("{line}");
                    }
                    println!(
                        "Collected {} files, selected {}.",
                        report.count_collected, report.count_selected
                    );
                    println!("{}", report.out_path.display());
                    tracing::info!(command = "generate", out_path = %report.out_path.display(), "Generation complete");
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "generate", error = %e, "Generation failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
    }
}
