//! CLI definition and command dispatch for okra.
//!
//! This module defines the command-line interface using `clap` and provides
//! the `run()` function that dispatches commands to the engine.
//!
//! ## Configuration Precedence
//!
//! Configuration is resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--config`, `--verbose`)
//! 2. Environment variables (`OKRA_CONFIG`, `OKRA_VERBOSE`, `OKRA_COLOR`)
//! 3. Config file (`~/.okra/config.yaml` or path from `--config`/`OKRA_CONFIG`)
//! 4. Built-in defaults

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use okra_core::{AnswerBundle, GlobalConfig, OkraEngine, QueryContext, QueryDomain, Timeframe};
use okra_store::{CollectionKind, JsonlStore};

use crate::ui::{self, ColorMode};

// ============================================================================
// CLI Definition
// ============================================================================

/// Organizational Knowledge Retrieval & Answering - grounded answers from
/// your organization's recorded knowledge
#[derive(Parser, Debug)]
#[command(name = "okra")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true, env = "OKRA_VERBOSE")]
    pub verbose: bool,

    /// Suppress warnings and informational messages
    #[arg(short, long, global = true, env = "OKRA_QUIET")]
    pub quiet: bool,

    /// Path to configuration file (default: ~/.okra/config.yaml)
    #[arg(long, global = true, env = "OKRA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "OKRA_COLOR", default_value = "auto")]
    pub color: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a question against an organization's knowledge
    #[command(after_help = r#"EXAMPLES:
    # Ask with the knowledge export in knowledge.jsonl
    okra ask "Why is churn rising?" --org org-42 --data knowledge.jsonl

    # Scope the question to a domain and business unit
    okra ask "Which KPIs are off target?" --org org-42 --domain operational \
        --business-unit bu-eu --data knowledge.jsonl

    # Skip remote model calls entirely (deterministic, degraded answer)
    okra ask "Why is churn rising?" --org org-42 --data knowledge.jsonl --offline

    # JSON output for scripting
    okra ask "Why is churn rising?" --org org-42 --data knowledge.jsonl --json | jq .confidence
"#)]
    Ask {
        /// The question to answer.
        question: String,

        /// Organization whose knowledge is queried.
        #[arg(long)]
        org: String,

        /// Topical domain scope: strategic, operational, financial, risk, innovation.
        #[arg(long)]
        domain: Option<QueryDomain>,

        /// Temporal scope: current, historical, future.
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// Business unit scope.
        #[arg(long)]
        business_unit: Option<String>,

        /// Initiative scope.
        #[arg(long)]
        initiative: Option<String>,

        /// Path to the knowledge JSONL file.
        #[arg(long)]
        data: PathBuf,

        /// Skip remote model capabilities (local embedding, template answer).
        #[arg(long)]
        offline: bool,

        /// Output the full answer bundle as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show per-collection item counts in a knowledge file
    #[command(after_help = r#"EXAMPLES:
    # Count items per collection
    okra collections --data knowledge.jsonl

    # As JSON
    okra collections --data knowledge.jsonl --json
"#)]
    Collections {
        /// Path to the knowledge JSONL file.
        #[arg(long)]
        data: PathBuf,

        /// Output counts as JSON.
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Dispatch
// ============================================================================

/// Parse arguments, initialize logging, and run the selected command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let colors = ColorMode::from_str(&cli.color)
        .unwrap_or_default()
        .is_enabled();

    match execute(cli, colors) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize tracing to stderr so JSON output on stdout stays clean.
fn init_tracing(cli: &Cli) {
    use tracing_subscriber::EnvFilter;

    let default_directive = if cli.verbose {
        "okra=debug,okra_core=debug,okra_store=debug,okra_model=debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_env("OKRA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn execute(cli: Cli, colors: bool) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Ask {
            question,
            org,
            domain,
            timeframe,
            business_unit,
            initiative,
            data,
            offline,
            json,
        } => {
            let store = Arc::new(
                JsonlStore::open(&data)
                    .with_context(|| format!("Failed to load knowledge file {}", data.display()))?,
            );

            let engine = if offline {
                OkraEngine::new(config, store)
            } else {
                OkraEngine::from_global_config(config, store)
            };

            let mut context = QueryContext::new(question, org);
            if let Some(domain) = domain {
                context = context.with_domain(domain);
            }
            if let Some(timeframe) = timeframe {
                context = context.with_timeframe(timeframe);
            }
            if let Some(business_unit) = business_unit {
                context = context.with_business_unit(business_unit);
            }
            if let Some(initiative) = initiative {
                context = context.with_initiative(initiative);
            }

            let bundle = engine.answer_query(context);

            if json {
                println!("{}", serde_json::to_string_pretty(&bundle)?);
            } else {
                print_bundle(&bundle, colors);
            }
            Ok(())
        }

        Command::Collections { data, json } => {
            let store = JsonlStore::open(&data)
                .with_context(|| format!("Failed to load knowledge file {}", data.display()))?;

            if json {
                let counts: serde_json::Map<String, serde_json::Value> = CollectionKind::ALL
                    .iter()
                    .map(|kind| {
                        (
                            kind.as_str().to_string(),
                            serde_json::json!(store.count(*kind)),
                        )
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "total": store.len(),
                        "collections": counts,
                    }))?
                );
            } else {
                println!("{}", ui::section("Collections", colors));
                for kind in CollectionKind::ALL {
                    println!("  {:<16} {}", kind.as_str(), store.count(kind));
                }
                println!("  {:<16} {}", "total", store.len());
            }
            Ok(())
        }
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<GlobalConfig> {
    let config = match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            GlobalConfig::from_path(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => GlobalConfig::load_default().context("Failed to load default config")?,
    };
    Ok(config)
}

// ============================================================================
// Human output
// ============================================================================

fn print_bundle(bundle: &AnswerBundle, colors: bool) {
    println!("{}", ui::section("Answer", colors));
    println!("{}", bundle.answer);
    println!();
    println!(
        "{} {}",
        ui::section("Confidence:", colors),
        ui::confidence_badge(bundle.confidence, colors)
    );

    if !bundle.sources.is_empty() {
        println!();
        println!("{}", ui::section("Sources", colors));
        println!("{}", ui::sources_table(&bundle.sources));
    }

    if !bundle.related_questions.is_empty() {
        println!();
        println!("{}", ui::section("Related questions", colors));
        for question in &bundle.related_questions {
            println!("  - {}", question);
        }
    }

    if !bundle.action_items.is_empty() {
        println!();
        println!("{}", ui::section("Action items", colors));
        for item in &bundle.action_items {
            println!(
                "  {} {}: {}",
                ui::priority_label(item.priority, colors),
                item.kind,
                item.description
            );
        }
    }
}
