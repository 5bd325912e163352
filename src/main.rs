//! # Ceres CLI (`ceres`)
//!
//! The `ceres` binary is the operator's interface to the Ceres diagnosis
//! core. It provides commands for checking the knowledge base, inspecting
//! retrieval output, previewing the assembled prompt, and running a full
//! image analysis against the configured vision model.
//!
//! ## Usage
//!
//! ```bash
//! ceres --config ./config/ceres.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ceres sources` | Show knowledge-base and model provider status |
//! | `ceres retrieve "<query>"` | Print the most relevant knowledge-base paragraphs |
//! | `ceres prompt "<observation>"` | Assemble and print the case-file prompt |
//! | `ceres analyze <image>` | Run the full diagnosis pipeline |
//!
//! ## Examples
//!
//! ```bash
//! # Check the knowledge base is readable
//! ceres sources --config ./config/ceres.toml
//!
//! # Inspect what the retriever would hand the model
//! ceres retrieve "coffee leaf rust control" --scores
//!
//! # Preview the prompt for a Kannada-speaking farmer
//! ceres prompt "ಎಲೆಗಳ ಮೇಲೆ ಕಿತ್ತಳೆ ಚುಕ್ಕೆ" --language kn
//!
//! # Full analysis (requires GEMINI_API_KEY and [model] provider = "gemini")
//! ceres analyze leaf.jpg --query "orange powder under the leaves"
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ceres_context::agent;
use ceres_context::config;
use ceres_context::models::FarmDetails;
use ceres_context::prompt::Language;
use ceres_context::retrieve;
use ceres_context::sources;

/// Ceres — local knowledge retrieval and crop diagnosis agent.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/ceres.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "ceres",
    about = "Ceres — local knowledge retrieval and crop diagnosis agent",
    version,
    long_about = "Ceres Context retrieves relevant paragraphs from a local knowledge base of \
    agronomy guides, assembles them with farm metadata into a diagnosis prompt, and consults \
    a hosted vision-language model for a structured crop-disease diagnosis."
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/ceres.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Show knowledge-base and model provider status.
    ///
    /// Verifies the corpus directory is listable and reports how many
    /// documents it contains. Useful for checking configuration.
    Sources,

    /// Retrieve the most relevant knowledge-base paragraphs for a query.
    ///
    /// Prints the joined context exactly as it would be embedded in the
    /// prompt, or "No relevant context found." when nothing matches.
    Retrieve {
        /// The search query string.
        query: String,

        /// Maximum number of paragraphs to return (overrides config).
        #[arg(long)]
        top_k: Option<usize>,

        /// Print ranked paragraphs with their relevance scores instead of
        /// the joined context.
        #[arg(long)]
        scores: bool,
    },

    /// Assemble and print the case-file prompt without calling the model.
    Prompt {
        /// The farmer's observation (voice note transcript); may be empty.
        observation: String,

        /// Farm location shown in the farm history line.
        #[arg(long, default_value = "Kodagu")]
        location: String,

        /// Primary crop grown on the farm.
        #[arg(long, default_value = "Robusta Coffee")]
        crop: String,

        /// Farm name.
        #[arg(long, default_value = "Guest Farm")]
        farm_name: String,

        /// Response language code (e.g. `en`, `kn`).
        #[arg(long, default_value = "en")]
        language: String,
    },

    /// Analyze a crop photo with the configured vision model.
    ///
    /// Runs the full pipeline — retrieval, prompt assembly, model call —
    /// and prints the diagnosis report as pretty JSON. Requires an enabled
    /// `[model]` provider.
    Analyze {
        /// Path to the image file (jpg, jpeg, png, webp).
        image: PathBuf,

        /// The farmer's observation; the configured fallback query is used
        /// for retrieval when this is omitted.
        #[arg(long, default_value = "")]
        query: String,

        /// Farm location shown in the farm history line.
        #[arg(long, default_value = "Kodagu")]
        location: String,

        /// Primary crop grown on the farm.
        #[arg(long, default_value = "Robusta Coffee")]
        crop: String,

        /// Farm name.
        #[arg(long, default_value = "Guest Farm")]
        farm_name: String,

        /// Response language code (e.g. `en`, `kn`).
        #[arg(long, default_value = "en")]
        language: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Sources => {
            sources::list_sources(&cfg)?;
        }
        Commands::Retrieve {
            query,
            top_k,
            scores,
        } => {
            retrieve::run_retrieve(&cfg, &query, top_k, scores)?;
        }
        Commands::Prompt {
            observation,
            location,
            crop,
            farm_name,
            language,
        } => {
            let farm = FarmDetails {
                name: farm_name,
                location,
                crop_type: crop,
            };
            agent::run_prompt(&cfg, &observation, &farm, Language::from_code(&language))?;
        }
        Commands::Analyze {
            image,
            query,
            location,
            crop,
            farm_name,
            language,
        } => {
            let farm = FarmDetails {
                name: farm_name,
                location,
                crop_type: crop,
            };
            agent::run_analyze(&cfg, &image, &query, &farm, Language::from_code(&language)).await?;
        }
    }

    Ok(())
}
