//! Analysis orchestration.
//!
//! [`run_analysis`] is the pipeline behind an analysis request: synthesize
//! the farm history, retrieve local knowledge, assemble the case-file
//! prompt, consult the vision model, and return the structured report.
//!
//! Retrieval coming back empty is a normal outcome (the prompt falls back
//! to the model's general knowledge); only corpus access and model errors
//! propagate.

use anyhow::Result;
use chrono::Utc;
use tracing::info;

use crate::config::Config;
use crate::corpus::{Corpus, DirectoryCorpus};
use crate::models::{AnalysisReport, FarmDetails};
use crate::prompt::{self, Language};
use crate::provider::{self, ImagePayload, VisionProvider};
use crate::retrieve;

/// Everything a single analysis run needs from the caller.
#[derive(Debug)]
pub struct AnalysisRequest {
    pub image: ImagePayload,
    /// The farmer's free-text observation; may be empty.
    pub observation: String,
    pub farm: FarmDetails,
    pub language: Language,
}

/// Run the full analysis pipeline against the given corpus and provider.
pub async fn run_analysis(
    config: &Config,
    corpus: &dyn Corpus,
    provider: &dyn VisionProvider,
    request: &AnalysisRequest,
) -> Result<AnalysisReport> {
    let history = prompt::farm_history(&request.farm);

    let query = prompt::effective_query(&request.observation, &config.retrieval.fallback_query);
    let local_context = retrieve::retrieve_context(corpus, query, config.retrieval.top_k)?;
    info!(
        "retrieved local context for query '{}' ({} paragraphs)",
        query,
        if local_context.is_empty() {
            0
        } else {
            local_context.matches(retrieve::CONTEXT_SEPARATOR).count() + 1
        }
    );

    let case_file = prompt::build_prompt(
        &request.observation,
        &history,
        &local_context,
        request.language,
    );

    info!("consulting vision model '{}'", provider.model_name());
    let diagnosis = provider.analyze(&case_file, &request.image).await?;

    Ok(AnalysisReport {
        diagnosis,
        query: query.to_string(),
        local_context,
        language: request.language.name().to_string(),
        timestamp: Utc::now(),
    })
}

/// CLI entry point for `ceres prompt` — assemble and print the case-file
/// prompt without any model call.
pub fn run_prompt(
    config: &Config,
    observation: &str,
    farm: &FarmDetails,
    language: Language,
) -> Result<()> {
    let corpus = DirectoryCorpus::new(
        &config.knowledge_base.path,
        &config.knowledge_base.include_globs,
    )?;

    let history = prompt::farm_history(farm);
    let query = prompt::effective_query(observation, &config.retrieval.fallback_query);
    let local_context = retrieve::retrieve_context(&corpus, query, config.retrieval.top_k)?;

    println!(
        "{}",
        prompt::build_prompt(observation, &history, &local_context, language)
    );

    Ok(())
}

/// CLI entry point for `ceres analyze` — run the full pipeline and print
/// the report as pretty JSON.
pub async fn run_analyze(
    config: &Config,
    image_path: &std::path::Path,
    observation: &str,
    farm: &FarmDetails,
    language: Language,
) -> Result<()> {
    let corpus = DirectoryCorpus::new(
        &config.knowledge_base.path,
        &config.knowledge_base.include_globs,
    )?;
    let provider = provider::create_provider(&config.model)?;

    let request = AnalysisRequest {
        image: ImagePayload::from_file(image_path)?,
        observation: observation.to_string(),
        farm: farm.clone(),
        language,
    };

    let report = run_analysis(config, &corpus, provider.as_ref(), &request).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
