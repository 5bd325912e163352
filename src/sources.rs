use anyhow::Result;

use crate::config::Config;
use crate::corpus::{Corpus, DirectoryCorpus};

pub fn list_sources(config: &Config) -> Result<()> {
    let kb = &config.knowledge_base;

    let (kb_status, documents) = if kb.path.exists() {
        match DirectoryCorpus::new(&kb.path, &kb.include_globs).and_then(|c| c.list()) {
            Ok(names) => ("OK".to_string(), names.len().to_string()),
            Err(e) => (format!("ERROR ({})", e), "-".to_string()),
        }
    } else {
        (
            "NOT FOUND (path does not exist)".to_string(),
            "-".to_string(),
        )
    };

    println!(
        "{:<16} {:<32} {:<12} DOCUMENTS",
        "SOURCE", "LOCATION", "STATUS"
    );
    println!(
        "{:<16} {:<32} {:<12} {}",
        "knowledge_base",
        kb.path.display(),
        kb_status,
        documents
    );

    let model_status = if config.model.is_enabled() {
        "OK"
    } else {
        "DISABLED"
    };
    println!(
        "{:<16} {:<32} {:<12} {}",
        "model",
        config.model.model.as_deref().unwrap_or("-"),
        model_status,
        "-"
    );

    Ok(())
}
