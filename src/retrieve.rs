//! Keyword-overlap paragraph retrieval.
//!
//! Given a free-text query and a [`Corpus`], ranks every blank-line-delimited
//! paragraph in the corpus by how many distinct query keywords it contains
//! and returns the best few joined into a single context string.
//!
//! A keyword counts as matched when it appears anywhere in the lowercased
//! paragraph, substring containment rather than token-exact matching
//! ("rust" matches inside "trusted"). The score is the number of distinct
//! matched keywords, squared, which heavily rewards paragraphs covering
//! more of the query.
//!
//! Retrieval is stateless: the corpus is rescanned and rescored on every
//! call, and for a fixed corpus the output is byte-for-byte reproducible.

use std::collections::BTreeSet;
use tracing::warn;

use crate::config::Config;
use crate::corpus::{Corpus, DirectoryCorpus};
use crate::error::CorpusError;

/// Separator placed between paragraphs in the joined retrieval output.
pub const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// Paragraphs shorter than this after trimming carry too little signal
/// and are never scored.
const MIN_PARAGRAPH_CHARS: usize = 20;

/// A ranked paragraph: relevance score plus the original (trimmed) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredParagraph {
    pub score: u64,
    pub text: String,
}

/// Extract the distinct lowercase keywords of a query.
///
/// A keyword is a maximal run of alphanumeric characters. Punctuation and
/// whitespace only delimit; there is no stop-word filtering, so short
/// function words count as keywords too.
pub fn keyword_set(query: &str) -> BTreeSet<String> {
    let lower = query.to_lowercase();
    let mut keywords = BTreeSet::new();
    let mut current = String::new();

    for ch in lower.chars() {
        if ch.is_alphanumeric() {
            current.push(ch);
        } else if !current.is_empty() {
            keywords.insert(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        keywords.insert(current);
    }

    keywords
}

/// Score one lowercased paragraph against a keyword set.
///
/// Counts the distinct keywords contained in the paragraph and squares the
/// count. Zero means no keyword matched.
pub fn score_paragraph(keywords: &BTreeSet<String>, paragraph_lower: &str) -> u64 {
    let matched = keywords
        .iter()
        .filter(|kw| paragraph_lower.contains(kw.as_str()))
        .count() as u64;
    matched * matched
}

/// Rank every qualifying paragraph in the corpus against the query.
///
/// Returns the full deduplicated candidate list, highest score first; equal
/// scores order by paragraph text descending, so the ranking is deterministic
/// regardless of corpus iteration order. An empty keyword set short-circuits
/// to an empty list without touching the corpus.
///
/// A document that cannot be read is logged and skipped; a corpus that
/// cannot be listed is a fatal error.
pub fn rank_paragraphs(
    corpus: &dyn Corpus,
    query: &str,
) -> Result<Vec<ScoredParagraph>, CorpusError> {
    let keywords = keyword_set(query);
    if keywords.is_empty() {
        return Ok(Vec::new());
    }

    // BTreeSet deduplicates identical (score, text) pairs and keeps them
    // ordered; reversing at the end yields score-descending, text-descending.
    let mut candidates: BTreeSet<(u64, String)> = BTreeSet::new();

    for name in corpus.list()? {
        let content = match corpus.read(&name) {
            Ok(content) => content,
            Err(e) => {
                warn!("skipping document: {}", e);
                continue;
            }
        };

        for para in content.split("\n\n") {
            let trimmed = para.trim();
            if trimmed.chars().count() < MIN_PARAGRAPH_CHARS {
                continue;
            }

            let score = score_paragraph(&keywords, &trimmed.to_lowercase());
            if score > 0 {
                candidates.insert((score, trimmed.to_string()));
            }
        }
    }

    Ok(candidates
        .into_iter()
        .rev()
        .map(|(score, text)| ScoredParagraph { score, text })
        .collect())
}

/// Retrieve the `top_k` most relevant paragraphs as one context string.
///
/// Returns the ranked paragraph texts joined by [`CONTEXT_SEPARATOR`], or an
/// empty string when nothing scores above zero. An empty string is a normal
/// outcome ("no relevant local context"), never an error.
pub fn retrieve_context(
    corpus: &dyn Corpus,
    query: &str,
    top_k: usize,
) -> Result<String, CorpusError> {
    let ranked = rank_paragraphs(corpus, query)?;

    Ok(ranked
        .iter()
        .take(top_k)
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR))
}

/// CLI entry point for `ceres retrieve`.
pub fn run_retrieve(
    config: &Config,
    query: &str,
    top_k: Option<usize>,
    scores: bool,
) -> anyhow::Result<()> {
    let corpus = DirectoryCorpus::new(
        &config.knowledge_base.path,
        &config.knowledge_base.include_globs,
    )?;
    let top_k = top_k.unwrap_or(config.retrieval.top_k);

    if scores {
        let ranked = rank_paragraphs(&corpus, query)?;
        if ranked.is_empty() {
            println!("No relevant context found.");
            return Ok(());
        }
        for (i, para) in ranked.iter().take(top_k).enumerate() {
            println!("{}. [{}] {}", i + 1, para.score, para.text.replace('\n', " "));
        }
        return Ok(());
    }

    let context = retrieve_context(&corpus, query, top_k)?;
    if context.is_empty() {
        println!("No relevant context found.");
    } else {
        println!("{}", context);
    }

    Ok(())
}
