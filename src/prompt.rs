//! Case-file prompt assembly for the vision model.
//!
//! The prompt bundles everything the model needs for an expert diagnosis:
//! the farmer's observation, the farm history line, the locally retrieved
//! knowledge snippet (embedded verbatim), the required JSON response shape,
//! and the target response language.

use crate::models::FarmDetails;

/// Response language for the diagnosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Kannada,
}

impl Language {
    /// Map a language code to a supported response language.
    ///
    /// Any `kn*` code selects Kannada; everything else falls back to
    /// English.
    pub fn from_code(code: &str) -> Self {
        if code.to_lowercase().starts_with("kn") {
            Language::Kannada
        } else {
            Language::English
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::Kannada => "Kannada",
            Language::English => "English",
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::English
    }
}

/// Sentence substituted into the prompt when retrieval found nothing.
const NO_CONTEXT_FALLBACK: &str =
    "No specific local context found. Rely on your general knowledge.";

/// Placeholder used when the farmer gave no observation.
const NO_OBSERVATION: &str = "No voice note provided.";

/// One-line farm history for the case file.
pub fn farm_history(farm: &FarmDetails) -> String {
    format!(
        "This farm is located in {} and primarily grows {}. Past issues are not yet recorded.",
        farm.location, farm.crop_type
    )
}

/// Pick the retrieval query: the farmer's observation, or the configured
/// fallback when the observation is blank.
pub fn effective_query<'a>(observation: &'a str, fallback: &'a str) -> &'a str {
    if observation.trim().is_empty() {
        fallback
    } else {
        observation
    }
}

/// Assemble the full case-file prompt.
///
/// `local_context` is the retriever's output and is embedded verbatim; an
/// empty string is replaced by the general-knowledge fallback sentence.
pub fn build_prompt(
    observation: &str,
    farm_history: &str,
    local_context: &str,
    language: Language,
) -> String {
    let observation = if observation.trim().is_empty() {
        NO_OBSERVATION
    } else {
        observation
    };

    let local_context = if local_context.is_empty() {
        NO_CONTEXT_FALLBACK
    } else {
        local_context
    };

    format!(
        r#"You are an expert agronomist specializing in Kodagu (Coorg) coffee and pepper plantations. Your analysis must be scientific, practical, and easy for a local farmer to understand.

**Case File:**
- **Farmer's Observation:** "{observation}"
- **Farm History & Details:** {farm_history}
- **Relevant Local Knowledge (from official guides):**
  ---
  {local_context}
  ---

**Your Task:**
Analyze the attached image in the context of all the information provided above. Respond ONLY with a valid JSON object following this exact structure, with no extra text or markdown formatting like ```json.

**CRITICAL INSTRUCTION: The entire final JSON response, including all text in the 'summary', 'recommendedActions', 'scientificReason', and 'preventativeMeasures' fields, MUST be in the {language} language.**

{{
    "diseaseName": "Your Diagnosis (e.g., Coffee Leaf Rust)",
    "severity": "Your assessment of severity (e.g., 'Low', 'Medium', 'High')",
    "summary": "A brief, 2-3 sentence summary explaining the issue in simple terms.",
    "recommendedActions": [
        "A list of 2-3 simple, numbered, actionable steps for the farmer.",
        "Example: 1. Prune and destroy all affected leaves immediately to reduce fungal load."
    ],
    "scientificReason": "A simple scientific explanation of the disease (e.g., 'This is a fungus that thrives in high humidity...').",
    "preventativeMeasures": [
        "A list of 2-3 long-term preventative measures.",
        "Example: 'Ensure proper shade management to improve air circulation.'"
    ]
}}"#,
        observation = observation,
        farm_history = farm_history,
        local_context = local_context,
        language = language.name(),
    )
}
