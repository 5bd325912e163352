//! Core data types for the diagnosis pipeline.
//!
//! These types represent the farm metadata, the structured diagnosis
//! returned by the vision model, and the final report handed back to the
//! caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Farm metadata attached to an analysis request.
///
/// For guest requests the defaults stand in for the unrecorded fields.
#[derive(Debug, Clone)]
pub struct FarmDetails {
    pub name: String,
    pub location: String,
    pub crop_type: String,
}

impl Default for FarmDetails {
    fn default() -> Self {
        Self {
            name: "Guest Farm".to_string(),
            location: "Kodagu".to_string(),
            crop_type: "Robusta Coffee".to_string(),
        }
    }
}

/// Structured diagnosis produced by the vision model.
///
/// Field names on the wire are camelCase; this is the exact JSON shape the
/// prompt instructs the model to emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub disease_name: String,
    pub severity: String,
    pub summary: String,
    pub recommended_actions: Vec<String>,
    pub scientific_reason: String,
    pub preventative_measures: Vec<String>,
}

/// Full result of one analysis run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub diagnosis: Diagnosis,
    /// The query actually used for retrieval (observation or fallback).
    pub query: String,
    /// The local knowledge snippet embedded in the prompt; empty when the
    /// corpus had nothing relevant.
    pub local_context: String,
    pub language: String,
    pub timestamp: DateTime<Utc>,
}
