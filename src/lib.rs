//! # Ceres Context
//!
//! Local knowledge retrieval and diagnosis agent for the Ceres crop-health
//! assistant.
//!
//! Ceres Context turns a farmer's crop photo, free-text observation, and
//! farm metadata into an expert diagnosis: it retrieves the most relevant
//! paragraphs from a local knowledge base of agronomy guides, assembles a
//! case-file prompt around them, and sends the bundle to a hosted
//! vision-language model that answers with a structured JSON diagnosis.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐
//! │ Knowledge    │──▶│  Retriever   │──▶│  Case-file    │
//! │ base (.txt)  │   │ rank top-k  │   │   prompt      │
//! └──────────────┘   └─────────────┘   └──────┬───────┘
//!                                            │
//!                         photo + farm data  ▼
//!                                      ┌──────────────┐
//!                                      │ Vision model │
//!                                      │  (Gemini)    │
//!                                      └──────┬───────┘
//!                                             ▼
//!                                       Diagnosis JSON
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ceres sources                         # check the knowledge base
//! ceres retrieve "coffee leaf rust"     # inspect retrieved context
//! ceres prompt "orange spots on leaves" # preview the full prompt
//! ceres analyze photo.jpg --query "orange spots on leaves"
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`corpus`] | Knowledge-base storage abstraction |
//! | [`retrieve`] | Keyword-overlap paragraph retrieval |
//! | [`prompt`] | Case-file prompt assembly |
//! | [`provider`] | Vision-model provider abstraction |
//! | [`agent`] | Analysis orchestration |
//! | [`error`] | Corpus error taxonomy |

pub mod agent;
pub mod config;
pub mod corpus;
pub mod error;
pub mod models;
pub mod prompt;
pub mod provider;
pub mod retrieve;
pub mod sources;
