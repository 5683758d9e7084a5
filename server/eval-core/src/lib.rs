//! Commit evaluation core: submission orchestration, remote-endpoint
//! clients, and history aggregation.
//!
//! One submission flows compliance -> risk -> save through the
//! [`CheckOrchestrator`]; accumulated [`RecordModel`] history is folded
//! into dashboard statistics by the [`aggregate`] module. Pure
//! computation plus HTTP clients; storage lives in history-api.

pub mod aggregate;
pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod types;

pub use client::{EvaluationApi, EvaluationClient, HistoryClient};
pub use config::{OrchestratorConfig, RiskPolicy};
pub use error::{ClientError, EvaluateError};
pub use input::{split_files, CommitInput, RawSubmission};
pub use orchestrator::{CheckOrchestrator, EvaluationOutcome};
pub use types::{ComplianceResult, FeedbackEntry, RecordModel, RiskResult};
