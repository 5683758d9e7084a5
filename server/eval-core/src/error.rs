//! Error types for the evaluation pipeline.

use thiserror::Error;

/// Failure talking to a remote endpoint. Transport errors are never
/// swallowed inside the client wrappers; they surface here and the
/// per-step policy in the orchestrator decides what happens next.
#[derive(Debug, Error)]
pub enum ClientError {
  #[error("transport: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("endpoint returned {status}: {message}")]
  Status { status: u16, message: String },
}

/// Fatal failure of one `evaluate` invocation.
///
/// A compliance failure always aborts. A risk failure aborts only under
/// `RiskPolicy::Strict`. Persistence failure is never fatal and is
/// reported on the outcome instead of here.
#[derive(Debug, Error)]
pub enum EvaluateError {
  #[error("compliance check failed: {0}")]
  Compliance(#[source] ClientError),

  #[error("risk scoring failed: {0}")]
  Risk(#[source] ClientError),
}
