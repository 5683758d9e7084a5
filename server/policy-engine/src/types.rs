//! Input types for the engine (JSON contract with callers).

use serde::Deserialize;

/// One classification request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ComplianceInput {
  pub commit_message: String,
  pub files: Vec<String>,
  pub pr_title: String,
  /// PR labels; `allow-during-freeze` and `hotfix` short-circuit the
  /// verdict to compliant.
  pub labels: Vec<String>,
}

/// One scoring request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RiskInput {
  pub commit_message: String,
  pub files: Vec<String>,
  pub lines_changed: u32,
  pub prev_bugs: u32,
  pub test_coverage: u32,
}

impl Default for RiskInput {
  fn default() -> Self {
    Self {
      commit_message: String::new(),
      files: Vec::new(),
      lines_changed: 0,
      prev_bugs: 0,
      test_coverage: 100,
    }
  }
}

/// Envelope for the binary: one JSON object on stdin selects the
/// operation via `op`.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EngineRequest {
  Compliance(ComplianceInput),
  Risk(RiskInput),
}
