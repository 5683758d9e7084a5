//! Staged raw-commit ingestion for /api/process_commits.

use std::fs;

use serde::Deserialize;

use eval_core::{ComplianceResult, RiskResult};
use policy_engine::{check_compliance, extract_features, predict_risk, ComplianceInput, RiskInput};

use crate::error::ApiError;

/// One staged commit awaiting evaluation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RawCommit {
  pub user: String,
  pub project: String,
  pub repo_url: String,
  pub commit_message: String,
  pub commit_hash: Option<String>,
  pub files: Vec<String>,
  pub file_added: Vec<String>,
  pub file_modified: Vec<String>,
  pub file_removed: Vec<String>,
  pub lines_changed: u32,
  pub prev_bugs: u32,
  pub test_coverage: u32,
  pub freeze_request: bool,
  pub timestamp: Option<String>,
}

impl Default for RawCommit {
  fn default() -> Self {
    Self {
      user: String::new(),
      project: String::new(),
      repo_url: String::new(),
      commit_message: String::new(),
      commit_hash: None,
      files: Vec::new(),
      file_added: Vec::new(),
      file_modified: Vec::new(),
      file_removed: Vec::new(),
      lines_changed: 0,
      prev_bugs: 0,
      test_coverage: 100,
      freeze_request: false,
      timestamp: None,
    }
  }
}

impl RawCommit {
  /// The full changed-file list: `files` when present, otherwise the
  /// added/modified/removed subsets concatenated.
  pub fn changed_files(&self) -> Vec<String> {
    if !self.files.is_empty() {
      return self.files.clone();
    }
    self
      .file_added
      .iter()
      .chain(self.file_modified.iter())
      .chain(self.file_removed.iter())
      .cloned()
      .collect()
  }
}

/// Load the staged raw-commits file. An absent file is an empty batch,
/// not an error.
pub fn load_staged(path: &str) -> Result<Vec<RawCommit>, ApiError> {
  if !std::path::Path::new(path).exists() {
    return Ok(Vec::new());
  }
  let raw = fs::read_to_string(path)?;
  Ok(serde_json::from_str(&raw)?)
}

/// Run one staged commit through classification and scoring.
pub fn evaluate(raw: &RawCommit) -> (ComplianceResult, RiskResult) {
  let files = raw.changed_files();
  let compliance = check_compliance(&ComplianceInput {
    commit_message: raw.commit_message.clone(),
    files: files.clone(),
    ..ComplianceInput::default()
  });
  let risk = predict_risk(&extract_features(&RiskInput {
    commit_message: raw.commit_message.clone(),
    files,
    lines_changed: raw.lines_changed,
    prev_bugs: raw.prev_bugs,
    test_coverage: raw.test_coverage,
  }));
  (compliance, risk)
}
