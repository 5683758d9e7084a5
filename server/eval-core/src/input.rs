//! Submission inputs: raw form text normalized into a typed CommitInput.

use serde::{Deserialize, Serialize};

/// One commit submission after normalization. Created per user action,
/// never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitInput {
  pub project: String,
  pub repo_url: String,
  pub commit_message: String,
  /// Changed file paths; order-preserving, duplicates permitted.
  pub files: Vec<String>,
  pub lines_changed: u32,
  pub prev_bugs: u32,
  pub test_coverage: u32,
  /// User-declared intent to block deployment; independent of the
  /// compliance verdict.
  pub freeze_request: bool,
}

/// A submission as it arrives from a form: every field free text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSubmission {
  pub project: String,
  pub repo_url: String,
  pub commit_message: String,
  /// Comma-separated file paths.
  pub files: String,
  pub lines_changed: String,
  pub prev_bugs: String,
  pub test_coverage: String,
  pub freeze_request: bool,
}

impl RawSubmission {
  /// Apply the defaulting rules: files split on commas, trimmed, empties
  /// dropped; numeric fields fall back to their defaults (0, 0, 100) on
  /// absent or non-numeric input.
  pub fn normalize(&self) -> CommitInput {
    CommitInput {
      project: self.project.clone(),
      repo_url: self.repo_url.clone(),
      commit_message: self.commit_message.clone(),
      files: split_files(&self.files),
      lines_changed: parse_or(&self.lines_changed, 0),
      prev_bugs: parse_or(&self.prev_bugs, 0),
      test_coverage: parse_or(&self.test_coverage, 100),
      freeze_request: self.freeze_request,
    }
  }
}

/// Split a comma-separated files field into trimmed, non-empty entries.
pub fn split_files(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|f| !f.is_empty())
    .map(str::to_string)
    .collect()
}

fn parse_or(raw: &str, default: u32) -> u32 {
  raw.trim().parse().unwrap_or(default)
}
