//! Shared data contracts (JSON shapes for results, records, and requests).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Evaluation results
// ---------------------------------------------------------------------------

/// Verdict returned by the compliance classifier.
///
/// Every field defaults when absent in a response; a missing key is never
/// an error at this boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceResult {
  pub is_compliant: bool,
  pub category: String,
  /// Classifier confidence in [0, 1].
  pub confidence: f64,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
}

/// Score returned by the risk predictor.
///
/// `risk_score` is conventionally 0-100 but the producer may emit
/// out-of-range values; consumers clamp via [`RiskResult::clamped_score`]
/// before display or aggregation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskResult {
  pub risk_score: f64,
  pub factors: BTreeMap<String, f64>,
  pub message: String,
}

impl RiskResult {
  /// Sentinel substituted when the scorer is unavailable under the
  /// lenient policy.
  pub fn no_data() -> Self {
    Self {
      risk_score: 0.0,
      factors: BTreeMap::new(),
      message: "No risk data".to_string(),
    }
  }

  /// Score clamped to the displayable 0-100 range.
  pub fn clamped_score(&self) -> f64 {
    self.risk_score.clamp(0.0, 100.0)
  }
}

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

/// One appended feedback note on a record. Append-only, never edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackEntry {
  #[serde(alias = "user_id")]
  pub user: String,
  pub message: String,
}

/// One persisted evaluation joined with its commit metadata.
///
/// Immutable once written except for appended feedback; the risk score is
/// a point-in-time snapshot and is never recomputed. `risk` is `None`
/// when no assessment was stored, never a silently-defaulted zero.
/// `freeze_request` is an independent user declaration and may disagree
/// with the compliance verdict.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordModel {
  /// Opaque identifier assigned by storage.
  pub id: Option<String>,
  /// Raw stored timestamp (RFC3339 or bare ISO); parsed only at
  /// aggregation boundaries.
  #[serde(alias = "timestamp")]
  pub created_at: Option<String>,
  #[serde(alias = "user_id")]
  pub user: Option<String>,
  pub project: Option<String>,
  pub repo_url: Option<String>,
  pub commit_message: String,
  pub commit_hash: Option<String>,
  pub files_changed: Vec<String>,
  pub file_added: Vec<String>,
  pub file_modified: Vec<String>,
  pub file_removed: Vec<String>,
  pub compliance: ComplianceResult,
  pub risk: Option<RiskResult>,
  pub freeze_request: bool,
  pub feedback: Vec<FeedbackEntry>,
}

// ---------------------------------------------------------------------------
// Wire requests (what the clients send)
// ---------------------------------------------------------------------------

/// Request body for the compliance endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceRequest {
  pub commit_message: String,
  pub files: Vec<String>,
}

/// Request body for the risk endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskRequest {
  pub commit_message: String,
  pub files: Vec<String>,
  pub lines_changed: u32,
  pub prev_bugs: u32,
  pub test_coverage: u32,
}

/// Request body for the save endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveRequest {
  pub user_id: String,
  pub project: String,
  pub repo_url: String,
  pub commit_message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub commit_hash: Option<String>,
  pub files_changed: Vec<String>,
  pub freeze_request: bool,
  pub compliance: ComplianceResult,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub risk: Option<RiskResult>,
}

/// Acknowledgement from the save endpoint: the identifier storage
/// assigned to the new record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveAck {
  pub record_id: Option<String>,
  pub commit_hash: Option<String>,
}

/// Request body for the feedback endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackRequest {
  pub user_id: String,
  pub commit_hash: String,
  pub message: String,
}

/// Acknowledgement from the ingestion trigger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessAck {
  pub processed: u64,
}

/// Free-text insight over the accumulated history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Insight {
  pub insight: String,
}

/// Free-text explanation of one record's scores.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Explanation {
  pub ai_explanation: String,
}
