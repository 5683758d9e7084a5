//! Risk heuristic: churn, bug history, coverage, and core-path touches.

use std::collections::BTreeMap;

use eval_core::RiskResult;

use crate::types::RiskInput;

/// Features extracted from one scoring request.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskFeatures {
  pub lines_changed: u32,
  pub prev_bugs: u32,
  pub test_coverage: u32,
  pub touches_core: bool,
}

/// Pull the scoring features out of a request.
pub fn extract_features(input: &RiskInput) -> RiskFeatures {
  RiskFeatures {
    lines_changed: input.lines_changed,
    prev_bugs: input.prev_bugs,
    test_coverage: input.test_coverage,
    touches_core: input
      .files
      .iter()
      .any(|f| f.starts_with("core/") || f.starts_with("db/")),
  }
}

/// Score 0-100, higher = more dangerous.
///
/// Safety starts at 100 and loses: 20 for >100 changed lines (10 for
/// >50), 30 for core-path touches, 5 per previous bug, and half a point
/// per coverage point below 80.
pub fn predict_risk(features: &RiskFeatures) -> RiskResult {
  let mut safety = 100.0_f64;
  if features.lines_changed > 100 {
    safety -= 20.0;
  } else if features.lines_changed > 50 {
    safety -= 10.0;
  }
  if features.touches_core {
    safety -= 30.0;
  }
  safety -= features.prev_bugs as f64 * 5.0;
  if features.test_coverage < 80 {
    safety -= (80 - features.test_coverage) as f64 * 0.5;
  }
  let safety = safety.clamp(0.0, 100.0);
  let risk = 100.0 - safety;

  let factors = BTreeMap::from([
    ("lines_changed".to_string(), features.lines_changed as f64),
    ("prev_bugs".to_string(), features.prev_bugs as f64),
    ("test_coverage".to_string(), features.test_coverage as f64),
    (
      "touches_core".to_string(),
      if features.touches_core { 1.0 } else { 0.0 },
    ),
  ]);

  RiskResult {
    risk_score: risk,
    factors,
    message: format!(
      "Risk score (heuristic): {:.1}% (safety={:.1}%)",
      risk, safety
    ),
  }
}
