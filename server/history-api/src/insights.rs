//! Rule-based report text derived from history and single records.

use eval_core::aggregate;
use eval_core::RecordModel;

/// Compose a short free-text insight over the stored history.
pub fn compose_insight(records: &[RecordModel]) -> String {
  if records.is_empty() {
    return "No history yet. Submit a commit check to start building trends.".to_string();
  }

  let summary = aggregate::summary(records);
  let mut parts = vec![format!(
    "{} commits across {} projects, average risk {:.1}.",
    summary.total_commits, summary.total_projects, summary.avg_risk_score
  )];

  let projects = aggregate::by_project(records);
  let worst = projects
    .iter()
    .max_by(|a, b| a.avg_risk.total_cmp(&b.avg_risk));
  if let Some(worst) = worst {
    if worst.avg_risk > 0.0 {
      parts.push(format!(
        "Highest average risk: {} ({:.1}).",
        worst.project, worst.avg_risk
      ));
    }
  }

  if summary.freeze_request_count > 0 {
    parts.push(format!(
      "{} of {} commits requested a deployment freeze.",
      summary.freeze_request_count, summary.total_commits
    ));
  }

  parts.join(" ")
}

/// Explain one record's verdict and score from its stored factors.
pub fn explain_record(record: &RecordModel) -> String {
  let mut reasons: Vec<String> = Vec::new();

  let compliance = &record.compliance;
  reasons.push(format!(
    "Classified as '{}' with {:.0}% confidence; {}",
    compliance.category,
    compliance.confidence * 100.0,
    if compliance.is_compliant {
      "allowed by policy."
    } else {
      "blocked by policy."
    }
  ));

  match &record.risk {
    Some(risk) => {
      reasons.push(format!("Risk score {:.1}.", risk.clamped_score()));
      if risk.factors.get("lines_changed").copied().unwrap_or(0.0) > 100.0 {
        reasons.push("Large change: over 100 lines touched.".to_string());
      }
      if risk.factors.get("touches_core").copied().unwrap_or(0.0) > 0.0 {
        reasons.push("Touches core or database paths.".to_string());
      }
      let prev_bugs = risk.factors.get("prev_bugs").copied().unwrap_or(0.0);
      if prev_bugs > 0.0 {
        reasons.push(format!("{} previous bugs in the touched area.", prev_bugs));
      }
      if let Some(coverage) = risk.factors.get("test_coverage") {
        if *coverage < 80.0 {
          reasons.push(format!("Test coverage below target ({:.0}%).", coverage));
        }
      }
    }
    None => reasons.push("No risk assessment was stored for this record.".to_string()),
  }

  if record.freeze_request {
    reasons.push("The author requested a deployment freeze.".to_string());
  }

  reasons.join(" ")
}
