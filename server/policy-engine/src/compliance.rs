//! Compliance verdict: intent classification gated by path risk and labels.

use eval_core::ComplianceResult;

use crate::intent::classify_intent;
use crate::types::ComplianceInput;

/// Categories allowed through during normal operation.
const ALLOWED_CATEGORIES: [&str; 5] = ["bug_fix", "feature", "documentation", "test", "chore"];

/// Labels that override the verdict regardless of classification.
const OVERRIDE_LABELS: [&str; 2] = ["allow-during-freeze", "hotfix"];

/// Classify one change and decide whether it passes policy.
pub fn check_compliance(input: &ComplianceInput) -> ComplianceResult {
  let labels_lower: Vec<String> = input.labels.iter().map(|l| l.to_lowercase()).collect();
  if labels_lower.iter().any(|l| OVERRIDE_LABELS.contains(&l.as_str())) {
    return ComplianceResult {
      is_compliant: true,
      category: "label_override".to_string(),
      confidence: 0.99,
      message: "Allowed via label.".to_string(),
      title: Some("Label override".to_string()),
    };
  }

  let text = format!("{} {}", input.pr_title, input.commit_message);
  let (category, confidence) = classify_intent(&text);
  let high_risk = touches_high_risk(&input.files);

  if ALLOWED_CATEGORIES.contains(&category) && !high_risk {
    ComplianceResult {
      is_compliant: true,
      category: category.to_string(),
      confidence,
      message: format!("{} allowed.", title_case(category)),
      title: None,
    }
  } else {
    ComplianceResult {
      is_compliant: false,
      category: category.to_string(),
      confidence,
      message: format!("Change classified as '{}', not allowed.", category),
      title: None,
    }
  }
}

/// Paths whose changes always need review: core modules, schema, raw SQL.
fn touches_high_risk(files: &[String]) -> bool {
  files
    .iter()
    .any(|f| f.starts_with("core/") || f.starts_with("db/") || f.ends_with(".sql"))
}

fn title_case(category: &str) -> String {
  category
    .split('_')
    .map(|word| {
      let mut chars = word.chars();
      match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
      }
    })
    .collect::<Vec<_>>()
    .join(" ")
}
