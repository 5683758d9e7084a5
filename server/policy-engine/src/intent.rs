//! Commit intent classification from message keywords.

/// Classify the intent of a commit/PR text into a category with a
/// confidence. First matching rule wins.
pub fn classify_intent(text: &str) -> (&'static str, f64) {
  let t = text.trim().to_lowercase();

  if t.starts_with("fix") || t.contains("fix:") || t.contains("bug") {
    return ("bug_fix", 0.9);
  }
  if t.starts_with("feat") || t.contains("feature") {
    return ("feature", 0.9);
  }
  if t.contains("refactor") {
    return ("refactor", 0.85);
  }
  if t.contains("doc") || t.contains("readme") {
    return ("documentation", 0.9);
  }
  if t.contains("test") || t.contains("spec") {
    return ("test", 0.9);
  }
  if t.contains("perf") || t.contains("performance") {
    return ("performance", 0.85);
  }
  if t.contains("security") || t.contains("vulnerability") {
    return ("security", 0.95);
  }
  if t.contains("chore") || t.contains("cleanup") {
    return ("chore", 0.8);
  }
  if t.contains("experiment") || t.contains("proof of concept") {
    return ("experimental", 0.7);
  }
  ("other", 0.6)
}
