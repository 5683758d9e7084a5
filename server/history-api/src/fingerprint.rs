//! Stable fingerprints for submissions that arrive without a commit hash.

/// Derive a stable identifier from the submission identity so feedback
/// can still address the record. Uses blake3 for a fast, deterministic
/// hash.
pub fn submission_fingerprint(
  user_id: &str,
  project: &str,
  commit_message: &str,
  files: &[String],
) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(user_id.as_bytes());
  hasher.update(b"|");
  hasher.update(project.as_bytes());
  hasher.update(b"|");
  hasher.update(commit_message.as_bytes());
  for file in files {
    hasher.update(b"|");
    hasher.update(file.as_bytes());
  }
  let hex = hasher.finalize().to_hex();
  format!("sub-{}", &hex[..16])
}
