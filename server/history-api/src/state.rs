//! Shared application state.

use sqlx::PgPool;

pub struct AppState {
  pub pool: PgPool,
  /// Staged raw-commits JSON file read by /api/process_commits.
  pub raw_commits_path: String,
}
