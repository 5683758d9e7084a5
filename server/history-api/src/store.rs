//! PostgreSQL persistence for evaluation records and feedback.
//!
//! Records are written once and never updated; feedback entries are
//! append-only, keyed by commit hash.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use eval_core::types::{ComplianceResult, FeedbackEntry, RiskResult};
use eval_core::RecordModel;

const CREATE_RECORDS: &str = r#"
CREATE TABLE IF NOT EXISTS evaluation_records (
  id TEXT PRIMARY KEY,
  created_at TIMESTAMPTZ NOT NULL,
  user_id TEXT,
  project TEXT,
  repo_url TEXT,
  commit_message TEXT NOT NULL DEFAULT '',
  commit_hash TEXT,
  files_changed JSONB NOT NULL DEFAULT '[]'::jsonb,
  freeze_request BOOLEAN NOT NULL DEFAULT FALSE,
  is_compliant BOOLEAN NOT NULL DEFAULT FALSE,
  category TEXT NOT NULL DEFAULT '',
  confidence DOUBLE PRECISION NOT NULL DEFAULT 0,
  compliance_message TEXT NOT NULL DEFAULT '',
  compliance_title TEXT,
  risk_score DOUBLE PRECISION,
  risk_factors JSONB,
  risk_message TEXT
)
"#;

const CREATE_FEEDBACK: &str = r#"
CREATE TABLE IF NOT EXISTS feedback_entries (
  id BIGSERIAL PRIMARY KEY,
  commit_hash TEXT NOT NULL,
  user_id TEXT NOT NULL DEFAULT '',
  message TEXT NOT NULL DEFAULT '',
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
  sqlx::query(CREATE_RECORDS).execute(pool).await?;
  sqlx::query(CREATE_FEEDBACK).execute(pool).await?;
  Ok(())
}

/// One record ready to insert. `risk` stays None when no assessment was
/// supplied; the columns are NULL and history reports the absence.
pub struct NewRecord {
  pub id: String,
  pub created_at: DateTime<Utc>,
  pub user_id: String,
  pub project: String,
  pub repo_url: String,
  pub commit_message: String,
  pub commit_hash: String,
  pub files_changed: Vec<String>,
  pub freeze_request: bool,
  pub compliance: ComplianceResult,
  pub risk: Option<RiskResult>,
}

pub async fn insert_record(pool: &PgPool, record: &NewRecord) -> Result<(), sqlx::Error> {
  sqlx::query(
    r#"
    INSERT INTO evaluation_records
      (id, created_at, user_id, project, repo_url, commit_message, commit_hash,
       files_changed, freeze_request, is_compliant, category, confidence,
       compliance_message, compliance_title, risk_score, risk_factors, risk_message)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
    "#,
  )
  .bind(&record.id)
  .bind(record.created_at)
  .bind(&record.user_id)
  .bind(&record.project)
  .bind(&record.repo_url)
  .bind(&record.commit_message)
  .bind(&record.commit_hash)
  .bind(serde_json::json!(record.files_changed))
  .bind(record.freeze_request)
  .bind(record.compliance.is_compliant)
  .bind(&record.compliance.category)
  .bind(record.compliance.confidence)
  .bind(&record.compliance.message)
  .bind(&record.compliance.title)
  .bind(record.risk.as_ref().map(|r| r.risk_score))
  .bind(record.risk.as_ref().map(|r| serde_json::json!(r.factors)))
  .bind(record.risk.as_ref().map(|r| r.message.clone()))
  .execute(pool)
  .await?;
  Ok(())
}

/// Fetch up to `limit` records, newest first, with their feedback
/// entries attached.
pub async fn fetch_history(pool: &PgPool, limit: i64) -> Result<Vec<RecordModel>, sqlx::Error> {
  let rows = sqlx::query(
    r#"
    SELECT id, created_at, user_id, project, repo_url, commit_message, commit_hash,
           files_changed, freeze_request, is_compliant, category, confidence,
           compliance_message, compliance_title, risk_score, risk_factors, risk_message
    FROM evaluation_records
    ORDER BY created_at DESC
    LIMIT $1
    "#,
  )
  .bind(limit)
  .fetch_all(pool)
  .await?;

  let mut records = Vec::with_capacity(rows.len());
  for row in &rows {
    records.push(row_to_record(row)?);
  }

  let hashes: Vec<String> = records
    .iter()
    .filter_map(|r| r.commit_hash.clone())
    .collect();
  let mut feedback = fetch_feedback(pool, &hashes).await?;
  for record in &mut records {
    if let Some(hash) = &record.commit_hash {
      if let Some(entries) = feedback.remove(hash) {
        record.feedback = entries;
      }
    }
  }

  Ok(records)
}

fn row_to_record(row: &PgRow) -> Result<RecordModel, sqlx::Error> {
  let files_value: serde_json::Value = row.try_get("files_changed")?;
  let files_changed: Vec<String> = serde_json::from_value(files_value).unwrap_or_default();

  let risk = match row.try_get::<Option<f64>, _>("risk_score")? {
    Some(risk_score) => {
      let factors = row
        .try_get::<Option<serde_json::Value>, _>("risk_factors")?
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
      Some(RiskResult {
        risk_score,
        factors,
        message: row
          .try_get::<Option<String>, _>("risk_message")?
          .unwrap_or_default(),
      })
    }
    None => None,
  };

  let created_at: DateTime<Utc> = row.try_get("created_at")?;

  Ok(RecordModel {
    id: Some(row.try_get("id")?),
    created_at: Some(created_at.to_rfc3339()),
    user: row.try_get("user_id")?,
    project: row.try_get("project")?,
    repo_url: row.try_get("repo_url")?,
    commit_message: row.try_get("commit_message")?,
    commit_hash: row.try_get("commit_hash")?,
    files_changed,
    file_added: Vec::new(),
    file_modified: Vec::new(),
    file_removed: Vec::new(),
    compliance: ComplianceResult {
      is_compliant: row.try_get("is_compliant")?,
      category: row.try_get("category")?,
      confidence: row.try_get("confidence")?,
      message: row.try_get("compliance_message")?,
      title: row.try_get("compliance_title")?,
    },
    risk,
    freeze_request: row.try_get("freeze_request")?,
    feedback: Vec::new(),
  })
}

pub async fn insert_feedback(
  pool: &PgPool,
  user_id: &str,
  commit_hash: &str,
  message: &str,
) -> Result<(), sqlx::Error> {
  sqlx::query("INSERT INTO feedback_entries (commit_hash, user_id, message) VALUES ($1, $2, $3)")
    .bind(commit_hash)
    .bind(user_id)
    .bind(message)
    .execute(pool)
    .await?;
  Ok(())
}

async fn fetch_feedback(
  pool: &PgPool,
  hashes: &[String],
) -> Result<HashMap<String, Vec<FeedbackEntry>>, sqlx::Error> {
  if hashes.is_empty() {
    return Ok(HashMap::new());
  }
  let rows = sqlx::query(
    "SELECT commit_hash, user_id, message FROM feedback_entries WHERE commit_hash = ANY($1) ORDER BY id",
  )
  .bind(hashes)
  .fetch_all(pool)
  .await?;

  let mut map: HashMap<String, Vec<FeedbackEntry>> = HashMap::new();
  for row in rows {
    let hash: String = row.try_get("commit_hash")?;
    map.entry(hash).or_default().push(FeedbackEntry {
      user: row.try_get("user_id")?,
      message: row.try_get("message")?,
    });
  }
  Ok(map)
}
