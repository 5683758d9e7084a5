//! HTTP handlers for the evaluation and history endpoints.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use eval_core::types::{
  ComplianceResult, Explanation, FeedbackRequest, Insight, ProcessAck, RiskResult, SaveAck,
  SaveRequest,
};
use eval_core::RecordModel;
use policy_engine::{check_compliance, extract_features, predict_risk, ComplianceInput, RiskInput};

use crate::error::ApiError;
use crate::fingerprint::submission_fingerprint;
use crate::ingest;
use crate::state::AppState;
use crate::store;

pub async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
  let database = match sqlx::query("SELECT 1").execute(&state.pool).await {
    Ok(_) => "connected".to_string(),
    Err(e) => format!("error: {}", e),
  };
  Json(json!({
    "status": "ok",
    "database": database,
    "timestamp": Utc::now().to_rfc3339(),
  }))
}

pub async fn compliance_check(Json(payload): Json<ComplianceInput>) -> Json<ComplianceResult> {
  Json(check_compliance(&payload))
}

pub async fn risk_score(Json(payload): Json<RiskInput>) -> Json<RiskResult> {
  Json(predict_risk(&extract_features(&payload)))
}

pub async fn save_result(
  State(state): State<Arc<AppState>>,
  Json(payload): Json<SaveRequest>,
) -> Result<Json<SaveAck>, ApiError> {
  let commit_hash = payload
    .commit_hash
    .clone()
    .filter(|h| !h.is_empty())
    .unwrap_or_else(|| {
      submission_fingerprint(
        &payload.user_id,
        &payload.project,
        &payload.commit_message,
        &payload.files_changed,
      )
    });

  let record = store::NewRecord {
    id: Uuid::new_v4().to_string(),
    created_at: Utc::now(),
    user_id: payload.user_id.clone(),
    project: payload.project.clone(),
    repo_url: payload.repo_url.clone(),
    commit_message: payload.commit_message.clone(),
    commit_hash: commit_hash.clone(),
    files_changed: payload.files_changed.clone(),
    freeze_request: payload.freeze_request,
    compliance: payload.compliance.clone(),
    risk: payload.risk.clone(),
  };
  store::insert_record(&state.pool, &record).await?;
  info!("saved record {} for {}", record.id, record.user_id);

  Ok(Json(SaveAck {
    record_id: Some(record.id),
    commit_hash: Some(commit_hash),
  }))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
  pub limit: Option<i64>,
}

pub async fn history(
  State(state): State<Arc<AppState>>,
  Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<RecordModel>>, ApiError> {
  let limit = params.limit.unwrap_or(100).clamp(1, 1000);
  Ok(Json(store::fetch_history(&state.pool, limit).await?))
}

pub async fn feedback(
  State(state): State<Arc<AppState>>,
  Json(payload): Json<FeedbackRequest>,
) -> Result<Json<Value>, ApiError> {
  if payload.commit_hash.is_empty() {
    return Err(ApiError::BadRequest("commit_hash is required".to_string()));
  }
  store::insert_feedback(
    &state.pool,
    &payload.user_id,
    &payload.commit_hash,
    &payload.message,
  )
  .await?;
  Ok(Json(json!({ "status": "ok" })))
}

pub async fn process_commits(
  State(state): State<Arc<AppState>>,
) -> Result<Json<ProcessAck>, ApiError> {
  let staged = ingest::load_staged(&state.raw_commits_path)?;
  let mut processed = 0u64;
  for raw in &staged {
    let (compliance, risk) = ingest::evaluate(raw);
    let files = raw.changed_files();
    let commit_hash = raw
      .commit_hash
      .clone()
      .filter(|h| !h.is_empty())
      .unwrap_or_else(|| {
        submission_fingerprint(&raw.user, &raw.project, &raw.commit_message, &files)
      });

    let record = store::NewRecord {
      id: Uuid::new_v4().to_string(),
      created_at: raw
        .timestamp
        .as_deref()
        .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now),
      user_id: raw.user.clone(),
      project: raw.project.clone(),
      repo_url: raw.repo_url.clone(),
      commit_message: raw.commit_message.clone(),
      commit_hash,
      files_changed: files,
      freeze_request: raw.freeze_request,
      compliance,
      risk: Some(risk),
    };
    store::insert_record(&state.pool, &record).await?;
    processed += 1;
  }
  info!("processed {} staged commits", processed);
  Ok(Json(ProcessAck { processed }))
}

pub async fn insights(State(state): State<Arc<AppState>>) -> Result<Json<Insight>, ApiError> {
  let records = store::fetch_history(&state.pool, 500).await?;
  Ok(Json(Insight {
    insight: crate::insights::compose_insight(&records),
  }))
}

pub async fn ai_explain(Json(record): Json<RecordModel>) -> Json<Explanation> {
  Json(Explanation {
    ai_explanation: crate::insights::explain_record(&record),
  })
}
