//! Stateless HTTP wrappers over the evaluation and history endpoints.
//!
//! All contracts are JSON over HTTP. Failures map to [`ClientError`] and
//! propagate to the caller; nothing is retried here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::ClientError;
use crate::types::{
  ComplianceRequest, ComplianceResult, Explanation, FeedbackRequest, Insight, ProcessAck,
  RecordModel, RiskRequest, RiskResult, SaveAck, SaveRequest,
};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The three remote steps the orchestrator drives. Implemented over HTTP
/// by [`EvaluationClient`]; tests substitute an in-memory fake.
#[async_trait]
pub trait EvaluationApi: Send + Sync {
  async fn check_compliance(
    &self,
    request: &ComplianceRequest,
  ) -> Result<ComplianceResult, ClientError>;

  async fn score_risk(&self, request: &RiskRequest) -> Result<RiskResult, ClientError>;

  async fn save_result(&self, request: &SaveRequest) -> Result<SaveAck, ClientError>;
}

fn build_client(timeout: Duration) -> Result<Client, ClientError> {
  Ok(Client::builder().timeout(timeout).build()?)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
  let status = response.status();
  if !status.is_success() {
    let message = response.text().await.unwrap_or_default();
    return Err(ClientError::Status {
      status: status.as_u16(),
      message,
    });
  }
  Ok(response.json::<T>().await?)
}

/// HTTP implementation of [`EvaluationApi`].
pub struct EvaluationClient {
  client: Client,
  base_url: String,
}

impl EvaluationClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
  }

  pub fn with_timeout(
    base_url: impl Into<String>,
    timeout: Duration,
  ) -> Result<Self, ClientError> {
    Ok(Self {
      client: build_client(timeout)?,
      base_url: base_url.into(),
    })
  }

  async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
  where
    B: Serialize + Sync,
    T: DeserializeOwned,
  {
    let url = format!("{}{}", self.base_url, path);
    debug!("POST {}", url);
    let response = self.client.post(&url).json(body).send().await?;
    decode(response).await
  }
}

#[async_trait]
impl EvaluationApi for EvaluationClient {
  async fn check_compliance(
    &self,
    request: &ComplianceRequest,
  ) -> Result<ComplianceResult, ClientError> {
    self.post_json("/api/compliance-check", request).await
  }

  async fn score_risk(&self, request: &RiskRequest) -> Result<RiskResult, ClientError> {
    self.post_json("/api/risk-score", request).await
  }

  async fn save_result(&self, request: &SaveRequest) -> Result<SaveAck, ClientError> {
    self.post_json("/api/save-result", request).await
  }
}

/// Read side: history fetch plus the auxiliary record endpoints.
pub struct HistoryClient {
  client: Client,
  base_url: String,
}

impl HistoryClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
    Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
  }

  pub fn with_timeout(
    base_url: impl Into<String>,
    timeout: Duration,
  ) -> Result<Self, ClientError> {
    Ok(Self {
      client: build_client(timeout)?,
      base_url: base_url.into(),
    })
  }

  /// Fetch up to `limit` records, newest first.
  pub async fn fetch_history(&self, limit: u32) -> Result<Vec<RecordModel>, ClientError> {
    let url = format!("{}/api/history", self.base_url);
    debug!("GET {} limit={}", url, limit);
    let response = self
      .client
      .get(&url)
      .query(&[("limit", limit)])
      .send()
      .await?;
    decode(response).await
  }

  /// Append a feedback entry to the record addressed by `commit_hash`.
  /// The actor is always passed explicitly; there is no ambient session.
  pub async fn post_feedback(
    &self,
    actor: &str,
    commit_hash: &str,
    message: &str,
  ) -> Result<(), ClientError> {
    let url = format!("{}/api/feedback", self.base_url);
    let body = FeedbackRequest {
      user_id: actor.to_string(),
      commit_hash: commit_hash.to_string(),
      message: message.to_string(),
    };
    let response = self.client.post(&url).json(&body).send().await?;
    // The server may answer with the updated record or a bare ack.
    let _ack: serde_json::Value = decode(response).await?;
    Ok(())
  }

  /// Trigger ingestion of staged raw commits.
  pub async fn process_commits(&self) -> Result<ProcessAck, ClientError> {
    let url = format!("{}/api/process_commits", self.base_url);
    let response = self.client.post(&url).send().await?;
    decode(response).await
  }

  /// Aggregate free-text insight over the stored history.
  pub async fn insights(&self) -> Result<Insight, ClientError> {
    let url = format!("{}/api/insights", self.base_url);
    let response = self.client.get(&url).send().await?;
    decode(response).await
  }

  /// Explanation of one record's scores.
  pub async fn ai_explain(&self, record: &RecordModel) -> Result<Explanation, ClientError> {
    let url = format!("{}/api/ai_explain", self.base_url);
    let response = self.client.post(&url).json(record).send().await?;
    decode(response).await
  }
}
