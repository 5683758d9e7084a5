//! Drives one commit submission through compliance, risk, and persistence.

use tracing::warn;

use crate::client::EvaluationApi;
use crate::config::{OrchestratorConfig, RiskPolicy};
use crate::error::{ClientError, EvaluateError};
use crate::input::{split_files, CommitInput};
use crate::types::{ComplianceRequest, ComplianceResult, RiskRequest, RiskResult, SaveRequest};

/// What the caller gets back from one evaluation.
#[derive(Debug)]
pub struct EvaluationOutcome {
  pub compliance: ComplianceResult,
  pub risk: RiskResult,
  /// True when the risk step failed and the lenient sentinel was
  /// substituted.
  pub risk_degraded: bool,
  pub persisted: bool,
  /// The save failure, when persistence was attempted and lost.
  pub persist_error: Option<ClientError>,
  /// Identifier storage assigned, when persistence succeeded.
  pub record_id: Option<String>,
}

/// Sequences the three remote steps for one submission.
///
/// Each invocation operates on its own input and outcome; there is no
/// shared mutable state, no de-duplication of concurrent calls, and no
/// mid-flight cancellation.
pub struct CheckOrchestrator<A> {
  api: A,
  config: OrchestratorConfig,
}

impl<A: EvaluationApi> CheckOrchestrator<A> {
  pub fn new(api: A, config: OrchestratorConfig) -> Self {
    Self { api, config }
  }

  pub fn with_defaults(api: A) -> Self {
    Self::new(api, OrchestratorConfig::default())
  }

  /// Evaluate one submission for `actor`.
  ///
  /// The three calls run strictly in order, one attempt each:
  /// 1. compliance: failure aborts, nothing else is attempted;
  /// 2. risk: failure follows the configured [`RiskPolicy`];
  /// 3. save: failure is reported on the outcome, never as an error,
  ///    so the caller can still display both results.
  pub async fn evaluate(
    &self,
    input: &CommitInput,
    actor: &str,
  ) -> Result<EvaluationOutcome, EvaluateError> {
    // Entries may still carry comma-joined paths from a raw form.
    let files: Vec<String> = input.files.iter().flat_map(|f| split_files(f)).collect();

    let compliance = self
      .api
      .check_compliance(&ComplianceRequest {
        commit_message: input.commit_message.clone(),
        files: files.clone(),
      })
      .await
      .map_err(EvaluateError::Compliance)?;

    let (risk, risk_degraded) = match self
      .api
      .score_risk(&RiskRequest {
        commit_message: input.commit_message.clone(),
        files: files.clone(),
        lines_changed: input.lines_changed,
        prev_bugs: input.prev_bugs,
        test_coverage: input.test_coverage,
      })
      .await
    {
      Ok(risk) => (risk, false),
      Err(e) => match self.config.risk_policy {
        RiskPolicy::Strict => return Err(EvaluateError::Risk(e)),
        RiskPolicy::Lenient => {
          warn!("risk scoring failed, continuing with sentinel: {}", e);
          (RiskResult::no_data(), true)
        }
      },
    };

    let saved = self
      .api
      .save_result(&SaveRequest {
        user_id: actor.to_string(),
        project: input.project.clone(),
        repo_url: input.repo_url.clone(),
        commit_message: input.commit_message.clone(),
        commit_hash: None,
        files_changed: files,
        freeze_request: input.freeze_request,
        compliance: compliance.clone(),
        risk: Some(risk.clone()),
      })
      .await;

    let (persisted, persist_error, record_id) = match saved {
      Ok(ack) => (true, None, ack.record_id),
      Err(e) => {
        warn!("saving evaluation failed, results still returned: {}", e);
        (false, Some(e), None)
      }
    };

    Ok(EvaluationOutcome {
      compliance,
      risk,
      risk_degraded,
      persisted,
      persist_error,
      record_id,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use std::collections::BTreeMap;
  use std::sync::Mutex;

  use crate::types::SaveAck;

  #[derive(Default)]
  struct FakeApi {
    fail_compliance: bool,
    fail_risk: bool,
    fail_save: bool,
    calls: Mutex<Vec<&'static str>>,
  }

  impl FakeApi {
    fn log(&self, step: &'static str) {
      self.calls.lock().unwrap().push(step);
    }

    fn calls(&self) -> Vec<&'static str> {
      self.calls.lock().unwrap().clone()
    }

    fn down() -> ClientError {
      ClientError::Status {
        status: 503,
        message: "service unavailable".into(),
      }
    }
  }

  #[async_trait]
  impl EvaluationApi for FakeApi {
    async fn check_compliance(
      &self,
      _request: &ComplianceRequest,
    ) -> Result<ComplianceResult, ClientError> {
      self.log("compliance");
      if self.fail_compliance {
        return Err(Self::down());
      }
      Ok(ComplianceResult {
        is_compliant: true,
        category: "bug_fix".into(),
        confidence: 0.9,
        message: "Bug Fix allowed.".into(),
        title: None,
      })
    }

    async fn score_risk(&self, _request: &RiskRequest) -> Result<RiskResult, ClientError> {
      self.log("risk");
      if self.fail_risk {
        return Err(Self::down());
      }
      Ok(RiskResult {
        risk_score: 18.0,
        factors: BTreeMap::from([("lines_changed".to_string(), 10.0)]),
        message: "Risk score (heuristic): 18.0%".into(),
      })
    }

    async fn save_result(&self, _request: &SaveRequest) -> Result<SaveAck, ClientError> {
      self.log("save");
      if self.fail_save {
        return Err(Self::down());
      }
      Ok(SaveAck {
        record_id: Some("rec-1".into()),
        commit_hash: Some("sub-abc".into()),
      })
    }
  }

  fn input() -> CommitInput {
    CommitInput {
      project: "Backend".into(),
      repo_url: "https://example.com/r.git".into(),
      commit_message: "fix bug".into(),
      files: vec!["a.py".into()],
      lines_changed: 10,
      prev_bugs: 0,
      test_coverage: 95,
      freeze_request: false,
    }
  }

  #[tokio::test]
  async fn successful_run_persists_and_reports_scores() {
    let orchestrator = CheckOrchestrator::with_defaults(FakeApi::default());
    let outcome = orchestrator.evaluate(&input(), "pooja").await.unwrap();
    assert!(outcome.compliance.is_compliant);
    assert_eq!(outcome.risk.risk_score, 18.0);
    assert!(!outcome.risk_degraded);
    assert!(outcome.persisted);
    assert!(outcome.persist_error.is_none());
    assert_eq!(outcome.record_id.as_deref(), Some("rec-1"));
  }

  #[tokio::test]
  async fn steps_run_in_order_and_save_comes_last() {
    let orchestrator = CheckOrchestrator::with_defaults(FakeApi::default());
    orchestrator.evaluate(&input(), "pooja").await.unwrap();
    assert_eq!(orchestrator.api.calls(), vec!["compliance", "risk", "save"]);
  }

  #[tokio::test]
  async fn save_failure_still_returns_both_results() {
    let api = FakeApi {
      fail_save: true,
      ..FakeApi::default()
    };
    let orchestrator = CheckOrchestrator::with_defaults(api);
    let outcome = orchestrator.evaluate(&input(), "pooja").await.unwrap();
    assert!(outcome.compliance.is_compliant);
    assert_eq!(outcome.risk.risk_score, 18.0);
    assert!(!outcome.persisted);
    assert!(outcome.persist_error.is_some());
    assert!(outcome.record_id.is_none());
  }

  #[tokio::test]
  async fn compliance_failure_aborts_before_risk_and_save() {
    let api = FakeApi {
      fail_compliance: true,
      ..FakeApi::default()
    };
    let orchestrator = CheckOrchestrator::with_defaults(api);
    let err = orchestrator.evaluate(&input(), "pooja").await.unwrap_err();
    assert!(matches!(err, EvaluateError::Compliance(_)));
    assert_eq!(orchestrator.api.calls(), vec!["compliance"]);
  }

  #[tokio::test]
  async fn lenient_policy_substitutes_sentinel_on_risk_failure() {
    let api = FakeApi {
      fail_risk: true,
      ..FakeApi::default()
    };
    let orchestrator = CheckOrchestrator::with_defaults(api);
    let outcome = orchestrator.evaluate(&input(), "pooja").await.unwrap();
    assert_eq!(outcome.risk.risk_score, 0.0);
    assert!(outcome.risk.factors.is_empty());
    assert_eq!(outcome.risk.message, "No risk data");
    assert!(outcome.risk_degraded);
    // The sentinel still goes to the save step.
    assert!(outcome.persisted);
    assert_eq!(orchestrator.api.calls(), vec!["compliance", "risk", "save"]);
  }

  #[tokio::test]
  async fn strict_policy_aborts_on_risk_failure() {
    let api = FakeApi {
      fail_risk: true,
      ..FakeApi::default()
    };
    let orchestrator = CheckOrchestrator::new(
      api,
      OrchestratorConfig {
        risk_policy: RiskPolicy::Strict,
      },
    );
    let err = orchestrator.evaluate(&input(), "pooja").await.unwrap_err();
    assert!(matches!(err, EvaluateError::Risk(_)));
    assert_eq!(orchestrator.api.calls(), vec!["compliance", "risk"]);
  }

  #[tokio::test]
  async fn comma_joined_file_entries_are_resplit() {
    let orchestrator = CheckOrchestrator::with_defaults(FakeApi::default());
    let mut submission = input();
    submission.files = vec!["auth/login.py, core/db/transaction.py".into(), " ".into()];
    let outcome = orchestrator.evaluate(&submission, "pooja").await.unwrap();
    assert!(outcome.persisted);
  }
}
