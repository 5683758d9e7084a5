//! Pure folds over record history into presentation-ready statistics.
//!
//! Every function takes an immutable slice and allocates its output;
//! source records are never mutated and no state is retained across
//! calls. Emission order is deterministic: date-bucketed series ascend
//! by date, keyed groupings ascend by key. Records missing a grouping
//! key land in the `"(unknown)"` bucket; records without a usable
//! timestamp are excluded from date buckets and tallied as unscheduled.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::date::record_day;
use crate::types::RecordModel;

/// Bucket label for records missing a project or user identifier.
pub const UNKNOWN_BUCKET: &str = "(unknown)";

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
  pub total_commits: usize,
  /// Count of distinct project names (the unknown bucket counts once).
  pub total_projects: usize,
  /// Mean of the clamped risk scores of records carrying one; exactly
  /// 0.0 when no record does.
  pub avg_risk_score: f64,
  pub freeze_request_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
  pub date: NaiveDate,
  pub count: usize,
}

/// Day-bucketed commit counts, date-ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateSeries {
  pub days: Vec<DayCount>,
  /// Records whose timestamp was missing or unparseable.
  pub unscheduled: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRisk {
  pub project: String,
  pub avg_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributorCount {
  pub user: String,
  pub commit_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectFreeze {
  pub project: String,
  pub freeze_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
  pub date: NaiveDate,
  pub avg_risk: f64,
  pub avg_confidence: f64,
}

/// Per-day risk and confidence averages, date-ascending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendSeries {
  pub points: Vec<TrendPoint>,
  pub unscheduled: usize,
}

fn project_key(record: &RecordModel) -> String {
  match record.project.as_deref() {
    Some(p) if !p.trim().is_empty() => p.to_string(),
    _ => UNKNOWN_BUCKET.to_string(),
  }
}

fn user_key(record: &RecordModel) -> String {
  match record.user.as_deref() {
    Some(u) if !u.trim().is_empty() => u.to_string(),
    _ => UNKNOWN_BUCKET.to_string(),
  }
}

fn clamped_risk(record: &RecordModel) -> Option<f64> {
  record.risk.as_ref().map(|r| r.clamped_score())
}

fn day_of(record: &RecordModel) -> Option<NaiveDate> {
  record.created_at.as_deref().and_then(record_day)
}

fn mean(sum: f64, n: usize) -> f64 {
  if n == 0 {
    0.0
  } else {
    sum / n as f64
  }
}

/// Headline totals and the overall average risk score.
pub fn summary(records: &[RecordModel]) -> Summary {
  let projects: BTreeSet<String> = records.iter().map(project_key).collect();
  let mut risk_sum = 0.0;
  let mut risk_n = 0;
  for score in records.iter().filter_map(clamped_risk) {
    risk_sum += score;
    risk_n += 1;
  }
  Summary {
    total_commits: records.len(),
    total_projects: projects.len(),
    avg_risk_score: mean(risk_sum, risk_n),
    freeze_request_count: records.iter().filter(|r| r.freeze_request).count(),
  }
}

/// Commits per calendar day.
pub fn by_date(records: &[RecordModel]) -> DateSeries {
  let mut buckets: BTreeMap<NaiveDate, usize> = BTreeMap::new();
  let mut unscheduled = 0;
  for record in records {
    match day_of(record) {
      Some(day) => *buckets.entry(day).or_insert(0) += 1,
      None => {
        debug!("record without usable timestamp excluded from date buckets");
        unscheduled += 1;
      }
    }
  }
  DateSeries {
    days: buckets
      .into_iter()
      .map(|(date, count)| DayCount { date, count })
      .collect(),
    unscheduled,
  }
}

/// Average risk per project; one entry per distinct project,
/// project-name-ascending.
pub fn by_project(records: &[RecordModel]) -> Vec<ProjectRisk> {
  let mut acc: BTreeMap<String, (f64, usize)> = BTreeMap::new();
  for record in records {
    let entry = acc.entry(project_key(record)).or_insert((0.0, 0));
    if let Some(score) = clamped_risk(record) {
      entry.0 += score;
      entry.1 += 1;
    }
  }
  acc
    .into_iter()
    .map(|(project, (sum, n))| ProjectRisk {
      project,
      avg_risk: mean(sum, n),
    })
    .collect()
}

/// Commit counts per contributor, user-ascending.
pub fn by_contributor(records: &[RecordModel]) -> Vec<ContributorCount> {
  let mut acc: BTreeMap<String, usize> = BTreeMap::new();
  for record in records {
    *acc.entry(user_key(record)).or_insert(0) += 1;
  }
  acc
    .into_iter()
    .map(|(user, commit_count)| ContributorCount { user, commit_count })
    .collect()
}

/// Freeze-request counts per project; every distinct project appears,
/// zero counts included.
pub fn freeze_by_project(records: &[RecordModel]) -> Vec<ProjectFreeze> {
  let mut acc: BTreeMap<String, usize> = BTreeMap::new();
  for record in records {
    let entry = acc.entry(project_key(record)).or_insert(0);
    if record.freeze_request {
      *entry += 1;
    }
  }
  acc
    .into_iter()
    .map(|(project, freeze_count)| ProjectFreeze {
      project,
      freeze_count,
    })
    .collect()
}

/// Per-day average risk score and compliance confidence, averaged
/// independently per bucket.
pub fn risk_confidence_trend(records: &[RecordModel]) -> TrendSeries {
  #[derive(Default)]
  struct Acc {
    risk_sum: f64,
    risk_n: usize,
    conf_sum: f64,
    conf_n: usize,
  }

  let mut buckets: BTreeMap<NaiveDate, Acc> = BTreeMap::new();
  let mut unscheduled = 0;
  for record in records {
    let day = match day_of(record) {
      Some(d) => d,
      None => {
        unscheduled += 1;
        continue;
      }
    };
    let acc = buckets.entry(day).or_default();
    if let Some(score) = clamped_risk(record) {
      acc.risk_sum += score;
      acc.risk_n += 1;
    }
    acc.conf_sum += record.compliance.confidence;
    acc.conf_n += 1;
  }

  TrendSeries {
    points: buckets
      .into_iter()
      .map(|(date, acc)| TrendPoint {
        date,
        avg_risk: mean(acc.risk_sum, acc.risk_n),
        avg_confidence: mean(acc.conf_sum, acc.conf_n),
      })
      .collect(),
    unscheduled,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::{ComplianceResult, RiskResult};

  fn rec(project: &str, user: &str, risk: Option<f64>, freeze: bool, ts: &str) -> RecordModel {
    RecordModel {
      project: if project.is_empty() { None } else { Some(project.into()) },
      user: if user.is_empty() { None } else { Some(user.into()) },
      created_at: if ts.is_empty() { None } else { Some(ts.into()) },
      commit_message: "msg".into(),
      risk: risk.map(|score| RiskResult {
        risk_score: score,
        ..RiskResult::default()
      }),
      freeze_request: freeze,
      compliance: ComplianceResult {
        confidence: 0.8,
        ..ComplianceResult::default()
      },
      ..RecordModel::default()
    }
  }

  #[test]
  fn summary_of_empty_input_is_all_zeros() {
    let s = summary(&[]);
    assert_eq!(s.total_commits, 0);
    assert_eq!(s.total_projects, 0);
    assert_eq!(s.avg_risk_score, 0.0);
    assert_eq!(s.freeze_request_count, 0);
  }

  #[test]
  fn summary_averages_risk_and_counts_projects() {
    let records = vec![
      rec("backend", "pooja", Some(40.0), false, "2025-10-12T09:15:00Z"),
      rec("backend", "pooja", Some(20.0), true, "2025-10-12T10:45:00Z"),
      rec("frontend", "dinhson", Some(30.0), false, "2025-10-13T08:00:00Z"),
    ];
    let s = summary(&records);
    assert_eq!(s.total_commits, 3);
    assert_eq!(s.total_projects, 2);
    assert!((s.avg_risk_score - 30.0).abs() < 1e-9);
    assert_eq!(s.freeze_request_count, 1);
  }

  #[test]
  fn summary_skips_absent_risk_and_clamps_out_of_range() {
    let records = vec![
      rec("a", "u", Some(150.0), false, ""), // clamps to 100
      rec("a", "u", None, false, ""),        // no risk term
      rec("a", "u", Some(-10.0), false, ""), // clamps to 0
    ];
    let s = summary(&records);
    assert!((s.avg_risk_score - 50.0).abs() < 1e-9);
  }

  #[test]
  fn by_date_orders_ascending_and_counts_unscheduled() {
    let records = vec![
      rec("a", "u", None, false, "2025-10-13T08:00:00Z"),
      rec("a", "u", None, false, "2025-10-12T09:15:00Z"),
      rec("a", "u", None, false, "2025-10-12T23:59:00Z"),
      rec("a", "u", None, false, "not-a-date"),
      rec("a", "u", None, false, ""),
    ];
    let series = by_date(&records);
    assert_eq!(series.unscheduled, 2);
    let days: Vec<(String, usize)> = series
      .days
      .iter()
      .map(|d| (d.date.to_string(), d.count))
      .collect();
    assert_eq!(
      days,
      vec![("2025-10-12".to_string(), 2), ("2025-10-13".to_string(), 1)]
    );
  }

  #[test]
  fn by_project_emits_one_entry_per_project_sorted() {
    let records = vec![
      rec("frontend", "u", Some(20.0), false, ""),
      rec("backend", "u", Some(40.0), false, ""),
      rec("backend", "u", Some(50.0), false, ""),
      rec("", "u", Some(10.0), false, ""),
    ];
    let groups = by_project(&records);
    let names: Vec<&str> = groups.iter().map(|g| g.project.as_str()).collect();
    assert_eq!(names, vec![UNKNOWN_BUCKET, "backend", "frontend"]);
    let backend = groups.iter().find(|g| g.project == "backend").unwrap();
    assert!((backend.avg_risk - 45.0).abs() < 1e-9);
  }

  #[test]
  fn by_project_averages_only_records_with_risk() {
    let records = vec![
      rec("a", "u", Some(60.0), false, ""),
      rec("a", "u", None, false, ""),
    ];
    let groups = by_project(&records);
    assert_eq!(groups.len(), 1);
    assert!((groups[0].avg_risk - 60.0).abs() < 1e-9);
  }

  #[test]
  fn by_contributor_buckets_missing_users_under_sentinel() {
    let records = vec![
      rec("a", "pooja", None, false, ""),
      rec("a", "pooja", None, false, ""),
      rec("a", "", None, false, ""),
    ];
    let groups = by_contributor(&records);
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].user, UNKNOWN_BUCKET);
    assert_eq!(groups[0].commit_count, 1);
    assert_eq!(groups[1].user, "pooja");
    assert_eq!(groups[1].commit_count, 2);
  }

  #[test]
  fn freeze_counts_never_exceed_project_totals() {
    let records = vec![
      rec("a", "u", None, true, ""),
      rec("a", "u", None, false, ""),
      rec("b", "u", None, false, ""),
    ];
    let freezes = freeze_by_project(&records);
    let totals: BTreeMap<String, usize> = records.iter().fold(BTreeMap::new(), |mut m, r| {
      *m.entry(project_key(r)).or_insert(0) += 1;
      m
    });
    assert_eq!(freezes.len(), totals.len());
    for f in &freezes {
      assert!(f.freeze_count <= totals[&f.project]);
    }
    let b = freezes.iter().find(|f| f.project == "b").unwrap();
    assert_eq!(b.freeze_count, 0);
  }

  #[test]
  fn trend_averages_risk_and_confidence_independently() {
    let records = vec![
      rec("a", "u", Some(30.0), false, "2025-10-12T09:00:00Z"),
      rec("a", "u", None, false, "2025-10-12T10:00:00Z"),
      rec("a", "u", Some(50.0), false, "2025-10-13T09:00:00Z"),
    ];
    let trend = risk_confidence_trend(&records);
    assert_eq!(trend.points.len(), 2);
    // Day one: one risk value (30), two confidence values (0.8 each).
    assert!((trend.points[0].avg_risk - 30.0).abs() < 1e-9);
    assert!((trend.points[0].avg_confidence - 0.8).abs() < 1e-9);
    assert!((trend.points[1].avg_risk - 50.0).abs() < 1e-9);
  }

  #[test]
  fn aggregations_are_idempotent() {
    let records = vec![
      rec("backend", "pooja", Some(40.0), true, "2025-10-12T09:15:00Z"),
      rec("frontend", "dinhson", Some(20.0), false, "bad-ts"),
      rec("", "", None, false, "2025-10-13"),
    ];
    assert_eq!(summary(&records), summary(&records));
    assert_eq!(by_date(&records), by_date(&records));
    assert_eq!(by_project(&records), by_project(&records));
    assert_eq!(by_contributor(&records), by_contributor(&records));
    assert_eq!(freeze_by_project(&records), freeze_by_project(&records));
    assert_eq!(
      risk_confidence_trend(&records),
      risk_confidence_trend(&records)
    );
  }
}
