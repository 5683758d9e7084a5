//! History JSON through the aggregation pipeline.

use eval_core::aggregate;
use eval_core::RecordModel;

fn fixture_records() -> Vec<RecordModel> {
  let json = r#"[
    {
      "id": "6f1f9f2e-6f2a-4a7e-9f0c-6f1f9f2e0001",
      "created_at": "2025-10-12T09:15:00Z",
      "user": "pooja",
      "project": "Backend",
      "repo_url": "https://example.com/backend.git",
      "commit_message": "Refactor API commit handler",
      "commit_hash": "abc123",
      "files_changed": ["api/handler.py"],
      "compliance": {"is_compliant": true, "category": "refactor", "confidence": 0.85, "message": "Refactor allowed."},
      "risk": {"risk_score": 48.0, "factors": {"lines_changed": 120}, "message": "Risk score (heuristic): 48.0%"},
      "freeze_request": false
    },
    {
      "timestamp": "2025-10-12T10:45:00Z",
      "user_id": "dinhson",
      "project": "Frontend",
      "commit_message": "Improve navbar layout",
      "files_changed": ["src/Navbar.jsx"],
      "compliance": {"is_compliant": true, "category": "feature", "confidence": 0.9, "message": "Feature allowed."},
      "risk": {"risk_score": 20.0, "factors": {}, "message": "Risk score (heuristic): 20.0%"},
      "freeze_request": true
    },
    {
      "created_at": "2025-10-13T18:20:00Z",
      "user": "kasthuri",
      "project": "Backend",
      "commit_message": "Update risk threshold",
      "compliance": {"is_compliant": false, "category": "experimental", "confidence": 0.7, "message": "Change classified as 'experimental', not allowed."},
      "freeze_request": false
    },
    {
      "user": "son",
      "project": "DataPipeline",
      "commit_message": "Fix large file ingestion bug",
      "compliance": {"is_compliant": true, "category": "bug_fix", "confidence": 0.9, "message": "Bug Fix allowed."},
      "risk": {"risk_score": 39.0, "factors": {}, "message": "Risk score (heuristic): 39.0%"},
      "freeze_request": false
    }
  ]"#;
  serde_json::from_str(json).unwrap()
}

#[test]
fn summary_over_fixture_history() {
  let records = fixture_records();
  let s = aggregate::summary(&records);
  assert_eq!(s.total_commits, 4);
  assert_eq!(s.total_projects, 3);
  assert_eq!(s.freeze_request_count, 1);
  // Three records carry a risk score: (48 + 20 + 39) / 3.
  let expected = (48.0 + 20.0 + 39.0) / 3.0;
  assert!((s.avg_risk_score - expected).abs() < 1e-9);
}

#[test]
fn date_buckets_exclude_the_timestampless_record() {
  let records = fixture_records();
  let series = aggregate::by_date(&records);
  assert_eq!(series.unscheduled, 1);
  assert_eq!(series.days.len(), 2);
  assert_eq!(series.days[0].count, 2);
  assert_eq!(series.days[1].count, 1);
}

#[test]
fn project_buckets_partition_the_records() {
  let records = fixture_records();
  let groups = aggregate::by_project(&records);
  assert_eq!(groups.len(), 3);

  // Sum of each project's record count equals the records with that project.
  for g in &groups {
    let n = records
      .iter()
      .filter(|r| r.project.as_deref() == Some(g.project.as_str()))
      .count();
    assert!(n > 0, "empty bucket emitted for {}", g.project);
  }

  let backend = groups.iter().find(|g| g.project == "Backend").unwrap();
  // Backend has two records but only one risk score.
  assert!((backend.avg_risk - 48.0).abs() < 1e-9);
}

#[test]
fn contributors_and_freezes_line_up() {
  let records = fixture_records();
  let contributors = aggregate::by_contributor(&records);
  assert_eq!(contributors.len(), 4);
  assert!(contributors.iter().all(|c| c.commit_count == 1));

  let freezes = aggregate::freeze_by_project(&records);
  let frontend = freezes.iter().find(|f| f.project == "Frontend").unwrap();
  assert_eq!(frontend.freeze_count, 1);
  let backend = freezes.iter().find(|f| f.project == "Backend").unwrap();
  assert_eq!(backend.freeze_count, 0);
}

#[test]
fn trend_buckets_follow_the_calendar() {
  let records = fixture_records();
  let trend = aggregate::risk_confidence_trend(&records);
  assert_eq!(trend.points.len(), 2);
  assert_eq!(trend.unscheduled, 1);
  // 2025-10-12: risks 48 and 20, confidences 0.85 and 0.9.
  assert!((trend.points[0].avg_risk - 34.0).abs() < 1e-9);
  assert!((trend.points[0].avg_confidence - 0.875).abs() < 1e-9);
  // 2025-10-13: no risk score stored, confidence 0.7.
  assert_eq!(trend.points[1].avg_risk, 0.0);
  assert!((trend.points[1].avg_confidence - 0.7).abs() < 1e-9);
}
