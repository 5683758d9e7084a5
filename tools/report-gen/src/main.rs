//! report-gen: aggregate report over evaluation history JSON
//!
//! Usage:
//!   report-gen < history.json           # compact JSON report on stdout
//!   report-gen --pretty < history.json  # pretty-printed
//!
//! Reads a JSON array of evaluation records (the /api/history shape) and
//! emits summary, per-day, per-project, and per-contributor aggregates.
//! Use in scripts to sanity-check exported history without a dashboard.

use std::env;
use std::io::{self, Read};
use std::process;

use eval_core::{aggregate, RecordModel};

fn main() {
    let pretty = env::args().any(|a| a == "--pretty" || a == "-p");

    let mut raw = String::new();
    if let Err(e) = io::stdin().lock().read_to_string(&mut raw) {
        eprintln!("report-gen: cannot read stdin: {}", e);
        process::exit(2);
    }

    let records: Vec<RecordModel> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("report-gen: invalid history JSON: {}", e);
            process::exit(2);
        }
    };

    let report = serde_json::json!({
        "summary": aggregate::summary(&records),
        "by_date": aggregate::by_date(&records),
        "by_project": aggregate::by_project(&records),
        "by_contributor": aggregate::by_contributor(&records),
        "freeze_by_project": aggregate::freeze_by_project(&records),
        "risk_confidence_trend": aggregate::risk_confidence_trend(&records),
    });

    let out = if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    match out {
        Ok(s) => println!("{}", s),
        Err(e) => {
            eprintln!("report-gen: serialization failed: {}", e);
            process::exit(2);
        }
    }
}
