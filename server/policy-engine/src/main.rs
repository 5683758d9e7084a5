//! Binary entrypoint: read one JSON request from stdin, write one JSON
//! result to stdout.
//!
//! The request selects the operation via `op` ("compliance" or "risk");
//! the remaining fields are the operation's input.

use policy_engine::{check_compliance, extract_features, predict_risk, EngineRequest};
use std::io::{self, Read, Write};

fn main() {
  if let Err(e) = run_binary() {
    let _ = writeln!(io::stderr(), "policy-engine error: {}", e);
    std::process::exit(1);
  }
}

fn run_binary() -> Result<(), Box<dyn std::error::Error>> {
  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let request: EngineRequest = serde_json::from_str(&raw)?;

  let json = match request {
    EngineRequest::Compliance(input) => serde_json::to_vec(&check_compliance(&input))?,
    EngineRequest::Risk(input) => serde_json::to_vec(&predict_risk(&extract_features(&input)))?,
  };
  io::stdout().write_all(&json)?;
  Ok(())
}
