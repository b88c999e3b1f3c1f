//! One function per offline subcommand. Each writes to the supplied sink so
//! output can be captured in tests.

use std::io::{Read, Write};

use agegate_claim::{AgeClaim, annotate_records};
use agegate_core::{EvaluationRequest, Policy, Reason};
use anyhow::{Context as _, Result, bail};
use chrono::{DateTime, FixedOffset, Utc};

fn reference_or_now(at: Option<DateTime<FixedOffset>>) -> DateTime<FixedOffset> {
  at.unwrap_or_else(|| Utc::now().fixed_offset())
}

/// `agegate check`. Returns the decision so the caller can pick an exit
/// code.
pub fn check(
  out: &mut impl Write,
  birthdate: &str,
  policy: Policy,
  at: Option<DateTime<FixedOffset>>,
  json: bool,
) -> Result<bool> {
  let request = EvaluationRequest {
    birthdate:      Some(birthdate.to_string()),
    reference_time: Some(reference_or_now(at)),
  };
  let result = request.evaluate(policy);
  tracing::debug!(%policy, ?result, "evaluated");

  if json {
    writeln!(out, "{}", serde_json::to_string(&result)?)?;
  } else {
    writeln!(out, "decision={} reason={}", result.decision, result.reason)?;
  }
  Ok(result.decision)
}

/// `agegate claim`
pub fn claim(
  out: &mut impl Write,
  birthdate: &str,
  policy: Policy,
  at: Option<DateTime<FixedOffset>>,
) -> Result<()> {
  let claim = AgeClaim::issue(birthdate, policy, reference_or_now(at))
    .context("cannot issue age claim")?;
  tracing::info!(claim_id = %claim.claim_id, "issued age claim");
  writeln!(out, "{}", claim.to_json_pretty()?)?;
  Ok(())
}

/// `agegate verify`: checks a stored claim's digest.
pub fn verify(out: &mut impl Write, input: &mut impl Read) -> Result<()> {
  let mut text = String::new();
  input.read_to_string(&mut text).context("reading claim")?;
  let claim = AgeClaim::from_json(&text).context("parsing claim")?;

  if !claim.verify_digest() {
    bail!("digest mismatch for {}", claim.claim_id);
  }
  writeln!(out, "{}: digest ok", claim.claim_id)?;
  Ok(())
}

/// `agegate annotate`: reads a user record (or an array of them) and
/// writes it back with the decision filled in.
pub fn annotate(
  out: &mut impl Write,
  input: &mut impl Read,
  policy: Policy,
  at: Option<DateTime<FixedOffset>>,
) -> Result<()> {
  let mut text = String::new();
  input.read_to_string(&mut text).context("reading input")?;
  let mut document: serde_json::Value =
    serde_json::from_str(&text).context("input is not valid JSON")?;

  let results = annotate_records(&mut document, policy, reference_or_now(at))
    .context("annotating records")?;
  tracing::debug!(records = results.len(), %policy, "annotated");

  writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
  Ok(())
}

/// `agegate reasons`
pub fn reasons(out: &mut impl Write) -> Result<()> {
  for r in Reason::ALL {
    writeln!(out, "{:<30} {}", r.as_str(), r.description())?;
  }
  Ok(())
}

/// `agegate policies`
pub fn policies(out: &mut impl Write) -> Result<()> {
  for (name, policy) in Policy::presets() {
    writeln!(out, "{name:<10} {policy}")?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use agegate_core::parse_instant;

  use super::*;

  fn at(s: &str) -> Option<DateTime<FixedOffset>> { Some(parse_instant(s).unwrap()) }

  fn run<F>(f: F) -> String
  where
    F: FnOnce(&mut Vec<u8>) -> Result<()>,
  {
    let mut out = Vec::new();
    f(&mut out).unwrap();
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn check_plain_output() {
    let mut out = Vec::new();
    let decision =
      check(&mut out, "2000-04-30", Policy::OVER_21, at("2021-04-29"), false)
        .unwrap();
    assert!(!decision);
    assert_eq!(
      String::from_utf8(out).unwrap(),
      "decision=false reason=under_threshold\n"
    );
  }

  #[test]
  fn check_json_output() {
    let mut out = Vec::new();
    let decision =
      check(&mut out, "2010-01-01", Policy::UNDER_18, at("2025-01-01"), true)
        .unwrap();
    assert!(decision);
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v, serde_json::json!({ "decision": true, "reason": "ok" }));
  }

  #[test]
  fn check_bad_input_is_not_an_error() {
    let mut out = Vec::new();
    let decision =
      check(&mut out, "", Policy::OVER_21, at("2025-01-01"), false).unwrap();
    assert!(!decision);
    assert!(String::from_utf8(out).unwrap().contains("invalid_or_missing_birthdate"));
  }

  #[test]
  fn claim_then_verify() {
    let text = run(|out| claim(out, "2000-04-30", Policy::OVER_21, at("2021-04-30")));
    let verified = run(|out| verify(out, &mut text.as_bytes()));
    assert!(verified.ends_with(": digest ok\n"));
  }

  #[test]
  fn verify_rejects_edited_claim() {
    let text = run(|out| claim(out, "2005-01-01", Policy::OVER_21, at("2025-01-01")));
    let edited = text.replace("\"decision\": false", "\"decision\": true");
    assert_ne!(edited, text);

    let mut out = Vec::new();
    let err = verify(&mut out, &mut edited.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("digest mismatch"));
  }

  #[test]
  fn claim_refuses_future_birthdate() {
    let mut out = Vec::new();
    assert!(claim(&mut out, "2030-01-01", Policy::OVER_21, at("2025-01-01")).is_err());
    assert!(out.is_empty());
  }

  #[test]
  fn annotate_over21_record() {
    let input = r#"{"user": {"name": "Jane Doe", "dob": "2000-04-30"}}"#;
    let text = run(|out| {
      annotate(out, &mut input.as_bytes(), Policy::OVER_21, at("2021-04-30"))
    });
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v["user"]["is_over_21"], true);
    assert_eq!(v["user"]["name"], "Jane Doe");
  }

  #[test]
  fn annotate_rejects_non_json() {
    let mut out = Vec::new();
    let err = annotate(&mut out, &mut "dob=2000".as_bytes(), Policy::OVER_21, None)
      .unwrap_err();
    assert!(err.to_string().contains("not valid JSON"));
  }

  #[test]
  fn reasons_lists_every_code() {
    let text = run(|out| reasons(out));
    assert_eq!(text.lines().count(), Reason::ALL.len());
    assert!(text.lines().any(|l| l.starts_with("birthdate_in_future ")));
  }

  #[test]
  fn policies_lists_presets() {
    let text = run(|out| policies(out));
    assert!(text.contains("over21"));
    assert!(text.contains("under:18"));
  }
}
