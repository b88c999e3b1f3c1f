//! `agegate`: age-eligibility checks from the command line.
//!
//! # Usage
//!
//! ```
//! agegate check --birthdate 2000-04-30 --policy over21 --at 2021-04-30
//! agegate claim --birthdate 2000-04-30 > claim.json
//! agegate verify claim.json
//! echo '{"user":{"dob":"2000-04-30"}}' | agegate annotate
//! agegate serve --config agegate.toml
//! ```

mod commands;
mod serve;
mod settings;

use std::{
  fs::File,
  io::{self, Read, Write},
  path::PathBuf,
  process::ExitCode,
};

use agegate_core::{Policy, parse_instant};
use anyhow::{Context as _, Result, bail};
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "agegate", version, about = "Age-eligibility policy checks")]
struct Cli {
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Evaluate a birthdate against a policy.
  Check {
    /// Birthdate: `YYYY-MM-DD`, `YYYYMMDD`, or an ISO-8601 timestamp.
    #[arg(short, long)]
    birthdate: String,

    #[command(flatten)]
    eval: EvalArgs,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Exit with status 1 when the decision is false.
    #[arg(long)]
    gate: bool,
  },

  /// Issue an AgeVerification claim document.
  Claim {
    #[arg(short, long)]
    birthdate: String,

    #[command(flatten)]
    eval: EvalArgs,
  },

  /// Check the digest of a stored claim.
  Verify {
    /// Claim file; stdin when omitted.
    file: Option<PathBuf>,
  },

  /// Fill in the decision on `{"user": {"dob": ...}}` records.
  Annotate {
    /// JSON file; stdin when omitted.
    file: Option<PathBuf>,

    #[command(flatten)]
    eval: EvalArgs,
  },

  /// List reason codes.
  Reasons,

  /// List policy presets.
  Policies,

  /// Serve the JSON API.
  Serve {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "agegate.toml")]
    config: PathBuf,
  },
}

#[derive(clap::Args, Debug)]
struct EvalArgs {
  /// Preset name (`over21`, `under18`) or `<at_least|under>:<years>`.
  #[arg(short, long, default_value = "over21")]
  policy: Policy,

  /// Reference time; defaults to now.
  #[arg(long, value_parser = parse_reference)]
  at: Option<DateTime<FixedOffset>>,
}

fn parse_reference(s: &str) -> Result<DateTime<FixedOffset>, String> {
  parse_instant(s).map_err(|e| e.to_string())
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  // Logs go to stderr so stdout stays machine-readable.
  tracing_subscriber::fmt()
    .with_writer(io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  match cli.command {
    Command::Serve { config } => {
      let cfg = settings::load(&config)?;
      serve::run(cfg).await?;
      Ok(ExitCode::SUCCESS)
    }
    command => run(command, &mut io::stdout().lock()),
  }
}

/// Run one offline subcommand, writing its output to `out`.
fn run(command: Command, out: &mut impl Write) -> Result<ExitCode> {
  match command {
    Command::Check {
      birthdate,
      eval,
      json,
      gate,
    } => {
      let decision =
        commands::check(out, &birthdate, eval.policy, eval.at, json)?;
      if gate && !decision {
        return Ok(ExitCode::FAILURE);
      }
    }
    Command::Claim { birthdate, eval } => {
      commands::claim(out, &birthdate, eval.policy, eval.at)?;
    }
    Command::Verify { file } => {
      commands::verify(out, &mut open_input(file.as_ref())?)?;
    }
    Command::Annotate { file, eval } => {
      commands::annotate(
        out,
        &mut open_input(file.as_ref())?,
        eval.policy,
        eval.at,
      )?;
    }
    Command::Reasons => commands::reasons(out)?,
    Command::Policies => commands::policies(out)?,
    Command::Serve { .. } => bail!("`serve` is not an offline command"),
  }

  Ok(ExitCode::SUCCESS)
}

/// A file if given, otherwise stdin.
fn open_input(path: Option<&PathBuf>) -> Result<Box<dyn Read>> {
  match path {
    Some(p) => {
      let f = File::open(p)
        .with_context(|| format!("opening {}", p.display()))?;
      Ok(Box::new(f))
    }
    None => Ok(Box::new(io::stdin())),
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn cli_definition_is_valid() { Cli::command().debug_assert(); }

  #[test]
  fn check_args_parse() {
    let cli = Cli::try_parse_from([
      "agegate",
      "check",
      "--birthdate",
      "2000-04-30",
      "--policy",
      "under:18",
      "--at",
      "2021-04-30T12:00:00+02:00",
      "--gate",
    ])
    .unwrap();
    let Command::Check { birthdate, eval, gate, json } = cli.command else {
      panic!("expected check");
    };
    assert_eq!(birthdate, "2000-04-30");
    assert_eq!(eval.policy, Policy::UNDER_18);
    assert_eq!(eval.at, Some(parse_instant("2021-04-30T12:00:00+02:00").unwrap()));
    assert!(gate);
    assert!(!json);
  }

  #[test]
  fn policy_defaults_to_over21() {
    let cli =
      Cli::try_parse_from(["agegate", "claim", "-b", "2000-04-30"]).unwrap();
    let Command::Claim { eval, .. } = cli.command else {
      panic!("expected claim");
    };
    assert_eq!(eval.policy, Policy::OVER_21);
    assert!(eval.at.is_none());
  }

  #[test]
  fn unknown_policy_is_rejected_at_parse_time() {
    let err = Cli::try_parse_from([
      "agegate", "check", "-b", "2000-04-30", "-p", "between:18",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("between"));
  }

  fn run_args(args: &[&str]) -> (ExitCode, String) {
    let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
    let mut out = Vec::new();
    let code = run(cli.command, &mut out).unwrap();
    (code, String::from_utf8(out).unwrap())
  }

  #[test]
  fn gate_fails_when_policy_not_met() {
    let args = ["agegate", "check", "-b", "2000-04-30", "--at", "2021-04-29"];
    let mut gated = args.to_vec();
    gated.push("--gate");
    let (code, text) = run_args(&gated);
    assert_eq!(code, ExitCode::FAILURE);
    assert_eq!(text, "decision=false reason=under_threshold\n");

    let (code, _) = run_args(&args);
    assert_eq!(code, ExitCode::SUCCESS);
  }

  #[test]
  fn offline_commands_write_to_the_given_sink() {
    let (code, text) = run_args(&["agegate", "reasons"]);
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(text.lines().count(), 5);
  }

  #[test]
  fn serve_is_not_run_offline() {
    let cli = Cli::try_parse_from(["agegate", "serve"]).unwrap();
    let mut out = Vec::new();
    assert!(run(cli.command, &mut out).is_err());
    assert!(out.is_empty());
  }

  #[test]
  fn bad_reference_time_is_rejected_at_parse_time() {
    assert!(
      Cli::try_parse_from([
        "agegate", "check", "-b", "2000-04-30", "--at", "yesterday",
      ])
      .is_err()
    );
  }
}
