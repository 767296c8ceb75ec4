//! External command execution: specs, the system runner, and retry
//!
//! Every external invocation is described by a `CommandSpec` built centrally
//! (see `builders`), so argument assembly and failure policy live in one
//! place and can be tested without spawning anything. The `CommandRunner`
//! trait is the seam the pipeline tests use to inject fakes.

use std::path::PathBuf;
use std::process::Command;
use std::thread;
use std::time::Duration;

use serde::Serialize;

use crate::core::error::{BumpResult, CommandError};

/// A fully specified external command invocation
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
  pub program: String,
  pub args: Vec<String>,
  /// Environment overlay on top of the ambient environment, not a
  /// replacement
  pub env: Vec<(String, String)>,
  pub cwd: Option<PathBuf>,
  /// A failure here aborts the whole run. The submit command leaves this
  /// false and is wrapped in retry instead.
  pub halt_on_failure: bool,
}

impl CommandSpec {
  pub fn new(program: impl Into<String>) -> Self {
    Self {
      program: program.into(),
      args: Vec::new(),
      env: Vec::new(),
      cwd: None,
      halt_on_failure: false,
    }
  }

  pub fn arg(mut self, arg: impl Into<String>) -> Self {
    self.args.push(arg.into());
    self
  }

  /// Append a flag/value pair
  pub fn flag(mut self, flag: &str, value: impl Into<String>) -> Self {
    self.args.push(flag.to_string());
    self.args.push(value.into());
    self
  }

  pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.env.push((key.into(), value.into()));
    self
  }

  pub fn halt_on_failure(mut self, halt: bool) -> Self {
    self.halt_on_failure = halt;
    self
  }

  /// One-line rendering for plan output and progress lines
  pub fn display_line(&self) -> String {
    let mut line = self.program.clone();
    for arg in &self.args {
      line.push(' ');
      line.push_str(arg);
    }
    line
  }
}

/// Executes a single `CommandSpec`. Implemented by `SystemRunner` for real
/// runs and by in-test fakes for fault injection.
pub trait CommandRunner {
  fn run(&self, spec: &CommandSpec) -> BumpResult<()>;
}

/// Runs commands as real subprocesses, synchronously
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
  fn run(&self, spec: &CommandSpec) -> BumpResult<()> {
    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args);
    for (key, value) in &spec.env {
      cmd.env(key, value);
    }
    if let Some(cwd) = &spec.cwd {
      cmd.current_dir(cwd);
    }

    let output = cmd.output().map_err(|e| CommandError::SpawnFailed {
      program: spec.program.clone(),
      message: e.to_string(),
    })?;

    if !output.status.success() {
      return Err(
        CommandError::Failed {
          program: spec.program.clone(),
          exit_code: output.status.code(),
          stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into(),
      );
    }

    Ok(())
  }
}

/// Bounded, deterministic retry for commands whose failure may be transient
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
  pub max_attempts: u32,
  /// Fixed delay between attempts
  pub delay: Duration,
}

impl Default for RetryPolicy {
  fn default() -> Self {
    Self {
      max_attempts: 3,
      delay: Duration::from_secs(30),
    }
  }
}

/// Run `spec` up to `policy.max_attempts` times, sleeping `policy.delay`
/// between attempts. Only the final exhausted failure is returned.
pub fn run_with_retry(runner: &dyn CommandRunner, spec: &CommandSpec, policy: &RetryPolicy) -> BumpResult<()> {
  let attempts = policy.max_attempts.max(1);
  let mut last_err = None;

  for attempt in 1..=attempts {
    match runner.run(spec) {
      Ok(()) => return Ok(()),
      Err(err) => {
        if attempt < attempts {
          println!("⚠️  Attempt {}/{} failed: {}. Retrying...", attempt, attempts, err);
          if !policy.delay.is_zero() {
            thread::sleep(policy.delay);
          }
        }
        last_err = Some(err);
      }
    }
  }

  Err(last_err.expect("at least one attempt was made"))
}
