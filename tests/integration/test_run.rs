//! Integration tests for the run command
//!
//! Only the filesystem-backed actions are exercised for real; everything
//! else would need hg, perl, and python on the test machine.

use crate::helpers::*;
use anyhow::Result;

#[test]
fn run_clobber_recreates_the_work_dir() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let work_dir = ws.path.join("build");
  std::fs::create_dir_all(&work_dir)?;
  std::fs::write(work_dir.join("stale-file"), "leftover from a previous run")?;

  let output = run_bumper_ok(
    &ws.path,
    &["run", "-a", "clobber", "-w", work_dir.to_str().unwrap()],
  )?;

  assert!(work_dir.exists());
  assert!(!work_dir.join("stale-file").exists());
  assert!(stdout_of(&output).contains("All selected actions completed"), "got:\n{}", stdout_of(&output));
  Ok(())
}

#[test]
fn run_reports_skipped_actions() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let work_dir = ws.path.join("build");

  let output = run_bumper_ok(
    &ws.path,
    &["run", "-a", "clobber", "-w", work_dir.to_str().unwrap()],
  )?;
  let stdout = stdout_of(&output);

  assert!(stdout.contains("✅ clobber"), "got:\n{}", stdout);
  assert!(stdout.contains("⏭️  pull"), "got:\n{}", stdout);
  assert!(stdout.contains("⏭️  submit-to-balrog"), "got:\n{}", stdout);
  Ok(())
}

#[test]
fn run_with_missing_config_exits_nonzero() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let output = run_bumper(&ws.path, &["run", "--config", "nonexistent.toml"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(
    stderr_of(&output).contains("No configuration found"),
    "got:\n{}",
    stderr_of(&output)
  );
  Ok(())
}
