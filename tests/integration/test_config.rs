//! Integration tests for configuration loading and resolution errors

use crate::helpers::*;
use anyhow::Result;

#[test]
fn missing_config_file_is_a_user_error() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let output = run_bumper(&ws.path, &["plan", "--config", "nonexistent.toml"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(
    stderr_of(&output).contains("No configuration found"),
    "got:\n{}",
    stderr_of(&output)
  );
  Ok(())
}

#[test]
fn malformed_partial_token_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(&BASE_CONFIG.replace("\"52.0build2\"", "\"52.0-2\""))?;

  let output = run_bumper(&ws.path, &["plan"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(
    stderr_of(&output).contains("Malformed partial version token"),
    "got:\n{}",
    stderr_of(&output)
  );
  Ok(())
}

#[test]
fn channel_selection_without_any_known_channel_fails() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let props = ws.write_props(r#"{"properties": {"channels": "nightly"}}"#)?;

  let output = run_bumper(&ws.path, &["plan", "--props", props.to_str().unwrap()])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("nightly"), "got:\n{}", stderr_of(&output));
  Ok(())
}

#[test]
fn malformed_props_json_is_rejected() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let props = ws.write_props(r#"{"properties": "#)?;

  let output = run_bumper(&ws.path, &["plan", "--props", props.to_str().unwrap()])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(
    stderr_of(&output).contains("parse error"),
    "got:\n{}",
    stderr_of(&output)
  );
  Ok(())
}

#[test]
fn empty_props_file_is_ignored() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let props = ws.write_props("")?;

  let output = run_bumper_ok(&ws.path, &["plan", "--json", "--props", props.to_str().unwrap()])?;
  let plan: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(plan["version"], "52.0.1");
  Ok(())
}

#[test]
fn invalid_version_pattern_fails_before_any_action() -> Result<()> {
  let ws = TestWorkspace::new()?;
  ws.write_config(&BASE_CONFIG.replace(r"'\d+\.'", "'('"))?;

  let output = run_bumper(&ws.path, &["plan"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(
    stderr_of(&output).contains("version_regex"),
    "got:\n{}",
    stderr_of(&output)
  );
  Ok(())
}
