//! Integration tests for the plan command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn plan_lists_the_full_catalog_in_order() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let output = run_bumper_ok(&ws.path, &["plan"])?;
  let stdout = stdout_of(&output);

  let actions = [
    "clobber",
    "pull",
    "download-shipped-locales",
    "bump-configs",
    "commit-changes",
    "tag",
    "push",
    "submit-to-balrog",
  ];
  let mut last = 0;
  for action in actions {
    let pos = stdout[last..]
      .find(action)
      .unwrap_or_else(|| panic!("'{}' missing or out of order in:\n{}", action, stdout));
    last += pos;
  }

  assert!(stdout.contains("firefox 52.0.1 build3"), "got:\n{}", stdout);
  Ok(())
}

#[test]
fn plan_json_includes_exact_command_lines() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let output = run_bumper_ok(&ws.path, &["plan", "--json", "-w", "/builds/work"])?;

  let plan: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  assert_eq!(plan["product"], "firefox");
  assert_eq!(plan["build_number"], 3);

  let actions = plan["actions"].as_array().unwrap();
  assert_eq!(actions.len(), 8);

  let bump = actions
    .iter()
    .find(|a| a["action"] == "bump-configs")
    .unwrap();
  let steps = bump["steps"].as_array().unwrap();
  // One perl bump, then one verify config per platform
  assert_eq!(steps.len(), 3);
  let perl = steps[0].as_str().unwrap();
  assert!(perl.starts_with("perl /builds/work/tools/release/patcher-config-bump.pl"), "got: {}", perl);
  assert!(perl.contains("--partial-version 52.0 --partial-version 51.0.1"), "got: {}", perl);
  assert!(steps[1].as_str().unwrap().contains("release-firefox-linux.cfg"));
  assert!(steps[2].as_str().unwrap().contains("release-firefox-win32.cfg"));

  let submit = actions
    .iter()
    .find(|a| a["action"] == "submit-to-balrog")
    .unwrap();
  let line = submit["steps"][0].as_str().unwrap();
  assert!(line.contains("balrog-release-pusher.py"), "got: {}", line);
  assert!(line.contains("--partial-update 52.0build2"), "got: {}", line);
  assert!(line.ends_with("--requires-mirrors"), "got: {}", line);

  Ok(())
}

#[test]
fn plan_respects_action_selection() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let output = run_bumper_ok(&ws.path, &["plan", "--json", "-a", "tag", "-a", "push"])?;

  let plan: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;
  let actions = plan["actions"].as_array().unwrap();
  assert_eq!(actions.len(), 2);
  assert_eq!(actions[0]["action"], "tag");
  assert_eq!(actions[1]["action"], "push");

  let tag_step = actions[0]["steps"][0].as_str().unwrap();
  assert!(
    tag_step.contains("FIREFOX_52_0_1_BUILD3_RUNTIME") && tag_step.contains("FIREFOX_52_0_1_RELEASE_RUNTIME"),
    "got: {}",
    tag_step
  );

  Ok(())
}

#[test]
fn plan_rejects_unknown_actions() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let output = run_bumper(&ws.path, &["plan", "-a", "deploy"])?;

  assert_eq!(output.status.code(), Some(1));
  assert!(stderr_of(&output).contains("deploy"), "got:\n{}", stderr_of(&output));
  Ok(())
}

#[test]
fn plan_applies_buildprops_overrides() -> Result<()> {
  let ws = TestWorkspace::new()?;
  let props = ws.write_props(
    r#"{"properties": {"version": "53.0", "appVersion": "53.0", "build_number": "1", "partial_versions": "52.0.1build3"}}"#,
  )?;

  let output = run_bumper_ok(&ws.path, &["plan", "--json", "--props", props.to_str().unwrap()])?;
  let plan: serde_json::Value = serde_json::from_str(&stdout_of(&output))?;

  assert_eq!(plan["version"], "53.0");
  assert_eq!(plan["build_number"], 1);

  let actions = plan["actions"].as_array().unwrap();
  let submit = actions
    .iter()
    .find(|a| a["action"] == "submit-to-balrog")
    .unwrap();
  let line = submit["steps"][0].as_str().unwrap();
  assert!(line.contains("--partial-update 52.0.1build3"), "got: {}", line);
  assert!(!line.contains("51.0.1build1"), "got: {}", line);

  Ok(())
}
