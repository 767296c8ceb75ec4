//! Plan command: render the work a run would do
//!
//! The plan is computed from the resolved config alone. Nothing is cloned,
//! downloaded, or executed, so `plan` is safe to run anywhere the config
//! files are readable.

use std::path::Path;

use serde::Serialize;

use crate::commands::load_resolved;
use crate::core::builders;
use crate::core::config::{COMMIT_MESSAGE, Dirs, ResolvedConfig};
use crate::core::error::BumpResult;
use crate::core::matrix;
use crate::core::pipeline::{Action, select_actions};
use crate::core::versions;

#[derive(Debug, Serialize)]
struct PlannedAction {
  action: Action,
  steps: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Plan {
  product: String,
  version: String,
  build_number: u32,
  channels: Vec<String>,
  platforms: Vec<String>,
  actions: Vec<PlannedAction>,
}

pub fn run_plan(
  config_path: &Path,
  props_path: Option<&Path>,
  action_names: &[String],
  work_dir: &Path,
  json: bool,
) -> BumpResult<()> {
  let resolved = load_resolved(config_path, props_path)?;
  let selected = select_actions(action_names)?;
  let dirs = Dirs::new(work_dir, &resolved.repo_dest);

  let plan = build_plan(&resolved, &dirs, &selected)?;

  if json {
    println!("{}", serde_json::to_string_pretty(&plan)?);
    return Ok(());
  }

  println!(
    "📊 Plan for {} {} build{}",
    plan.product, plan.version, plan.build_number
  );
  println!("   Channels:  {}", plan.channels.join(", "));
  println!("   Platforms: {}", plan.platforms.join(", "));
  println!();

  for planned in &plan.actions {
    println!("▶️  {}", planned.action);
    for step in &planned.steps {
      println!("   {}", step);
    }
  }

  println!();
  println!("ℹ️  No changes were made. Use `run` to execute.");
  Ok(())
}

fn build_plan(resolved: &ResolvedConfig, dirs: &Dirs, selected: &[Action]) -> BumpResult<Plan> {
  let mut actions = Vec::new();

  for action in selected {
    actions.push(PlannedAction {
      action: *action,
      steps: steps_for(*action, resolved, dirs)?,
    });
  }

  Ok(Plan {
    product: resolved.product.clone(),
    version: resolved.version.clone(),
    build_number: resolved.build_number,
    channels: resolved.channels.clone(),
    platforms: resolved.platforms.clone(),
    actions,
  })
}

fn steps_for(action: Action, resolved: &ResolvedConfig, dirs: &Dirs) -> BumpResult<Vec<String>> {
  let steps = match action {
    Action::Clobber => {
      vec![format!("remove and recreate {}", dirs.work_dir.display())]
    }

    Action::Pull => {
      vec![format!(
        "hg clone/pull {} to {} at revision {}",
        resolved.repo_url,
        dirs.tools_dir.display(),
        resolved.revision
      )]
    }

    Action::DownloadShippedLocales => {
      let url = resolved.shipped_locales_url.replace("{revision}", &resolved.revision);
      vec![format!("fetch {} to {}", url, dirs.shipped_locales_path().display())]
    }

    Action::BumpConfigs => {
      let mut steps = Vec::new();
      for channel in matrix::active_channels(resolved) {
        let matching = versions::matching_partials(channel, &resolved.partial_versions)?;
        let prev = builders::previous_version(resolved, &matching)?;
        steps.push(
          builders::bump_patcher_config(resolved, dirs, channel, &prev, &matching).display_line(),
        );
        for platform in matrix::platforms_of(resolved) {
          steps.push(builders::update_verify_config(resolved, dirs, channel, platform).display_line());
        }
      }
      steps
    }

    Action::CommitChanges => {
      vec![format!(
        "hg commit in {} as {}: \"{}\"",
        dirs.tools_dir.display(),
        resolved.vcs_user,
        COMMIT_MESSAGE
      )]
    }

    Action::Tag => {
      let tags = builders::tag_names(&resolved.product, &resolved.version, resolved.build_number);
      vec![format!("hg tag {}", tags.join(" "))]
    }

    Action::Push => {
      vec![format!(
        "hg push from {} as {} with key {}",
        dirs.tools_dir.display(),
        resolved.ssh_user,
        resolved.ssh_key
      )]
    }

    Action::SubmitToBalrog => {
      let mut steps = Vec::new();
      for channel in matrix::active_channels(resolved) {
        let matching = versions::matching_partials(channel, &resolved.partial_versions)?;
        steps.push(builders::submit_release(resolved, dirs, channel, &matching).display_line());
      }
      steps
    }
  };

  Ok(steps)
}
