//! Run command: execute the release pipeline

use std::path::Path;

use crate::commands::load_resolved;
use crate::core::command::{RetryPolicy, SystemRunner};
use crate::core::config::Dirs;
use crate::core::download::HttpDownloader;
use crate::core::error::BumpResult;
use crate::core::pipeline::{ActionState, Pipeline, select_actions};
use crate::core::vcs::SystemHg;

pub fn run_run(
  config_path: &Path,
  props_path: Option<&Path>,
  action_names: &[String],
  work_dir: &Path,
) -> BumpResult<()> {
  let resolved = load_resolved(config_path, props_path)?;
  let selected = select_actions(action_names)?;
  let dirs = Dirs::new(work_dir, &resolved.repo_dest);

  println!(
    "📊 {} {} build{} — {} channel(s), {} platform(s)",
    resolved.product,
    resolved.version,
    resolved.build_number,
    resolved.channels.len(),
    resolved.platforms.len()
  );

  let runner = SystemRunner;
  let vcs = SystemHg;
  let downloader = HttpDownloader;
  let pipeline = Pipeline::new(
    &resolved,
    dirs,
    &runner,
    &vcs,
    &downloader,
    RetryPolicy::default(),
  );

  let outcome = pipeline.run(&selected);

  println!();
  for report in &outcome.actions {
    let icon = match report.state {
      ActionState::Completed => "✅",
      ActionState::Failed => "❌",
      ActionState::Skipped => "⏭️ ",
      ActionState::Pending | ActionState::Running => "⏸️ ",
    };
    println!("{} {}", icon, report.action);
  }

  match outcome.failure {
    None => {
      println!("\n✅ All selected actions completed");
      Ok(())
    }
    Some((action, err)) => {
      eprintln!("\n❌ Pipeline halted at action '{}'", action);
      Err(err)
    }
  }
}
