//! The fixed action pipeline
//!
//! The catalog of actions is known at build time and always executes in
//! catalog order; an invocation may select a subset, but never reorder.
//! The first failing action aborts the run — later actions stay pending and
//! the failure surfaces with the action's name attached. Collaborators
//! (command runner, VCS, downloader) are injected as trait objects so the
//! whole state machine is testable without subprocesses.

use std::fmt;
use std::fs;

use serde::Serialize;

use crate::core::builders;
use crate::core::command::{CommandRunner, RetryPolicy, run_with_retry};
use crate::core::config::{COMMIT_MESSAGE, Dirs, ResolvedConfig};
use crate::core::download::Downloader;
use crate::core::error::{BumpError, BumpResult};
use crate::core::matrix;
use crate::core::vcs::VersionControl;
use crate::core::versions;

/// The fixed, ordered action catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
  Clobber,
  Pull,
  DownloadShippedLocales,
  BumpConfigs,
  CommitChanges,
  Tag,
  Push,
  SubmitToBalrog,
}

impl Action {
  pub const CATALOG: [Action; 8] = [
    Action::Clobber,
    Action::Pull,
    Action::DownloadShippedLocales,
    Action::BumpConfigs,
    Action::CommitChanges,
    Action::Tag,
    Action::Push,
    Action::SubmitToBalrog,
  ];

  pub fn name(self) -> &'static str {
    match self {
      Action::Clobber => "clobber",
      Action::Pull => "pull",
      Action::DownloadShippedLocales => "download-shipped-locales",
      Action::BumpConfigs => "bump-configs",
      Action::CommitChanges => "commit-changes",
      Action::Tag => "tag",
      Action::Push => "push",
      Action::SubmitToBalrog => "submit-to-balrog",
    }
  }

  pub fn from_name(name: &str) -> Option<Action> {
    Action::CATALOG.iter().copied().find(|a| a.name() == name)
  }
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name())
  }
}

/// Resolve `--action` selections into catalog members. An empty selection
/// means the full catalog.
pub fn select_actions(names: &[String]) -> BumpResult<Vec<Action>> {
  if names.is_empty() {
    return Ok(Action::CATALOG.to_vec());
  }

  let mut selected = Vec::new();
  for name in names {
    let action = Action::from_name(name).ok_or_else(|| {
      BumpError::with_help(
        format!("Unknown action: '{}'", name),
        format!(
          "Known actions: {}",
          Action::CATALOG.map(|a| a.name()).join(", ")
        ),
      )
    })?;
    if !selected.contains(&action) {
      selected.push(action);
    }
  }
  Ok(selected)
}

/// Per-action lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionState {
  Pending,
  Running,
  Skipped,
  Completed,
  Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionReport {
  pub action: Action,
  pub state: ActionState,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

/// Outcome of one pipeline invocation. Either every selected action
/// completed, or exactly one failed and everything after it stayed pending.
#[derive(Debug)]
pub struct PipelineRun {
  pub actions: Vec<ActionReport>,
  pub failure: Option<(Action, BumpError)>,
}

impl PipelineRun {
  pub fn succeeded(&self) -> bool {
    self.failure.is_none()
  }

  pub fn state_of(&self, action: Action) -> ActionState {
    self
      .actions
      .iter()
      .find(|r| r.action == action)
      .map(|r| r.state)
      .unwrap_or(ActionState::Pending)
  }
}

/// Drives the action catalog against the injected collaborators
pub struct Pipeline<'a> {
  resolved: &'a ResolvedConfig,
  dirs: Dirs,
  runner: &'a dyn CommandRunner,
  vcs: &'a dyn VersionControl,
  downloader: &'a dyn Downloader,
  retry: RetryPolicy,
}

impl<'a> Pipeline<'a> {
  pub fn new(
    resolved: &'a ResolvedConfig,
    dirs: Dirs,
    runner: &'a dyn CommandRunner,
    vcs: &'a dyn VersionControl,
    downloader: &'a dyn Downloader,
    retry: RetryPolicy,
  ) -> Self {
    Self {
      resolved,
      dirs,
      runner,
      vcs,
      downloader,
      retry,
    }
  }

  /// Execute the selected actions in catalog order, halting on the first
  /// failure
  pub fn run(&self, selected: &[Action]) -> PipelineRun {
    let mut reports: Vec<ActionReport> = Action::CATALOG
      .iter()
      .map(|a| ActionReport {
        action: *a,
        state: ActionState::Pending,
        error: None,
      })
      .collect();

    for (idx, action) in Action::CATALOG.iter().enumerate() {
      if !selected.contains(action) {
        reports[idx].state = ActionState::Skipped;
        continue;
      }

      reports[idx].state = ActionState::Running;
      println!("▶️  {}", action);

      match self.execute(*action) {
        Ok(()) => {
          reports[idx].state = ActionState::Completed;
        }
        Err(err) => {
          reports[idx].state = ActionState::Failed;
          reports[idx].error = Some(err.to_string());
          return PipelineRun {
            actions: reports,
            failure: Some((*action, err)),
          };
        }
      }
    }

    PipelineRun {
      actions: reports,
      failure: None,
    }
  }

  fn execute(&self, action: Action) -> BumpResult<()> {
    match action {
      Action::Clobber => self.clobber(),
      Action::Pull => self.pull(),
      Action::DownloadShippedLocales => self.download_shipped_locales(),
      Action::BumpConfigs => self.bump_configs(),
      Action::CommitChanges => self.commit_changes(),
      Action::Tag => self.tag(),
      Action::Push => self.push(),
      Action::SubmitToBalrog => self.submit_to_balrog(),
    }
  }

  fn clobber(&self) -> BumpResult<()> {
    if self.dirs.work_dir.exists() {
      fs::remove_dir_all(&self.dirs.work_dir)?;
    }
    fs::create_dir_all(&self.dirs.work_dir)?;
    Ok(())
  }

  fn pull(&self) -> BumpResult<()> {
    self
      .vcs
      .pull(&self.resolved.repo_url, &self.resolved.revision, &self.dirs.tools_dir)
  }

  fn download_shipped_locales(&self) -> BumpResult<()> {
    fs::create_dir_all(&self.dirs.work_dir)?;
    let url = self
      .resolved
      .shipped_locales_url
      .replace("{revision}", &self.resolved.revision);
    self.downloader.fetch(&url, &self.dirs.shipped_locales_path())
  }

  fn bump_configs(&self) -> BumpResult<()> {
    for channel in matrix::active_channels(self.resolved) {
      let matching = versions::matching_partials(channel, &self.resolved.partial_versions)?;
      let prev = builders::previous_version(self.resolved, &matching)?;

      let bump = builders::bump_patcher_config(self.resolved, &self.dirs, channel, &prev, &matching);
      self.runner.run(&bump)?;

      for platform in matrix::platforms_of(self.resolved) {
        let verify = builders::update_verify_config(self.resolved, &self.dirs, channel, platform);
        self.runner.run(&verify)?;
      }
    }
    Ok(())
  }

  fn commit_changes(&self) -> BumpResult<()> {
    self
      .vcs
      .commit(&[self.dirs.tools_dir.clone()], COMMIT_MESSAGE, &self.resolved.vcs_user)
  }

  fn tag(&self) -> BumpResult<()> {
    let tags = builders::tag_names(&self.resolved.product, &self.resolved.version, self.resolved.build_number);
    self.vcs.tag(&self.dirs.tools_dir, &tags, &self.resolved.vcs_user)
  }

  fn push(&self) -> BumpResult<()> {
    self
      .vcs
      .push(&self.dirs.tools_dir, &self.resolved.ssh_user, &self.resolved.ssh_key)
  }

  fn submit_to_balrog(&self) -> BumpResult<()> {
    for channel in matrix::active_channels(self.resolved) {
      let matching = versions::matching_partials(channel, &self.resolved.partial_versions)?;
      let submit = builders::submit_release(self.resolved, &self.dirs, channel, &matching);
      run_with_retry(self.runner, &submit, &self.retry)?;
    }
    Ok(())
  }
}
