//! System Mercurial backend
//!
//! Uses the `hg` binary for all operations. Subprocesses run synchronously;
//! non-zero exits are mapped into `VcsError` with the captured stderr.

use std::path::{Path, PathBuf};
use std::process::Command;

use super::VersionControl;
use crate::core::error::{BumpResult, VcsError};

/// VCS backend using system hg
pub struct SystemHg;

impl SystemHg {
  fn hg_cmd(cwd: &Path) -> Command {
    let mut cmd = Command::new("hg");
    cmd.current_dir(cwd);
    cmd
  }

  fn run(mut cmd: Command, description: &str) -> BumpResult<std::process::Output> {
    let output = cmd.output().map_err(|e| VcsError::CommandFailed {
      command: description.to_string(),
      stderr: e.to_string(),
    })?;

    if !output.status.success() {
      return Err(
        VcsError::CommandFailed {
          command: description.to_string(),
          stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into(),
      );
    }

    Ok(output)
  }
}

impl VersionControl for SystemHg {
  fn pull(&self, repo_url: &str, revision: &str, dest: &Path) -> BumpResult<()> {
    if dest.join(".hg").exists() {
      Self::run(
        {
          let mut cmd = Self::hg_cmd(dest);
          cmd.arg("pull");
          cmd
        },
        "hg pull",
      )?;
    } else {
      if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
      }
      let mut cmd = Command::new("hg");
      cmd.args(["clone", "--noupdate", repo_url]).arg(dest);
      Self::run(cmd, "hg clone")?;
    }

    // Pin the working copy to the requested revision
    Self::run(
      {
        let mut cmd = Self::hg_cmd(dest);
        cmd.args(["update", "--clean", "--rev", revision]);
        cmd
      },
      "hg update",
    )?;

    Ok(())
  }

  fn commit(&self, dirs: &[PathBuf], message: &str, user: &str) -> BumpResult<()> {
    for dir in dirs {
      if !dir.join(".hg").exists() {
        return Err(VcsError::RepoNotFound { path: dir.clone() }.into());
      }

      let mut cmd = Self::hg_cmd(dir);
      cmd.args(["commit", "-m", message, "-u", user]);

      let output = cmd.output().map_err(|e| VcsError::CommandFailed {
        command: "hg commit".to_string(),
        stderr: e.to_string(),
      })?;

      if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        // hg exits 1 when the working copy is clean; not a failure for us
        if stdout.contains("nothing changed") || stderr.contains("nothing changed") {
          continue;
        }
        return Err(
          VcsError::CommandFailed {
            command: "hg commit".to_string(),
            stderr: stderr.trim().to_string(),
          }
          .into(),
        );
      }
    }

    Ok(())
  }

  fn tag(&self, cwd: &Path, tags: &[String], user: &str) -> BumpResult<()> {
    let mut cmd = Self::hg_cmd(cwd);
    cmd.args(["tag", "-u", user]);
    for tag in tags {
      cmd.arg(tag);
    }
    Self::run(cmd, "hg tag")?;
    Ok(())
  }

  fn push(&self, cwd: &Path, ssh_user: &str, ssh_key: &str) -> BumpResult<()> {
    let key = shellexpand::tilde(ssh_key).into_owned();
    let ssh_opts = format!("ssh -l {} -i {}", ssh_user, key);

    let mut cmd = Self::hg_cmd(cwd);
    cmd.args(["push", "-e", &ssh_opts]);

    let output = cmd.output().map_err(|e| VcsError::PushFailed {
      dest: cwd.display().to_string(),
      reason: e.to_string(),
    })?;

    if !output.status.success() {
      return Err(
        VcsError::PushFailed {
          dest: cwd.display().to_string(),
          reason: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }
        .into(),
      );
    }

    Ok(())
  }
}
