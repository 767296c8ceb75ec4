//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A fully valid base configuration for tests to start from
pub const BASE_CONFIG: &str = r#"product = "firefox"
version = "52.0.1"
app_version = "52.0.1"
build_number = 3
revision = "abcdef012345"
balrog_api_root = "https://balrog.example.com/api"
balrog_username = "ffxbld"
balrog_url = "https://aus5.example.com/"
archive_domain = "archive.example.com"
download_domain = "download.example.com"
archive_prefix = "https://archive.example.com/pub/firefox"
previous_archive_prefix = "https://archive.example.com/pub/firefox"
shipped_locales_url = "https://hg.example.com/raw-file/{revision}/shipped-locales"
channels = ["release"]
platforms = ["linux", "win32"]
partial_versions = ["52.0build2", "51.0.1build1"]

[vcs]
ssh_user = "ffxbld"
ssh_key = "~/.ssh/ffxbld_rsa"
repo_url = "https://hg.example.com/build/tools"

[[update_channels]]
name = "release"
version_regex = '\d+\.'
patcher_config = "mozRelease-branch-patcher2.cfg"
mar_channel_ids = ["firefox-mozilla-release"]
update_verify_channel = "release-localtest"
channel_names = ["release", "release-localtest"]
rules_to_update = ["firefox-release"]
requires_mirrors = true
"#;

/// A scratch directory holding the config files a run reads
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  /// Create a workspace with the default release.toml
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();
    std::fs::write(path.join("release.toml"), BASE_CONFIG)?;
    Ok(Self { _root: root, path })
  }

  /// Replace release.toml wholesale
  pub fn write_config(&self, content: &str) -> Result<()> {
    std::fs::write(self.path.join("release.toml"), content)?;
    Ok(())
  }

  /// Write a buildprops JSON file and return its path
  pub fn write_props(&self, content: &str) -> Result<PathBuf> {
    let path = self.path.join("buildprops.json");
    std::fs::write(&path, content)?;
    Ok(path)
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }
}

/// Run the updates-bumper binary; the caller inspects the exit status
pub fn run_bumper(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_updates-bumper");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run updates-bumper")
}

/// Run the updates-bumper binary and fail the test on a non-zero exit
pub fn run_bumper_ok(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = run_bumper(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "updates-bumper command failed: updates-bumper {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr_of(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
