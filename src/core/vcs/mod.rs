//! Version control abstraction (Mercurial)
//!
//! The pipeline depends on the `VersionControl` trait, not on the concrete
//! backend, so tests can record calls without touching a real repository.

pub mod system_hg;

pub use system_hg::SystemHg;

use std::path::{Path, PathBuf};

use crate::core::error::BumpResult;

/// Operations the pipeline needs from the VCS: fetch the tools repo at a
/// pinned revision, then commit, tag, and push the bumped configuration.
pub trait VersionControl {
  /// Clone `repo_url` to `dest` (or pull if it already exists) and update
  /// the working copy to `revision`
  fn pull(&self, repo_url: &str, revision: &str, dest: &Path) -> BumpResult<()>;

  /// Commit all outstanding changes under `dirs` with the given message and
  /// author identity
  fn commit(&self, dirs: &[PathBuf], message: &str, user: &str) -> BumpResult<()>;

  /// Apply the given tags in `cwd`
  fn tag(&self, cwd: &Path, tags: &[String], user: &str) -> BumpResult<()>;

  /// Push `cwd` to its default remote over SSH with the given identity
  fn push(&self, cwd: &Path, ssh_user: &str, ssh_key: &str) -> BumpResult<()>;
}
