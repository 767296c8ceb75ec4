//! CLI commands for updates-bumper
//!
//! - **run**: Execute the release pipeline against the real collaborators
//! - **plan**: Show what a run would execute, without side effects
//!
//! Both commands resolve configuration the same way: base TOML, then sparse
//! buildprops overrides, merged once into an immutable `ResolvedConfig`.

pub mod plan;
pub mod run;

pub use plan::run_plan;
pub use run::run_run;

use std::path::Path;

use crate::core::config::{self, PropertyOverrides, RawConfig, ResolvedConfig};
use crate::core::error::BumpResult;

pub(crate) fn load_resolved(config_path: &Path, props_path: Option<&Path>) -> BumpResult<ResolvedConfig> {
  let base = RawConfig::load(config_path)?;
  let overrides = match props_path {
    Some(path) => PropertyOverrides::load(path)?,
    None => None,
  };
  config::resolve(base, overrides.as_ref())
}
