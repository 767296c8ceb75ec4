//! Channel version-pattern matching
//!
//! Channel eligibility for partial updates uses prefix-match semantics: the
//! pattern is anchored at the start of the version string but does not have
//! to consume all of it, so `\d+\.\d+` matches `52.0.1`.

use regex::Regex;

use crate::core::config::{ChannelConfig, PartialVersion};
use crate::core::error::{BumpResult, ConfigError};

/// True if `version` matches `pattern` at its start
pub fn matches(pattern: &str, version: &str) -> BumpResult<bool> {
  let anchored = Regex::new(&format!("^(?:{})", pattern)).map_err(|e| ConfigError::Parse {
    message: format!("version pattern '{}': {}", pattern, e),
  })?;
  Ok(anchored.is_match(version))
}

/// Filter `partials` down to those whose version matches the channel's
/// pattern, preserving input order
pub fn matching_partials<'a>(
  channel: &ChannelConfig,
  partials: &'a [PartialVersion],
) -> BumpResult<Vec<&'a PartialVersion>> {
  let anchored =
    Regex::new(&format!("^(?:{})", channel.version_regex)).map_err(|e| ConfigError::BadVersionPattern {
      channel: channel.name.clone(),
      message: e.to_string(),
    })?;

  Ok(partials.iter().filter(|p| anchored.is_match(&p.version)).collect())
}
