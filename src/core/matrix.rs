//! Channel/platform work matrix
//!
//! Pure functions of the resolved config and the static channel table: which
//! channels are active for this run, and which platforms each config-mutating
//! action fans out over.

use crate::core::config::{ChannelConfig, ResolvedConfig};

/// Channel table entries selected by `resolved.channels`, in
/// table-definition order (not in the order the channels were requested)
pub fn active_channels(resolved: &ResolvedConfig) -> Vec<&ChannelConfig> {
  resolved
    .update_channels
    .iter()
    .filter(|c| resolved.channels.contains(&c.name))
    .collect()
}

/// The configured platform sequence. Named accessor so every component
/// iterates platforms the same way.
pub fn platforms_of(resolved: &ResolvedConfig) -> &[String] {
  &resolved.platforms
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::config::{RawConfig, VcsConfig, resolve};

  fn channel(name: &str) -> ChannelConfig {
    ChannelConfig {
      name: name.to_string(),
      version_regex: r"\d+\.".to_string(),
      patcher_config: format!("moz{}-branch-patcher2.cfg", name),
      mar_channel_ids: vec![],
      update_verify_channel: format!("{}-localtest", name),
      channel_names: vec![name.to_string()],
      rules_to_update: vec![format!("firefox-{}", name)],
      requires_mirrors: false,
    }
  }

  fn resolved_with(table: Vec<ChannelConfig>, requested: &[&str]) -> ResolvedConfig {
    let raw = RawConfig {
      product: Some("firefox".to_string()),
      version: Some("52.0".to_string()),
      app_version: Some("52.0".to_string()),
      build_number: Some(1),
      revision: Some("abc".to_string()),
      balrog_api_root: Some("api".to_string()),
      balrog_username: Some("ffxbld".to_string()),
      balrog_url: Some("url".to_string()),
      archive_domain: Some("a".to_string()),
      download_domain: Some("d".to_string()),
      archive_prefix: Some("ap".to_string()),
      previous_archive_prefix: Some("pap".to_string()),
      shipped_locales_url: Some("u/{revision}".to_string()),
      channels: requested.iter().map(|s| s.to_string()).collect(),
      platforms: vec!["linux".to_string()],
      vcs: VcsConfig {
        ssh_user: Some("u".to_string()),
        ssh_key: Some("k".to_string()),
        repo_url: Some("r".to_string()),
        ..Default::default()
      },
      update_channels: table,
      ..Default::default()
    };
    resolve(raw, None).unwrap()
  }

  #[test]
  fn active_channels_follow_table_order() {
    let table = vec![channel("release"), channel("beta"), channel("esr")];
    // Requested in a different order than the table defines
    let resolved = resolved_with(table, &["esr", "beta"]);

    let names: Vec<&str> = active_channels(&resolved).iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["beta", "esr"]);
  }

  #[test]
  fn unknown_requested_channels_are_ignored() {
    let table = vec![channel("release"), channel("beta")];
    let resolved = resolved_with(table, &["beta", "aurora"]);

    let names: Vec<&str> = active_channels(&resolved).iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["beta"]);
  }

  #[test]
  fn platforms_accessor_is_identity() {
    let resolved = resolved_with(vec![channel("beta")], &["beta"]);
    assert_eq!(platforms_of(&resolved), resolved.platforms.as_slice());
  }
}
