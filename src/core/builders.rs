//! Builders for the three external release commands
//!
//! Each logical operation has a fixed, ordered argument template. List-valued
//! parameters are always emitted as repeated flag/value pairs, one pair per
//! element in the element's original order — the downstream tools do not
//! accept comma-joined values.

use crate::core::command::CommandSpec;
use crate::core::config::{ChannelConfig, Dirs, PartialVersion, ResolvedConfig};
use crate::core::error::{BumpResult, ConfigError};

/// Python-style capitalize: first character uppercased, the rest lowercased
/// ("firefox" → "Firefox"). The patcher-config bumper wants this for its
/// product-display flag.
pub fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    None => String::new(),
  }
}

/// The two release tags applied to the tools repo:
/// `{PRODUCT}_{VERSION}_BUILD{n}_RUNTIME` and
/// `{PRODUCT}_{VERSION}_RELEASE_RUNTIME`, with dots in the version replaced
/// by underscores.
pub fn tag_names(product: &str, version: &str, build_number: u32) -> [String; 2] {
  let product = product.to_uppercase();
  let version = version.replace('.', "_");
  [
    format!("{}_{}_BUILD{}_RUNTIME", product, version, build_number),
    format!("{}_{}_RELEASE_RUNTIME", product, version),
  ]
}

/// The previous release version passed to the patcher-config bump: the
/// configured `previous_version` if set, otherwise the first partial (in
/// input order) that matched the channel's pattern.
pub fn previous_version(resolved: &ResolvedConfig, matching: &[&PartialVersion]) -> BumpResult<String> {
  if let Some(v) = &resolved.previous_version {
    return Ok(v.clone());
  }
  matching
    .first()
    .map(|p| p.version.clone())
    .ok_or_else(|| ConfigError::MissingField { field: "previous_version".to_string() }.into())
}

/// Build the patcher-config bump invocation (perl, halt-on-failure).
///
/// `matching` is the channel's filtered partial set; only the versions go on
/// the command line here.
pub fn bump_patcher_config(
  resolved: &ResolvedConfig,
  dirs: &Dirs,
  channel: &ChannelConfig,
  prev_version: &str,
  matching: &[&PartialVersion],
) -> CommandSpec {
  let mut spec = CommandSpec::new("perl")
    .arg(dirs.patcher_bump_script().display().to_string())
    .flag("-p", &resolved.product)
    .flag("-r", capitalize(&resolved.product))
    .flag("-v", &resolved.version)
    .flag("-a", &resolved.app_version)
    .flag("-o", prev_version)
    .flag("-b", resolved.build_number.to_string())
    .flag("-c", dirs.patcher_config_path(channel).display().to_string())
    .flag("-f", &resolved.archive_domain)
    .flag("-d", &resolved.download_domain)
    .flag("-l", dirs.shipped_locales_path().display().to_string());

  for partial in matching {
    spec = spec.flag("--partial-version", &partial.version);
  }
  for platform in &resolved.platforms {
    spec = spec.flag("--platform", platform);
  }
  for mar_channel_id in &channel.mar_channel_ids {
    spec = spec.flag("--mar-channel-id", mar_channel_id);
  }

  spec
    .env("PERL5LIB", dirs.perl_lib().display().to_string())
    .halt_on_failure(true)
}

/// Build one update-verify-config generation invocation (python,
/// halt-on-failure). One command per (channel, platform) pair; the output
/// path is unique per pair.
pub fn update_verify_config(
  resolved: &ResolvedConfig,
  dirs: &Dirs,
  channel: &ChannelConfig,
  platform: &str,
) -> CommandSpec {
  CommandSpec::new("python")
    .arg(dirs.update_verify_script().display().to_string())
    .flag("--config", dirs.patcher_config_path(channel).display().to_string())
    .flag("--platform", platform)
    .flag("--update-verify-channel", &channel.update_verify_channel)
    .flag(
      "--output",
      dirs
        .update_verify_config_path(&channel.name, &resolved.product, platform)
        .display()
        .to_string(),
    )
    .flag("--archive-prefix", &resolved.archive_prefix)
    .flag("--previous-archive-prefix", &resolved.previous_archive_prefix)
    .flag("--product", &resolved.product)
    .flag("--balrog-url", &resolved.balrog_url)
    .flag("--build-number", resolved.build_number.to_string())
    .halt_on_failure(true)
}

/// Build the Balrog submission invocation (python).
///
/// Not halt-on-failure: the caller wraps it in retry because the submission
/// is network-dependent.
pub fn submit_release(
  resolved: &ResolvedConfig,
  dirs: &Dirs,
  channel: &ChannelConfig,
  matching: &[&PartialVersion],
) -> CommandSpec {
  let mut spec = CommandSpec::new("python")
    .arg(dirs.balrog_pusher_script().display().to_string())
    .flag("--api-root", &resolved.balrog_api_root)
    .flag("--download-domain", &resolved.download_domain)
    .flag("--archive-domain", &resolved.archive_domain)
    .flag("--credentials-file", resolved.credentials_file.display().to_string())
    .flag("--product", &resolved.product)
    .flag("--version", &resolved.version)
    .flag("--build-number", resolved.build_number.to_string())
    .flag("--app-version", &resolved.app_version)
    .flag("--username", &resolved.balrog_username)
    .arg("--verbose");

  for name in &channel.channel_names {
    spec = spec.flag("--channel", name);
  }
  for rule in &channel.rules_to_update {
    spec = spec.flag("--rule-to-update", rule);
  }
  for platform in &resolved.platforms {
    spec = spec.flag("--platform", platform);
  }
  for partial in matching {
    spec = spec.flag("--partial-update", partial.token());
  }
  if channel.requires_mirrors {
    spec = spec.arg("--requires-mirrors");
  }

  spec
}
