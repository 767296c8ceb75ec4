//! Release configuration: base TOML, buildprops overrides, resolved config
//!
//! Configuration is resolved in two stages: the base `release.toml` is parsed
//! into a `RawConfig`, an optional buildprops JSON file (CI-injected build
//! metadata) supplies sparse overrides, and the merge produces one immutable
//! `ResolvedConfig` for the whole run. Nothing mutates the resolved config
//! after this point.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{BumpResult, ConfigError, ResultExt};

/// Default base config file name
pub const DEFAULT_CONFIG_FILE: &str = "release.toml";

/// Commit message used by the commit-changes action
pub const COMMIT_MESSAGE: &str = "Automated configuration bump";

fn default_credentials_file() -> String {
  "oauth.txt".to_string()
}

fn default_repo_dest() -> String {
  "tools".to_string()
}

fn default_vcs_user() -> String {
  "ffxbld <release@mozilla.com>".to_string()
}

/// Static per-channel descriptor from the `[[update_channels]]` table.
///
/// Table definition order is preserved (array of tables → Vec) and decides
/// the order channels are processed in, regardless of how `channels` was
/// supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
  pub name: String,
  /// Prefix-anchored pattern selecting which partial versions apply
  pub version_regex: String,
  /// Patcher config file name under release/patcher-configs/
  pub patcher_config: String,
  #[serde(default)]
  pub mar_channel_ids: Vec<String>,
  pub update_verify_channel: String,
  /// Publish-time channel aliases passed to the release pusher
  pub channel_names: Vec<String>,
  pub rules_to_update: Vec<String>,
  #[serde(default)]
  pub requires_mirrors: bool,
}

/// `[vcs]` table: repository location and identities for commit/tag/push
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcsConfig {
  #[serde(default = "default_vcs_user")]
  pub user: String,
  pub ssh_user: Option<String>,
  pub ssh_key: Option<String>,
  pub repo_url: Option<String>,
  #[serde(default = "default_repo_dest")]
  pub repo_dest: String,
}

impl Default for VcsConfig {
  fn default() -> Self {
    Self {
      user: default_vcs_user(),
      ssh_user: None,
      ssh_key: None,
      repo_url: None,
      repo_dest: default_repo_dest(),
    }
  }
}

/// Base configuration as parsed from release.toml.
///
/// Fields the override source may supply are optional here; presence is
/// enforced after the merge, not at parse time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
  pub product: Option<String>,
  pub version: Option<String>,
  pub app_version: Option<String>,
  pub build_number: Option<u32>,
  pub revision: Option<String>,
  pub balrog_api_root: Option<String>,
  pub balrog_username: Option<String>,
  pub balrog_url: Option<String>,
  pub archive_domain: Option<String>,
  pub download_domain: Option<String>,
  pub archive_prefix: Option<String>,
  pub previous_archive_prefix: Option<String>,
  /// URL template for the shipped-locales manifest; `{revision}` is
  /// replaced with the resolved revision
  pub shipped_locales_url: Option<String>,
  #[serde(default = "default_credentials_file")]
  pub credentials_file: String,
  /// Previous release version for the patcher-config bump. When absent the
  /// first channel-matching partial is used.
  pub previous_version: Option<String>,
  #[serde(default)]
  pub channels: Vec<String>,
  #[serde(default)]
  pub platforms: Vec<String>,
  /// "<version>build<buildNumber>" tokens, newest first
  #[serde(default)]
  pub partial_versions: Vec<String>,
  #[serde(default)]
  pub vcs: VcsConfig,
  #[serde(default)]
  pub update_channels: Vec<ChannelConfig>,
}

impl RawConfig {
  /// Load the base config from a TOML file
  pub fn load(path: &Path) -> BumpResult<Self> {
    if !path.exists() {
      return Err(ConfigError::NotFound { path: path.to_path_buf() }.into());
    }

    let content = fs::read_to_string(path)
      .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: RawConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse {}", path.display()))?;

    Ok(config)
  }
}

/// Override source: the `properties` object of a buildprops JSON file.
///
/// All values arrive as strings; list-valued keys are comma-separated.
/// Overrides are sparse and additive: an absent or empty value never
/// clobbers the base config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PropertyOverrides {
  #[serde(default)]
  pub product: Option<String>,
  #[serde(default)]
  pub version: Option<String>,
  #[serde(default)]
  pub build_number: Option<String>,
  #[serde(default)]
  pub revision: Option<String>,
  #[serde(rename = "appVersion", default)]
  pub app_version: Option<String>,
  #[serde(default)]
  pub balrog_api_root: Option<String>,
  #[serde(default)]
  pub channels: Option<String>,
  #[serde(default)]
  pub partial_versions: Option<String>,
  #[serde(default)]
  pub platforms: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BuildProperties {
  #[serde(default)]
  properties: PropertyOverrides,
}

impl PropertyOverrides {
  /// Load overrides from a buildprops JSON file.
  ///
  /// An absent or empty file is not an error; the caller gets `None` and
  /// resolution proceeds from the base config alone.
  pub fn load(path: &Path) -> BumpResult<Option<Self>> {
    if !path.exists() {
      return Ok(None);
    }

    let content = fs::read_to_string(path)
      .with_context(|| format!("Failed to read build properties from {}", path.display()))?;
    if content.trim().is_empty() {
      return Ok(None);
    }

    let props: BuildProperties = serde_json::from_str(&content)
      .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(props.properties))
  }
}

/// A prior release eligible for a partial update to the current version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialVersion {
  pub version: String,
  pub build_number: String,
}

impl PartialVersion {
  /// Format back to the "<version>build<buildNumber>" wire form
  pub fn token(&self) -> String {
    format!("{}build{}", self.version, self.build_number)
  }
}

/// Parse a "<version>build<buildNumber>" token.
///
/// The token is split on the literal substring `build`, which must occur
/// exactly once with non-empty text on both sides.
pub fn parse_partial(token: &str) -> Result<PartialVersion, ConfigError> {
  let trimmed = token.trim();
  let malformed = || ConfigError::MalformedPartial { token: trimmed.to_string() };

  let (version, build_number) = trimmed.split_once("build").ok_or_else(malformed)?;
  if version.is_empty() || build_number.is_empty() || build_number.contains("build") {
    return Err(malformed());
  }

  Ok(PartialVersion {
    version: version.to_string(),
    build_number: build_number.to_string(),
  })
}

/// Split a comma-separated override value, trimming elements and dropping
/// empty ones
pub fn split_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(String::from)
    .collect()
}

/// The one immutable configuration for a run.
///
/// Built once by [`resolve`], read-only afterwards; every component takes it
/// by shared reference.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
  pub product: String,
  pub version: String,
  pub app_version: String,
  pub build_number: u32,
  pub revision: String,
  pub balrog_api_root: String,
  pub balrog_username: String,
  pub balrog_url: String,
  pub archive_domain: String,
  pub download_domain: String,
  pub archive_prefix: String,
  pub previous_archive_prefix: String,
  pub shipped_locales_url: String,
  pub credentials_file: PathBuf,
  pub previous_version: Option<String>,
  pub channels: Vec<String>,
  pub platforms: Vec<String>,
  pub partial_versions: Vec<PartialVersion>,
  pub vcs_user: String,
  pub ssh_user: String,
  pub ssh_key: String,
  pub repo_url: String,
  pub repo_dest: String,
  pub update_channels: Vec<ChannelConfig>,
}

/// Merge the base config with an optional override source into a
/// `ResolvedConfig`.
///
/// Override values win only when non-empty; required fields must be present
/// on at least one side. Channel version patterns are compile-checked here
/// so a bad pattern fails the run before any action starts.
pub fn resolve(base: RawConfig, overrides: Option<&PropertyOverrides>) -> BumpResult<ResolvedConfig> {
  let mut product = base.product;
  let mut version = base.version;
  let mut app_version = base.app_version;
  let mut build_number = base.build_number;
  let mut revision = base.revision;
  let mut balrog_api_root = base.balrog_api_root;
  let mut channels = base.channels;
  let mut platforms = base.platforms;
  let mut partial_tokens = base.partial_versions;

  if let Some(props) = overrides {
    override_field(&mut product, &props.product);
    override_field(&mut version, &props.version);
    override_field(&mut app_version, &props.app_version);
    override_field(&mut revision, &props.revision);
    override_field(&mut balrog_api_root, &props.balrog_api_root);

    if let Some(value) = non_empty(&props.build_number) {
      let parsed = value.parse::<u32>().map_err(|e| ConfigError::Parse {
        message: format!("build_number '{}': {}", value, e),
      })?;
      build_number = Some(parsed);
    }
    if let Some(value) = non_empty(&props.channels) {
      channels = split_list(value);
    }
    if let Some(value) = non_empty(&props.platforms) {
      platforms = split_list(value);
    }
    if let Some(value) = non_empty(&props.partial_versions) {
      partial_tokens = split_list(value);
    }
  }

  let partial_versions = partial_tokens
    .iter()
    .map(|t| parse_partial(t))
    .collect::<Result<Vec<_>, _>>()?;

  let vcs = base.vcs;

  let resolved = ResolvedConfig {
    product: required(product, "product")?,
    version: required(version, "version")?,
    app_version: required(app_version, "app_version")?,
    build_number: required(build_number, "build_number")?,
    revision: required(revision, "revision")?,
    balrog_api_root: required(balrog_api_root, "balrog_api_root")?,
    balrog_username: required(base.balrog_username, "balrog_username")?,
    balrog_url: required(base.balrog_url, "balrog_url")?,
    archive_domain: required(base.archive_domain, "archive_domain")?,
    download_domain: required(base.download_domain, "download_domain")?,
    archive_prefix: required(base.archive_prefix, "archive_prefix")?,
    previous_archive_prefix: required(base.previous_archive_prefix, "previous_archive_prefix")?,
    shipped_locales_url: required(base.shipped_locales_url, "shipped_locales_url")?,
    credentials_file: PathBuf::from(base.credentials_file),
    previous_version: base.previous_version,
    channels,
    platforms,
    partial_versions,
    vcs_user: vcs.user,
    ssh_user: required(vcs.ssh_user, "vcs.ssh_user")?,
    ssh_key: required(vcs.ssh_key, "vcs.ssh_key")?,
    repo_url: required(vcs.repo_url, "vcs.repo_url")?,
    repo_dest: vcs.repo_dest,
    update_channels: base.update_channels,
  };

  if resolved.channels.is_empty() {
    return Err(ConfigError::MissingField { field: "channels".to_string() }.into());
  }
  let any_active = resolved
    .update_channels
    .iter()
    .any(|c| resolved.channels.contains(&c.name));
  if !any_active {
    return Err(ConfigError::NoActiveChannels { requested: resolved.channels.clone() }.into());
  }

  for channel in &resolved.update_channels {
    if resolved.channels.contains(&channel.name) {
      regex::Regex::new(&channel.version_regex).map_err(|e| ConfigError::BadVersionPattern {
        channel: channel.name.clone(),
        message: e.to_string(),
      })?;
    }
  }

  Ok(resolved)
}

fn override_field(slot: &mut Option<String>, value: &Option<String>) {
  if let Some(v) = non_empty(value) {
    *slot = Some(v.to_string());
  }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ConfigError> {
  value.ok_or_else(|| ConfigError::MissingField { field: field.to_string() })
}

/// Working-directory layout for a run.
///
/// Mirrors the tools-repo tree: the repo is cloned under the work dir,
/// patcher configs live under release/patcher-configs/ and generated verify
/// configs under release/updates/ inside it.
#[derive(Debug, Clone)]
pub struct Dirs {
  pub work_dir: PathBuf,
  pub tools_dir: PathBuf,
}

impl Dirs {
  pub fn new(work_dir: impl Into<PathBuf>, repo_dest: &str) -> Self {
    let work_dir = work_dir.into();
    let tools_dir = work_dir.join(repo_dest);
    Self { work_dir, tools_dir }
  }

  /// Where the shipped-locales manifest is downloaded to
  pub fn shipped_locales_path(&self) -> PathBuf {
    self.work_dir.join("shipped-locales")
  }

  pub fn patcher_config_path(&self, channel: &ChannelConfig) -> PathBuf {
    self
      .tools_dir
      .join("release/patcher-configs")
      .join(&channel.patcher_config)
  }

  /// Output path for a generated update-verify config. The file name must
  /// stay `{channel}-{product}-{platform}.cfg` for downstream consumers.
  pub fn update_verify_config_path(&self, channel: &str, product: &str, platform: &str) -> PathBuf {
    self
      .tools_dir
      .join("release/updates")
      .join(update_verify_config_name(channel, product, platform))
  }

  pub fn patcher_bump_script(&self) -> PathBuf {
    self.tools_dir.join("release/patcher-config-bump.pl")
  }

  pub fn update_verify_script(&self) -> PathBuf {
    self.tools_dir.join("scripts/build-promotion/create-update-verify-config.py")
  }

  pub fn balrog_pusher_script(&self) -> PathBuf {
    self.tools_dir.join("scripts/build-promotion/balrog-release-pusher.py")
  }

  pub fn perl_lib(&self) -> PathBuf {
    self.tools_dir.join("lib/perl")
  }
}

pub fn update_verify_config_name(channel: &str, product: &str, platform: &str) -> String {
  format!("{}-{}-{}.cfg", channel, product, platform)
}
