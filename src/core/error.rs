//! Error types for updates-bumper with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and
//! provides contextual help messages. The category also decides the process
//! exit code: configuration problems are user errors, everything that went
//! wrong while talking to an external tool, the VCS, or the network is a
//! system error.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for updates-bumper
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, malformed overrides)
  User = 1,
  /// System error (subprocess, VCS, network, I/O)
  System = 2,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for updates-bumper
#[derive(Debug)]
pub enum BumpError {
  /// Configuration errors (base config, overrides, channel table)
  Config(ConfigError),

  /// Version control operation errors
  Vcs(VcsError),

  /// External command errors (bump, verify-config, submit)
  Command(CommandError),

  /// Download errors (shipped-locales fetch)
  Download(DownloadError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl BumpError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    BumpError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    BumpError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      BumpError::Message { message, context, help } => BumpError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      // Categorized errors keep their category (and exit code)
      other => other,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      BumpError::Config(_) => ExitCode::User,
      BumpError::Vcs(_) => ExitCode::System,
      BumpError::Command(_) => ExitCode::System,
      BumpError::Download(_) => ExitCode::System,
      BumpError::Io(_) => ExitCode::System,
      BumpError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      BumpError::Config(e) => e.help_message(),
      BumpError::Vcs(e) => e.help_message(),
      BumpError::Command(e) => e.help_message(),
      BumpError::Download(_) => None,
      BumpError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for BumpError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BumpError::Config(e) => write!(f, "{}", e),
      BumpError::Vcs(e) => write!(f, "{}", e),
      BumpError::Command(e) => write!(f, "{}", e),
      BumpError::Download(e) => write!(f, "{}", e),
      BumpError::Io(e) => write!(f, "I/O error: {}", e),
      BumpError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for BumpError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      BumpError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for BumpError {
  fn from(err: io::Error) -> Self {
    BumpError::Io(err)
  }
}

impl From<ConfigError> for BumpError {
  fn from(err: ConfigError) -> Self {
    BumpError::Config(err)
  }
}

impl From<VcsError> for BumpError {
  fn from(err: VcsError) -> Self {
    BumpError::Vcs(err)
  }
}

impl From<CommandError> for BumpError {
  fn from(err: CommandError) -> Self {
    BumpError::Command(err)
  }
}

impl From<DownloadError> for BumpError {
  fn from(err: DownloadError) -> Self {
    BumpError::Download(err)
  }
}

impl From<String> for BumpError {
  fn from(msg: String) -> Self {
    BumpError::message(msg)
  }
}

impl From<&str> for BumpError {
  fn from(msg: &str) -> Self {
    BumpError::message(msg)
  }
}

impl From<toml_edit::de::Error> for BumpError {
  fn from(err: toml_edit::de::Error) -> Self {
    BumpError::Config(ConfigError::Parse {
      message: err.to_string(),
    })
  }
}

impl From<serde_json::Error> for BumpError {
  fn from(err: serde_json::Error) -> Self {
    BumpError::Config(ConfigError::Parse {
      message: err.to_string(),
    })
  }
}

impl From<std::num::ParseIntError> for BumpError {
  fn from(err: std::num::ParseIntError) -> Self {
    BumpError::message(format!("Parse error: {}", err))
  }
}

/// Convert anyhow::Error to BumpError (for ad hoc call sites)
impl From<anyhow::Error> for BumpError {
  fn from(err: anyhow::Error) -> Self {
    BumpError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// release.toml not found
  NotFound { path: PathBuf },

  /// Config or override file could not be parsed
  Parse { message: String },

  /// Missing required field after override merge
  MissingField { field: String },

  /// Malformed "<version>build<buildNumber>" token
  MalformedPartial { token: String },

  /// Channel version-selection pattern failed to compile
  BadVersionPattern { channel: String, message: String },

  /// Requested channels match nothing in the update_channels table
  NoActiveChannels { requested: Vec<String> },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Pass --config <path> or create release.toml in the working directory.".to_string())
      }
      ConfigError::MalformedPartial { .. } => Some(
        "Partial versions must look like \"51.0.1build2\": a version, the literal \"build\", and a build number."
          .to_string(),
      ),
      ConfigError::NoActiveChannels { .. } => {
        Some("Check `channels` against the [[update_channels]] table in release.toml.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { path } => {
        write!(f, "No configuration found.\nExpected file: {}", path.display())
      }
      ConfigError::Parse { message } => {
        write!(f, "Configuration parse error: {}", message)
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required config field: {}", field)
      }
      ConfigError::MalformedPartial { token } => {
        write!(f, "Malformed partial version token: '{}'", token)
      }
      ConfigError::BadVersionPattern { channel, message } => {
        write!(f, "Invalid version_regex for channel '{}': {}", channel, message)
      }
      ConfigError::NoActiveChannels { requested } => {
        write!(
          f,
          "None of the requested channels exist in the update_channels table: {}",
          requested.join(", ")
        )
      }
    }
  }
}

/// Version control (Mercurial) operation errors
#[derive(Debug)]
pub enum VcsError {
  /// hg command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found at expected path
  RepoNotFound { path: PathBuf },

  /// Push failed
  PushFailed { dest: String, reason: String },
}

impl VcsError {
  fn help_message(&self) -> Option<String> {
    match self {
      VcsError::PushFailed { reason, .. } => {
        if reason.contains("permission denied") || reason.contains("pushing to") {
          Some("Check the configured ssh_user/ssh_key and your push permissions.".to_string())
        } else {
          None
        }
      }
      VcsError::RepoNotFound { path } => Some(format!(
        "Run the pull action first, or check the repo destination: {}",
        path.display()
      )),
      _ => None,
    }
  }
}

impl fmt::Display for VcsError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VcsError::CommandFailed { command, stderr } => {
        write!(f, "hg command failed: {}\n{}", command, stderr)
      }
      VcsError::RepoNotFound { path } => {
        write!(f, "Mercurial repository not found at: {}", path.display())
      }
      VcsError::PushFailed { dest, reason } => {
        write!(f, "Push to {} failed: {}", dest, reason)
      }
    }
  }
}

/// External command errors
#[derive(Debug)]
pub enum CommandError {
  /// The command could not be spawned at all
  SpawnFailed { program: String, message: String },

  /// The command ran and exited non-zero
  Failed {
    program: String,
    exit_code: Option<i32>,
    stderr: String,
  },
}

impl CommandError {
  fn help_message(&self) -> Option<String> {
    match self {
      CommandError::SpawnFailed { program, .. } => {
        Some(format!("Is '{}' installed and on PATH?", program))
      }
      _ => None,
    }
  }
}

impl fmt::Display for CommandError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CommandError::SpawnFailed { program, message } => {
        write!(f, "Failed to spawn '{}': {}", program, message)
      }
      CommandError::Failed {
        program,
        exit_code,
        stderr,
      } => match exit_code {
        Some(code) => write!(f, "'{}' exited with code {}\n{}", program, code, stderr),
        None => write!(f, "'{}' was terminated by a signal\n{}", program, stderr),
      },
    }
  }
}

/// Download errors (no subprocess was launched)
#[derive(Debug)]
pub struct DownloadError {
  pub url: String,
  pub reason: String,
}

impl fmt::Display for DownloadError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Unable to fetch {}: {}", self.url, self.reason)
  }
}

/// Result type alias for updates-bumper
pub type BumpResult<T> = Result<T, BumpError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> BumpResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> BumpResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<BumpError>,
{
  fn context(self, ctx: impl Into<String>) -> BumpResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> BumpResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &BumpError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
