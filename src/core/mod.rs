//! Core engine for the release updates pipeline
//!
//! This module contains the fundamental building blocks:
//!
//! - **builders**: Argument-vector builders for the external release tools
//! - **command**: Command specs, the system runner, and bounded retry
//! - **config**: Base TOML config, buildprops overrides, resolved config
//! - **download**: Shipped-locales fetch abstraction
//! - **error**: Error types with contextual help messages and exit codes
//! - **matrix**: Active channel/platform selection
//! - **pipeline**: The fixed action catalog and its state machine
//! - **vcs**: Mercurial operations abstraction (SystemHg)
//! - **versions**: Prefix-anchored partial-version matching

pub mod builders;
pub mod command;
pub mod config;
pub mod download;
pub mod error;
pub mod matrix;
pub mod pipeline;
pub mod vcs;
pub mod versions;
