//! Integration tests for updates-bumper
//!
//! These drive the compiled binary. Tests stick to the plan command and the
//! filesystem-only actions so they do not depend on hg, perl, python, or the
//! network being available.

mod helpers;
mod test_config;
mod test_plan;
mod test_run;
