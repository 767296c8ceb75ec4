mod commands;
mod core;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use core::config::DEFAULT_CONFIG_FILE;
use core::error::{BumpError, print_error};

/// Bump release update configs and submit the release to Balrog
#[derive(Parser)]
#[command(name = "updates-bumper")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Execute the release pipeline
  Run {
    /// Path to the base release configuration
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Path to a buildprops JSON file with property overrides
    #[arg(long)]
    props: Option<PathBuf>,

    /// Action to run (repeatable; default: the full catalog, in order)
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    actions: Vec<String>,

    /// Working directory for the checkout and downloads
    #[arg(short = 'w', long, default_value = "build")]
    work_dir: PathBuf,
  },

  /// Show what a run would execute, without side effects
  Plan {
    /// Path to the base release configuration
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Path to a buildprops JSON file with property overrides
    #[arg(long)]
    props: Option<PathBuf>,

    /// Action to plan (repeatable; default: the full catalog, in order)
    #[arg(short = 'a', long = "action", value_name = "ACTION")]
    actions: Vec<String>,

    /// Working directory the plan assumes
    #[arg(short = 'w', long, default_value = "build")]
    work_dir: PathBuf,

    /// Output the plan in JSON format (useful for CI/automation)
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn main() {
  let cli = Cli::parse();

  let result = match cli.command {
    Commands::Run {
      config,
      props,
      actions,
      work_dir,
    } => commands::run_run(&config, props.as_deref(), &actions, &work_dir),
    Commands::Plan {
      config,
      props,
      actions,
      work_dir,
      json,
    } => commands::run_plan(&config, props.as_deref(), &actions, &work_dir, json),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: BumpError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
