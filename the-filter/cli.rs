use std::path::PathBuf;

use anyhow::{
  Result,
  ensure,
};
use clap::{
  ArgAction,
  Parser,
};
use the_filter_core::Config;

/// Validated command-line options.
#[derive(Clone, Debug)]
pub struct CliOptions {
  pub config:       Config,
  pub item_files:   Vec<PathBuf>,
  pub history_file: Option<PathBuf>,
  pub log_file:     Option<PathBuf>,
  pub verbosity:    u8,
}

impl CliOptions {
  pub fn parse() -> Result<Self> {
    let raw = RawCli::parse();
    raw.try_into()
  }
}

#[derive(Parser, Debug)]
#[command(
  name = "the-filter",
  about = "Interactively filter lines and print the chosen one",
  long_about = None,
  version
)]
struct RawCli {
  /// Complete filenames against the typed text
  #[arg(short = 'f', long = "files")]
  file_completion: bool,

  /// Treat blank lines on input as group separators
  #[arg(short = 'g', long = "group")]
  grouping: bool,

  /// Match ignoring ASCII case
  #[arg(short = 'i', long = "ignore-case")]
  case_fold: bool,

  /// Echo asterisks instead of the typed text
  #[arg(short = 'p', long = "password")]
  password: bool,

  /// Load and save input history in FILE
  #[arg(short = 'H', long = "history", value_name = "FILE")]
  history_file: Option<PathBuf>,

  /// Number of matches shown at once
  #[arg(long = "items", value_name = "N", default_value_t = the_filter_core::config::DEFAULT_VISIBLE_ITEMS)]
  visible_items: usize,

  /// Increase logging verbosity (repeat for more detail)
  #[arg(short = 'v', action = ArgAction::Count)]
  verbosity: u8,

  /// Save logs to a specific file
  #[arg(long = "log", value_name = "FILE")]
  log_file: Option<PathBuf>,

  /// Read items from these files instead of standard input
  #[arg(value_name = "FILE")]
  item_files: Vec<PathBuf>,
}

impl TryFrom<RawCli> for CliOptions {
  type Error = anyhow::Error;

  fn try_from(raw: RawCli) -> Result<Self> {
    ensure!(raw.visible_items >= 1, "--items must be at least 1");

    let config = Config {
      visible_items: raw.visible_items,
      case_fold: raw.case_fold,
      file_completion: raw.file_completion,
      grouping: raw.grouping,
      password: raw.password,
      ..Config::default()
    };

    Ok(Self {
      config,
      item_files: raw.item_files,
      history_file: raw.history_file,
      log_file: raw.log_file,
      verbosity: raw.verbosity,
    })
  }
}
