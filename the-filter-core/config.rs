//! Configuration values for a filter session.
//!
//! Values only; where they come from (flags, resources, files) is the
//! front-end's business.

/// Default number of items visible in the match window.
pub const DEFAULT_VISIBLE_ITEMS: usize = 10;
/// Default capacity of the input line, in bytes.
pub const DEFAULT_INPUT_CAPACITY: usize = 1024;
/// Default maximum number of history entries kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;
/// Two clicks within this many milliseconds form a double click.
pub const DOUBLE_CLICK_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct Config {
  /// How many matched items the window shows at once.
  pub visible_items:    usize,
  /// Maximum byte length of the input line.
  pub input_capacity:   usize,
  /// Maximum number of entries in the command history.
  pub history_capacity: usize,
  /// Compare input and items ignoring ASCII case.
  pub case_fold:        bool,
  /// Rebuild filesystem-completion items on every edit.
  pub file_completion:  bool,
  /// Interpret blank lines in the item source as group markers.
  pub grouping:         bool,
  /// Suppress input echo in the front-end; editing is unaffected.
  pub password:         bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      visible_items:    DEFAULT_VISIBLE_ITEMS,
      input_capacity:   DEFAULT_INPUT_CAPACITY,
      history_capacity: DEFAULT_HISTORY_CAPACITY,
      case_fold:        false,
      file_completion:  false,
      grouping:         false,
      password:         false,
    }
  }
}
