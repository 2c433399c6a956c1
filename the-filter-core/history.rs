//! History of previously confirmed inputs.
//!
//! A bounded list of entries, oldest first, with a navigation index. The
//! index ranges over `[0, len]`; `len` is the resting state meaning "not
//! navigating, the buffer is fresh". Navigation returns the entry under
//! the index (or nothing at the resting state) and the caller replaces the
//! whole input buffer with it.
//!
//! Loading and saving go through plain `std::io` traits; opening the
//! history file, or deciding there is none, is the front-end's business.

use std::io::{
  self,
  BufRead,
  Write,
};

use crate::window::Dir;

#[derive(Debug, Clone)]
pub struct CommandHistory {
  entries:  Vec<String>,
  capacity: usize,
  index:    usize,
}

impl CommandHistory {
  pub fn new(capacity: usize) -> Self {
    Self {
      entries: Vec::new(),
      capacity,
      index: 0,
    }
  }

  /// Load entries from a line-oriented source, keeping at most `capacity`
  /// of the leading lines. The navigation index starts at rest.
  pub fn read_from(reader: impl BufRead, capacity: usize) -> io::Result<Self> {
    let mut entries = Vec::new();
    for line in reader.lines() {
      if entries.len() >= capacity {
        break;
      }
      entries.push(line?);
    }
    let index = entries.len();
    Ok(Self {
      entries,
      capacity,
      index,
    })
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Step the navigation index and return the entry now under it, or
  /// `None` at the fresh-buffer state past the newest entry.
  pub fn navigate(&mut self, dir: Dir) -> Option<&str> {
    match dir {
      Dir::Previous => {
        if self.index > 0 {
          self.index -= 1;
        }
      },
      Dir::Next => {
        if self.index < self.entries.len() {
          self.index += 1;
        }
      },
    }
    if self.index == self.entries.len() {
      None
    } else {
      Some(&self.entries[self.index])
    }
  }

  /// Record the confirmed input: appended when it differs from the newest
  /// entry (or the log is empty), evicting the oldest entry over capacity.
  pub fn commit(&mut self, final_text: &str) {
    if self.entries.last().is_some_and(|last| last == final_text) {
      return;
    }
    self.entries.push(final_text.to_string());
    while self.entries.len() > self.capacity {
      self.entries.remove(0);
    }
    self.index = self.entries.len();
  }

  /// Write the full log, oldest first, one entry per line.
  pub fn write_to(&self, mut writer: impl Write) -> io::Result<()> {
    for entry in &self.entries {
      writeln!(writer, "{entry}")?;
    }
    Ok(())
  }
}
