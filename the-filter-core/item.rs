//! The item catalog.
//!
//! Items are read once from a line-oriented source: tab-separated
//! `text[\tdescription[\toutput]]` fields, with blank lines (when grouping
//! is enabled) arming a group capture so that the next non-blank line names
//! the group every following item belongs to. Lines with an empty text
//! field are discarded.
//!
//! All items live in one owned vector, static items first. Filesystem
//! completion appends a transient block after them that is thrown away and
//! rebuilt wholesale on every qualifying edit; the match chain references
//! items by index and is rebuilt right after, so a rebuild can never leave
//! dangling references behind.

use std::io::{
  self,
  BufRead,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
  #[error("failed to read item source: {0}")]
  Io(#[from] io::Error),
}

/// A named item group, ordered by first appearance in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
  pub name: String,
}

/// One candidate item. `output` is what confirmation prints in place of
/// `text` when present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
  pub text:        String,
  pub description: Option<String>,
  pub output:      Option<String>,
  pub group:       Option<usize>,
}

impl Item {
  fn plain(text: String) -> Self {
    Self {
      text,
      description: None,
      output: None,
      group: None,
    }
  }

  /// The text printed on confirmation.
  pub fn output_text(&self) -> &str {
    self.output.as_deref().unwrap_or(&self.text)
  }
}

/// Source of filesystem-completion entries. The engine never lists
/// directories itself; the front-end supplies an implementation (or none).
pub trait CompletionSource {
  /// Entry names for the directory implied by the current input text.
  fn entries(&self, input: &str) -> Vec<String>;
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
  items:      Vec<Item>,
  groups:     Vec<Group>,
  /// Items below this index are static; the rest is the transient
  /// filesystem-completion block.
  static_len: usize,
}

impl Catalog {
  /// Parse the item source. With `grouping`, a blank line arms group
  /// capture and the next non-blank line names the group; repeated blank
  /// lines just re-arm it. The very first line names a group too.
  pub fn parse(reader: impl BufRead, grouping: bool) -> Result<Self, ParseError> {
    let mut catalog = Self::default();
    let mut capture_group = true;

    for line in reader.lines() {
      let line = line?;
      if line.is_empty() {
        capture_group = true;
        continue;
      }
      if grouping && capture_group {
        catalog.groups.push(Group { name: line });
        capture_group = false;
        continue;
      }

      let mut fields = line.split('\t');
      let text = fields.next().unwrap_or_default();
      if text.is_empty() {
        continue;
      }
      catalog.items.push(Item {
        text:        text.to_string(),
        description: fields.next().map(str::to_string),
        output:      fields.next().map(str::to_string),
        group:       if catalog.groups.is_empty() {
          None
        } else {
          Some(catalog.groups.len() - 1)
        },
      });
    }

    catalog.static_len = catalog.items.len();
    log::debug!(
      "catalog: {} items, {} groups",
      catalog.items.len(),
      catalog.groups.len()
    );
    Ok(catalog)
  }

  pub fn items(&self) -> &[Item] {
    &self.items
  }

  pub fn get(&self, index: usize) -> Option<&Item> {
    self.items.get(index)
  }

  pub fn group(&self, item: &Item) -> Option<&Group> {
    item.group.and_then(|g| self.groups.get(g))
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Replace the transient filesystem-completion block. Old entries are
  /// discarded first, so the block never accumulates.
  pub fn set_file_items(&mut self, entries: Vec<String>) {
    self.items.truncate(self.static_len);
    self.items.extend(entries.into_iter().map(Item::plain));
  }

  /// Drop the transient block entirely.
  pub fn clear_file_items(&mut self) {
    self.items.truncate(self.static_len);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_tab_separated_fields() {
    let src = "apple\tA fruit\tAPPLE\nbanana\n\tno text\n";
    let catalog = Catalog::parse(src.as_bytes(), false).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.items()[0].text, "apple");
    assert_eq!(catalog.items()[0].description.as_deref(), Some("A fruit"));
    assert_eq!(catalog.items()[0].output_text(), "APPLE");
    assert_eq!(catalog.items()[1].text, "banana");
    assert_eq!(catalog.items()[1].output_text(), "banana");
  }

  #[test]
  fn grouping_captures_names_from_blank_lines() {
    let src = "Fruit\napple\nbanana\n\n\nVeg\ncarrot\n";
    let catalog = Catalog::parse(src.as_bytes(), true).unwrap();
    assert_eq!(catalog.len(), 3);
    let apple = &catalog.items()[0];
    let carrot = &catalog.items()[2];
    assert_eq!(catalog.group(apple).map(|g| g.name.as_str()), Some("Fruit"));
    assert_eq!(catalog.group(carrot).map(|g| g.name.as_str()), Some("Veg"));
  }

  #[test]
  fn grouping_disabled_treats_every_line_as_item() {
    let src = "Fruit\napple\n";
    let catalog = Catalog::parse(src.as_bytes(), false).unwrap();
    assert_eq!(catalog.len(), 2);
    assert!(catalog.group(&catalog.items()[0]).is_none());
  }

  #[test]
  fn file_items_are_rebuilt_wholesale() {
    let mut catalog = Catalog::parse("a\nb\n".as_bytes(), false).unwrap();
    catalog.set_file_items(vec!["/etc/hosts".into(), "/etc/group".into()]);
    assert_eq!(catalog.len(), 4);
    catalog.set_file_items(vec!["/tmp/x".into()]);
    assert_eq!(catalog.len(), 3);
    assert_eq!(catalog.items()[2].text, "/tmp/x");
    catalog.clear_file_items();
    assert_eq!(catalog.len(), 2);
  }
}
