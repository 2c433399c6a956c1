//! Filtering the catalog against the typed text.
//!
//! Two passes build the match chain. Pass one keeps every item with a
//! whitespace-delimited word that starts with the typed text; pass two
//! appends the items that only contain it somewhere in the middle. Catalog
//! order is preserved inside each tier, so the chain is "word-prefix
//! matches first" end to end.
//!
//! The chain is a vector of catalog indices, rebuilt from scratch on every
//! text change; nothing in it outlives a rebuild.

use crate::item::Catalog;

/// Byte comparison mode. Folding is ASCII-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compare {
  Exact,
  CaseFold,
}

impl Compare {
  /// Does `hay` start with `needle` under this comparison?
  fn prefix_eq(self, hay: &[u8], needle: &[u8]) -> bool {
    if hay.len() < needle.len() {
      return false;
    }
    match self {
      Self::Exact => &hay[..needle.len()] == needle,
      Self::CaseFold => hay[..needle.len()].eq_ignore_ascii_case(needle),
    }
  }
}

/// True if any word of `text` starts with `needle`. Words are delimited by
/// runs of ASCII whitespace; the empty needle matches unconditionally.
fn word_prefix_match(text: &str, needle: &str, cmp: Compare) -> bool {
  if needle.is_empty() {
    return true;
  }
  let bytes = text.as_bytes();
  let mut at_word_start = true;
  for i in 0..bytes.len() {
    if bytes[i].is_ascii_whitespace() {
      at_word_start = true;
      continue;
    }
    if at_word_start && cmp.prefix_eq(&bytes[i..], needle.as_bytes()) {
      return true;
    }
    at_word_start = false;
  }
  false
}

/// True if `needle` occurs at any byte offset of `text`, sliding one byte
/// at a time.
fn substring_match(text: &str, needle: &str, cmp: Compare) -> bool {
  let bytes = text.as_bytes();
  if needle.is_empty() {
    return true;
  }
  (0..bytes.len()).any(|i| cmp.prefix_eq(&bytes[i..], needle.as_bytes()))
}

/// Build the match chain for `needle`: word-prefix matches in catalog
/// order, then substring-only matches in catalog order.
pub fn filter(catalog: &Catalog, needle: &str, cmp: Compare) -> Vec<usize> {
  let mut chain = Vec::new();
  let mut word_matched = vec![false; catalog.len()];

  for (i, item) in catalog.items().iter().enumerate() {
    if word_prefix_match(&item.text, needle, cmp) {
      word_matched[i] = true;
      chain.push(i);
    }
  }
  for (i, item) in catalog.items().iter().enumerate() {
    if !word_matched[i] && substring_match(&item.text, needle, cmp) {
      chain.push(i);
    }
  }
  chain
}
