//! Undo history for the input line.
//!
//! The history is a plain vector of text revisions plus an index of the
//! current one, oldest first. The vector always holds at least one element,
//! the initial buffer text. Committing while the index is not at the newest
//! revision first discards everything newer, so redo branches never
//! survive a fresh edit.
//!
//! Coalescing is the caller's job: the engine commits only when the class
//! of the incoming edit changes (or when undo/redo closes an editing run),
//! so a run of same-class edits collapses into a single revision. With the
//! boundaries placed that way, `undo` and `redo` are exact inverses.

#[derive(Debug, Clone)]
pub struct UndoStack {
  revisions: Vec<String>,
  current:   usize,
}

impl UndoStack {
  pub fn new(initial: &str) -> Self {
    Self {
      revisions: vec![initial.to_string()],
      current:   0,
    }
  }

  /// Number of stored revisions. Never zero.
  pub fn len(&self) -> usize {
    self.revisions.len()
  }

  /// Record `text` as the newest revision. Any revision newer than the
  /// current one is discarded first; nothing is pushed when `text` equals
  /// the current revision.
  pub fn commit(&mut self, text: &str) {
    self.revisions.truncate(self.current + 1);
    if self.revisions[self.current] != text {
      self.revisions.push(text.to_string());
      self.current += 1;
    }
  }

  /// Step to the previous revision and return it, or `None` at the oldest.
  pub fn undo(&mut self) -> Option<&str> {
    if self.current == 0 {
      return None;
    }
    self.current -= 1;
    Some(&self.revisions[self.current])
  }

  /// Step to the next revision and return it, or `None` at the newest.
  pub fn redo(&mut self) -> Option<&str> {
    if self.current + 1 >= self.revisions.len() {
      return None;
    }
    self.current += 1;
    Some(&self.revisions[self.current])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn undo_redo_round_trip() {
    let mut undo = UndoStack::new("");
    // One boundary per distinct-class edit.
    for state in ["a", "ab", "abc"] {
      undo.commit(state);
    }

    assert_eq!(undo.undo(), Some("ab"));
    assert_eq!(undo.undo(), Some("a"));
    assert_eq!(undo.undo(), Some(""));
    assert_eq!(undo.undo(), None);

    assert_eq!(undo.redo(), Some("a"));
    assert_eq!(undo.redo(), Some("ab"));
    assert_eq!(undo.redo(), Some("abc"));
    assert_eq!(undo.redo(), None);
  }

  #[test]
  fn commit_deduplicates_current_text() {
    let mut undo = UndoStack::new("x");
    undo.commit("x");
    undo.commit("x");
    assert_eq!(undo.len(), 1);
    assert_eq!(undo.undo(), None);
  }

  #[test]
  fn new_commit_truncates_redo_branch() {
    let mut undo = UndoStack::new("");
    undo.commit("one");
    undo.commit("two");
    assert_eq!(undo.undo(), Some("one"));

    // Editing from "one" discards "two".
    undo.commit("one-b");
    assert_eq!(undo.len(), 3);
    assert_eq!(undo.redo(), None);
    assert_eq!(undo.undo(), Some("one"));
    assert_eq!(undo.redo(), Some("one-b"));
  }
}
