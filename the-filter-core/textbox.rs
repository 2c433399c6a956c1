//! The editable input line.
//!
//! A [`TextBox`] owns a fixed-capacity UTF-8 string plus two byte offsets,
//! `cursor` and `select`. When they are equal nothing is selected; otherwise
//! the half-open range between them is. Every operation keeps both offsets
//! inside `[0, len]` and on a codepoint lead byte, and fails silently (a
//! no-op) instead of erroring: in an interactive prompt a rejected edit is a
//! degraded state, not a fault.
//!
//! Boundary walking never decodes codepoints: a byte starts a codepoint iff
//! its top two bits are not `10`. Word classification is ASCII-only; bytes
//! of multi-byte codepoints are never spaces.

/// Returns true if `byte` is not a UTF-8 continuation byte.
#[inline]
pub fn is_boundary(byte: u8) -> bool {
  byte & 0xC0 != 0x80
}

#[inline]
fn is_word_space(byte: u8) -> bool {
  byte == b' '
}

#[derive(Debug, Clone)]
pub struct TextBox {
  text:     String,
  capacity: usize,
  cursor:   usize,
  select:   usize,
}

impl TextBox {
  pub fn new(capacity: usize) -> Self {
    Self {
      text: String::new(),
      capacity,
      cursor: 0,
      select: 0,
    }
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn cursor(&self) -> usize {
    self.cursor
  }

  pub fn select(&self) -> usize {
    self.select
  }

  pub fn is_empty(&self) -> bool {
    self.text.is_empty()
  }

  /// The selected byte range, lower bound first, or `None` when the
  /// selection is collapsed.
  pub fn selection(&self) -> Option<(usize, usize)> {
    if self.cursor == self.select {
      None
    } else {
      Some((
        self.cursor.min(self.select),
        self.cursor.max(self.select),
      ))
    }
  }

  /// The selected text, if any.
  pub fn selected_text(&self) -> Option<&str> {
    self.selection().map(|(lo, hi)| &self.text[lo..hi])
  }

  /// Collapse the selection onto the cursor.
  pub fn collapse(&mut self) {
    self.select = self.cursor;
  }

  /// Byte offset of the next codepoint boundary after `pos`, clamped to the
  /// end of the text.
  pub fn next_boundary(&self, pos: usize) -> usize {
    let bytes = self.text.as_bytes();
    let mut n = pos + 1;
    while n < bytes.len() && !is_boundary(bytes[n]) {
      n += 1;
    }
    n.min(bytes.len())
  }

  /// Byte offset of the previous codepoint boundary before `pos`, clamped
  /// to the start of the text.
  pub fn prev_boundary(&self, pos: usize) -> usize {
    let bytes = self.text.as_bytes();
    if pos == 0 {
      return 0;
    }
    let mut n = pos - 1;
    while n > 0 && !is_boundary(bytes[n]) {
      n -= 1;
    }
    n
  }

  /// Snap an arbitrary byte offset onto a valid boundary in `[0, len]`.
  pub fn clamp_offset(&self, pos: usize) -> usize {
    let bytes = self.text.as_bytes();
    let mut n = pos.min(bytes.len());
    while n > 0 && !is_boundary(bytes[n]) {
      n -= 1;
    }
    n
  }

  /// Move `pos` to the start (`-1`) or end (`+1`) of the word around it.
  /// Going left skips the trailing space run, then the word; going right
  /// mirrors this forward.
  pub fn word_edge(&self, mut pos: usize, dir: i32) -> usize {
    let bytes = self.text.as_bytes();
    if dir < 0 {
      while pos > 0 && is_word_space(bytes[self.prev_boundary(pos)]) {
        pos = self.prev_boundary(pos);
      }
      while pos > 0 && !is_word_space(bytes[self.prev_boundary(pos)]) {
        pos = self.prev_boundary(pos);
      }
    } else {
      while pos < bytes.len() && is_word_space(bytes[pos]) {
        pos = self.next_boundary(pos);
      }
      while pos < bytes.len() && !is_word_space(bytes[pos]) {
        pos = self.next_boundary(pos);
      }
    }
    pos
  }

  /// Insert `s` at the cursor. Rejected wholesale when the result would not
  /// fit in the capacity. The selection collapses onto the new cursor.
  pub fn insert(&mut self, s: &str) -> bool {
    if self.text.len() + s.len() > self.capacity {
      log::debug!(
        "rejecting {}-byte insert over capacity {}",
        s.len(),
        self.capacity
      );
      return false;
    }
    if s.is_empty() {
      return false;
    }
    self.text.insert_str(self.cursor, s);
    self.cursor += s.len();
    self.select = self.cursor;
    true
  }

  /// Delete `n` bytes ending at the cursor. Every deletion op funnels
  /// through here. The range start is snapped to a boundary.
  pub fn delete_back(&mut self, n: usize) -> bool {
    let start = self.clamp_offset(self.cursor.saturating_sub(n));
    if start == self.cursor {
      return false;
    }
    self.text.replace_range(start..self.cursor, "");
    self.cursor = start;
    self.select = start;
    true
  }

  /// Collapse the selected range to its lower bound, removing its text.
  pub fn delete_selection(&mut self) -> bool {
    let Some((lo, hi)) = self.selection() else {
      return false;
    };
    self.text.replace_range(lo..hi, "");
    self.cursor = lo;
    self.select = lo;
    true
  }

  /// Replace the whole buffer (history recall and undo both work by
  /// wholesale replacement). Oversized text is clipped at a boundary.
  pub fn replace_all(&mut self, s: &str) {
    let mut end = s.len().min(self.capacity);
    while !s.is_char_boundary(end) {
      end -= 1;
    }
    self.text.clear();
    self.text.push_str(&s[..end]);
    self.cursor = self.text.len();
    self.select = self.cursor;
  }

  // Movement. Each returns whether the cursor moved; the caller decides
  // whether the selection anchor follows.

  pub fn move_bol(&mut self) -> bool {
    let moved = self.cursor != 0;
    self.cursor = 0;
    moved
  }

  pub fn move_eol(&mut self) -> bool {
    let moved = self.cursor != self.text.len();
    self.cursor = self.text.len();
    moved
  }

  pub fn move_left(&mut self) -> bool {
    if self.cursor == 0 {
      return false;
    }
    self.cursor = self.prev_boundary(self.cursor);
    true
  }

  pub fn move_right(&mut self) -> bool {
    if self.cursor == self.text.len() {
      return false;
    }
    self.cursor = self.next_boundary(self.cursor);
    true
  }

  pub fn move_word_left(&mut self) -> bool {
    let pos = self.word_edge(self.cursor, -1);
    let moved = pos != self.cursor;
    self.cursor = pos;
    moved
  }

  pub fn move_word_right(&mut self) -> bool {
    let pos = self.word_edge(self.cursor, 1);
    let moved = pos != self.cursor;
    self.cursor = pos;
    moved
  }

  /// Place cursor and anchor at an arbitrary offset (pointer click).
  pub fn set_point(&mut self, pos: usize) {
    self.cursor = self.clamp_offset(pos);
    self.select = self.cursor;
  }

  /// Extend the selection anchor to an arbitrary offset (pointer drag).
  pub fn drag_to(&mut self, pos: usize) {
    self.select = self.clamp_offset(pos);
  }

  /// Select the word around `pos` (double click).
  pub fn select_word_at(&mut self, pos: usize) {
    let pos = self.clamp_offset(pos);
    self.cursor = self.word_edge(pos, -1);
    self.select = self.word_edge(pos, 1);
  }

  /// Select the whole line (triple click).
  pub fn select_all(&mut self) {
    self.cursor = 0;
    self.select = self.text.len();
  }

  // Deletion. Composed from the movement distances above and
  // [`TextBox::delete_back`].

  pub fn delete_to_bol(&mut self) -> bool {
    self.delete_back(self.cursor)
  }

  pub fn delete_to_eol(&mut self) -> bool {
    if self.cursor == self.text.len() {
      return false;
    }
    self.text.truncate(self.cursor);
    self.select = self.cursor;
    true
  }

  pub fn delete_char_left(&mut self) -> bool {
    if self.delete_selection() {
      return true;
    }
    if self.cursor == 0 {
      return false;
    }
    let n = self.cursor - self.prev_boundary(self.cursor);
    self.delete_back(n)
  }

  /// Delete the codepoint after the cursor: step over it, then delete
  /// backward, leaving the cursor where it was.
  pub fn delete_char_right(&mut self) -> bool {
    if self.delete_selection() {
      return true;
    }
    if self.cursor == self.text.len() {
      return false;
    }
    let next = self.next_boundary(self.cursor);
    let n = next - self.cursor;
    self.cursor = next;
    self.delete_back(n)
  }

  /// Delete back to the beginning of the word: the trailing space run, then
  /// the word itself.
  pub fn delete_word_left(&mut self) -> bool {
    let mut deleted = false;
    while self.cursor > 0 && is_word_space(self.text.as_bytes()[self.prev_boundary(self.cursor)]) {
      let n = self.cursor - self.prev_boundary(self.cursor);
      deleted |= self.delete_back(n);
    }
    while self.cursor > 0 && !is_word_space(self.text.as_bytes()[self.prev_boundary(self.cursor)])
    {
      let n = self.cursor - self.prev_boundary(self.cursor);
      deleted |= self.delete_back(n);
    }
    deleted
  }

  #[cfg(test)]
  fn assert_valid(&self) {
    assert!(self.cursor <= self.text.len());
    assert!(self.select <= self.text.len());
    assert!(self.text.is_char_boundary(self.cursor));
    assert!(self.text.is_char_boundary(self.select));
  }
}
