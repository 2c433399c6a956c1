//! Bounded, paginated view over the match chain.
//!
//! The window tracks three positions in the chain: `start` (first visible
//! entry), an optional selection and an optional hover. Navigation moves
//! the selection one entry at a time but the window itself moves in whole
//! pages: when the selection reaches the last visible slot the window
//! start jumps forward by its full capacity, and symmetrically backward.
//! Positions are plain indices into the chain; a chain rebuild resets all
//! of them, so nothing here can dangle.

/// Navigation direction along the match chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dir {
  Previous,
  Next,
}

#[derive(Debug, Clone)]
pub struct ViewWindow {
  capacity: usize,
  start:    usize,
  selected: Option<usize>,
  hovered:  Option<usize>,
}

impl ViewWindow {
  pub fn new(capacity: usize) -> Self {
    Self {
      capacity: capacity.max(1),
      start: 0,
      selected: None,
      hovered: None,
    }
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn start(&self) -> usize {
    self.start
  }

  pub fn selected(&self) -> Option<usize> {
    self.selected
  }

  pub fn hovered(&self) -> Option<usize> {
    self.hovered
  }

  /// Forget all positions; called after every chain rebuild.
  pub fn reset(&mut self) {
    self.start = 0;
    self.selected = None;
    self.hovered = None;
  }

  /// The chain positions currently visible, given the chain length.
  pub fn visible(&self, len: usize) -> std::ops::Range<usize> {
    let start = self.start.min(len);
    start..len.min(start + self.capacity)
  }

  /// Move the selection one entry along the chain. The first movement with
  /// no selection lands on the window start without moving the window;
  /// afterwards the window jumps by whole pages as the selection crosses
  /// its edges.
  pub fn advance(&mut self, dir: Dir, len: usize) -> bool {
    if len == 0 {
      return false;
    }
    let Some(sel) = self.selected else {
      self.selected = Some(self.start.min(len - 1));
      return true;
    };
    match dir {
      Dir::Next => {
        if sel + 1 >= len {
          return false;
        }
        let sel = sel + 1;
        self.selected = Some(sel);
        // Selection reached the last visible slot (or beyond): flip a full
        // page forward, or land the window on the selection when fewer
        // than a page remains.
        if sel - self.start >= self.capacity - 1 {
          self.start = if self.start + self.capacity < len {
            self.start + self.capacity
          } else {
            sel
          };
        }
      },
      Dir::Previous => {
        if sel == 0 {
          return false;
        }
        let sel = sel - 1;
        self.selected = Some(sel);
        // Selection stepped just above the window: flip a full page back.
        if sel + 1 == self.start {
          self.start = self.start.saturating_sub(self.capacity);
        }
      },
    }
    true
  }

  /// Move selection and window a whole page at once.
  pub fn page(&mut self, dir: Dir, len: usize) -> bool {
    if len == 0 {
      return false;
    }
    let sel = self.selected.unwrap_or(self.start);
    match dir {
      Dir::Next => {
        self.start = (self.start + self.capacity).min(len - 1);
        self.selected = Some((sel + self.capacity).min(len - 1));
      },
      Dir::Previous => {
        self.start = self.start.saturating_sub(self.capacity);
        self.selected = Some(sel.saturating_sub(self.capacity));
      },
    }
    true
  }

  /// Hover lookup: map a row inside the visible window to a chain
  /// position, clamped to the occupied rows. No side effect beyond the
  /// hover cursor itself.
  pub fn hover(&mut self, row: usize, len: usize) -> bool {
    let visible = self.visible(len);
    let prev = self.hovered;
    self.hovered = if visible.is_empty() {
      None
    } else {
      Some((self.start + row).min(visible.end - 1))
    };
    prev != self.hovered
  }

  pub fn clear_hover(&mut self) {
    self.hovered = None;
  }

  /// Select the entry on a visible row (pointer click on the list).
  pub fn select_row(&mut self, row: usize, len: usize) -> Option<usize> {
    let visible = self.visible(len);
    let pos = self.start + row;
    if visible.contains(&pos) {
      self.selected = Some(pos);
      Some(pos)
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn window_advances_by_whole_pages() {
    let mut win = ViewWindow::new(3);
    let len = 10;

    assert!(win.advance(Dir::Next, len));
    assert_eq!(win.selected(), Some(0));
    assert_eq!(win.start(), 0);

    assert!(win.advance(Dir::Next, len));
    assert_eq!(win.selected(), Some(1));
    assert_eq!(win.start(), 0);

    // Third press: the selection hits the last visible slot and the window
    // jumps a full page, not a single entry.
    assert!(win.advance(Dir::Next, len));
    assert_eq!(win.selected(), Some(2));
    assert_eq!(win.start(), 3);
  }

  #[test]
  fn window_jumps_back_a_full_page() {
    let mut win = ViewWindow::new(3);
    let len = 10;
    for _ in 0..4 {
      win.advance(Dir::Next, len);
    }
    assert_eq!(win.selected(), Some(3));
    assert_eq!(win.start(), 3);

    assert!(win.advance(Dir::Previous, len));
    assert_eq!(win.selected(), Some(2));
    assert_eq!(win.start(), 0);
  }

  #[test]
  fn short_tail_lands_window_on_selection() {
    let mut win = ViewWindow::new(4);
    let len = 5;
    for _ in 0..5 {
      win.advance(Dir::Next, len);
    }
    assert_eq!(win.selected(), Some(4));
    // 5 - 4 < capacity entries remained, so the window landed on the
    // selection instead of jumping past the end.
    assert!(win.start() <= 4);
    assert!(win.visible(len).contains(&win.start()));
  }

  #[test]
  fn advance_on_empty_chain_is_a_no_op() {
    let mut win = ViewWindow::new(3);
    assert!(!win.advance(Dir::Next, 0));
    assert_eq!(win.selected(), None);
  }

  #[test]
  fn selection_stops_at_chain_ends() {
    let mut win = ViewWindow::new(3);
    win.advance(Dir::Next, 2);
    assert!(!win.advance(Dir::Previous, 2));
    win.advance(Dir::Next, 2);
    assert!(!win.advance(Dir::Next, 2));
    assert_eq!(win.selected(), Some(1));
  }

  #[test]
  fn paging_moves_selection_and_window_together() {
    let mut win = ViewWindow::new(3);
    let len = 10;
    assert!(win.page(Dir::Next, len));
    assert_eq!(win.start(), 3);
    assert_eq!(win.selected(), Some(3));
    assert!(win.page(Dir::Next, len));
    assert_eq!(win.start(), 6);
    assert!(win.page(Dir::Next, len));
    assert_eq!(win.start(), 9);
    assert_eq!(win.selected(), Some(9));
    assert!(win.page(Dir::Previous, len));
    assert_eq!(win.start(), 6);
    assert_eq!(win.selected(), Some(6));
  }

  #[test]
  fn hover_is_clamped_to_occupied_rows() {
    let mut win = ViewWindow::new(5);
    assert!(win.hover(3, 2));
    assert_eq!(win.hovered(), Some(1));
    assert!(!win.hover(4, 2));
    win.clear_hover();
    assert_eq!(win.hovered(), None);
    assert!(!win.hover(0, 0));
  }

  #[test]
  fn select_row_only_inside_visible_window() {
    let mut win = ViewWindow::new(3);
    assert_eq!(win.select_row(1, 10), Some(1));
    assert_eq!(win.select_row(5, 10), None);
    assert_eq!(win.selected(), Some(1));
  }
}
