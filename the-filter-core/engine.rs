//! The engine: abstract operations in, redraw directives out.
//!
//! The front-end decodes whatever its platform delivers (key events,
//! pointer events, IME callbacks) into [`Op`] values and feeds them to
//! [`Engine::handle`]. The engine mutates its state and answers with a
//! [`Redraw`] directive telling the front-end how much to repaint, or that
//! the session is over. Every operation runs to completion or is a no-op;
//! there is nothing asynchronous here.
//!
//! Undo boundaries are placed by operation class: a run of edits of one
//! class (say, repeated character deletions) coalesces into a single undo
//! step, closed when an edit of another class, or an undo/redo, arrives.

use crate::{
  compose::Composer,
  config::{
    Config,
    DOUBLE_CLICK_MS,
  },
  history::CommandHistory,
  item::{
    Catalog,
    CompletionSource,
    Group,
    Item,
  },
  matcher::{
    self,
    Compare,
  },
  textbox::TextBox,
  undo::UndoStack,
  window::{
    Dir,
    ViewWindow,
  },
};

/// Abstract operations the engine understands. The front-end owns the
/// mapping from raw events to these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
  /// Select the previous match.
  MatchPrev,
  /// Select the next match.
  MatchNext,
  /// Select the match one window above.
  PageUp,
  /// Select the match one window below.
  PageDown,
  /// Recall the previous history entry.
  HistPrev,
  /// Recall the next history entry.
  HistNext,
  /// Move the cursor to the beginning of the line.
  MoveBol,
  /// Move the cursor to the end of the line.
  MoveEol,
  /// Move the cursor one codepoint left.
  MoveLeft,
  /// Move the cursor one codepoint right.
  MoveRight,
  /// Move the cursor one word left.
  MoveWordLeft,
  /// Move the cursor one word right.
  MoveWordRight,
  /// Extend the selection to the beginning of the line.
  SelectBol,
  /// Extend the selection to the end of the line.
  SelectEol,
  /// Extend the selection one codepoint left.
  SelectLeft,
  /// Extend the selection one codepoint right.
  SelectRight,
  /// Extend the selection one word left.
  SelectWordLeft,
  /// Extend the selection one word right.
  SelectWordRight,
  /// Delete from the cursor to the beginning of the line.
  DeleteBol,
  /// Delete from the cursor to the end of the line.
  DeleteEol,
  /// Delete the codepoint left of the cursor (or the selection).
  DeleteCharLeft,
  /// Delete the codepoint right of the cursor (or the selection).
  DeleteCharRight,
  /// Delete back to the beginning of the word.
  DeleteWord,
  /// Undo the last editing run.
  Undo,
  /// Redo the last undone run.
  Redo,
  /// Insert text at the cursor, replacing the selection.
  Insert(String),
  /// Accept the current selection or typed text.
  Confirm,
  /// Abandon the session.
  Cancel,
}

/// Editing classes for undo coalescing. Each class opens its own undo run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
  DeleteBol,
  DeleteEol,
  DeleteCharLeft,
  DeleteCharRight,
  DeleteWord,
  Insert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpClass {
  Motion,
  Selection,
  Edit(EditKind),
  Undo,
  History,
  Other,
}

impl Op {
  fn class(&self) -> OpClass {
    match self {
      Op::MoveBol
      | Op::MoveEol
      | Op::MoveLeft
      | Op::MoveRight
      | Op::MoveWordLeft
      | Op::MoveWordRight => OpClass::Motion,
      Op::SelectBol
      | Op::SelectEol
      | Op::SelectLeft
      | Op::SelectRight
      | Op::SelectWordLeft
      | Op::SelectWordRight => OpClass::Selection,
      Op::DeleteBol => OpClass::Edit(EditKind::DeleteBol),
      Op::DeleteEol => OpClass::Edit(EditKind::DeleteEol),
      Op::DeleteCharLeft => OpClass::Edit(EditKind::DeleteCharLeft),
      Op::DeleteCharRight => OpClass::Edit(EditKind::DeleteCharRight),
      Op::DeleteWord => OpClass::Edit(EditKind::DeleteWord),
      Op::Insert(_) => OpClass::Edit(EditKind::Insert),
      Op::Undo | Op::Redo => OpClass::Undo,
      Op::HistPrev | Op::HistNext => OpClass::History,
      Op::MatchPrev | Op::MatchNext | Op::PageUp | Op::PageDown | Op::Confirm | Op::Cancel => {
        OpClass::Other
      },
    }
  }
}

/// What the front-end should do after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
  /// Nothing changed.
  Nothing,
  /// Only the input line changed.
  Input,
  /// Input and match window changed.
  Everything,
  /// The user confirmed; print and exit.
  Confirm,
  /// The user cancelled; exit without printing.
  Cancel,
}

/// One row of the visible match window, ready for drawing.
#[derive(Debug)]
pub struct VisibleRow<'a> {
  pub item:     &'a Item,
  pub group:    Option<&'a Group>,
  pub selected: bool,
  pub hovered:  bool,
}

#[derive(Debug, Clone, Copy, Default)]
struct ClickState {
  last_ms:       Option<u64>,
  word_selected: bool,
}

pub struct Engine {
  config:     Config,
  textbox:    TextBox,
  undo:       UndoStack,
  catalog:    Catalog,
  history:    CommandHistory,
  window:     ViewWindow,
  composer:   Composer,
  completion: Option<Box<dyn CompletionSource>>,
  chain:      Vec<usize>,
  compare:    Compare,
  prev_class: OpClass,
  click:      ClickState,
}

impl Engine {
  pub fn new(
    config: Config,
    catalog: Catalog,
    history: CommandHistory,
    completion: Option<Box<dyn CompletionSource>>,
  ) -> Self {
    let compare = if config.case_fold {
      Compare::CaseFold
    } else {
      Compare::Exact
    };
    let mut engine = Self {
      textbox: TextBox::new(config.input_capacity),
      undo: UndoStack::new(""),
      window: ViewWindow::new(config.visible_items),
      composer: Composer::default(),
      completion,
      chain: Vec::new(),
      compare,
      prev_class: OpClass::Other,
      click: ClickState::default(),
      config,
      catalog,
      history,
    };
    engine.refresh_file_items();
    engine.rebuild_matches();
    engine
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn textbox(&self) -> &TextBox {
    &self.textbox
  }

  pub fn window(&self) -> &ViewWindow {
    &self.window
  }

  pub fn composer(&self) -> &Composer {
    &self.composer
  }

  pub fn match_count(&self) -> usize {
    self.chain.len()
  }

  /// The rows the front-end should draw, in window order.
  pub fn visible_rows(&self) -> Vec<VisibleRow<'_>> {
    let mut rows = Vec::new();
    for pos in self.window.visible(self.chain.len()) {
      let Some(item) = self.catalog.get(self.chain[pos]) else {
        continue;
      };
      rows.push(VisibleRow {
        item,
        group: self.catalog.group(item),
        selected: self.window.selected() == Some(pos),
        hovered: self.window.hovered() == Some(pos),
      });
    }
    rows
  }

  /// Process one abstract operation.
  pub fn handle(&mut self, op: Op) -> Redraw {
    let class = op.class();

    // Undo boundaries: an undo/redo closes a pending editing run, and an
    // edit of a new class closes the previous run.
    if class == OpClass::Undo && matches!(self.prev_class, OpClass::Edit(_)) {
      self.undo.commit(self.textbox.text());
    }
    if matches!(class, OpClass::Edit(_)) && class != self.prev_class {
      self.undo.commit(self.textbox.text());
    }
    self.prev_class = class;

    let changed = match op {
      Op::Cancel => return Redraw::Cancel,
      Op::Confirm => return Redraw::Confirm,

      Op::MatchPrev => return self.navigate_matches(Dir::Previous),
      Op::MatchNext => return self.navigate_matches(Dir::Next),
      Op::PageUp => {
        return if self.window.page(Dir::Previous, self.chain.len()) {
          Redraw::Everything
        } else {
          Redraw::Nothing
        };
      },
      Op::PageDown => {
        return if self.window.page(Dir::Next, self.chain.len()) {
          Redraw::Everything
        } else {
          Redraw::Nothing
        };
      },

      Op::HistPrev | Op::HistNext => {
        let dir = if op == Op::HistPrev {
          Dir::Previous
        } else {
          Dir::Next
        };
        let Some(entry) = self.history.navigate(dir) else {
          return Redraw::Nothing;
        };
        let entry = entry.to_string();
        self.textbox.replace_all(&entry);
        true
      },

      Op::MoveBol | Op::SelectBol => {
        self.textbox.move_bol();
        true
      },
      Op::MoveEol | Op::SelectEol => {
        self.textbox.move_eol();
        true
      },
      Op::MoveLeft | Op::SelectLeft => {
        if !self.textbox.move_left() {
          return Redraw::Nothing;
        }
        true
      },
      Op::MoveRight | Op::SelectRight => {
        if !self.textbox.move_right() {
          return Redraw::Nothing;
        }
        true
      },
      Op::MoveWordLeft | Op::SelectWordLeft => {
        self.textbox.move_word_left();
        true
      },
      Op::MoveWordRight | Op::SelectWordRight => {
        self.textbox.move_word_right();
        true
      },

      Op::DeleteBol => self.textbox.delete_to_bol(),
      Op::DeleteEol => self.textbox.delete_to_eol(),
      Op::DeleteCharLeft => self.textbox.delete_char_left(),
      Op::DeleteCharRight => self.textbox.delete_char_right(),
      Op::DeleteWord => self.textbox.delete_word_left(),

      Op::Undo => {
        let Some(text) = self.undo.undo() else {
          return Redraw::Nothing;
        };
        let text = text.to_string();
        self.textbox.replace_all(&text);
        true
      },
      Op::Redo => {
        let Some(text) = self.undo.redo() else {
          return Redraw::Nothing;
        };
        let text = text.to_string();
        self.textbox.replace_all(&text);
        true
      },

      Op::Insert(text) => {
        // Pasted text is cut at the first newline; the input is one line.
        let text = text.split('\n').next().unwrap_or_default().to_string();
        let deleted = self.textbox.delete_selection();
        self.textbox.insert(&text) || deleted
      },
    };

    match class {
      OpClass::Motion => {
        self.textbox.collapse();
        Redraw::Everything
      },
      OpClass::Selection => Redraw::Input,
      _ if changed => {
        self.after_text_change();
        Redraw::Everything
      },
      _ => Redraw::Nothing,
    }
  }

  fn navigate_matches(&mut self, dir: Dir) -> Redraw {
    if self.window.advance(dir, self.chain.len()) {
      Redraw::Everything
    } else {
      Redraw::Nothing
    }
  }

  /// Rebuild the transient completion items and refilter. Runs after every
  /// text change.
  fn after_text_change(&mut self) {
    self.refresh_file_items();
    self.rebuild_matches();
  }

  fn refresh_file_items(&mut self) {
    if !self.config.file_completion {
      return;
    }
    let Some(source) = self.completion.as_ref() else {
      return;
    };
    let entries = source.entries(self.textbox.text());
    log::trace!("file completion: {} entries", entries.len());
    self.catalog.set_file_items(entries);
  }

  fn rebuild_matches(&mut self) {
    self.chain = matcher::filter(&self.catalog, self.textbox.text(), self.compare);
    self.window.reset();
  }

  // Pointer input. Offsets and rows come from the rendering collaborator;
  // timestamps are caller-supplied milliseconds, compared against the
  // double-click threshold.

  /// Click inside the input line at a byte offset.
  pub fn click_input(&mut self, offset: usize, time_ms: u64) -> Redraw {
    if self.composer.is_composing() {
      return Redraw::Nothing;
    }
    let double = self
      .click
      .last_ms
      .is_some_and(|last| time_ms.saturating_sub(last) < DOUBLE_CLICK_MS);
    if double && self.click.word_selected {
      // Third click in a row selects the whole line.
      self.textbox.select_all();
      self.click.word_selected = false;
    } else if double {
      self.textbox.select_word_at(offset);
      self.click.word_selected = true;
    } else {
      self.textbox.set_point(offset);
      self.click.word_selected = false;
    }
    self.click.last_ms = Some(time_ms);
    Redraw::Input
  }

  /// Drag inside the input line: extend the selection to a byte offset.
  pub fn drag_input(&mut self, offset: usize) -> Redraw {
    if self.composer.is_composing() {
      return Redraw::Nothing;
    }
    let before = (self.textbox.cursor(), self.textbox.select());
    self.textbox.drag_to(offset);
    if (self.textbox.cursor(), self.textbox.select()) == before {
      Redraw::Nothing
    } else {
      Redraw::Input
    }
  }

  /// Click on a visible match row: select it and confirm.
  pub fn click_item(&mut self, row: usize) -> Redraw {
    if self.composer.is_composing() {
      return Redraw::Nothing;
    }
    match self.window.select_row(row, self.chain.len()) {
      Some(_) => Redraw::Confirm,
      None => Redraw::Nothing,
    }
  }

  /// Pointer moved over a visible match row (`None`: left the list).
  pub fn hover_item(&mut self, row: Option<usize>) -> Redraw {
    let changed = match row {
      Some(row) => self.window.hover(row, self.chain.len()),
      None => {
        let had = self.window.hovered().is_some();
        self.window.clear_hover();
        had
      },
    };
    if changed {
      Redraw::Everything
    } else {
      Redraw::Nothing
    }
  }

  // Composition. The platform's pre-edit protocol reduces to these three
  // calls; only the finished string enters the buffer.

  pub fn compose_start(&mut self) {
    self.composer.start();
  }

  pub fn compose_update(&mut self, text: &str, caret: usize) {
    self.composer.update(text, caret);
  }

  pub fn compose_end(&mut self) -> Redraw {
    match self.composer.end() {
      Some(text) => self.handle(Op::Insert(text)),
      None => Redraw::Input,
    }
  }

  /// What confirmation prints: the selected item's group and output when
  /// an item is selected, the raw typed text otherwise.
  pub fn confirm_text(&self) -> String {
    let selected = self
      .window
      .selected()
      .and_then(|pos| self.chain.get(pos))
      .and_then(|&idx| self.catalog.get(idx));
    match selected {
      Some(item) => {
        match self.catalog.group(item) {
          Some(group) => format!("{}\t{}", group.name, item.output_text()),
          None => item.output_text().to_string(),
        }
      },
      None => self.textbox.text().to_string(),
    }
  }

  /// Record the typed text in the history; called once on confirmation.
  pub fn commit_history(&mut self) {
    let text = self.textbox.text().to_string();
    self.history.commit(&text);
  }

  pub fn history(&self) -> &CommandHistory {
    &self.history
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn engine_with(items: &str, config: Config) -> Engine {
    let catalog = Catalog::parse(items.as_bytes(), config.grouping).unwrap();
    let history = CommandHistory::new(config.history_capacity);
    Engine::new(config, catalog, history, None)
  }

  fn type_str(engine: &mut Engine, s: &str) {
    for ch in s.chars() {
      engine.handle(Op::Insert(ch.to_string()));
    }
  }

  #[test]
  fn end_to_end_confirmation_scenario() {
    let mut engine = engine_with("apple\tA fruit\tAPPLE\nbanana\n", Config::default());
    type_str(&mut engine, "a");
    assert_eq!(engine.match_count(), 2);

    // Nothing selected: confirmation prints the typed text.
    assert_eq!(engine.confirm_text(), "a");

    // One step of match navigation selects the first match.
    engine.handle(Op::MatchNext);
    assert_eq!(engine.confirm_text(), "APPLE");
  }

  #[test]
  fn grouped_selection_prints_group_and_output() {
    let mut config = Config::default();
    config.grouping = true;
    let mut engine = engine_with("Fruit\napple\tcrisp\tAPPLE\n", config);
    engine.handle(Op::MatchNext);
    assert_eq!(engine.confirm_text(), "Fruit\tAPPLE");
  }

  #[test]
  fn editing_rebuilds_matches_and_clears_selection() {
    let mut engine = engine_with("alpha\nbeta\n", Config::default());
    engine.handle(Op::MatchNext);
    assert!(engine.window().selected().is_some());

    let redraw = engine.handle(Op::Insert("b".into()));
    assert_eq!(redraw, Redraw::Everything);
    assert_eq!(engine.match_count(), 1);
    assert_eq!(engine.window().selected(), None);
  }

  #[test]
  fn same_class_deletions_coalesce_into_one_undo_step() {
    let mut engine = engine_with("x\n", Config::default());
    type_str(&mut engine, "abcd");
    for _ in 0..3 {
      engine.handle(Op::DeleteCharLeft);
    }
    assert_eq!(engine.textbox().text(), "a");

    // One undo restores the whole run of deletions.
    engine.handle(Op::Undo);
    assert_eq!(engine.textbox().text(), "abcd");
    // A second undo restores the state before typing.
    engine.handle(Op::Undo);
    assert_eq!(engine.textbox().text(), "");

    engine.handle(Op::Redo);
    assert_eq!(engine.textbox().text(), "abcd");
    engine.handle(Op::Redo);
    assert_eq!(engine.textbox().text(), "a");
  }

  #[test]
  fn history_navigation_replaces_the_whole_buffer() {
    let mut engine = engine_with("x\n", Config::default());
    engine.history.commit("older");
    engine.history.commit("newer");
    type_str(&mut engine, "typed");

    engine.handle(Op::HistPrev);
    assert_eq!(engine.textbox().text(), "newer");
    engine.handle(Op::HistPrev);
    assert_eq!(engine.textbox().text(), "older");
  }

  #[test]
  fn history_navigation_on_empty_history_is_a_no_op() {
    let mut engine = engine_with("x\n", Config::default());
    type_str(&mut engine, "typed");
    assert_eq!(engine.handle(Op::HistPrev), Redraw::Nothing);
    assert_eq!(engine.textbox().text(), "typed");
  }

  #[test]
  fn motion_collapses_selection_and_selection_ops_keep_it() {
    let mut engine = engine_with("x\n", Config::default());
    type_str(&mut engine, "ab");

    assert_eq!(engine.handle(Op::SelectLeft), Redraw::Input);
    assert!(engine.textbox().selection().is_some());

    assert_eq!(engine.handle(Op::MoveLeft), Redraw::Everything);
    assert!(engine.textbox().selection().is_none());
  }

  #[test]
  fn oversized_insert_changes_nothing() {
    let mut config = Config::default();
    config.input_capacity = 2;
    let mut engine = engine_with("x\n", config);
    type_str(&mut engine, "ab");
    assert_eq!(engine.handle(Op::Insert("c".into())), Redraw::Nothing);
    assert_eq!(engine.textbox().text(), "ab");
  }

  #[test]
  fn pasted_text_is_cut_at_the_first_newline() {
    let mut engine = engine_with("x\n", Config::default());
    engine.handle(Op::Insert("one\ntwo".into()));
    assert_eq!(engine.textbox().text(), "one");
  }

  #[test]
  fn double_and_triple_clicks_grow_the_selection() {
    let mut engine = engine_with("x\n", Config::default());
    type_str(&mut engine, "foo bar");

    engine.click_input(5, 0);
    assert_eq!(engine.textbox().selection(), None);

    engine.click_input(5, 100);
    assert_eq!(engine.textbox().selected_text(), Some("bar"));

    engine.click_input(5, 200);
    assert_eq!(engine.textbox().selected_text(), Some("foo bar"));
  }

  #[test]
  fn stale_clicks_do_not_select_words() {
    let mut engine = engine_with("x\n", Config::default());
    type_str(&mut engine, "foo bar");
    engine.click_input(5, 0);
    engine.click_input(5, 1000);
    assert_eq!(engine.textbox().selection(), None);
  }

  #[test]
  fn click_on_visible_item_confirms_it() {
    let mut engine = engine_with("alpha\nbeta\n", Config::default());
    assert_eq!(engine.click_item(1), Redraw::Confirm);
    assert_eq!(engine.confirm_text(), "beta");
    assert_eq!(engine.click_item(7), Redraw::Nothing);
  }

  #[test]
  fn hover_tracks_pointer_rows() {
    let mut engine = engine_with("alpha\nbeta\n", Config::default());
    assert_eq!(engine.hover_item(Some(1)), Redraw::Everything);
    assert_eq!(engine.hover_item(Some(1)), Redraw::Nothing);
    assert_eq!(engine.hover_item(None), Redraw::Everything);
  }

  struct FakeCompletion;

  impl CompletionSource for FakeCompletion {
    fn entries(&self, input: &str) -> Vec<String> {
      if input.starts_with('/') {
        vec![format!("{input}etc"), format!("{input}usr")]
      } else {
        Vec::new()
      }
    }
  }

  #[test]
  fn file_completion_items_follow_the_buffer() {
    let mut config = Config::default();
    config.file_completion = true;
    let catalog = Catalog::parse("static\n".as_bytes(), false).unwrap();
    let history = CommandHistory::new(8);
    let mut engine = Engine::new(config, catalog, history, Some(Box::new(FakeCompletion)));

    type_str(&mut engine, "/");
    // "/etc" and "/usr" substring-match the "/" input; "static" does not.
    assert_eq!(engine.match_count(), 2);

    engine.handle(Op::DeleteCharLeft);
    assert_eq!(engine.match_count(), 1);
    assert_eq!(engine.confirm_text(), "");
  }

  #[test]
  fn composition_feeds_one_finished_insert() {
    let mut engine = engine_with("x\n", Config::default());
    engine.compose_start();
    engine.compose_update("か", 3);
    assert!(engine.composer().is_composing());
    // Pointer input is ignored mid-composition.
    assert_eq!(engine.click_input(0, 0), Redraw::Nothing);

    assert_eq!(engine.compose_end(), Redraw::Everything);
    assert_eq!(engine.textbox().text(), "か");
  }

  #[test]
  fn confirmation_commits_typed_text_to_history() {
    let mut engine = engine_with("x\n", Config::default());
    type_str(&mut engine, "picked");
    engine.commit_history();
    let mut out = Vec::new();
    engine.history().write_to(&mut out).unwrap();
    assert_eq!(out, b"picked\n");
  }
}
