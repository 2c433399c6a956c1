//! Key decoding: crossterm events to engine operations.
//!
//! The bindings follow the usual line-editing conventions. Control
//! chords mirror their emacs counterparts, shift extends the selection,
//! and control on an arrow key moves by words.

use crossterm::event::{
  KeyCode,
  KeyEvent,
  KeyModifiers,
};
use the_filter_core::Op;

pub fn decode(key: KeyEvent) -> Option<Op> {
  let shift = key.modifiers.contains(KeyModifiers::SHIFT);
  let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

  let op = match key.code {
    KeyCode::Esc => Op::Cancel,
    KeyCode::Enter => Op::Confirm,

    KeyCode::Tab => Op::MatchNext,
    KeyCode::BackTab => Op::MatchPrev,
    KeyCode::PageUp => Op::PageUp,
    KeyCode::PageDown => Op::PageDown,
    KeyCode::Up => Op::HistPrev,
    KeyCode::Down => Op::HistNext,

    KeyCode::Home if shift => Op::SelectBol,
    KeyCode::Home => Op::MoveBol,
    KeyCode::End if shift => Op::SelectEol,
    KeyCode::End => Op::MoveEol,
    KeyCode::Left => {
      match (ctrl, shift) {
        (true, true) => Op::SelectWordLeft,
        (true, false) => Op::MoveWordLeft,
        (false, true) => Op::SelectLeft,
        (false, false) => Op::MoveLeft,
      }
    },
    KeyCode::Right => {
      match (ctrl, shift) {
        (true, true) => Op::SelectWordRight,
        (true, false) => Op::MoveWordRight,
        (false, true) => Op::SelectRight,
        (false, false) => Op::MoveRight,
      }
    },

    KeyCode::Backspace if ctrl => Op::DeleteWord,
    KeyCode::Backspace => Op::DeleteCharLeft,
    KeyCode::Delete => Op::DeleteCharRight,

    KeyCode::Char(c) if ctrl => {
      match c {
        'a' => Op::MoveBol,
        'A' => Op::SelectBol,
        'e' => Op::MoveEol,
        'E' => Op::SelectEol,
        'b' => Op::MoveLeft,
        'B' => Op::SelectLeft,
        'f' => Op::MoveRight,
        'F' => Op::SelectRight,
        'h' => Op::DeleteCharLeft,
        'd' => Op::DeleteCharRight,
        'k' => Op::DeleteEol,
        'u' => Op::DeleteBol,
        'w' => Op::DeleteWord,
        'n' => Op::MatchNext,
        'p' => Op::MatchPrev,
        'm' => Op::Confirm,
        'c' => Op::Cancel,
        'z' => Op::Undo,
        'Z' => Op::Redo,
        _ => return None,
      }
    },
    KeyCode::Char(c) if !c.is_control() => Op::Insert(c.to_string()),

    _ => return None,
  };
  Some(op)
}
