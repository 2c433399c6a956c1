//! Terminal drawing.
//!
//! The whole interface is one input line with the match window below it,
//! painted on the alternate screen of stderr so stdout stays clean for
//! the confirmed result. Redraws are full-line repaints; the window is
//! small enough that partial damage tracking would buy nothing.

use std::io::{
  self,
  Stderr,
  Write,
};

use crossterm::{
  cursor,
  event::{
    DisableBracketedPaste,
    DisableMouseCapture,
    EnableBracketedPaste,
    EnableMouseCapture,
  },
  execute,
  queue,
  style::{
    Attribute,
    Print,
    SetAttribute,
  },
  terminal::{
    self,
    Clear,
    ClearType,
    EnterAlternateScreen,
    LeaveAlternateScreen,
  },
};
use the_filter_core::Engine;

const PROMPT: &str = "> ";

pub struct Screen {
  out: Stderr,
}

impl Screen {
  pub fn new() -> io::Result<Self> {
    let mut out = io::stderr();
    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    Ok(Self { out })
  }

  pub fn restore(&mut self) -> io::Result<()> {
    execute!(
      self.out,
      DisableBracketedPaste,
      DisableMouseCapture,
      LeaveAlternateScreen
    )?;
    terminal::disable_raw_mode()
  }

  pub fn draw_input(&mut self, engine: &Engine) -> io::Result<()> {
    self.queue_input(engine)?;
    self.out.flush()
  }

  pub fn draw_all(&mut self, engine: &Engine) -> io::Result<()> {
    let rows = engine.visible_rows();
    for (i, row) in rows.iter().enumerate() {
      queue!(
        self.out,
        cursor::MoveTo(0, i as u16 + 1),
        Clear(ClearType::CurrentLine)
      )?;
      if row.selected {
        queue!(self.out, SetAttribute(Attribute::Reverse))?;
      } else if row.hovered {
        queue!(self.out, SetAttribute(Attribute::Underlined))?;
      }
      if let Some(group) = row.group {
        queue!(
          self.out,
          SetAttribute(Attribute::Bold),
          Print(&group.name),
          SetAttribute(Attribute::NormalIntensity),
          Print(" ")
        )?;
      }
      queue!(self.out, Print(&row.item.text))?;
      if let Some(description) = &row.item.description {
        queue!(
          self.out,
          SetAttribute(Attribute::Dim),
          Print("  "),
          Print(description),
          SetAttribute(Attribute::NormalIntensity)
        )?;
      }
      queue!(self.out, SetAttribute(Attribute::Reset))?;
    }
    for i in rows.len()..engine.window().capacity() {
      queue!(
        self.out,
        cursor::MoveTo(0, i as u16 + 1),
        Clear(ClearType::CurrentLine)
      )?;
    }
    // Input last, so the terminal cursor ends up on it.
    self.queue_input(engine)?;
    self.out.flush()
  }

  fn queue_input(&mut self, engine: &Engine) -> io::Result<()> {
    let textbox = engine.textbox();
    let text = textbox.text();
    queue!(
      self.out,
      cursor::Hide,
      cursor::MoveTo(0, 0),
      Clear(ClearType::CurrentLine),
      Print(PROMPT)
    )?;

    if engine.config().password {
      for _ in text.chars() {
        queue!(self.out, Print('*'))?;
      }
    } else if let Some((start, end)) = textbox.selection() {
      queue!(
        self.out,
        Print(&text[..start]),
        SetAttribute(Attribute::Reverse),
        Print(&text[start..end]),
        SetAttribute(Attribute::NoReverse),
        Print(&text[end..])
      )?;
    } else if let Some((preedit, _)) = engine.composer().preedit() {
      let at = textbox.cursor();
      queue!(
        self.out,
        Print(&text[..at]),
        SetAttribute(Attribute::Underlined),
        Print(preedit),
        SetAttribute(Attribute::NoUnderline),
        Print(&text[at..])
      )?;
    } else {
      queue!(self.out, Print(text))?;
    }

    let col = display_column(engine);
    queue!(self.out, cursor::MoveTo(col, 0), cursor::Show)
  }
}

/// Column of the terminal cursor for the engine's current state.
fn display_column(engine: &Engine) -> u16 {
  let textbox = engine.textbox();
  let mut chars = textbox.text()[..textbox.cursor()].chars().count();
  if let Some((preedit, caret)) = engine.composer().preedit() {
    chars += preedit[..caret].chars().count();
  }
  (PROMPT.len() + chars) as u16
}

/// Map a click column on the input line to a byte offset into the text.
pub fn input_offset(engine: &Engine, column: u16) -> usize {
  let text = engine.textbox().text();
  let clicked = (column as usize).saturating_sub(PROMPT.len());
  text
    .char_indices()
    .nth(clicked)
    .map(|(pos, _)| pos)
    .unwrap_or(text.len())
}

/// Map a screen row to a row of the match window, if it lands on one.
pub fn item_row(row: u16) -> Option<usize> {
  (row >= 1).then(|| row as usize - 1)
}

#[cfg(test)]
mod tests {
  use the_filter_core::{
    Config,
    Engine,
    Op,
  };

  use super::*;

  fn engine_with_text(text: &str) -> Engine {
    let catalog = the_filter_core::item::Catalog::parse("x\n".as_bytes(), false).unwrap();
    let history = the_filter_core::history::CommandHistory::new(8);
    let mut engine = Engine::new(Config::default(), catalog, history, None);
    engine.handle(Op::Insert(text.into()));
    engine
  }

  #[test]
  fn click_columns_map_to_char_starts() {
    let engine = engine_with_text("héllo");
    assert_eq!(input_offset(&engine, 2), 0);
    assert_eq!(input_offset(&engine, 3), 1);
    // "é" is two bytes, so the third char starts at byte 3.
    assert_eq!(input_offset(&engine, 4), 3);
    assert_eq!(input_offset(&engine, 40), 6);
  }

  #[test]
  fn clicks_on_the_prompt_land_at_the_start() {
    let engine = engine_with_text("abc");
    assert_eq!(input_offset(&engine, 0), 0);
    assert_eq!(input_offset(&engine, 1), 0);
  }

  #[test]
  fn screen_rows_skip_the_input_line() {
    assert_eq!(item_row(0), None);
    assert_eq!(item_row(1), Some(0));
    assert_eq!(item_row(4), Some(3));
  }
}
