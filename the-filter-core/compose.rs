//! Input-method composition, modeled as an explicit state machine.
//!
//! The platform's pre-edit callbacks are kept entirely outside the core:
//! whatever IME protocol the front-end speaks, it reduces to `start`, any
//! number of `update(text, caret)` calls carrying the whole pre-edit
//! string, and `end`, which yields the finished string to insert into the
//! input line. While composing, the front-end may render the pending text
//! and caret; the engine itself ignores pointer input during composition.

#[derive(Debug, Clone, Default)]
pub struct Composer {
  state: Option<Preedit>,
}

#[derive(Debug, Clone)]
struct Preedit {
  text:  String,
  caret: usize,
}

impl Composer {
  pub fn is_composing(&self) -> bool {
    self.state.is_some()
  }

  /// The pending pre-edit text and caret byte offset, if composing.
  pub fn preedit(&self) -> Option<(&str, usize)> {
    self.state.as_ref().map(|p| (p.text.as_str(), p.caret))
  }

  /// Begin a composition session. Restarting discards pending text.
  pub fn start(&mut self) {
    self.state = Some(Preedit {
      text:  String::new(),
      caret: 0,
    });
  }

  /// Replace the pending text. The caret hint is clamped onto a codepoint
  /// boundary inside the new text. Ignored when not composing.
  pub fn update(&mut self, text: &str, caret: usize) {
    let Some(preedit) = self.state.as_mut() else {
      return;
    };
    let mut caret = caret.min(text.len());
    while caret > 0 && !text.is_char_boundary(caret) {
      caret -= 1;
    }
    preedit.text = text.to_string();
    preedit.caret = caret;
  }

  /// Finish composing and hand back the finished string, empty when the
  /// session was cancelled by the platform.
  pub fn end(&mut self) -> Option<String> {
    self.state.take().map(|p| p.text).filter(|t| !t.is_empty())
  }
}
