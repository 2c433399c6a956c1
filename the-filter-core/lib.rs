//! Engine of an interactive line-filter.
//!
//! The crate owns everything with algorithmic content: the editable input
//! line, its undo history, the item catalog, the filter that narrows the
//! catalog against the typed text, the paginated view over the matches, and
//! the navigable history of previously confirmed inputs.
//!
//! Everything platform-shaped stays outside: the surrounding front-end
//! decodes its events into [`engine::Op`] values, feeds them to
//! [`engine::Engine::handle`], and acts on the returned
//! [`engine::Redraw`] directive. Filesystem completion enters through the
//! [`item::CompletionSource`] seam and history persistence goes through
//! plain `std::io` traits, so the engine itself never touches a display, a
//! clipboard or a directory.

pub mod compose;
pub mod config;
pub mod engine;
pub mod history;
pub mod item;
pub mod matcher;
pub mod textbox;
pub mod undo;
pub mod window;

pub use config::Config;
pub use engine::{
  Engine,
  Op,
  Redraw,
};
