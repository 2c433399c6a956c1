use std::{
  fs::File,
  io::{
    self,
    BufReader,
    BufWriter,
    ErrorKind,
    Read,
  },
  path::Path,
  process::ExitCode,
  time::Instant,
};

use anyhow::{
  Context,
  Result,
};
use crossterm::event::{
  self,
  Event,
  KeyEventKind,
  MouseButton,
  MouseEvent,
  MouseEventKind,
};
use the_filter_core::{
  Engine,
  Op,
  Redraw,
  history::CommandHistory,
  item::{
    Catalog,
    CompletionSource,
  },
};

mod cli;
mod completion;
mod draw;
mod keys;

enum Outcome {
  Confirmed(String),
  Cancelled,
}

fn main() -> Result<ExitCode> {
  let options = cli::CliOptions::parse()?;
  if let Some(path) = &options.log_file {
    setup_logging(path, options.verbosity)?;
  }

  let catalog = load_catalog(&options)?;
  let history = load_history(options.history_file.as_deref(), options.config.history_capacity)?;
  let source = options
    .config
    .file_completion
    .then(|| Box::new(completion::FsCompletion) as Box<dyn CompletionSource>);
  let mut engine = Engine::new(options.config.clone(), catalog, history, source);

  let mut screen = draw::Screen::new()?;
  let outcome = run(&mut engine, &mut screen);
  screen.restore()?;

  match outcome? {
    Outcome::Confirmed(text) => {
      engine.commit_history();
      if let Some(path) = &options.history_file {
        save_history(&engine, path)?;
      }
      println!("{text}");
      Ok(ExitCode::SUCCESS)
    },
    Outcome::Cancelled => Ok(ExitCode::FAILURE),
  }
}

fn run(engine: &mut Engine, screen: &mut draw::Screen) -> Result<Outcome> {
  let started = Instant::now();
  screen.draw_all(engine)?;

  loop {
    let redraw = match event::read()? {
      Event::Key(key) if key.kind != KeyEventKind::Release => {
        match keys::decode(key) {
          Some(op) => engine.handle(op),
          None => Redraw::Nothing,
        }
      },
      Event::Paste(text) => engine.handle(Op::Insert(text)),
      Event::Mouse(mouse) => on_mouse(engine, mouse, started.elapsed().as_millis() as u64),
      Event::Resize(..) => Redraw::Everything,
      _ => Redraw::Nothing,
    };

    match redraw {
      Redraw::Nothing => {},
      Redraw::Input => screen.draw_input(engine)?,
      Redraw::Everything => screen.draw_all(engine)?,
      Redraw::Confirm => return Ok(Outcome::Confirmed(engine.confirm_text())),
      Redraw::Cancel => return Ok(Outcome::Cancelled),
    }
  }
}

fn on_mouse(engine: &mut Engine, mouse: MouseEvent, time_ms: u64) -> Redraw {
  match mouse.kind {
    MouseEventKind::Down(MouseButton::Left) => {
      if mouse.row == 0 {
        engine.click_input(draw::input_offset(engine, mouse.column), time_ms)
      } else if let Some(row) = draw::item_row(mouse.row) {
        engine.click_item(row)
      } else {
        Redraw::Nothing
      }
    },
    MouseEventKind::Drag(MouseButton::Left) if mouse.row == 0 => {
      engine.drag_input(draw::input_offset(engine, mouse.column))
    },
    MouseEventKind::Moved => engine.hover_item(draw::item_row(mouse.row)),
    _ => Redraw::Nothing,
  }
}

/// Items come from the named files, or from stdin when none are given.
fn load_catalog(options: &cli::CliOptions) -> Result<Catalog> {
  if options.item_files.is_empty() {
    return Catalog::parse(io::stdin().lock(), options.config.grouping).context("reading items from stdin");
  }
  let mut buffer = Vec::new();
  for path in &options.item_files {
    File::open(path)
      .and_then(|mut file| file.read_to_end(&mut buffer))
      .with_context(|| format!("reading items from {}", path.display()))?;
    // A file boundary always separates groups.
    if buffer.last() != Some(&b'\n') {
      buffer.push(b'\n');
    }
    buffer.push(b'\n');
  }
  Ok(Catalog::parse(buffer.as_slice(), options.config.grouping)?)
}

fn load_history(path: Option<&Path>, capacity: usize) -> Result<CommandHistory> {
  let Some(path) = path else {
    return Ok(CommandHistory::new(capacity));
  };
  match File::open(path) {
    Ok(file) => {
      CommandHistory::read_from(BufReader::new(file), capacity)
        .with_context(|| format!("reading history from {}", path.display()))
    },
    Err(err) if err.kind() == ErrorKind::NotFound => Ok(CommandHistory::new(capacity)),
    Err(err) => Err(err).with_context(|| format!("opening history file {}", path.display())),
  }
}

fn save_history(engine: &Engine, path: &Path) -> Result<()> {
  let file = File::create(path).with_context(|| format!("writing history to {}", path.display()))?;
  engine.history().write_to(BufWriter::new(file))?;
  Ok(())
}

fn setup_logging(path: &Path, verbosity: u8) -> Result<()> {
  let level = match verbosity {
    0 => log::LevelFilter::Warn,
    1 => log::LevelFilter::Info,
    2 => log::LevelFilter::Debug,
    _ => log::LevelFilter::Trace,
  };
  fern::Dispatch::new()
    .format(|out, message, record| {
      out.finish(format_args!(
        "{} {} [{}] {}",
        chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.level(),
        record.target(),
        message
      ))
    })
    .level(level)
    .chain(fern::log_file(path)?)
    .apply()?;
  Ok(())
}
