//! Filename completion backed by the real filesystem.
//!
//! The typed text names a directory: its entries become the transient
//! completion items, each keeping the typed text as a prefix so picking
//! one extends the input. Relative input is read under `./`. Dotfiles
//! never complete. Narrowing is the matcher's job, not this module's.

use std::fs;

use the_filter_core::item::CompletionSource;

pub struct FsCompletion;

impl CompletionSource for FsCompletion {
  fn entries(&self, input: &str) -> Vec<String> {
    let path = if input.starts_with('/') || input.starts_with('.') {
      input.to_string()
    } else {
      format!("./{input}")
    };

    let dir = match fs::read_dir(&path) {
      Ok(dir) => dir,
      Err(err) => {
        log::debug!("completion: cannot read {path}: {err}");
        return Vec::new();
      },
    };

    let mut names = Vec::new();
    for entry in dir.flatten() {
      let Ok(name) = entry.file_name().into_string() else {
        continue;
      };
      if name.starts_with('.') {
        continue;
      }
      if input.is_empty() {
        names.push(name);
      } else {
        let sep = if input.ends_with('/') { "" } else { "/" };
        names.push(format!("{input}{sep}{name}"));
      }
    }
    names.sort_unstable();
    names
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  fn populated_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("alpha"), b"").unwrap();
    fs::write(dir.path().join("beta"), b"").unwrap();
    fs::write(dir.path().join(".hidden"), b"").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("inner"), b"").unwrap();
    dir
  }

  #[test]
  fn directory_input_lists_its_entries() {
    let dir = populated_dir();
    let base = dir.path().to_str().unwrap();
    assert_eq!(FsCompletion.entries(base), vec![
      format!("{base}/alpha"),
      format!("{base}/beta"),
      format!("{base}/sub"),
    ]);
  }

  #[test]
  fn typed_text_prefixes_every_entry() {
    let dir = populated_dir();
    let base = dir.path().to_str().unwrap();
    let inner = vec![format!("{base}/sub/inner")];
    assert_eq!(FsCompletion.entries(&format!("{base}/sub")), inner);
    // A trailing slash must not double the separator.
    assert_eq!(FsCompletion.entries(&format!("{base}/sub/")), inner);
  }

  #[test]
  fn dotfiles_are_always_excluded() {
    let dir = populated_dir();
    let base = dir.path().to_str().unwrap();
    assert!(FsCompletion.entries(base).iter().all(|e| !e.contains(".hidden")));
    assert!(FsCompletion.entries(&format!("{base}/.hi")).is_empty());
  }

  #[test]
  fn non_directories_complete_to_nothing() {
    let dir = populated_dir();
    let base = dir.path().to_str().unwrap();
    assert!(FsCompletion.entries(&format!("{base}/alpha")).is_empty());
    assert!(FsCompletion.entries("/definitely/not/a/real/dir").is_empty());
  }
}
