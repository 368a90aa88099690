//! The document controller: buffer, file path, modified flag.
//!
//! All file I/O for the editor goes through [`Document`]. Operations return
//! explicit [`Result`]s and leave the document untouched when they fail;
//! turning a failure into something the user sees is the shell's job.

mod error;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use error::DocumentError;

use crate::editor::TextBuffer;

/// Extension applied by save-as when the chosen path has none.
pub const DEFAULT_EXTENSION: &str = "md";

/// Name shown for a document that has no file yet.
pub const UNTITLED: &str = "Untitled";

/// Outcome of [`Document::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    /// The buffer was written to this path.
    Saved(PathBuf),
    /// No file path is set; the caller must run the save-as flow.
    NeedsPath,
}

/// The single open document.
#[derive(Debug, Default)]
pub struct Document {
    buffer: TextBuffer,
    file_path: Option<PathBuf>,
    modified: bool,
}

impl Document {
    /// Create an empty, unnamed, unmodified document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document that will be saved to `path`.
    ///
    /// Used when the editor is started on a file that does not exist yet.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Create an unnamed document holding `text`, marked as modified.
    #[cfg(test)]
    pub(crate) fn from_text(text: &str) -> Self {
        Self {
            buffer: TextBuffer::from_text(text),
            file_path: None,
            modified: !text.is_empty(),
        }
    }

    pub const fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The full buffer content.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// File name of the current path, or [`UNTITLED`].
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| UNTITLED.to_string(), |n| n.to_string_lossy().to_string())
    }

    /// Apply an edit to the buffer.
    ///
    /// `f` returns whether the text changed; a change sets the modified
    /// flag. Returns the same value.
    pub fn edit(&mut self, f: impl FnOnce(&mut TextBuffer) -> bool) -> bool {
        let changed = f(&mut self.buffer);
        if changed {
            self.modified = true;
        }
        changed
    }

    /// Move the cursor without touching the text.
    pub fn navigate(&mut self, f: impl FnOnce(&mut TextBuffer)) {
        f(&mut self.buffer);
    }

    /// Clear the buffer, forget the file path and reset the modified flag.
    ///
    /// Guarding unsaved changes is up to the caller.
    pub fn new_document(&mut self) {
        self.buffer.clear();
        self.file_path = None;
        self.modified = false;
    }

    /// Replace the buffer with the UTF-8 content of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Read`] if the file cannot be read or is not
    /// valid UTF-8. The document is unchanged in that case.
    pub fn open(&mut self, path: &Path) -> Result<(), DocumentError> {
        let text = read_text(path)?;
        self.buffer.replace_all(&text);
        self.file_path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Write the buffer to the current path.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Write`] if the file cannot be written. The
    /// modified flag is left as it was.
    pub fn save(&mut self) -> Result<SaveStatus, DocumentError> {
        let Some(path) = self.file_path.clone() else {
            return Ok(SaveStatus::NeedsPath);
        };
        fs::write(&path, self.buffer.text()).map_err(|err| DocumentError::write(&path, err))?;
        self.modified = false;
        Ok(SaveStatus::Saved(path))
    }

    /// Bind the document to `path` and save it there.
    ///
    /// `path` gets the `.md` extension when it has none. Returns the path
    /// actually written.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Write`] if the file cannot be written; the
    /// previous file path is restored.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf, DocumentError> {
        let target = with_default_extension(path);
        let previous = self.file_path.replace(target.clone());
        match self.save() {
            Ok(_) => Ok(target),
            Err(err) => {
                self.file_path = previous;
                Err(err)
            }
        }
    }
}

/// Append [`DEFAULT_EXTENSION`] to a path that has no extension.
pub fn with_default_extension(path: &Path) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(DEFAULT_EXTENSION)
    }
}

fn read_text(path: &Path) -> Result<String, DocumentError> {
    let bytes = fs::read(path).map_err(|err| DocumentError::read(path, err))?;
    String::from_utf8(bytes).map_err(|err| {
        DocumentError::read(path, io::Error::new(io::ErrorKind::InvalidData, err))
    })
}
