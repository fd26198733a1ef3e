//! Output artifacts.
//!
//! Every run produces four files next to the input manuscript:
//! - `<stem>_parsed.json`: the parsed sections before translation
//! - `<stem>_structured_book.json`: the translated [`Book`]
//! - `<stem>_translated.txt`: translated headings and paragraphs only
//! - `<stem>_full.txt`: original and translated text interleaved

use crate::book::Book;
use crate::error::OutputError;
use crate::manuscript::ParsedManuscript;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Paths of all output artifacts for one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub parsed_json: PathBuf,
    pub structured_book_json: PathBuf,
    pub translated_text: PathBuf,
    pub full_text: PathBuf,
}

impl OutputPaths {
    /// Derives output paths in `dir` from the input file's stem.
    pub fn new(dir: &Path, stem: &str) -> Self {
        Self {
            parsed_json: dir.join(format!("{}_parsed.json", stem)),
            structured_book_json: dir.join(format!("{}_structured_book.json", stem)),
            translated_text: dir.join(format!("{}_translated.txt", stem)),
            full_text: dir.join(format!("{}_full.txt", stem)),
        }
    }
}

fn save_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), OutputError> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the parsed sections, keeping section order.
pub fn save_parsed_json(manuscript: &ParsedManuscript, path: &Path) -> Result<(), OutputError> {
    save_json(manuscript, path)
}

/// Writes the translated book.
pub fn save_book_json(book: &Book, path: &Path) -> Result<(), OutputError> {
    save_json(book, path)
}

/// Writes the two text renderings side by side as the pass proceeds.
pub struct TextRenderer<W: Write> {
    translated: W,
    full: W,
}

impl TextRenderer<BufWriter<File>> {
    /// Creates (truncating) both text files.
    pub fn create(paths: &OutputPaths) -> Result<Self, OutputError> {
        let open = |path: &Path| {
            File::create(path)
                .map(BufWriter::new)
                .map_err(|source| OutputError::Write {
                    path: path.to_path_buf(),
                    source,
                })
        };

        Ok(Self::new(
            open(paths.translated_text.as_path())?,
            open(paths.full_text.as_path())?,
        ))
    }
}

impl<W: Write> TextRenderer<W> {
    pub fn new(translated: W, full: W) -> Self {
        Self { translated, full }
    }

    /// Writes a section heading; headings are upper-cased.
    pub fn heading(&mut self, original: &str, translated: &str) -> Result<(), OutputError> {
        let translated = translated.to_uppercase();
        write!(self.translated, "\n\n{}\n\n\n", translated)?;
        write!(self.full, "\n\n{}\n\n\n", original.to_uppercase())?;
        write!(self.full, "{}\n\n\n", translated)?;
        Ok(())
    }

    /// Writes one paragraph.
    pub fn paragraph(&mut self, original: &str, translated: &str) -> Result<(), OutputError> {
        write!(self.translated, ":\n{}\n", translated)?;
        write!(self.full, "(Original):\n\n{}\n\n\n", original)?;
        write!(self.full, "(Translated):\n\n{}\n\n\n", translated)?;
        Ok(())
    }

    /// Flushes both outputs and hands back the writers.
    pub fn finish(mut self) -> Result<(W, W), OutputError> {
        self.translated.flush()?;
        self.full.flush()?;
        Ok((self.translated, self.full))
    }
}
