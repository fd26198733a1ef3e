//! Translated book model.
//!
//! The book is built append-only during the translation pass: a chapter
//! is started for each section, then its paragraphs are added in order.

use crate::error::BookError;
use serde::{Deserialize, Serialize};

/// A single paragraph with its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Source-language text.
    pub original: String,
    /// Translated text, or a failure marker.
    pub translated: String,
}

/// A chapter titled with its translated heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub paragraphs: Vec<Paragraph>,
}

/// The whole translated book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub title: String,
    pub content: Vec<Chapter>,
}

impl Book {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    /// Starts a new chapter; later paragraphs are added to it.
    pub fn add_chapter(&mut self, title: impl Into<String>) {
        self.content.push(Chapter {
            title: title.into(),
            paragraphs: Vec::new(),
        });
    }

    /// Appends a paragraph to the most recently started chapter.
    pub fn add_paragraph(
        &mut self,
        original: impl Into<String>,
        translated: impl Into<String>,
    ) -> Result<(), BookError> {
        let chapter = self.content.last_mut().ok_or(BookError::NoChapter)?;
        chapter.paragraphs.push(Paragraph {
            original: original.into(),
            translated: translated.into(),
        });
        Ok(())
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.content
    }

    pub fn chapter_count(&self) -> usize {
        self.content.len()
    }

    pub fn paragraph_count(&self) -> usize {
        self.content.iter().map(|c| c.paragraphs.len()).sum()
    }
}
