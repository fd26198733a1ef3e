//! The translation pass.
//!
//! Walks the parsed manuscript one section and one paragraph at a time,
//! translating each unit with bounded retries, writing the text
//! renderings as it goes, and building the [`Book`].

use crate::book::Book;
use crate::console::Console;
use crate::error::Result;
use crate::manuscript::ParsedManuscript;
use crate::output::{OutputPaths, TextRenderer, save_book_json, save_parsed_json};
use crate::retry::{PARAGRAPH_SENTINEL, RetryPolicy, heading_sentinel, retry_or};
use crate::translator::{TranslationBackend, Translator};
use crate::utils::rate_limit;
use anyhow::Context;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Timing settings for one pass.
#[derive(Debug, Clone, Copy)]
pub struct PassSettings {
    /// Retry policy for each heading and paragraph.
    pub retry: RetryPolicy,
    /// Pause after each paragraph.
    pub throttle: Duration,
}

/// Result of a completed pass.
#[derive(Debug)]
pub struct PassReport {
    pub book: Book,
    /// Headings replaced by a failure marker.
    pub failed_headings: usize,
    /// Paragraphs replaced by a failure marker.
    pub failed_paragraphs: usize,
}

impl PassReport {
    pub fn has_failures(&self) -> bool {
        self.failed_headings + self.failed_paragraphs > 0
    }
}

/// Translates every section of `manuscript`.
///
/// Translation failures never abort the pass; they are replaced by
/// failure markers. Errors writing the text renderings do abort it.
pub async fn translate_manuscript<B, W>(
    manuscript: &ParsedManuscript,
    translator: &Translator<B>,
    renderer: &mut TextRenderer<W>,
    book_title: &str,
    settings: PassSettings,
    console: &Console,
) -> Result<PassReport>
where
    B: TranslationBackend,
    W: Write,
{
    let mut report = PassReport {
        book: Book::new(book_title),
        failed_headings: 0,
        failed_paragraphs: 0,
    };

    for section in manuscript.sections() {
        let name = section.name.as_str();
        console.step(&format!("Translating heading '{}'...", name));

        let heading = retry_or(
            settings.retry,
            &format!("heading '{}'", name),
            heading_sentinel(name),
            console,
            || translator.translate_heading(name),
        )
        .await;
        if !heading.is_success() {
            report.failed_headings += 1;
        }
        let heading = heading.into_inner();

        console.info(&format!(
            "Original: '{}' {} Translated: '{}'",
            name,
            console.muted("->"),
            heading
        ));

        renderer
            .heading(name, &heading)
            .with_context(|| format!("Failed to write heading '{}'", name))?;
        report.book.add_chapter(heading);

        let total = section.paragraphs.len();
        for (i, block) in section.paragraphs.iter().enumerate() {
            let number = i + 1;
            console.info(&format!(
                "{} Translating...",
                console.paragraph_info(name, number, total)
            ));

            let translation = retry_or(
                settings.retry,
                &format!("paragraph {} of '{}'", number, name),
                PARAGRAPH_SENTINEL.to_string(),
                console,
                || translator.translate_paragraph(block),
            )
            .await;
            if !translation.is_success() {
                report.failed_paragraphs += 1;
            }
            let translation = translation.into_inner();

            report.book.add_paragraph(block.as_str(), translation.as_str())?;
            renderer
                .paragraph(block, &translation)
                .with_context(|| format!("Failed to write paragraph {} of '{}'", number, name))?;

            rate_limit(settings.throttle).await;
        }
    }

    Ok(report)
}

/// Writes the parsed sections; a failure is reported and otherwise ignored.
///
/// Returns whether the file was written.
pub fn save_parsed(manuscript: &ParsedManuscript, path: &Path, console: &Console) -> bool {
    match save_parsed_json(manuscript, path) {
        Ok(()) => {
            console.success(&format!("Data saved to {}", path.display()));
            true
        }
        Err(e) => {
            console.error(&format!("Error saving parsed sections: {}", e));
            false
        }
    }
}

/// Runs the pass with both text renderings open, then writes the book JSON.
///
/// A text-file error aborts the pass and the book JSON is not written.
/// A failure writing the book JSON is reported and otherwise ignored.
pub async fn translate_to_files<B>(
    manuscript: &ParsedManuscript,
    translator: &Translator<B>,
    paths: &OutputPaths,
    book_title: &str,
    settings: PassSettings,
    console: &Console,
) -> Result<PassReport>
where
    B: TranslationBackend,
{
    let mut renderer = TextRenderer::create(paths)?;
    let report =
        translate_manuscript(manuscript, translator, &mut renderer, book_title, settings, console)
            .await?;
    renderer.finish()?;

    console.success(&format!(
        "Translation complete! Output saved to '{}' and '{}'.",
        paths.translated_text.display(),
        paths.full_text.display()
    ));

    match save_book_json(&report.book, &paths.structured_book_json) {
        Ok(()) => console.success(&format!(
            "Full book JSON saved to {}",
            paths.structured_book_json.display()
        )),
        Err(e) => console.error(&format!("Error saving full book JSON: {}", e)),
    }

    Ok(report)
}
