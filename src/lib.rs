//! Folio - book manuscript translator.
//!
//! This library provides functionality for:
//! - Parsing plain-text manuscripts into named sections and paragraphs
//! - Translating each unit through the Gemini API with bounded retries
//! - Writing the translated book as JSON and as plain-text renderings

pub mod book;
pub mod config;
pub mod console;
pub mod error;
pub mod manuscript;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod translator;
pub mod utils;

// Re-export commonly used types
pub use book::{Book, Chapter, Paragraph};
pub use config::Config;
pub use console::Console;
pub use error::{BookError, ConfigError, ManuscriptError, OutputError, TranslationError};
pub use manuscript::{ParsedManuscript, Section, load_manuscript, parse_manuscript};
pub use pipeline::{PassReport, PassSettings, save_parsed, translate_manuscript, translate_to_files};
pub use retry::{Outcome, RetryPolicy, retry_or};
pub use translator::{GeminiClient, TranslationBackend, Translator, check_api_key};
