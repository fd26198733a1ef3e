//! Manuscript parsing.
//!
//! A manuscript is plain text made of blocks separated by a blank line.
//! A block of the form `{-Name-}` starts a new section; every other block
//! is a paragraph of the current section. Paragraphs that appear before
//! the first marker belong to the `summary` section.

use crate::error::ManuscriptError;
use regex::Regex;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Name of the implicit section collecting text before the first marker.
pub const SUMMARY_SECTION: &str = "summary";

/// Blocks shorter than this many characters are treated as noise.
const MIN_BLOCK_CHARS: usize = 3;

/// Regex matching a section marker like `{-Chapter One-}`.
static SECTION_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\{-(.+)-\}$").expect("Invalid SECTION_MARKER_REGEX"));

/// A named group of paragraphs in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub paragraphs: Vec<String>,
}

/// Ordered mapping from section name to its paragraphs.
///
/// Sections keep the order in which they were first encountered. The
/// `summary` section is always present and always first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedManuscript {
    sections: Vec<Section>,
}

impl Default for ParsedManuscript {
    fn default() -> Self {
        Self {
            sections: vec![Section {
                name: SUMMARY_SECTION.to_string(),
                paragraphs: Vec::new(),
            }],
        }
    }
}

impl ParsedManuscript {
    /// Appends a paragraph to `section`, creating the section if needed.
    fn push(&mut self, section: &str, paragraph: String) {
        match self.sections.iter_mut().find(|s| s.name == section) {
            Some(existing) => existing.paragraphs.push(paragraph),
            None => self.sections.push(Section {
                name: section.to_string(),
                paragraphs: vec![paragraph],
            }),
        }
    }

    /// All sections in order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Section names in order.
    pub fn section_names(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.name.as_str()).collect()
    }

    /// Paragraphs of the named section.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.sections
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.paragraphs.as_slice())
    }

    /// Number of sections, including `summary`.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false; `summary` is always present.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of paragraphs across all sections.
    pub fn paragraph_count(&self) -> usize {
        self.sections.iter().map(|s| s.paragraphs.len()).sum()
    }
}

impl Serialize for ParsedManuscript {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &section.paragraphs)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParsedManuscript {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ManuscriptVisitor;

        impl<'de> Visitor<'de> for ManuscriptVisitor {
            type Value = ParsedManuscript;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of section names to paragraph lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut manuscript = ParsedManuscript::default();
                while let Some((name, paragraphs)) =
                    access.next_entry::<String, Vec<String>>()?
                {
                    match manuscript.sections.iter_mut().find(|s| s.name == name) {
                        Some(existing) => existing.paragraphs.extend(paragraphs),
                        None => manuscript.sections.push(Section { name, paragraphs }),
                    }
                }
                Ok(manuscript)
            }
        }

        deserializer.deserialize_map(ManuscriptVisitor)
    }
}

/// Parses manuscript text into sections.
pub fn parse_manuscript(text: &str) -> ParsedManuscript {
    let normalized = text.replace("\r\n", "\n");
    let mut manuscript = ParsedManuscript::default();
    let mut current = SUMMARY_SECTION.to_string();

    let blocks = normalized
        .trim()
        .split("\n\n")
        .map(str::trim)
        .filter(|block| block.chars().count() >= MIN_BLOCK_CHARS);

    for block in blocks {
        if let Some(captures) = SECTION_MARKER_REGEX.captures(block) {
            current = captures[1].to_string();
        } else {
            manuscript.push(&current, block.to_string());
        }
    }

    manuscript
}

/// Reads and parses a manuscript file.
pub async fn load_manuscript(path: &Path) -> Result<ParsedManuscript, ManuscriptError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ManuscriptError::NotFound(path.to_path_buf())
        } else {
            ManuscriptError::Read {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    Ok(parse_manuscript(&content))
}
