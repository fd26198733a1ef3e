//! Utility functions for common operations.

use std::path::Path;
use std::time::Duration;

/// Capitalises the first letter of every word and lower-cases the rest.
///
/// A word starts at any alphabetic character that follows a
/// non-alphabetic one, so `"o'neil"` becomes `"O'Neil"`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_alphabetic = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_alphabetic {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_alphabetic = true;
        } else {
            result.push(c);
            previous_alphabetic = false;
        }
    }

    result
}

/// File name of `path` without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "book".to_string())
}

/// Title of the translated book derived from the input file stem.
pub fn book_title(stem: &str) -> String {
    format!("Translated {}", title_case(&stem.replace('_', " ")))
}

/// Applies rate limiting delay.
pub async fn rate_limit(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("the old man"), "The Old Man");
        assert_eq!(title_case("SHOUTING text"), "Shouting Text");
        assert_eq!(title_case("o'neil 2nd"), "O'Neil 2Nd");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_book_title() {
        assert_eq!(book_title("my_first_book"), "Translated My First Book");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Path::new("/tmp/novel.txt")), "novel");
        assert_eq!(file_stem(Path::new("draft")), "draft");
        assert_eq!(file_stem(Path::new("/")), "book");
    }

    #[tokio::test]
    async fn test_rate_limit_zero_returns() {
        rate_limit(Duration::ZERO).await;
    }
}
