//! Clean-up of aggregated MQSC documents.

use mqsc_config::WhitespaceMode;
use regex::Regex;

/// Strips constructs that `runmqsc` rejects from an aggregated document.
///
/// Rules run in a fixed order:
/// 1. continued comments (`*` up to a trailing `+` and its line break)
/// 2. tab characters
/// 3. blank lines
/// 4. whitespace runs
#[derive(Debug, Clone)]
pub struct Normalizer {
    mode: WhitespaceMode,
    continued_comment: Regex,
    blank_lines: Regex,
    inline_whitespace: Regex,
    any_whitespace: Regex,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(WhitespaceMode::default())
    }
}

impl Normalizer {
    pub fn new(mode: WhitespaceMode) -> Self {
        Self {
            mode,
            // Carriage returns and tabs may sit between the `+` and the line feed.
            continued_comment: Regex::new(r"\*[^\r\n]*\+[\t\r]*\n").unwrap(),
            blank_lines: Regex::new(r"(\r?\n)\s*\r?\n").unwrap(),
            inline_whitespace: Regex::new(r"[^\S\r\n]+").unwrap(),
            any_whitespace: Regex::new(r"\s+").unwrap(),
        }
    }

    pub fn mode(&self) -> WhitespaceMode {
        self.mode
    }

    pub fn normalize(&self, text: &str) -> String {
        let text = self.continued_comment.replace_all(text, "");
        let text = text.replace('\t', "");
        let text = self.blank_lines.replace_all(&text, "$1");

        let whitespace = match self.mode {
            WhitespaceMode::PreserveLines => &self.inline_whitespace,
            WhitespaceMode::Flatten => &self.any_whitespace,
        };
        whitespace.replace_all(&text, " ").into_owned()
    }
}
