#![deny(missing_docs)]

//! # Key Patterns
//!
//! Regular expressions used by generated code to recognize wildcard keys.
//! Patterns are declared as `static` items and compiled on first use.

use once_cell::sync::OnceCell;
use regex::Regex;

/// A lazily compiled regular expression.
#[derive(Debug)]
pub struct Pattern {
    source: &'static str,
    compiled: OnceCell<Option<Regex>>,
}

impl Pattern {
    /// Declares a pattern; nothing is compiled until the first match.
    pub const fn new(source: &'static str) -> Self {
        Self {
            source,
            compiled: OnceCell::new(),
        }
    }

    /// The regular expression source.
    pub fn as_str(&self) -> &'static str {
        self.source
    }

    /// Tests `text` against the pattern. An invalid pattern matches nothing.
    pub fn is_match(&self, text: &str) -> bool {
        self.compiled
            .get_or_init(|| match Regex::new(self.source) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    tracing::warn!(pattern = self.source, error = %e, "invalid key pattern");
                    None
                }
            })
            .as_ref()
            .is_some_and(|regex| regex.is_match(text))
    }
}
