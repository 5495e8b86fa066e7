#![deny(missing_docs)]

//! # Pattern Allocator
//!
//! Hands out one identifier per distinct key pattern for the duration of a
//! generation pass, so that identical patterns used by unrelated types share a
//! single compiled `static` in the emitted unit.
//!
//! A pattern that does not start with `^` and contains a `{...}` template capture
//! is generalized first: the capture is replaced with `.*`, so `/{id}` and `/{name}`
//! collapse to one entry. A few very common patterns can be inlined as plain
//! string tests instead of being compiled at all.

use crate::naming::pattern_ident;
use once_cell::sync::Lazy;
use proc_macro2::{Ident, TokenStream};
use quote::quote;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};

static SUBPATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^.*(\{.*\}).*$").expect("subpattern regex is valid"));

/// The prefix of allocated pattern identifiers.
pub const PATTERN_PREFIX: &str = "PATTERN";

/// A pattern that can be emitted as a direct test on the key variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecialCase {
    /// `^x-`
    ExtensionPrefix,
    /// `^/`
    PathPrefix,
    /// `^`
    Anything,
}

impl SpecialCase {
    fn for_pattern(pattern: &str) -> Option<Self> {
        match pattern {
            "^x-" => Some(SpecialCase::ExtensionPrefix),
            "^/" => Some(SpecialCase::PathPrefix),
            "^" => Some(SpecialCase::Anything),
            _ => None,
        }
    }

    fn expression(self, variable: &Ident) -> TokenStream {
        match self {
            SpecialCase::ExtensionPrefix => quote! { #variable.starts_with("x-") },
            SpecialCase::PathPrefix => quote! { #variable.starts_with('/') },
            SpecialCase::Anything => quote! { true },
        }
    }
}

/// Deduplicating allocator of pattern identifiers, scoped to one generation pass.
#[derive(Debug, Clone)]
pub struct PatternAllocator {
    prefix: String,
    values: HashMap<String, usize>,
    last: usize,
}

impl Default for PatternAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternAllocator {
    /// Creates an empty allocator.
    pub fn new() -> Self {
        Self::with_prefix(PATTERN_PREFIX)
    }

    /// Creates an empty allocator naming patterns `<prefix>0`, `<prefix>1`, ...
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            values: HashMap::new(),
            last: 0,
        }
    }

    /// Returns the identifier of `pattern`, allocating one on first use.
    pub fn identifier_for(&mut self, pattern: &str) -> String {
        let generalized = generalize(pattern);
        self.variable_name(&generalized)
    }

    /// Returns a direct boolean test of `variable` if `pattern` is one of the
    /// inlinable special cases.
    pub fn inline_expression(&self, pattern: &str, variable: &Ident) -> Option<TokenStream> {
        SpecialCase::for_pattern(pattern).map(|case| case.expression(variable))
    }

    /// Number of distinct patterns allocated so far.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was allocated.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Allocated patterns keyed (and therefore ordered) by identifier.
    pub fn names(&self) -> BTreeMap<String, String> {
        self.values
            .iter()
            .map(|(value, num)| (pattern_ident(&self.prefix, *num), value.clone()))
            .collect()
    }

    fn variable_name(&mut self, value: &str) -> String {
        let num = match self.values.get(value) {
            Some(num) => *num,
            None => {
                let num = self.last;
                self.last += 1;
                self.values.insert(value.to_string(), num);
                tracing::trace!(pattern = value, num, "allocated key pattern");
                num
            }
        };
        pattern_ident(&self.prefix, num)
    }
}

/// Replaces a `{...}` template capture with `.*` in unanchored patterns.
fn generalize(pattern: &str) -> String {
    if pattern.starts_with('^') {
        return pattern.to_string();
    }
    match SUBPATTERN
        .captures(pattern)
        .and_then(|captures| captures.get(1))
    {
        Some(capture) => pattern.replace(capture.as_str(), ".*"),
        None => pattern.to_string(),
    }
}
