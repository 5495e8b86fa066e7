#![deny(missing_docs)]

//! # Extension Handlers
//!
//! Hooks that let callers take over compilation of "any"-valued map entries
//! (typically `x-` vendor extensions). A handler either claims an entry and
//! returns its own encoded value, or declines so the generated constructor
//! falls back to storing the raw document.

use crate::context::Context;
use crate::error::Error;
use crate::node::Node;
use std::fmt;

/// An opaque value produced by an extension handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionValue {
    /// Identifies the encoding of `value`.
    pub type_url: String,
    /// The encoded payload.
    pub value: Vec<u8>,
}

/// Compiles extension entries.
pub trait ExtensionHandler: Send + Sync {
    /// Handles the entry `name` with contents `node`.
    ///
    /// Returns `None` to decline the entry.
    fn handle(&self, name: &str, node: &Node) -> Option<Result<ExtensionValue, String>>;
}

/// An ordered set of extension handlers; the first to claim an entry wins.
#[derive(Default)]
pub struct ExtensionRegistry {
    handlers: Vec<Box<dyn ExtensionHandler>>,
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl ExtensionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a handler.
    pub fn register(&mut self, handler: impl ExtensionHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    /// Returns `true` if no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    fn dispatch(&self, name: &str, node: &Node) -> Option<Result<ExtensionValue, String>> {
        self.handlers
            .iter()
            .find_map(|handler| handler.handle(name, node))
    }
}

/// Offers the entry `name` to the handlers visible from `context`.
///
/// Returns `None` if no handler claimed it.
pub fn call_extension(
    context: &Context,
    node: &Node,
    name: &str,
) -> Option<Result<ExtensionValue, Error>> {
    let registry = context.extensions()?;
    let outcome = registry.dispatch(name, node)?;
    tracing::trace!(extension = name, ok = outcome.is_ok(), "extension handled");
    Some(outcome.map_err(|message| Error::new(context, message)))
}
