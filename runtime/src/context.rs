#![deny(missing_docs)]

//! # Diagnostic Context
//!
//! A chain of names recording where a generated constructor is in the document,
//! used to build the display path of errors. Extension handlers registered on the
//! root context are inherited by every descendant.

use crate::extension::ExtensionRegistry;

/// The location of a constructor call inside a document.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    name: String,
    parent: Option<&'a Context<'a>>,
    extensions: Option<&'a ExtensionRegistry>,
}

impl<'a> Context<'a> {
    /// Creates a context named `name` below `parent`.
    pub fn new(name: impl Into<String>, parent: Option<&'a Context<'a>>) -> Self {
        Self {
            name: name.into(),
            parent,
            extensions: parent.and_then(|p| p.extensions),
        }
    }

    /// Creates a root context that makes `extensions` available to all descendants.
    pub fn with_extensions(name: impl Into<String>, extensions: &'a ExtensionRegistry) -> Self {
        Self {
            name: name.into(),
            parent: None,
            extensions: Some(extensions),
        }
    }

    /// The name of this context, without its ancestors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The extension handlers visible from this context.
    pub fn extensions(&self) -> Option<&'a ExtensionRegistry> {
        self.extensions
    }

    /// The dotted path from the root to this context.
    pub fn description(&self) -> String {
        match self.parent {
            Some(parent) => format!("{}.{}", parent.description(), self.name),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_walks_parents() {
        let root = Context::new("$root", None);
        let paths = Context::new("paths", Some(&root));
        let item = Context::new("/pets", Some(&paths));
        assert_eq!(item.description(), "$root.paths./pets");
        assert_eq!(item.name(), "/pets");
    }

    #[test]
    fn test_extensions_are_inherited() {
        let registry = ExtensionRegistry::new();
        let root = Context::with_extensions("$root", &registry);
        let child = Context::new("info", Some(&root));
        let grandchild = Context::new("x-logo", Some(&child));
        assert!(grandchild.extensions().is_some());
        assert!(Context::new("$root", None).extensions().is_none());
    }
}
