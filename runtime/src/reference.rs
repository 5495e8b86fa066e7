#![deny(missing_docs)]

//! # Reference Reading
//!
//! Reads the node a `$ref` points at. A reference has the shape
//! `document#/json/pointer`: the document part is resolved relative to the
//! directory of the root document (an empty document part means the root itself)
//! and the pointer is walked through mappings (by key) and sequences (by index).
//!
//! Parsed documents are cached by path for the life of the process. Remote
//! documents are never fetched.
//!
//! A reference being resolved is marked active on the current thread until its
//! [`ReferenceGuard`] is dropped; entering it again before that is a cycle.

use crate::error::Error;
use crate::node::{unmarshal, Node};
use once_cell::sync::Lazy;
use percent_encoding::percent_decode_str;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use url::Url;

static DOCUMENTS: Lazy<Mutex<HashMap<PathBuf, Node>>> = Lazy::new(|| Mutex::new(HashMap::new()));

type ReferenceKey = (PathBuf, String);

thread_local! {
    static ACTIVE: RefCell<HashSet<ReferenceKey>> = RefCell::new(HashSet::new());
}

/// Keeps a reference marked as being resolved. Dropping it clears the mark.
#[must_use = "the reference is only marked while the guard is alive"]
#[derive(Debug)]
pub struct ReferenceGuard {
    key: ReferenceKey,
}

impl Drop for ReferenceGuard {
    fn drop(&mut self) {
        let _ = ACTIVE.try_with(|active| active.borrow_mut().remove(&self.key));
    }
}

/// Marks `reference` (relative to `root`) as being resolved on this thread.
///
/// Fails with `circular reference <reference>` if the same document and pointer
/// are already being resolved further up the call chain.
pub fn enter_reference(root: &str, reference: &str) -> Result<ReferenceGuard, Error> {
    let (document, fragment) = split_reference(reference);
    let key = (document_path(root, document)?, fragment.unwrap_or_default().to_string());
    let fresh = ACTIVE.with(|active| active.borrow_mut().insert(key.clone()));
    if !fresh {
        tracing::debug!(reference, "circular reference");
        return Err(Error::general(format!("circular reference {}", reference)));
    }
    Ok(ReferenceGuard { key })
}

fn split_reference(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once('#') {
        Some((document, fragment)) => (document, Some(fragment)),
        None => (reference, None),
    }
}

/// Reads the node referenced by `reference`, relative to the document at `root`.
pub fn read_info_for_ref(root: &str, reference: &str) -> Result<Option<Node>, Error> {
    let (document, fragment) = split_reference(reference);

    let path = document_path(root, document)?;
    let info = load_document(&path)?;

    let Some(fragment) = fragment else {
        return Ok(Some(info));
    };

    tracing::debug!(reference, path = %path.display(), "resolving reference");
    walk_pointer(&info, fragment)
        .cloned()
        .map(Some)
        .ok_or_else(|| Error::general(format!("could not resolve {}", reference)))
}

/// Makes `node` available as the document at `path` without touching the filesystem.
pub fn cache_document(path: impl Into<PathBuf>, node: Node) {
    documents().insert(path.into(), node);
}

/// Forgets every cached document.
pub fn clear_document_cache() {
    documents().clear();
}

fn documents() -> std::sync::MutexGuard<'static, HashMap<PathBuf, Node>> {
    // Poisoning leaves the map intact.
    DOCUMENTS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn document_path(root: &str, document: &str) -> Result<PathBuf, Error> {
    if document.is_empty() {
        return Ok(PathBuf::from(root));
    }
    if let Ok(url) = Url::parse(document) {
        if url.scheme() == "file" {
            return url
                .to_file_path()
                .map_err(|_| Error::general(format!("invalid file reference {}", document)));
        }
        if url.scheme().len() > 1 {
            return Err(Error::general(format!(
                "remote references are not supported: {}",
                document
            )));
        }
    }
    let base = Path::new(root).parent().unwrap_or_else(|| Path::new(""));
    Ok(base.join(document))
}

fn load_document(path: &Path) -> Result<Node, Error> {
    if let Some(node) = documents().get(path) {
        return Ok(node.clone());
    }
    let text = fs::read_to_string(path)
        .map_err(|e| Error::general(format!("could not read {}: {}", path.display(), e)))?;
    let node = unmarshal(&text)
        .ok_or_else(|| Error::general(format!("could not parse {}", path.display())))?;
    documents().insert(path.to_path_buf(), node.clone());
    Ok(node)
}

fn walk_pointer<'a>(node: &'a Node, pointer: &str) -> Option<&'a Node> {
    pointer
        .split('/')
        .skip(1)
        .map(decode_pointer_segment)
        .try_fold(node, |current, segment| match current {
            Node::Mapping(pairs) => pairs
                .iter()
                .find(|(k, _)| k.scalar_value() == Some(segment.as_str()))
                .map(|(_, v)| v),
            Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            Node::Scalar { .. } => None,
        })
}

/// Decodes a JSON Pointer segment (handles `~1`, `~0` and percent escapes).
fn decode_pointer_segment(segment: &str) -> String {
    let decoded = segment.replace("~1", "/").replace("~0", "~");
    percent_decode_str(&decoded).decode_utf8_lossy().into_owned()
}
