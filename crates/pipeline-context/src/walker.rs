//! Depth-first traversal over a context tree, without recursion.
//!
//! The walk is pre-order: a container is yielded before its children. Array items
//! come in index order and dictionary entries in insertion order. Unless keys are
//! omitted, each dictionary entry contributes two items: a synthesized string
//! holding the key, then the value.
//!
//! State is an explicit stack of per-container cursors, so memory grows with tree
//! depth and never with the call stack. Each call to [`traverse`] starts a fresh
//! walk. The tree must be acyclic, which ownership already guarantees.
//!
//! # Example
//! ```
//! use pipeline_context::{traverse, ContextValue, DictionaryValue};
//!
//! let mut dict = DictionaryValue::new();
//! dict.insert("os", "linux");
//! let root = ContextValue::Dictionary(dict);
//!
//! assert_eq!(traverse(&root, false).count(), 3);
//! assert_eq!(traverse(&root, true).count(), 2);
//! ```

use std::borrow::Cow;
use std::iter::FusedIterator;

use crate::types::{ContextValue, DictionaryValue};

/// Start a depth-first walk at `root`. With `omit_keys`, dictionary keys are not yielded.
pub fn traverse(root: &ContextValue, omit_keys: bool) -> Traverse<'_> {
    Traverse {
        root: Some(root),
        stack: Vec::new(),
        omit_keys,
        depth: 0,
    }
}

/// Lazy pre-order iterator returned by [`traverse`].
///
/// Tree nodes are yielded borrowed; synthesized dictionary keys are yielded owned.
#[derive(Debug)]
pub struct Traverse<'a> {
    root: Option<&'a ContextValue>,
    stack: Vec<Frame<'a>>,
    omit_keys: bool,
    depth: usize,
}

impl Traverse<'_> {
    /// Depth of the most recently yielded item. The root is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Cursor over one container's children.
#[derive(Debug)]
enum Frame<'a> {
    Array {
        items: &'a [ContextValue],
        next: usize,
    },
    Dictionary {
        dict: &'a DictionaryValue,
        next: usize,
        /// The key at `next` was yielded and its value is due.
        value_pending: bool,
    },
}

impl<'a> Frame<'a> {
    fn for_container(value: &'a ContextValue) -> Option<Self> {
        match value {
            ContextValue::Array(array) => Some(Frame::Array {
                items: array.as_slice(),
                next: 0,
            }),
            ContextValue::Dictionary(dict) => Some(Frame::Dictionary {
                dict,
                next: 0,
                value_pending: false,
            }),
            ContextValue::String(_) => None,
        }
    }

    fn advance(&mut self, omit_keys: bool) -> Option<Cow<'a, ContextValue>> {
        match self {
            Frame::Array { items, next } => {
                let items: &'a [ContextValue] = *items;
                let item = items.get(*next)?;
                *next += 1;
                Some(Cow::Borrowed(item))
            }
            Frame::Dictionary {
                dict,
                next,
                value_pending,
            } => {
                let dict: &'a DictionaryValue = *dict;
                let (key, value) = dict.entry_at(*next)?;
                if *value_pending || omit_keys {
                    *value_pending = false;
                    *next += 1;
                    Some(Cow::Borrowed(value))
                } else {
                    *value_pending = true;
                    Some(Cow::Owned(ContextValue::string(key)))
                }
            }
        }
    }
}

impl<'a> Iterator for Traverse<'a> {
    type Item = Cow<'a, ContextValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(root) = self.root.take() {
            self.depth = 0;
            self.stack.extend(Frame::for_container(root));
            return Some(Cow::Borrowed(root));
        }

        while let Some(frame) = self.stack.last_mut() {
            match frame.advance(self.omit_keys) {
                Some(item) => {
                    self.depth = self.stack.len();
                    if let Cow::Borrowed(node) = &item {
                        self.stack.extend(Frame::for_container(*node));
                    }
                    return Some(item);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

impl FusedIterator for Traverse<'_> {}

/// Shape summary of a context tree, gathered in a single walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    /// Tree nodes, root included.
    pub nodes: usize,
    /// Dictionary keys.
    pub keys: usize,
    /// Deepest node depth; a lone root is 0.
    pub max_depth: usize,
}

impl ContextValue {
    /// Walk this tree depth-first, keys included.
    pub fn traverse(&self) -> Traverse<'_> {
        traverse(self, false)
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        let mut walk = traverse(self, false);
        while let Some(item) = walk.next() {
            match item {
                Cow::Owned(_) => stats.keys += 1,
                Cow::Borrowed(_) => {
                    stats.nodes += 1;
                    stats.max_depth = stats.max_depth.max(walk.depth());
                }
            }
        }
        stats
    }

    /// Deepest chain of nested containers. A string is 0, an empty array is 1.
    pub fn nesting_depth(&self) -> usize {
        let mut deepest = 0;
        let mut walk = traverse(self, true);
        while let Some(item) = walk.next() {
            if item.is_container() {
                deepest = deepest.max(walk.depth() + 1);
            }
        }
        deepest
    }
}
