//! Key-path insertion
//!
//! A key path is an ordered list of field and index segments, e.g.
//! `["items", "0", "productId"]`. Inserting it into a tree creates one
//! grouping node per non-final segment (reusing a sibling that already has
//! that target) and always appends a fresh leaf for the final segment, so two
//! messages for the same field stay side by side.

use thiserror::Error;

use crate::node::{Cause, ErrorNode};

/// Malformed key paths
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyPathError {
    #[error("key path is empty")]
    EmptyPath,

    #[error("key path segment {index} is empty")]
    EmptySegment { index: usize },
}

/// Insert `message` at `keys`, leaving `root` unchanged on a malformed path
pub fn insert<S: AsRef<str>>(root: &mut ErrorNode, keys: &[S], message: impl Into<String>) {
    let _ = try_insert(root, keys, message);
}

/// Insert `message` at `keys`
///
/// Segments are checked before the tree is touched, so an error leaves
/// `root` exactly as it was.
///
/// # Errors
///
/// `EmptyPath` for an empty key list, `EmptySegment` for an empty key.
pub fn try_insert<S: AsRef<str>>(
    root: &mut ErrorNode,
    keys: &[S],
    message: impl Into<String>,
) -> Result<(), KeyPathError> {
    let (last, parents) = keys.split_last().ok_or(KeyPathError::EmptyPath)?;
    if let Some(index) = keys.iter().position(|key| key.as_ref().is_empty()) {
        return Err(KeyPathError::EmptySegment { index });
    }

    insert_under(root, parents, last.as_ref(), message.into());
    Ok(())
}

/// Walk `parents` below `node`, reusing the first child node with each target
fn insert_under<S: AsRef<str>>(
    node: &mut ErrorNode,
    parents: &[S],
    last: &str,
    message: String,
) {
    let Some((key, rest)) = parents.split_first() else {
        node.children
            .push(Cause::Node(ErrorNode::leaf(last, message)));
        return;
    };
    let key = key.as_ref();

    let existing = node.children.iter_mut().find_map(|child| match child {
        Cause::Node(n) if n.target == key => Some(n),
        _ => None,
    });
    match existing {
        Some(child) => insert_under(child, rest, last, message),
        None => {
            let mut child = ErrorNode::grouping(key);
            insert_under(&mut child, rest, last, message);
            node.children.push(Cause::Node(child));
        }
    }
}

/// One message addressed by a key path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedItem {
    pub keys: Vec<String>,
    pub message: String,
}

impl CombinedItem {
    pub fn new<S: Into<String>>(
        keys: impl IntoIterator<Item = S>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    /// Split a dotted, bracketed path such as `items[1].id`
    ///
    /// ```
    /// use errtree_core::CombinedItem;
    ///
    /// let item = CombinedItem::parse("items[1].id", "required");
    /// assert_eq!(item.keys, vec!["items", "1", "id"]);
    /// ```
    pub fn parse(path: &str, message: impl Into<String>) -> Self {
        let mut keys = Vec::new();
        for part in path.split('.') {
            let mut rest = part;
            match rest.find('[') {
                Some(open) => {
                    keys.push(rest[..open].to_string());
                    rest = &rest[open..];
                }
                None => {
                    keys.push(rest.to_string());
                    continue;
                }
            }
            while let Some(inner) = rest.strip_prefix('[') {
                match inner.find(']') {
                    Some(close) => {
                        keys.push(inner[..close].to_string());
                        rest = &inner[close + 1..];
                    }
                    None => {
                        keys.push(inner.to_string());
                        rest = "";
                    }
                }
            }
        }
        // `[0].id` at the root has no name before the bracket
        if keys.first().is_some_and(|k| k.is_empty()) && path.starts_with('[') {
            keys.remove(0);
        }
        Self {
            keys,
            message: message.into(),
        }
    }
}

/// A root error plus flat key-path messages, expanded on demand
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedError {
    pub code: u32,
    pub message: String,
    pub target: String,
    pub items: Vec<CombinedItem>,
}

impl CombinedError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_item(mut self, item: CombinedItem) -> Self {
        self.items.push(item);
        self
    }

    /// Add a message under `keys`
    pub fn add<S: Into<String>>(
        mut self,
        keys: impl IntoIterator<Item = S>,
        message: impl Into<String>,
    ) -> Self {
        self.items.push(CombinedItem::new(keys, message));
        self
    }

    /// Build the tree, inserting every item in order
    pub fn to_error(&self) -> ErrorNode {
        let mut root = ErrorNode::new()
            .with_code(self.code)
            .with_message(self.message.clone())
            .with_target(self.target.clone());
        for item in &self.items {
            insert(&mut root, &item.keys, item.message.clone());
        }
        root
    }
}

impl From<CombinedError> for ErrorNode {
    fn from(combined: CombinedError) -> Self {
        combined.to_error()
    }
}
