//! Immutable snapshot model of the device UI tree.

use std::collections::BTreeMap;
use std::time::Instant;

use thiserror::Error;
use uidriver_protocols::geometry::Rect;

// Canonical attribute keys. Nodes may carry arbitrary others.
pub const ATTR_TEXT: &str = "text";
pub const ATTR_ID: &str = "resource-id";
pub const ATTR_KEY: &str = "key";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_INDEX: &str = "index";
pub const ATTR_BOUNDS: &str = "bounds";
pub const ATTR_HASHCODE: &str = "hashcode";

/// Failed to parse a serialized UI tree.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("dom node is not an object")]
    NotAnObject,

    #[error("'{0}' field has an unexpected shape")]
    BadField(&'static str),

    #[error("attribute '{0}' is not a string")]
    NonStringAttribute(String),

    #[error("malformed bounds '{0}'")]
    MalformedBounds(String),
}

/// A node of the parsed UI tree: an attribute map, the pixel bounds parsed
/// from the `bounds` attribute, and the child nodes in declared order.
///
/// Nodes without bounds have no screen area and cannot be interacted with.
/// The tree is immutable once parsed; nodes are owned by their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiNode {
    attributes: BTreeMap<String, String>,
    bounds: Option<Rect>,
    children: Vec<UiNode>,
}

impl UiNode {
    /// Parse a node and its descendants from the
    /// `{"attributes": {..}, "children": [..]}` wire shape.
    pub fn from_value(dom: &serde_json::Value) -> Result<Self, DomError> {
        let object = dom.as_object().ok_or(DomError::NotAnObject)?;
        let mut attributes = BTreeMap::new();
        if let Some(attrs) = object.get("attributes") {
            let map = attrs.as_object().ok_or(DomError::BadField("attributes"))?;
            for (key, value) in map {
                let text = value
                    .as_str()
                    .ok_or_else(|| DomError::NonStringAttribute(key.clone()))?;
                attributes.insert(key.clone(), text.to_string());
            }
        }
        let bounds = match attributes.get(ATTR_BOUNDS) {
            Some(raw) => Some(parse_bounds(raw)?),
            None => None,
        };
        let mut children = Vec::new();
        if let Some(kids) = object.get("children") {
            let list = kids.as_array().ok_or(DomError::BadField("children"))?;
            for child in list {
                children.push(UiNode::from_value(child)?);
            }
        }
        Ok(Self { attributes, bounds, children })
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attr_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attr(name).unwrap_or(default)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Screen area of this node, `None` when it carries no `bounds`.
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    pub fn children(&self) -> &[UiNode] {
        &self.children
    }

    /// Pre-order depth-first traversal: parent before children, children
    /// in declared order.
    pub fn iter(&self) -> Dfs<'_> {
        Dfs { stack: vec![self] }
    }

    /// Marshal this node and its descendants back into the wire shape.
    pub fn to_value(&self) -> serde_json::Value {
        let mut attrs = serde_json::Map::new();
        for (key, value) in &self.attributes {
            attrs.insert(key.clone(), serde_json::Value::String(value.clone()));
        }
        let children: Vec<serde_json::Value> = self.children.iter().map(UiNode::to_value).collect();
        serde_json::json!({ "attributes": attrs, "children": children })
    }
}

/// Pre-order DFS iterator over a node tree.
pub struct Dfs<'a> {
    stack: Vec<&'a UiNode>,
}

impl<'a> Iterator for Dfs<'a> {
    type Item = &'a UiNode;

    fn next(&mut self) -> Option<&'a UiNode> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A parsed UI tree at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: UiNode,
    acquired_at: Instant,
}

impl Snapshot {
    pub fn new(root: UiNode) -> Self {
        Self { root, acquired_at: Instant::now() }
    }

    pub fn from_value(dom: &serde_json::Value) -> Result<Self, DomError> {
        Ok(Self::new(UiNode::from_value(dom)?))
    }

    pub fn root(&self) -> &UiNode {
        &self.root
    }

    pub fn acquired_at(&self) -> Instant {
        self.acquired_at
    }

    /// Structural identity over attributes and children, ignoring the
    /// acquisition time. Two identical consecutive snapshots are the
    /// "frozen" signal of scroll-search; comparing structure rather than
    /// serialized bytes keeps the signal immune to key-order churn.
    pub fn same_content(&self, other: &Snapshot) -> bool {
        self.root == other.root
    }
}

/// Parse the `"[l,t][r,b]"` bounds notation. Accepts negative coordinates;
/// any separator characters between the numbers are tolerated.
pub(crate) fn parse_bounds(raw: &str) -> Result<Rect, DomError> {
    let mut numbers = [0i32; 4];
    let mut count = 0usize;
    let mut current: Option<i64> = None;
    let mut negative = false;
    let malformed = || DomError::MalformedBounds(raw.to_string());
    for ch in raw.chars() {
        match ch {
            '-' if current.is_none() => negative = true,
            '0'..='9' => {
                let digit = i64::from(ch as u8 - b'0');
                current = Some(current.unwrap_or(0) * 10 + digit);
            }
            _ => {
                if let Some(value) = current.take() {
                    if count >= 4 {
                        return Err(malformed());
                    }
                    numbers[count] = (if negative { -value } else { value }) as i32;
                    count += 1;
                    negative = false;
                }
            }
        }
    }
    if let Some(value) = current.take() {
        if count >= 4 {
            return Err(malformed());
        }
        numbers[count] = (if negative { -value } else { value }) as i32;
        count += 1;
    }
    if count != 4 {
        return Err(malformed());
    }
    let rect = Rect::new(numbers[0], numbers[1], numbers[2], numbers[3]);
    if rect.left > rect.right || rect.top > rect.bottom {
        return Err(malformed());
    }
    Ok(rect)
}

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
