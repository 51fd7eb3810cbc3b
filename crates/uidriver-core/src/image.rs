//! Detached widget handles, re-resolvable against newer snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uidriver_protocols::geometry::Rect;
use uidriver_protocols::value::{ParcelError, Parcelable, TypeId};

use crate::dom::{self, UiNode, ATTR_BOUNDS, ATTR_HASHCODE};
use crate::selector::Selector;

/// A detached snapshot of one node's attributes plus the selector that
/// produced it.
///
/// Created by a find, refreshed against the current snapshot by every
/// operation, and invalidated when that refresh fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetImage {
    attributes: BTreeMap<String, String>,
    selector: Selector,
}

impl WidgetImage {
    /// Capture `node` as located by `selector`.
    pub fn from_node(node: &UiNode, selector: &Selector) -> Self {
        Self {
            attributes: node.attributes().clone(),
            selector: selector.clone(),
        }
    }

    /// Captured attribute value, or `default` when the node had none.
    pub fn attribute(&self, name: &str, default: &str) -> String {
        self.attributes
            .get(name)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Captured hashcode, empty when the node had none.
    pub fn hash_code(&self) -> &str {
        self.attributes.get(ATTR_HASHCODE).map(String::as_str).unwrap_or("")
    }

    /// Description of the selection that produced this image.
    pub fn selection_desc(&self) -> String {
        self.selector.describe()
    }

    /// The selector that produced this image, used to re-resolve it when
    /// no hashcode was captured.
    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    /// Captured bounds, `None` when the node carried no displayable area.
    pub fn bounds(&self) -> Option<Rect> {
        self.attributes
            .get(ATTR_BOUNDS)
            .and_then(|raw| dom::parse_bounds(raw).ok())
    }

    /// Replace the captured attributes with the node's fresh ones.
    pub(crate) fn refresh_from(&mut self, node: &UiNode) {
        self.attributes = node.attributes().clone();
    }
}

impl Parcelable for WidgetImage {
    const TYPE_ID: TypeId = TypeId::Widget;

    fn write_into_parcel(&self) -> Result<serde_json::Value, ParcelError> {
        Ok(serde_json::to_value(self)?)
    }

    fn read_from_parcel(data: &serde_json::Value) -> Result<Self, ParcelError> {
        Ok(serde_json::from_value(data.clone())?)
    }
}
