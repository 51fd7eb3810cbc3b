//! Attribute predicate algebra over snapshot nodes.

use serde::{Deserialize, Serialize};
use uidriver_protocols::value::{ParcelError, Parcelable, TypeId};

use crate::dom::{Snapshot, UiNode};

/// Comparison applied between a matcher value and a node attribute.
/// Comparisons are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MatchPattern {
    Eq = 0,
    Contains = 1,
    StartsWith = 2,
    EndsWith = 3,
}

impl MatchPattern {
    /// Pattern from its wire integer, as passed by By builders.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            0 => Some(MatchPattern::Eq),
            1 => Some(MatchPattern::Contains),
            2 => Some(MatchPattern::StartsWith),
            3 => Some(MatchPattern::EndsWith),
            _ => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            MatchPattern::Eq => "=",
            MatchPattern::Contains => "*=",
            MatchPattern::StartsWith => "^=",
            MatchPattern::EndsWith => "$=",
        }
    }
}

/// A single attribute predicate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttrMatcher {
    key: String,
    value: String,
    pattern: MatchPattern,
}

impl AttrMatcher {
    pub fn new(key: impl Into<String>, value: impl Into<String>, pattern: MatchPattern) -> Self {
        Self { key: key.into(), value: value.into(), pattern }
    }

    /// Whether `node` satisfies this predicate. A missing attribute never
    /// matches.
    pub fn matches(&self, node: &UiNode) -> bool {
        match node.attr(&self.key) {
            Some(actual) => match self.pattern {
                MatchPattern::Eq => actual == self.value,
                MatchPattern::Contains => actual.contains(&self.value),
                MatchPattern::StartsWith => actual.starts_with(&self.value),
                MatchPattern::EndsWith => actual.ends_with(&self.value),
            },
            None => false,
        }
    }

    fn describe(&self) -> String {
        format!("[{}{}{}]", self.key, self.pattern.symbol(), self.value)
    }
}

/// Ordered, conjunctive list of attribute matchers identifying widgets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    matchers: Vec<AttrMatcher>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a matcher to the conjunction.
    pub fn add_matcher(&mut self, matcher: AttrMatcher) {
        self.matchers.push(matcher);
    }

    pub fn matchers(&self) -> &[AttrMatcher] {
        &self.matchers
    }

    /// Stable human-readable encoding of the matcher list, used in error
    /// messages and as widget-image provenance.
    pub fn describe(&self) -> String {
        if self.matchers.is_empty() {
            return "[any]".to_string();
        }
        self.matchers.iter().map(AttrMatcher::describe).collect()
    }

    /// Whether every matcher matches one of the node's attributes.
    pub fn satisfied_by(&self, node: &UiNode) -> bool {
        self.matchers.iter().all(|matcher| matcher.matches(node))
    }

    /// All satisfying nodes of the snapshot, in pre-order DFS order.
    pub fn find_all<'a>(&self, snapshot: &'a Snapshot) -> Vec<&'a UiNode> {
        snapshot
            .root()
            .iter()
            .filter(|node| self.satisfied_by(node))
            .collect()
    }
}

impl Parcelable for Selector {
    const TYPE_ID: TypeId = TypeId::By;

    fn write_into_parcel(&self) -> Result<serde_json::Value, ParcelError> {
        Ok(serde_json::to_value(self)?)
    }

    fn read_from_parcel(data: &serde_json::Value) -> Result<Self, ParcelError> {
        Ok(serde_json::from_value(data.clone())?)
    }
}

#[cfg(test)]
#[path = "selector_tests.rs"]
mod tests;
