use super::*;
use crate::dom::ATTR_TEXT;
use serde_json::json;

fn snapshot() -> Snapshot {
    Snapshot::from_value(&json!({
        "attributes": {"bounds": "[0,0][100,100]", "text": "root"},
        "children": [
            {
                "attributes": {"bounds": "[0,0][50,50]", "text": "USB", "resource-id": "id4"},
                "children": [
                    {"attributes": {"bounds": "[0,0][20,20]", "text": "USB-inner"}, "children": []}
                ]
            },
            {
                "attributes": {"bounds": "[50,0][100,50]", "text": "WLAN"},
                "children": []
            }
        ]
    }))
    .unwrap()
}

fn selector_of(key: &str, value: &str, pattern: MatchPattern) -> Selector {
    let mut selector = Selector::new();
    selector.add_matcher(AttrMatcher::new(key, value, pattern));
    selector
}

#[test]
fn test_eq_matches_full_value() {
    let snap = snapshot();
    let found = selector_of(ATTR_TEXT, "USB", MatchPattern::Eq).find_all(&snap);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].attr(ATTR_TEXT), Some("USB"));
}

#[test]
fn test_substring_patterns() {
    let snap = snapshot();
    assert_eq!(
        selector_of(ATTR_TEXT, "USB", MatchPattern::Contains).find_all(&snap).len(),
        2
    );
    assert_eq!(
        selector_of(ATTR_TEXT, "USB", MatchPattern::StartsWith).find_all(&snap).len(),
        2
    );
    assert_eq!(
        selector_of(ATTR_TEXT, "inner", MatchPattern::EndsWith).find_all(&snap).len(),
        1
    );
}

#[test]
fn test_matching_is_case_sensitive() {
    let snap = snapshot();
    assert!(selector_of(ATTR_TEXT, "usb", MatchPattern::Eq).find_all(&snap).is_empty());
}

#[test]
fn test_missing_attribute_never_matches() {
    let snap = snapshot();
    assert!(selector_of("no-such-attr", "", MatchPattern::Contains)
        .find_all(&snap)
        .is_empty());
}

#[test]
fn test_conjunction() {
    let snap = snapshot();
    let mut selector = selector_of(ATTR_TEXT, "USB", MatchPattern::Eq);
    selector.add_matcher(AttrMatcher::new("resource-id", "id4", MatchPattern::Eq));
    assert_eq!(selector.find_all(&snap).len(), 1);

    selector.add_matcher(AttrMatcher::new("resource-id", "other", MatchPattern::Eq));
    assert!(selector.find_all(&snap).is_empty());
}

#[test]
fn test_empty_selector_matches_every_node() {
    let snap = snapshot();
    assert_eq!(Selector::new().find_all(&snap).len(), 4);
}

#[test]
fn test_find_all_is_preorder_and_deterministic() {
    let snap = snapshot();
    let selector = selector_of(ATTR_TEXT, "USB", MatchPattern::StartsWith);
    let first: Vec<&str> = selector
        .find_all(&snap)
        .iter()
        .map(|n| n.attr_or(ATTR_TEXT, "?"))
        .collect();
    assert_eq!(first, vec!["USB", "USB-inner"]);
    let second: Vec<&str> = selector
        .find_all(&snap)
        .iter()
        .map(|n| n.attr_or(ATTR_TEXT, "?"))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_describe_is_stable() {
    let mut selector = selector_of(ATTR_TEXT, "USB", MatchPattern::Eq);
    assert_eq!(selector.describe(), "[text=USB]");
    selector.add_matcher(AttrMatcher::new("resource-id", "id4", MatchPattern::Contains));
    assert_eq!(selector.describe(), "[text=USB][resource-id*=id4]");
    assert_eq!(Selector::new().describe(), "[any]");
}

#[test]
fn test_pattern_from_raw() {
    assert_eq!(MatchPattern::from_raw(0), Some(MatchPattern::Eq));
    assert_eq!(MatchPattern::from_raw(3), Some(MatchPattern::EndsWith));
    assert_eq!(MatchPattern::from_raw(4), None);
}

#[test]
fn test_parcel_round_trip() {
    let selector = selector_of(ATTR_TEXT, "USB", MatchPattern::Eq);
    let parcel = selector.write_into_parcel().unwrap();
    let back = Selector::read_from_parcel(&parcel).unwrap();
    assert_eq!(back, selector);
    assert_eq!(back.describe(), selector.describe());
}
