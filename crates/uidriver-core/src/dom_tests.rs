use super::*;
use serde_json::json;

fn sample_dom() -> serde_json::Value {
    json!({
        "attributes": {
            "bounds": "[0,0][100,100]",
            "text": ""
        },
        "children": [
            {
                "attributes": {
                    "bounds": "[0,0][50,50]",
                    "text": "USB",
                    "hashcode": "888"
                },
                "children": []
            },
            {
                "attributes": {
                    "bounds": "[50,0][100,100]",
                    "text": "WLAN"
                },
                "children": [
                    {
                        "attributes": {
                            "bounds": "[50,0][100,50]",
                            "text": "inner"
                        },
                        "children": []
                    }
                ]
            }
        ]
    })
}

#[test]
fn test_parse_tree() {
    let root = UiNode::from_value(&sample_dom()).unwrap();
    assert_eq!(root.children().len(), 2);
    assert_eq!(root.children()[0].attr(ATTR_TEXT), Some("USB"));
    assert_eq!(root.children()[1].children()[0].attr(ATTR_TEXT), Some("inner"));
    assert_eq!(root.bounds(), Some(Rect::new(0, 0, 100, 100)));
}

#[test]
fn test_attr_helpers() {
    let root = UiNode::from_value(&sample_dom()).unwrap();
    let usb = &root.children()[0];
    assert!(usb.has_attr(ATTR_HASHCODE));
    assert_eq!(usb.attr_or(ATTR_HASHCODE, ""), "888");
    assert_eq!(usb.attr_or("missing", "fallback"), "fallback");
    assert_eq!(usb.attr("missing"), None);
}

#[test]
fn test_preorder_dfs_order() {
    let root = UiNode::from_value(&sample_dom()).unwrap();
    let texts: Vec<&str> = root.iter().map(|n| n.attr_or(ATTR_TEXT, "?")).collect();
    assert_eq!(texts, vec!["", "USB", "WLAN", "inner"]);
}

#[test]
fn test_missing_bounds_means_no_area() {
    let dom = json!({"attributes": {"text": "ghost"}, "children": []});
    let node = UiNode::from_value(&dom).unwrap();
    assert_eq!(node.bounds(), None);
}

#[test]
fn test_missing_attributes_and_children_tolerated() {
    let node = UiNode::from_value(&json!({})).unwrap();
    assert!(node.attributes().is_empty());
    assert!(node.children().is_empty());
}

#[test]
fn test_non_object_node_rejected() {
    assert!(UiNode::from_value(&json!([1, 2])).is_err());
    assert!(UiNode::from_value(&json!("x")).is_err());
}

#[test]
fn test_non_string_attribute_rejected() {
    let dom = json!({"attributes": {"text": 5}, "children": []});
    assert!(UiNode::from_value(&dom).is_err());
}

#[test]
fn test_parse_bounds() {
    assert_eq!(parse_bounds("[0,0][50,50]").unwrap(), Rect::new(0, 0, 50, 50));
    assert_eq!(
        parse_bounds("[-10,-20][30,40]").unwrap(),
        Rect::new(-10, -20, 30, 40)
    );
}

#[test]
fn test_parse_bounds_malformed() {
    assert!(parse_bounds("").is_err());
    assert!(parse_bounds("[0,0][50]").is_err());
    assert!(parse_bounds("[0,0][50,50][60,60]").is_err());
    assert!(parse_bounds("[50,0][0,50]").is_err()); // left > right
}

#[test]
fn test_marshal_round_trip() {
    let dom = sample_dom();
    let root = UiNode::from_value(&dom).unwrap();
    let back = UiNode::from_value(&root.to_value()).unwrap();
    assert_eq!(back, root);
}

#[test]
fn test_same_content_ignores_key_order() {
    let a = Snapshot::from_value(&json!({
        "attributes": {"text": "USB", "bounds": "[0,0][10,10]"},
        "children": []
    }))
    .unwrap();
    let b = Snapshot::from_value(&json!({
        "attributes": {"bounds": "[0,0][10,10]", "text": "USB"},
        "children": []
    }))
    .unwrap();
    assert!(a.same_content(&b));
}

#[test]
fn test_same_content_detects_change() {
    let a = Snapshot::from_value(&sample_dom()).unwrap();
    let mut changed = sample_dom();
    changed["children"][0]["attributes"]["text"] = json!("WYZ");
    let b = Snapshot::from_value(&changed).unwrap();
    assert!(!a.same_content(&b));
}
