//! Pixel geometry of the snapshot tree and injected events.

use serde::{Deserialize, Serialize};

/// A point in screen pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned pixel rectangle with `left <= right` and `top <= bottom`.
///
/// The serde keys match the wire shape used for bounds payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    #[serde(rename = "leftX")]
    pub left: i32,
    #[serde(rename = "topY")]
    pub top: i32,
    #[serde(rename = "rightX")]
    pub right: i32,
    #[serde(rename = "bottomY")]
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> i32 {
        (self.left + self.right) / 2
    }

    pub fn center_y(&self) -> i32 {
        (self.top + self.bottom) / 2
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_derived_values() {
        let rect = Rect::new(0, 200, 600, 1000);
        assert_eq!(rect.width(), 600);
        assert_eq!(rect.height(), 800);
        assert_eq!(rect.center(), Point::new(300, 600));
    }

    #[test]
    fn test_rect_wire_keys() {
        let rect = Rect::new(1, 2, 3, 4);
        let data = serde_json::to_value(rect).unwrap();
        assert_eq!(data["leftX"], 1);
        assert_eq!(data["topY"], 2);
        assert_eq!(data["rightX"], 3);
        assert_eq!(data["bottomY"], 4);
    }

    #[test]
    fn test_rect_round_trip() {
        let rect = Rect::new(-10, -20, 30, 40);
        let data = serde_json::to_value(rect).unwrap();
        let back: Rect = serde_json::from_value(data).unwrap();
        assert_eq!(back, rect);
    }
}
