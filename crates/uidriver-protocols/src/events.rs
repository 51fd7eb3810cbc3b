//! Input events injected into the device.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

// Frequently used key codes.
pub const KEYCODE_NONE: i32 = 0;
pub const KEYCODE_HOME: i32 = 1;
pub const KEYCODE_BACK: i32 = 2;
pub const KEYCODE_POWER: i32 = 18;
pub const KEYCODE_V: i32 = 2038;
pub const KEYCODE_CTRL: i32 = 2072;

/// Stage of a pointer within a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionStage {
    Down,
    Move,
    Up,
}

/// One pointer event of a synthesized gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub stage: ActionStage,
    pub point: Point,
    /// Offset from the gesture's down event, in milliseconds.
    pub down_time_offset_ms: u32,
    /// How long the pointer rests at this step before the next one.
    pub hold_ms: u32,
    pub flags: u32,
}

/// One key stroke, with at most one control key held around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub code: i32,
    /// `KEYCODE_NONE` when no control key applies.
    pub ctrl_code: i32,
    pub hold_ms: u32,
}
