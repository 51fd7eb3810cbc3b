//! Decomposition of high-level operations into ordered event sequences.

use serde::{Deserialize, Serialize};

use uidriver_protocols::events::{
    ActionStage, KeyEvent, TouchEvent, KEYCODE_BACK, KEYCODE_CTRL, KEYCODE_HOME, KEYCODE_NONE,
    KEYCODE_POWER, KEYCODE_V,
};
use uidriver_protocols::geometry::Point;

/// Timing and amplitude knobs of the synthesized operations.
///
/// Every field has a system default; embedders can layer the struct from
/// their configuration files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiOpArgs {
    pub click_hold_ms: u32,
    pub long_click_hold_ms: u32,
    pub double_click_interval_ms: u32,
    pub key_hold_ms: u32,
    pub swipe_velocity_pps: u32,
    pub swipe_step_count: u32,
}

impl Default for UiOpArgs {
    fn default() -> Self {
        Self {
            click_hold_ms: 100,
            long_click_hold_ms: 1500,
            double_click_interval_ms: 200,
            key_hold_ms: 100,
            swipe_velocity_pps: 600,
            swipe_step_count: 50,
        }
    }
}

/// Coordinate-based touch operations on a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchOp {
    Click,
    LongClick,
    DoubleClick,
}

/// Events implementing a click-family gesture at one point.
pub fn decompose_click(op: TouchOp, point: Point, args: &UiOpArgs) -> Vec<TouchEvent> {
    let press = |offset: u32, hold: u32| TouchEvent {
        stage: ActionStage::Down,
        point,
        down_time_offset_ms: offset,
        hold_ms: hold,
        flags: 0,
    };
    let release = |offset: u32, hold: u32| TouchEvent {
        stage: ActionStage::Up,
        point,
        down_time_offset_ms: offset,
        hold_ms: hold,
        flags: 0,
    };
    match op {
        TouchOp::Click => {
            let hold = args.click_hold_ms;
            vec![press(0, hold), release(hold, 0)]
        }
        TouchOp::LongClick => {
            let hold = args.long_click_hold_ms;
            vec![press(0, hold), release(hold, 0)]
        }
        TouchOp::DoubleClick => {
            let hold = args.click_hold_ms;
            let gap = args.double_click_interval_ms;
            vec![
                press(0, hold),
                release(hold, gap),
                press(hold + gap, hold),
                release(hold + gap + hold, 0),
            ]
        }
    }
}

/// Events implementing a straight-line swipe from `from` to `to`.
///
/// The first event is a down at `from`, the last an up at `to`, with moves
/// in between. The step count is clamped to the pixel distance so every
/// step advances by at least one pixel, keeping the coordinate sequence
/// strictly monotone along the swipe axis.
pub fn decompose_swipe(from: Point, to: Point, args: &UiOpArgs) -> Vec<TouchEvent> {
    let dx = i64::from(to.x - from.x);
    let dy = i64::from(to.y - from.y);
    let distance = (((dx * dx + dy * dy) as f64).sqrt() as i64).max(1);
    let steps = i64::from(args.swipe_step_count.max(1)).min(distance);
    let total_ms = distance * 1000 / i64::from(args.swipe_velocity_pps.max(1));
    let interval_ms = (total_ms / steps).max(1) as u32;

    let mut events = Vec::with_capacity(steps as usize + 1);
    for step in 0..=steps {
        let point = Point::new(
            from.x + (dx * step / steps) as i32,
            from.y + (dy * step / steps) as i32,
        );
        let stage = if step == 0 {
            ActionStage::Down
        } else if step == steps {
            ActionStage::Up
        } else {
            ActionStage::Move
        };
        events.push(TouchEvent {
            stage,
            point,
            down_time_offset_ms: step as u32 * interval_ms,
            hold_ms: if step == steps { 0 } else { interval_ms },
            flags: 0,
        });
    }
    events
}

/// Computes the key event sequence implementing a key action.
pub trait KeyAction {
    fn compute_events(&self, args: &UiOpArgs) -> Vec<KeyEvent>;
}

/// A single named or anonymous key, with at most one control key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleKey {
    code: i32,
    ctrl_code: i32,
}

impl SingleKey {
    pub fn new(code: i32) -> Self {
        Self { code, ctrl_code: KEYCODE_NONE }
    }

    pub fn with_ctrl(code: i32, ctrl_code: i32) -> Self {
        Self { code, ctrl_code }
    }

    pub fn back() -> Self {
        Self::new(KEYCODE_BACK)
    }

    pub fn home() -> Self {
        Self::new(KEYCODE_HOME)
    }

    pub fn power() -> Self {
        Self::new(KEYCODE_POWER)
    }

    pub fn paste() -> Self {
        Self::with_ctrl(KEYCODE_V, KEYCODE_CTRL)
    }
}

impl KeyAction for SingleKey {
    fn compute_events(&self, args: &UiOpArgs) -> Vec<KeyEvent> {
        vec![KeyEvent {
            code: self.code,
            ctrl_code: self.ctrl_code,
            hold_ms: args.key_hold_ms,
        }]
    }
}

/// A chord of plain keys struck in order under one held control key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedKeys {
    ctrl_code: i32,
    codes: Vec<i32>,
}

impl CombinedKeys {
    pub fn new(ctrl_code: i32, codes: Vec<i32>) -> Self {
        Self { ctrl_code, codes }
    }
}

impl KeyAction for CombinedKeys {
    fn compute_events(&self, args: &UiOpArgs) -> Vec<KeyEvent> {
        self.codes
            .iter()
            .map(|&code| KeyEvent {
                code,
                ctrl_code: self.ctrl_code,
                hold_ms: args.key_hold_ms,
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "actions_tests.rs"]
mod tests;
