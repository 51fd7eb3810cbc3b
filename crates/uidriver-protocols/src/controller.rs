//! Device backend interface and its selection priority.

use std::path::Path;
use std::sync::Arc;

use crate::error::ControllerError;
use crate::events::{KeyEvent, TouchEvent};

/// Selection priority of a registered controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Priority {
    Low = 1,
    Medium = 2,
    High = 3,
}

/// A device backend exposing snapshot reads and input injection.
///
/// Only `name`, `current_ui_dom` and `is_workable` are required; the input
/// facilities default to no-ops so partial backends stay registrable.
pub trait UiController: Send + Sync {
    fn name(&self) -> &str;

    /// Device this controller serves; empty serves any device.
    fn target_device(&self) -> &str {
        ""
    }

    /// Read the current UI tree in its `{"attributes", "children"}` wire
    /// shape. May block until the backend produces a tree.
    fn current_ui_dom(&self) -> Result<serde_json::Value, ControllerError>;

    /// Block until the UI has stayed idle for `idle_threshold_ms`, giving
    /// up after `timeout_sec`. Returns whether idle was reached in time.
    fn wait_for_ui_steady(&self, _idle_threshold_ms: u32, _timeout_sec: u32) -> bool {
        true
    }

    /// Inject an ordered gesture. The backend must flush the events before
    /// returning so a following snapshot read observes their effect.
    fn inject_touch_events(&self, _events: &[TouchEvent]) -> Result<(), ControllerError> {
        Ok(())
    }

    fn inject_key_events(&self, _events: &[KeyEvent]) -> Result<(), ControllerError> {
        Ok(())
    }

    fn put_text_to_clipboard(&self, _text: &str) -> Result<(), ControllerError> {
        Ok(())
    }

    fn take_screen_cap(&self, _path: &Path) -> Result<(), ControllerError> {
        Err(ControllerError::Unsupported("screen capture"))
    }

    /// Key code and control code producing `ch`, when the device knows one.
    fn char_key_code(&self, _ch: char) -> Option<(i32, i32)> {
        None
    }

    /// Tells if this controller is effective for the current UI. Called
    /// under the registry lock; must be cheap and non-blocking.
    fn is_workable(&self) -> bool;
}

/// Factory producing controllers for a device. Invoked lazily by the
/// registry, at most once per device.
pub type ControllerProvider =
    Box<dyn Fn(&str) -> Vec<(Arc<dyn UiController>, Priority)> + Send + Sync>;
