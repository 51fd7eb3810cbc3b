//! Widget lookup, freshness tracking and compound operations.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use uidriver_protocols::controller::UiController;
use uidriver_protocols::error::ApiCallErr;
use uidriver_protocols::events::{KeyEvent, TouchEvent};
use uidriver_protocols::geometry::{Point, Rect};

use crate::actions::{decompose_click, decompose_swipe, KeyAction, SingleKey, TouchOp, UiOpArgs};
use crate::dom::{Snapshot, UiNode, ATTR_HASHCODE};
use crate::image::WidgetImage;
use crate::registry::{self, ControllerRegistry};
use crate::selector::Selector;

/// Scroll direction of one search phase. Phase 1 drags the pointer from
/// the subject's top edge towards its bottom (revealing content above);
/// phase 2 is the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrollPhase {
    Upward,
    Downward,
}

/// Driver bound to one target device, resolving widgets against live
/// snapshots and injecting synthesized events.
pub struct UiDriver {
    device: String,
    registry: Arc<ControllerRegistry>,
    args: UiOpArgs,
}

impl UiDriver {
    /// Driver over the process-wide controller registry.
    pub fn new(device: impl Into<String>) -> Self {
        Self::with_registry(Arc::clone(registry::global()), device)
    }

    /// Driver over an explicit registry, for embedders running several
    /// engines side by side.
    pub fn with_registry(registry: Arc<ControllerRegistry>, device: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            registry,
            args: UiOpArgs::default(),
        }
    }

    /// Replace the operation timing knobs.
    pub fn with_op_args(mut self, args: UiOpArgs) -> Self {
        self.args = args;
        self
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    fn controller(&self) -> Result<Arc<dyn UiController>, ApiCallErr> {
        self.registry.install_for_device(&self.device);
        self.registry.active_controller(&self.device).ok_or_else(|| {
            ApiCallErr::internal(format!("no usable UiController for device '{}'", self.device))
        })
    }

    fn capture_snapshot(&self, controller: &Arc<dyn UiController>) -> Result<Snapshot, ApiCallErr> {
        let dom = controller
            .current_ui_dom()
            .map_err(|err| ApiCallErr::internal(format!("get current ui dom failed: {err}")))?;
        Snapshot::from_value(&dom)
            .map_err(|err| ApiCallErr::internal(format!("parse ui dom failed: {err}")))
    }

    /// Locate all widgets satisfying `selector` in the current snapshot,
    /// in pre-order DFS order.
    pub fn find_widgets(&self, selector: &Selector) -> Result<Vec<WidgetImage>, ApiCallErr> {
        let controller = self.controller()?;
        let snapshot = self.capture_snapshot(&controller)?;
        let images: Vec<WidgetImage> = selector
            .find_all(&snapshot)
            .into_iter()
            .map(|node| WidgetImage::from_node(node, selector))
            .collect();
        debug!(count = images.len(), selection = %selector.describe(), "widgets located");
        Ok(images)
    }

    /// Refresh `image` against the current snapshot: resolve it by its
    /// captured hashcode, or by its origin selector when no hashcode was
    /// captured, and take over the fresh attributes.
    pub fn update_widget_image(&self, image: &mut WidgetImage) -> Result<(), ApiCallErr> {
        let controller = self.controller()?;
        self.refresh_image(&controller, image).map(|_| ())
    }

    // Single snapshot fetch plus resolution. Returns the snapshot so
    // compound operations can reuse it as their first inspected frame.
    fn refresh_image(
        &self,
        controller: &Arc<dyn UiController>,
        image: &mut WidgetImage,
    ) -> Result<Snapshot, ApiCallErr> {
        let snapshot = self.capture_snapshot(controller)?;
        match Self::resolve_in(image, &snapshot) {
            Some(node) => {
                image.refresh_from(node);
                Ok(snapshot)
            }
            None => Err(ApiCallErr::widget_lost(format!(
                "widget lost, selected by: {}",
                image.selection_desc()
            ))),
        }
    }

    fn resolve_in<'a>(image: &WidgetImage, snapshot: &'a Snapshot) -> Option<&'a UiNode> {
        let hashcode = image.hash_code();
        if !hashcode.is_empty() {
            snapshot
                .root()
                .iter()
                .find(|node| node.attr(ATTR_HASHCODE) == Some(hashcode))
        } else {
            image.selector().find_all(snapshot).into_iter().next()
        }
    }

    /// Refresh `image` and run the click-family operation `op` at the
    /// center of its fresh bounds. No events are injected when the
    /// refresh fails.
    pub fn perform_widget_operate(
        &self,
        image: &mut WidgetImage,
        op: TouchOp,
    ) -> Result<(), ApiCallErr> {
        let controller = self.controller()?;
        self.refresh_image(&controller, image)?;
        let center = Self::interaction_center(image)?;
        let events = decompose_click(op, center, &self.args);
        self.inject_touch(&controller, &events)
    }

    // Center of the refreshed bounds; a widget without bounds has no
    // screen area and cannot be operated.
    fn interaction_center(image: &WidgetImage) -> Result<Point, ApiCallErr> {
        let bounds = image.bounds().ok_or_else(|| {
            ApiCallErr::usage(format!(
                "widget has no display bounds, selected by: {}",
                image.selection_desc()
            ))
        })?;
        Ok(bounds.center())
    }

    fn inject_touch(
        &self,
        controller: &Arc<dyn UiController>,
        events: &[TouchEvent],
    ) -> Result<(), ApiCallErr> {
        controller
            .inject_touch_events(events)
            .map_err(|err| ApiCallErr::internal(format!("touch event injection failed: {err}")))
    }

    fn inject_keys(
        &self,
        controller: &Arc<dyn UiController>,
        events: &[KeyEvent],
    ) -> Result<(), ApiCallErr> {
        controller
            .inject_key_events(events)
            .map_err(|err| ApiCallErr::internal(format!("key event injection failed: {err}")))
    }

    /// Inject the event sequence of `key`.
    pub fn trigger_key(&self, key: &dyn KeyAction) -> Result<(), ApiCallErr> {
        let controller = self.controller()?;
        let events = key.compute_events(&self.args);
        self.inject_keys(&controller, &events)
    }

    /// Inject the key chord producing `ch`. Characters the device knows
    /// no key code for are a usage error.
    pub fn type_char(&self, ch: char) -> Result<(), ApiCallErr> {
        let controller = self.controller()?;
        let (code, ctrl_code) = controller
            .char_key_code(ch)
            .ok_or_else(|| ApiCallErr::usage(format!("no key code for character '{ch}'")))?;
        let events = SingleKey::with_ctrl(code, ctrl_code).compute_events(&self.args);
        self.inject_keys(&controller, &events)
    }

    /// Refresh `image`, focus it with a click, then paste `text` into it
    /// from the clipboard.
    pub fn input_text(&self, image: &mut WidgetImage, text: &str) -> Result<(), ApiCallErr> {
        let controller = self.controller()?;
        self.refresh_image(&controller, image)?;
        let center = Self::interaction_center(image)?;
        self.inject_touch(&controller, &decompose_click(TouchOp::Click, center, &self.args))?;
        controller
            .put_text_to_clipboard(text)
            .map_err(|err| ApiCallErr::internal(format!("clipboard write failed: {err}")))?;
        self.inject_keys(&controller, &SingleKey::paste().compute_events(&self.args))
    }

    /// Scroll the `subject` widget until `target` matches, reversing the
    /// direction exactly once when the snapshot freezes.
    ///
    /// The first snapshot inspected is the one in which the subject was
    /// refreshed, so a target already visible costs zero scrolls. Each
    /// loop turn issues one scroll gesture on the subject bounds and
    /// fetches one snapshot; a phase ends when two consecutive snapshots
    /// carry identical content. The subject is re-resolved in every
    /// fetched snapshot, and losing it fails the search with the
    /// widget-lost error. Returns the target image, or `None` without
    /// error when both directions are exhausted.
    ///
    /// `start_offset` insets the gesture's starting edge within the
    /// subject bounds; `0` spans the full height.
    pub fn scroll_search(
        &self,
        subject: &mut WidgetImage,
        target: &Selector,
        start_offset: i32,
    ) -> Result<Option<WidgetImage>, ApiCallErr> {
        let controller = self.controller()?;
        let mut current = self.refresh_image(&controller, subject)?;
        let bounds = subject.bounds().ok_or_else(|| {
            ApiCallErr::usage(format!(
                "scroll subject has no display bounds, selected by: {}",
                subject.selection_desc()
            ))
        })?;
        for phase in [ScrollPhase::Upward, ScrollPhase::Downward] {
            debug!(?phase, selection = %target.describe(), "scroll search phase");
            loop {
                if let Some(found) = Self::first_match(target, &current) {
                    return Ok(Some(found));
                }
                self.scroll_subject(&controller, &bounds, phase, start_offset)?;
                let next = self.capture_snapshot(&controller)?;
                if let Some(found) = Self::first_match(target, &next) {
                    return Ok(Some(found));
                }
                // the subject must stay resolvable to keep scrolling on it
                if Self::resolve_in(subject, &next).is_none() {
                    return Err(ApiCallErr::widget_lost(format!(
                        "scroll subject lost, selected by: {}",
                        subject.selection_desc()
                    )));
                }
                let frozen = next.same_content(&current);
                current = next;
                if frozen {
                    break;
                }
            }
        }
        debug!(selection = %target.describe(), "scroll search exhausted both directions");
        Ok(None)
    }

    fn first_match(target: &Selector, snapshot: &Snapshot) -> Option<WidgetImage> {
        target
            .find_all(snapshot)
            .into_iter()
            .next()
            .map(|node| WidgetImage::from_node(node, target))
    }

    // One scroll gesture on the subject bounds: pointer x at the subject
    // center, pointer y spanning the subject height in phase direction.
    fn scroll_subject(
        &self,
        controller: &Arc<dyn UiController>,
        bounds: &Rect,
        phase: ScrollPhase,
        start_offset: i32,
    ) -> Result<(), ApiCallErr> {
        let cx = bounds.center_x();
        let offset = start_offset.clamp(0, bounds.height());
        let (y_from, y_to) = match phase {
            ScrollPhase::Upward => (bounds.top + offset, bounds.bottom),
            ScrollPhase::Downward => (bounds.bottom - offset, bounds.top),
        };
        let events = decompose_swipe(Point::new(cx, y_from), Point::new(cx, y_to), &self.args);
        self.inject_touch(controller, &events)
    }

    /// Capture the screen into `path` via the active controller.
    pub fn take_screen_cap(&self, path: &Path) -> Result<(), ApiCallErr> {
        let controller = self.controller()?;
        controller.take_screen_cap(path).map_err(|err| {
            warn!(path = %path.display(), error = %err, "screen capture failed");
            ApiCallErr::internal(format!("screen capture failed: {err}"))
        })
    }

    /// Wait until the UI reports steady; returns whether idle was reached
    /// within the timeout.
    pub fn wait_for_ui_steady(
        &self,
        idle_threshold_ms: u32,
        timeout_sec: u32,
    ) -> Result<bool, ApiCallErr> {
        let controller = self.controller()?;
        Ok(controller.wait_for_ui_steady(idle_threshold_ms, timeout_sec))
    }

    /// Marshal the current snapshot back into its wire shape.
    pub fn dump_ui_hierarchy(&self) -> Result<serde_json::Value, ApiCallErr> {
        let controller = self.controller()?;
        let snapshot = self.capture_snapshot(&controller)?;
        Ok(snapshot.root().to_value())
    }
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
