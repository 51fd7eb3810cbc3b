//! # UiDriver Core
//!
//! The widget-interaction engine behind the string-transaction api:
//! snapshot model, selector algebra, widget images, the prioritized
//! controller registry, the driver operations (find, operate, update,
//! scroll-search) and the extern-api dispatch envelope.
//!
//! Device backends implement [`uidriver_protocols::UiController`] and are
//! registered with a [`ControllerRegistry`]; an [`Engine`] serves
//! transactions against one target device.

pub mod actions;
pub mod dom;
pub mod driver;
pub mod extern_api;
mod handlers;
pub mod image;
pub mod registry;
pub mod selector;

pub use actions::{KeyAction, TouchOp, UiOpArgs};
pub use dom::{Snapshot, UiNode};
pub use driver::UiDriver;
pub use extern_api::Engine;
pub use image::WidgetImage;
pub use registry::ControllerRegistry;
pub use selector::{AttrMatcher, MatchPattern, Selector};
