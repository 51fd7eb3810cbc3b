//! # UiDriver Protocols
//!
//! Boundary definitions for the uidriver engine. Contains the types and
//! traits that cross the engine boundary - no engine logic.
//!
//! ## Contents
//!
//! - [`Value`] - tagged values travelling through the api transaction
//! - [`Parcelable`] - objects that serialize into tagged value payloads
//! - [`ApiCallErr`] / [`ErrCode`] - the api invocation error model
//! - [`UiController`] - device backend interface (snapshot read, input
//!   injection, clipboard, screen capture)
//! - [`TouchEvent`] / [`KeyEvent`] - injected input events
//! - [`Rect`] / [`Point`] - pixel geometry

pub mod controller;
pub mod error;
pub mod events;
pub mod geometry;
pub mod value;

pub use controller::{ControllerProvider, Priority, UiController};
pub use error::{ApiCallErr, ControllerError, ErrCode};
pub use events::{ActionStage, KeyEvent, TouchEvent};
pub use geometry::{Point, Rect};
pub use value::{Parcelable, ParcelError, TypeId, Value};
