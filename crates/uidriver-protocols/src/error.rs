//! Api invocation and controller errors.

use thiserror::Error;

/// Outcome kind of an api invocation. The numeric value orders errors by
/// severity when a local error is merged with the untracked slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrCode {
    /// Success.
    NoError = 0,
    /// Internal error, not expected to happen.
    Internal = 1,
    /// A widget that was expected to exist is lost.
    WidgetLost = 2,
    /// Caller violated a precondition.
    Usage = 4,
}

impl ErrCode {
    /// Stable display name, also used as the `exception.code` wire value.
    pub fn name(self) -> &'static str {
        match self {
            ErrCode::NoError => "NO_ERROR",
            ErrCode::Internal => "ERROR",
            ErrCode::WidgetLost => "WIDGET_LOST",
            ErrCode::Usage => "USAGE_ERROR",
        }
    }
}

/// Api invocation error detail wrapper.
///
/// The message always carries the `[<NAME>]:` prefix of its code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ApiCallErr {
    pub code: ErrCode,
    pub message: String,
}

impl ApiCallErr {
    pub fn new(code: ErrCode, msg: impl AsRef<str>) -> Self {
        Self {
            code,
            message: format!("[{}]:{}", code.name(), msg.as_ref()),
        }
    }

    /// The no-error value.
    pub fn none() -> Self {
        Self::new(ErrCode::NoError, "")
    }

    pub fn internal(msg: impl AsRef<str>) -> Self {
        Self::new(ErrCode::Internal, msg)
    }

    pub fn widget_lost(msg: impl AsRef<str>) -> Self {
        Self::new(ErrCode::WidgetLost, msg)
    }

    pub fn usage(msg: impl AsRef<str>) -> Self {
        Self::new(ErrCode::Usage, msg)
    }

    pub fn is_error(&self) -> bool {
        self.code != ErrCode::NoError
    }
}

/// Failures raised by device controllers.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("device connection failed: {0}")]
    Connection(String),

    #[error("event injection failed: {0}")]
    Injection(String),

    #[error("screen capture failed: {0}")]
    ScreenCap(String),

    #[error("clipboard access failed: {0}")]
    Clipboard(String),
}
