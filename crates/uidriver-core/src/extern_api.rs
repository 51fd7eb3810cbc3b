//! Extern-api dispatch: handler chain, transaction envelope and typed
//! value marshalling.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use uidriver_protocols::error::ApiCallErr;
use uidriver_protocols::value::{Parcelable, Value};

use crate::actions::UiOpArgs;
use crate::driver::UiDriver;
use crate::handlers;
use crate::registry::{self, ControllerRegistry};

const KEY_UPDATED_CALLER: &str = "updatedCaller";
const KEY_RESULT_VALUES: &str = "resultValues";
const KEY_EXCEPTION: &str = "exception";
const KEY_CODE: &str = "code";
const KEY_MESSAGE: &str = "message";

/// Handler of api invocation requests.
///
/// Arguments: the engine, the function id, the caller value (updated in
/// place), the incoming parameters, the outgoing results and the error
/// slot. Returns true when the request was accepted and handled.
pub type ApiRequestHandler = Box<
    dyn Fn(&Engine, &str, &mut Value, &[Value], &mut Vec<Value>, &mut ApiCallErr) -> bool
        + Send
        + Sync,
>;

/// Dispatch engine serving string transactions against one target device.
///
/// The built-in handler set is installed by the constructors; additional
/// handlers must be registered before the first transaction is served.
pub struct Engine {
    device: String,
    registry: Arc<ControllerRegistry>,
    op_args: UiOpArgs,
    handlers: Vec<ApiRequestHandler>,
    untracked_error: Mutex<ApiCallErr>,
}

impl Engine {
    /// Engine over the process-wide controller registry.
    pub fn new(device: impl Into<String>) -> Self {
        Self::with_registry(Arc::clone(registry::global()), device)
    }

    /// Engine over an explicit registry, so independent engines can run
    /// side by side.
    pub fn with_registry(registry: Arc<ControllerRegistry>, device: impl Into<String>) -> Self {
        let mut engine = Self {
            device: device.into(),
            registry,
            op_args: UiOpArgs::default(),
            handlers: Vec::new(),
            untracked_error: Mutex::new(ApiCallErr::none()),
        };
        handlers::register_builtin(&mut engine);
        engine
    }

    /// Replace the operation timing knobs used by drivers of this engine.
    pub fn with_op_args(mut self, args: UiOpArgs) -> Self {
        self.op_args = args;
        self
    }

    /// Append a handler; handlers run in registration order.
    pub fn add_handler(&mut self, handler: ApiRequestHandler) {
        self.handlers.push(handler);
    }

    pub fn device(&self) -> &str {
        &self.device
    }

    /// Driver bound to this engine's device and registry.
    pub fn driver(&self) -> UiDriver {
        UiDriver::with_registry(Arc::clone(&self.registry), self.device.clone())
            .with_op_args(self.op_args.clone())
    }

    /// Record a failure from a helper without an error return path. The
    /// running transaction adopts it when it is worse than its local
    /// error.
    pub fn note_untracked_error(&self, error: ApiCallErr) {
        *self.untracked_error.lock() = error;
    }

    /// Run the handler chain for one parsed call; the first accepting
    /// handler wins.
    pub fn call(
        &self,
        function: &str,
        caller: &mut Value,
        input: &[Value],
        out: &mut Vec<Value>,
        err: &mut ApiCallErr,
    ) {
        for handler in &self.handlers {
            if handler(self, function, caller, input, out, err) {
                return;
            }
        }
        *err = ApiCallErr::internal(format!("No handler found for extern-api: {function}"));
    }

    /// Serve one string transaction: parse the boundary values, dispatch,
    /// and build the reply envelope.
    pub fn api_transact(&self, function: &str, caller_str: &str, params_str: &str) -> String {
        debug!(api = function, params = params_str, "begin api transaction");
        *self.untracked_error.lock() = ApiCallErr::none();
        let mut error = ApiCallErr::none();
        let mut out = Vec::new();
        let mut reply = serde_json::Map::new();
        match Self::parse_boundary(caller_str, params_str) {
            Ok((mut caller, input)) => {
                self.call(function, &mut caller, &input, &mut out, &mut error);
                reply.insert(KEY_UPDATED_CALLER.to_string(), caller.to_wire());
                reply.insert(
                    KEY_RESULT_VALUES.to_string(),
                    serde_json::Value::Array(out.iter().map(Value::to_wire).collect()),
                );
            }
            Err(parse_error) => error = parse_error,
        }
        let untracked = self.untracked_error.lock().clone();
        if untracked.code > error.code {
            error = untracked;
        }
        if error.is_error() {
            warn!(api = function, error = %error.message, "api transaction failed");
            reply.insert(
                KEY_EXCEPTION.to_string(),
                serde_json::json!({ KEY_CODE: error.code.name(), KEY_MESSAGE: error.message }),
            );
        }
        serde_json::Value::Object(reply).to_string()
    }

    fn parse_boundary(caller_str: &str, params_str: &str) -> Result<(Value, Vec<Value>), ApiCallErr> {
        let caller = serde_json::from_str::<Value>(caller_str).map_err(|err| {
            ApiCallErr::internal(format!("Convert transaction parameters failed: {err}"))
        })?;
        let input = serde_json::from_str::<Vec<Value>>(params_str).map_err(|err| {
            ApiCallErr::internal(format!("Convert transaction parameters failed: {err}"))
        })?;
        Ok((caller, input))
    }
}

/// A primitive that can be read out of a tagged value.
pub trait FromValueItem: Sized {
    const TYPE_NAME: &'static str;

    fn from_value_item(value: &Value) -> Option<Self>;
}

impl FromValueItem for bool {
    const TYPE_NAME: &'static str = "BOOL";

    fn from_value_item(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValueItem for i64 {
    const TYPE_NAME: &'static str = "INT";

    fn from_value_item(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValueItem for f64 {
    const TYPE_NAME: &'static str = "FLOAT";

    fn from_value_item(value: &Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromValueItem for String {
    const TYPE_NAME: &'static str = "STRING";

    fn from_value_item(value: &Value) -> Option<Self> {
        match value {
            Value::String(v) => Some(v.clone()),
            _ => None,
        }
    }
}

/// A primitive that can be pushed as a tagged result value.
pub trait IntoValueItem {
    fn into_value_item(self) -> Value;
}

impl IntoValueItem for bool {
    fn into_value_item(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValueItem for i64 {
    fn into_value_item(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValueItem for f64 {
    fn into_value_item(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValueItem for String {
    fn into_value_item(self) -> Value {
        Value::String(self)
    }
}

impl IntoValueItem for &str {
    fn into_value_item(self) -> Value {
        Value::String(self.to_string())
    }
}

/// Typed read of the parameter at `index`. Type mismatches are fatal.
pub fn get_item<T: FromValueItem>(items: &[Value], index: usize) -> Result<T, ApiCallErr> {
    let item = items
        .get(index)
        .ok_or_else(|| ApiCallErr::internal(format!("missing argument at index {index}")))?;
    T::from_value_item(item).ok_or_else(|| {
        ApiCallErr::internal(format!(
            "argument at index {index} is not of type {}",
            T::TYPE_NAME
        ))
    })
}

/// Typed read with a default for trailing optional arguments.
pub fn get_item_or<T: FromValueItem>(
    items: &[Value],
    index: usize,
    default: T,
) -> Result<T, ApiCallErr> {
    if index >= items.len() {
        return Ok(default);
    }
    get_item(items, index)
}

/// Read a parcelable object out of its tagged blob at `index`.
pub fn get_parcel<T: Parcelable>(items: &[Value], index: usize) -> Result<T, ApiCallErr> {
    let item = items
        .get(index)
        .ok_or_else(|| ApiCallErr::internal(format!("missing argument at index {index}")))?;
    parcel_from_value(item)
}

/// Decode a parcelable object from a single tagged value.
pub fn parcel_from_value<T: Parcelable>(value: &Value) -> Result<T, ApiCallErr> {
    let data = value.parcel_data(T::TYPE_ID).ok_or_else(|| {
        ApiCallErr::internal(format!("value is not of type {}", T::TYPE_ID.name()))
    })?;
    T::read_from_parcel(data).map_err(|err| {
        ApiCallErr::internal(format!("decode {} parcel failed: {err}", T::TYPE_ID.name()))
    })
}

/// Serialize a parcelable object under its type tag.
pub fn parcel_to_value<T: Parcelable>(object: &T) -> Result<Value, ApiCallErr> {
    let data = object.write_into_parcel().map_err(|err| {
        ApiCallErr::internal(format!("encode {} parcel failed: {err}", T::TYPE_ID.name()))
    })?;
    Value::from_parcel(T::TYPE_ID, data).ok_or_else(|| {
        ApiCallErr::internal(format!("type {} carries no parcel", T::TYPE_ID.name()))
    })
}

/// Push a primitive result value.
pub fn push_item<T: IntoValueItem>(value: T, out: &mut Vec<Value>) {
    out.push(value.into_value_item());
}

/// Serialize a parcelable under its tag and push it as a result value.
pub fn push_parcel<T: Parcelable>(object: &T, out: &mut Vec<Value>) -> Result<(), ApiCallErr> {
    let value = parcel_to_value(object)?;
    out.push(value);
    Ok(())
}

#[cfg(test)]
#[path = "extern_api_tests.rs"]
mod tests;
