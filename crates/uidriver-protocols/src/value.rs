//! Tagged boundary values and the parcel trait.
//!
//! Every value crossing the external boundary travels as a
//! `{"type": <tag>, "value": <payload>}` object. The tag integers are
//! fixed protocol shared with the front-end.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::geometry::Rect;

/// Wire tag of a boundary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeId {
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,
    By = 5,
    Widget = 6,
    Rect = 7,
}

impl TypeId {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(TypeId::Bool),
            2 => Some(TypeId::Int),
            3 => Some(TypeId::Float),
            4 => Some(TypeId::String),
            5 => Some(TypeId::By),
            6 => Some(TypeId::Widget),
            7 => Some(TypeId::Rect),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TypeId::Bool => "BOOL",
            TypeId::Int => "INT",
            TypeId::Float => "FLOAT",
            TypeId::String => "STRING",
            TypeId::By => "BY",
            TypeId::Widget => "WIDGET",
            TypeId::Rect => "RECT",
        }
    }
}

/// A tagged value. Primitive tags carry their payload directly; the object
/// tags (BY, WIDGET, RECT) carry the serialized parcel of the object.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    By(serde_json::Value),
    Widget(serde_json::Value),
    Rect(serde_json::Value),
}

impl Value {
    pub fn type_id(&self) -> TypeId {
        match self {
            Value::Bool(_) => TypeId::Bool,
            Value::Int(_) => TypeId::Int,
            Value::Float(_) => TypeId::Float,
            Value::String(_) => TypeId::String,
            Value::By(_) => TypeId::By,
            Value::Widget(_) => TypeId::Widget,
            Value::Rect(_) => TypeId::Rect,
        }
    }

    /// Wrap a parcel payload under its object tag. `None` for primitive
    /// tags, which do not carry parcels.
    pub fn from_parcel(tag: TypeId, data: serde_json::Value) -> Option<Self> {
        match tag {
            TypeId::By => Some(Value::By(data)),
            TypeId::Widget => Some(Value::Widget(data)),
            TypeId::Rect => Some(Value::Rect(data)),
            _ => None,
        }
    }

    /// Parcel payload of an object-tagged value, when its tag is `tag`.
    pub fn parcel_data(&self, tag: TypeId) -> Option<&serde_json::Value> {
        match (self, tag) {
            (Value::By(data), TypeId::By) => Some(data),
            (Value::Widget(data), TypeId::Widget) => Some(data),
            (Value::Rect(data), TypeId::Rect) => Some(data),
            _ => None,
        }
    }

    /// The `{"type", "value"}` wire form.
    pub fn to_wire(&self) -> serde_json::Value {
        let payload = match self {
            Value::Bool(v) => serde_json::json!(v),
            Value::Int(v) => serde_json::json!(v),
            Value::Float(v) => serde_json::json!(v),
            Value::String(v) => serde_json::json!(v),
            Value::By(data) | Value::Widget(data) | Value::Rect(data) => data.clone(),
        };
        serde_json::json!({ "type": self.type_id() as u8, "value": payload })
    }

    fn from_wire(tag: u8, payload: serde_json::Value) -> Result<Self, String> {
        let type_id = TypeId::from_raw(tag).ok_or_else(|| format!("unknown value tag {tag}"))?;
        let value = match type_id {
            TypeId::Bool => Value::Bool(payload.as_bool().ok_or("BOOL payload is not a boolean")?),
            TypeId::Int => Value::Int(payload.as_i64().ok_or("INT payload is not an integer")?),
            TypeId::Float => Value::Float(payload.as_f64().ok_or("FLOAT payload is not a number")?),
            TypeId::String => match payload {
                serde_json::Value::String(text) => Value::String(text),
                _ => return Err("STRING payload is not a string".into()),
            },
            TypeId::By => Value::By(payload),
            TypeId::Widget => Value::Widget(payload),
            TypeId::Rect => Value::Rect(payload),
        };
        Ok(value)
    }
}

#[derive(Serialize, Deserialize)]
struct WireValue {
    #[serde(rename = "type")]
    tag: u8,
    value: serde_json::Value,
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireValue::deserialize(deserializer)?;
        Value::from_wire(wire.tag, wire.value).map_err(D::Error::custom)
    }
}

/// Failed to encode or decode a parcel payload.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ParcelError(String);

impl ParcelError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

impl From<serde_json::Error> for ParcelError {
    fn from(err: serde_json::Error) -> Self {
        Self(err.to_string())
    }
}

/// An object that writes itself into / reads itself from the payload of a
/// boundary value and advertises its type tag.
pub trait Parcelable: Sized {
    const TYPE_ID: TypeId;

    fn write_into_parcel(&self) -> Result<serde_json::Value, ParcelError>;

    fn read_from_parcel(data: &serde_json::Value) -> Result<Self, ParcelError>;
}

impl Parcelable for Rect {
    const TYPE_ID: TypeId = TypeId::Rect;

    fn write_into_parcel(&self) -> Result<serde_json::Value, ParcelError> {
        Ok(serde_json::to_value(self)?)
    }

    fn read_from_parcel(data: &serde_json::Value) -> Result<Self, ParcelError> {
        Ok(serde_json::from_value(data.clone())?)
    }
}
