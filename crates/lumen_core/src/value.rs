//! Animatable values
//!
//! A [`Value`] is what a keyframe stores and what a track produces each frame.
//! The set of kinds is closed so interpolation can be an exhaustive match.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Keyed collection of values, ordered by insertion
pub type Mapping = IndexMap<String, Value>;

/// A value that can be held by a keyframe
///
/// Serialized externally tagged by kind, e.g. `{ float = 0.5 }` in TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Integral number. Interpolating two `Int`s yields an `Int` (truncated).
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Boolean flag (step interpolation)
    Flag(bool),
    /// Text (step interpolation)
    Text(String),
    /// Fixed-shape numeric tuple such as an RGB color or a 2D/3D position
    Vector(Vec<Value>),
    /// Variable-length list
    Sequence(Vec<Value>),
    /// Keyed record
    Mapping(Mapping),
}

impl Value {
    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Flag(_) => "flag",
            Value::Text(_) => "text",
            Value::Vector(_) => "vector",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }

    /// Whether this is an `Int` or a `Float`
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Numeric value as `f64` (`Int` is widened)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric value as `i64` (`Float` is truncated toward zero)
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Flag(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Components of a `Vector` or items of a `Sequence`
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::Vector(v) | Value::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// Numeric components of a `Vector`/`Sequence` as `f64`
    ///
    /// Returns `None` if any component is not a number.
    pub fn to_f64_vec(&self) -> Option<Vec<f64>> {
        self.as_slice()?.iter().map(Value::as_f64).collect()
    }

    /// Interpret a 3-component vector as an RGB color
    ///
    /// Components are clamped to `0..=255` and truncated.
    pub fn as_rgb(&self) -> Option<[u8; 3]> {
        match self.as_slice()? {
            [r, g, b] => Some([channel(r)?, channel(g)?, channel(b)?]),
            _ => None,
        }
    }

    /// Interpret a 2-component vector as a point
    pub fn as_point(&self) -> Option<(f64, f64)> {
        match self.as_slice()? {
            [x, y] => Some((x.as_f64()?, y.as_f64()?)),
            _ => None,
        }
    }
}

fn channel(value: &Value) -> Option<u8> {
    value.as_f64().map(|v| v.clamp(0.0, 255.0) as u8)
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Flag(v)
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Int(v as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Vector(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::Vector(vec![a.into(), b.into(), c.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>, D: Into<Value>> From<(A, B, C, D)>
    for Value
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Value::Vector(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

/// Fixed-size arrays become vectors
impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(v: [T; N]) -> Self {
        Value::Vector(v.into_iter().map(Into::into).collect())
    }
}

/// Growable lists become sequences
impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for Value {
    fn from(m: Mapping) -> Self {
        Value::Mapping(m)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Value::Mapping(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
