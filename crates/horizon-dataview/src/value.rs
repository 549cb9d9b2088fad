//! Cell values exchanged between the view, models and renderers.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// A dynamically-typed cell value.
///
/// The view never stores values; it fetches them from the model on demand
/// and hands them to renderers and editors.
#[derive(Clone, Default)]
pub enum CellValue {
    /// No data.
    #[default]
    None,
    /// String data.
    String(String),
    /// Integer data.
    Int(i64),
    /// Floating point data.
    Float(f64),
    /// Boolean data (check boxes, toggles).
    Bool(bool),
    /// Custom data (type-erased). Clones share the payload.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl CellValue {
    /// Creates new custom data from any type.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        CellValue::Custom(Arc::new(value))
    }

    /// Returns `true` if this is `CellValue::None`.
    pub fn is_none(&self) -> bool {
        matches!(self, CellValue::None)
    }

    /// Returns `true` if this contains some data.
    pub fn is_some(&self) -> bool {
        !self.is_none()
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            CellValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Floating point view; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(n) => Some(*n),
            CellValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Downcast custom data.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            CellValue::Custom(data) => data.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Text shown by text renderers and used to seed text editors.
    pub fn display_text(&self) -> String {
        match self {
            CellValue::None | CellValue::Custom(_) => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(n) => n.to_string(),
            CellValue::Bool(b) => b.to_string(),
        }
    }

    /// Parse text typed into an editor into a value of the same kind as
    /// `self`. Returns `None` when the text does not parse.
    pub fn parse_like(&self, text: &str) -> Option<CellValue> {
        match self {
            CellValue::Int(_) => text.trim().parse().ok().map(CellValue::Int),
            CellValue::Float(_) => text.trim().parse().ok().map(CellValue::Float),
            CellValue::Bool(_) => text.trim().parse().ok().map(CellValue::Bool),
            CellValue::Custom(_) => None,
            CellValue::None | CellValue::String(_) => Some(CellValue::String(text.to_string())),
        }
    }

    /// Total ordering used by the default sort comparator.
    ///
    /// `None` sorts first, then booleans, numbers (ints and floats compared
    /// numerically), strings, and custom values, which compare equal.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        fn rank(value: &CellValue) -> u8 {
            match value {
                CellValue::None => 0,
                CellValue::Bool(_) => 1,
                CellValue::Int(_) | CellValue::Float(_) => 2,
                CellValue::String(_) => 3,
                CellValue::Custom(_) => 4,
            }
        }

        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
            (a, b) if rank(a) == 2 && rank(b) == 2 => {
                let (x, y) = (a.as_float().unwrap_or_default(), b.as_float().unwrap_or_default());
                x.total_cmp(&y)
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::None, CellValue::None) => true,
            (CellValue::String(a), CellValue::String(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Float(a), CellValue::Float(b)) => a == b,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            (CellValue::Custom(a), CellValue::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::None => f.write_str("None"),
            CellValue::String(s) => f.debug_tuple("String").field(s).finish(),
            CellValue::Int(n) => f.debug_tuple("Int").field(n).finish(),
            CellValue::Float(n) => f.debug_tuple("Float").field(n).finish(),
            CellValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            CellValue::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Int(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Int(n as i64)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Float(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

static_assertions::assert_impl_all!(CellValue: Send, Sync, Clone);
