//! Named scalar properties attachable to elements and sub-shapes

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Integer(i32),
    Double(f64),
    String(String),
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl std::fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
        }
    }
}

/// Callbacks for each typed entry of a [`PropertyTable`]
pub trait PropertyVisitor {
    fn visit_integer(&mut self, _name: &str, _value: i32) {}
    fn visit_double(&mut self, _name: &str, _value: f64) {}
    fn visit_string(&mut self, _name: &str, _value: &str) {}
}

/// Insertion-ordered name → value table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyTable {
    values: IndexMap<String, PropertyValue>,
}

impl PropertyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite; returns the previous value
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        self.values.shift_remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Dispatches every entry to the typed callback, in insertion order
    pub fn accept<V: PropertyVisitor + ?Sized>(&self, visitor: &mut V) {
        for (name, value) in &self.values {
            match value {
                PropertyValue::Integer(v) => visitor.visit_integer(name, *v),
                PropertyValue::Double(v) => visitor.visit_double(name, *v),
                PropertyValue::String(v) => visitor.visit_string(name, v),
            }
        }
    }
}
