//! Operand model
//!
//! Leaf values that appear inside expressions: literal values, field
//! references and generic identifiers. A nested [`Expression`] is also an
//! operand, which is how trees are formed.

use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;

use super::node::Expression;
use crate::notation::NotationError;

/// A literal scalar carried by [`Operand::Value`]
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Integer(i64),
    /// Integers above `i64::MAX`
    Unsigned(u64),
    Float(f64),
    String(String),
}

impl ScalarValue {
    /// Returns the boolean if this is a boolean literal
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to a JSON scalar
    pub fn to_json(&self) -> JsonValue {
        match self {
            ScalarValue::Null => JsonValue::Null,
            ScalarValue::Bool(b) => JsonValue::Bool(*b),
            ScalarValue::Integer(i) => JsonValue::Number((*i).into()),
            ScalarValue::Unsigned(u) => JsonValue::Number((*u).into()),
            // NaN and infinities have no JSON form
            ScalarValue::Float(f) => Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            ScalarValue::String(s) => JsonValue::String(s.clone()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => Ok(()),
            ScalarValue::Bool(true) => write!(f, "true"),
            ScalarValue::Bool(false) => write!(f, "false"),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Unsigned(u) => write!(f, "{}", u),
            ScalarValue::Float(v) => write!(f, "{}", v),
            ScalarValue::String(s) => write!(f, "{}", s),
        }
    }
}

impl TryFrom<&JsonValue> for ScalarValue {
    type Error = NotationError;

    fn try_from(value: &JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Null => Ok(ScalarValue::Null),
            JsonValue::Bool(b) => Ok(ScalarValue::Bool(*b)),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(ScalarValue::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(ScalarValue::Unsigned(u))
                } else {
                    n.as_f64()
                        .map(ScalarValue::Float)
                        .ok_or_else(|| NotationError::UnexpectedNodeType(n.to_string()))
                }
            }
            JsonValue::String(s) => Ok(ScalarValue::String(s.clone())),
            JsonValue::Array(_) => Err(NotationError::UnexpectedNodeType("array".to_string())),
            JsonValue::Object(_) => Err(NotationError::UnexpectedNodeType("object".to_string())),
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(b: bool) -> Self {
        ScalarValue::Bool(b)
    }
}

impl From<i64> for ScalarValue {
    fn from(i: i64) -> Self {
        ScalarValue::Integer(i)
    }
}

impl From<i32> for ScalarValue {
    fn from(i: i32) -> Self {
        ScalarValue::Integer(i64::from(i))
    }
}

impl From<u32> for ScalarValue {
    fn from(i: u32) -> Self {
        ScalarValue::Integer(i64::from(i))
    }
}

impl From<u64> for ScalarValue {
    fn from(u: u64) -> Self {
        i64::try_from(u).map_or(ScalarValue::Unsigned(u), ScalarValue::Integer)
    }
}

impl From<f64> for ScalarValue {
    fn from(f: f64) -> Self {
        ScalarValue::Float(f)
    }
}

impl From<&str> for ScalarValue {
    fn from(s: &str) -> Self {
        ScalarValue::String(s.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(s: String) -> Self {
        ScalarValue::String(s)
    }
}

/// An argument of an expression
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Literal value
    Value(ScalarValue),
    /// Symbolic field reference, e.g. `UID` or `subject`
    VariableName(String),
    /// Generic identifier
    Identifier(String),
    /// Nested sub-expression
    Expression(Box<Expression>),
}

impl Operand {
    /// Create a literal value operand
    pub fn value(value: impl Into<ScalarValue>) -> Self {
        Operand::Value(value.into())
    }

    /// Create a field reference operand
    pub fn variable(name: impl Into<String>) -> Self {
        Operand::VariableName(name.into())
    }

    /// Create an identifier operand
    pub fn identifier(name: impl Into<String>) -> Self {
        Operand::Identifier(name.into())
    }

    /// Returns the field name if this is a [`Operand::VariableName`]
    pub fn as_variable_name(&self) -> Option<&str> {
        match self {
            Operand::VariableName(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Returns the literal if this is a [`Operand::Value`]
    pub fn as_value(&self) -> Option<&ScalarValue> {
        match self {
            Operand::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the nested expression if this is a [`Operand::Expression`]
    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Operand::Expression(expr) => Some(&**expr),
            _ => None,
        }
    }

    /// Single-element array export
    pub fn to_array(&self) -> Vec<JsonValue> {
        vec![self.to_json()]
    }

    /// JSON export. Names export as strings, nested expressions as
    /// `{"operator": .., "operands": [..]}`
    pub fn to_json(&self) -> JsonValue {
        match self {
            Operand::Value(value) => value.to_json(),
            Operand::VariableName(name) | Operand::Identifier(name) => {
                JsonValue::String(name.clone())
            }
            Operand::Expression(expr) => expr.to_json(),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(value) => write!(f, "{}", value),
            Operand::VariableName(name) | Operand::Identifier(name) => write!(f, "{}", name),
            Operand::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

impl From<Expression> for Operand {
    fn from(expr: Expression) -> Self {
        Operand::Expression(Box::new(expr))
    }
}

impl From<ScalarValue> for Operand {
    fn from(value: ScalarValue) -> Self {
        Operand::Value(value)
    }
}

pub(crate) fn expression_json(operator: &str, operands: &[Operand]) -> JsonValue {
    let mut map = Map::new();
    map.insert("operator".to_string(), JsonValue::String(operator.to_string()));
    map.insert(
        "operands".to_string(),
        JsonValue::Array(operands.iter().map(Operand::to_json).collect()),
    );
    JsonValue::Object(map)
}
