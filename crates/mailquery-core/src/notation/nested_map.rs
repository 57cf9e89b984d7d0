//! Export of an expression tree to the nested-map wire format
//!
//! This is the inverse of [`PolishNotationTransformer`](super::PolishNotationTransformer):
//!
//! - `op(field, v)`        exports as `{op: {field: v}}`
//! - `op(field, v1, v2..)` exports as `{op: {field: [v1, v2, ..]}}`
//! - anything else         exports as `{op: [operand, ..]}`
//!
//! Only a leading name becomes a map key. Names elsewhere, and leading names
//! the parser would read as operators, export as JSON strings; Polish output
//! does not distinguish the two, so the tree still renders the same after a
//! round trip.

use serde_json::{Map, Value as JsonValue};

use super::{check_depth, NotationError, DEFAULT_MAX_DEPTH};
use crate::expression::{classify, Expression, Operand};

/// Export with the default depth limit
pub fn to_nested_map(expr: &Expression) -> Result<JsonValue, NotationError> {
    to_nested_map_with_depth(expr, DEFAULT_MAX_DEPTH)
}

pub fn to_nested_map_with_depth(
    expr: &Expression,
    max_depth: usize,
) -> Result<JsonValue, NotationError> {
    export(expr, 1, max_depth)
}

fn export(expr: &Expression, depth: usize, max_depth: usize) -> Result<JsonValue, NotationError> {
    check_depth(depth, max_depth)?;

    let operands = expr.operands().as_slice();
    let body = match operands.split_first() {
        Some((Operand::VariableName(name) | Operand::Identifier(name), rest))
            if !rest.is_empty() && is_field_key(name) =>
        {
            single(name, field_value(rest, depth, max_depth)?)
        }
        _ => JsonValue::Array(
            operands
                .iter()
                .map(|operand| operand_value(operand, depth, max_depth))
                .collect::<Result<Vec<_>, _>>()?,
        ),
    };

    Ok(single(expr.operator().symbol(), body))
}

/// A name the parser reads back as a field rather than an operator
fn is_field_key(name: &str) -> bool {
    classify::is_field_name(name) && classify::resolve_alias(name).is_none()
}

fn field_value(rest: &[Operand], depth: usize, max_depth: usize) -> Result<JsonValue, NotationError> {
    let mut values = rest
        .iter()
        .map(|operand| operand_value(operand, depth, max_depth))
        .collect::<Result<Vec<_>, _>>()?;

    if values.len() == 1 {
        Ok(values.remove(0))
    } else {
        Ok(JsonValue::Array(values))
    }
}

fn operand_value(operand: &Operand, depth: usize, max_depth: usize) -> Result<JsonValue, NotationError> {
    match operand {
        Operand::Value(value) => Ok(value.to_json()),
        Operand::VariableName(name) | Operand::Identifier(name) => Ok(JsonValue::String(name.clone())),
        Operand::Expression(child) => export(child, depth + 1, max_depth),
    }
}

fn single(key: &str, value: JsonValue) -> JsonValue {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    JsonValue::Object(map)
}
