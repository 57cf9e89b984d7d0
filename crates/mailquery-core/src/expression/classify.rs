//! Operator token classification shared by the parser and the renderers

use super::operator::{FunctionalOperator, LogicalOperator, Operator, RelationalOperator};

/// Characters that only ever appear in symbolic operator tokens
const OPERATOR_SYMBOLS: &[char] = &['=', '!', '<', '>', '&', '|'];

pub fn is_logical(token: &str) -> bool {
    LogicalOperator::from_token(token).is_some()
}

pub fn is_relational(token: &str) -> bool {
    RelationalOperator::from_token(token).is_some()
}

pub fn is_functional(token: &str) -> bool {
    FunctionalOperator::from_token(token).is_some()
}

/// Resolve a token against all families, in the order logical, relational,
/// functional
pub fn resolve_alias(token: &str) -> Option<Operator> {
    LogicalOperator::from_token(token)
        .map(Operator::Logical)
        .or_else(|| RelationalOperator::from_token(token).map(Operator::Relational))
        .or_else(|| FunctionalOperator::from_token(token).map(Operator::Functional))
}

/// Whether an unresolved token is likely a mistyped symbolic operator
pub fn looks_like_operator(token: &str) -> bool {
    token.chars().any(|c| OPERATOR_SYMBOLS.contains(&c))
}

/// Whether a token is a plausible field name: `[A-Za-z_][A-Za-z0-9_.-]*`
pub fn is_field_name(token: &str) -> bool {
    let mut chars = token.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
