//! Nested-map parser
//!
//! Rebuilds an [`Expression`] from the decoded JSON wire format, where each
//! single-key object is an operator token (or a field name) and sequences
//! carry operand lists:
//!
//! ```json
//! {"OR": [{"IN": {"id": [1, 2]}}, {"==": {"id": 5}}]}
//! ```
//!
//! Keys are classified logical, then relational, then functional. A key that
//! resolves to no operator is a field name and yields the operands
//! `[VariableName(key), value...]`. How far that fallback reaches is governed
//! by [`FieldFallback`].
//!
//! Depth counts operator levels, the same unit the renderers use, so a tree
//! that renders under a limit also parses back under it. Arrays and field
//! objects between two operators are capped separately.

use mailquery_common::{FieldFallback, FilterConfig};
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;
use tracing::{debug, warn};

use super::{NotationError, DEFAULT_MAX_DEPTH};
use crate::expression::{
    classify, Expression, ExpressionError, Operand, OperandList, RelationalOperator, ScalarValue,
};

/// Filter payload parse errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unrecognized operator token '{token}'")]
    UnrecognizedOperator { token: String },

    #[error("Field name '{key}' is only allowed directly under an operator")]
    AmbiguousFieldFallback { key: String },

    #[error("Filter payload does not describe an expression")]
    NotAnExpression,

    #[error("Empty object in filter payload")]
    EmptyNode,

    #[error("Object with multiple keys ({keys}); use a sequence for multiple operands")]
    MultipleKeys { keys: String },

    #[error("Operator '{operator}' has no operands")]
    EmptyOperands { operator: String },

    #[error("Filter nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    #[error("More than {limit} nested arrays or field objects without an operator")]
    NestingExceeded { limit: usize },

    #[error("Unexpected node type: {0}")]
    UnexpectedNodeType(String),
}

impl From<ExpressionError> for ParseError {
    fn from(err: ExpressionError) -> Self {
        match err {
            ExpressionError::EmptyOperands { operator } => ParseError::EmptyOperands { operator },
        }
    }
}

impl From<NotationError> for ParseError {
    fn from(err: NotationError) -> Self {
        match err {
            NotationError::DepthExceeded { limit } => ParseError::DepthExceeded { limit },
            NotationError::UnexpectedNodeType(kind) => ParseError::UnexpectedNodeType(kind),
        }
    }
}

/// Containers allowed between two operator levels
pub const MAX_CONTAINER_NESTING: usize = 8;

/// Intermediate parse result
#[derive(Debug)]
enum Node {
    Literal(ScalarValue),
    Operands(OperandList),
    Expression(Expression),
}

impl Node {
    fn into_operands(self) -> OperandList {
        match self {
            Node::Literal(value) => OperandList::from(vec![Operand::Value(value)]),
            Node::Operands(list) => list,
            Node::Expression(expr) => OperandList::from(vec![Operand::from(expr)]),
        }
    }
}

/// Where a node sits, which decides whether a field name is allowed there
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Root,
    UnderOperator,
    InSequence,
}

/// Parser from the nested-map wire format to an [`Expression`]
#[derive(Debug, Clone, Copy)]
pub struct PolishNotationTransformer {
    max_depth: usize,
    field_fallback: FieldFallback,
}

impl Default for PolishNotationTransformer {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            field_fallback: FieldFallback::default(),
        }
    }
}

impl PolishNotationTransformer {
    pub fn new(max_depth: usize, field_fallback: FieldFallback) -> Self {
        Self {
            max_depth,
            field_fallback,
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.max_depth, config.field_fallback)
    }

    pub fn field_fallback(&self) -> FieldFallback {
        self.field_fallback
    }

    /// Parse a decoded payload into an expression tree
    pub fn transform(&self, payload: &JsonValue) -> Result<Expression, ParseError> {
        debug!(fallback = ?self.field_fallback, "Parsing filter payload");

        match self.node(payload, 0, 0, Position::Root)? {
            Node::Expression(expr) => Ok(expr),
            // Only a single-field object at the root reaches here: implicit equality
            Node::Operands(operands) if payload.is_object() => {
                Ok(Expression::relational(RelationalOperator::Eq, operands)?)
            }
            _ => Err(ParseError::NotAnExpression),
        }
    }

    fn node(
        &self,
        value: &JsonValue,
        depth: usize,
        nesting: usize,
        position: Position,
    ) -> Result<Node, ParseError> {
        match value {
            JsonValue::Array(items) => {
                let nesting = enter_container(nesting)?;
                self.sequence(items, depth, nesting).map(Node::Operands)
            }
            JsonValue::Object(map) => self.object(map, depth, nesting, position),
            scalar => Ok(Node::Literal(ScalarValue::try_from(scalar)?)),
        }
    }

    fn sequence(
        &self,
        items: &[JsonValue],
        depth: usize,
        nesting: usize,
    ) -> Result<OperandList, ParseError> {
        let mut operands = OperandList::new();
        for item in items {
            match self.node(item, depth, nesting, Position::InSequence)? {
                Node::Literal(value) => operands.push(Operand::Value(value)),
                Node::Operands(list) => operands.extend(list),
                Node::Expression(expr) => operands.push(expr),
            }
        }
        Ok(operands)
    }

    fn object(
        &self,
        map: &Map<String, JsonValue>,
        depth: usize,
        nesting: usize,
        position: Position,
    ) -> Result<Node, ParseError> {
        let mut entries = map.iter();
        let (key, value) = match (entries.next(), entries.next()) {
            (None, _) => return Err(ParseError::EmptyNode),
            (Some(entry), None) => entry,
            (Some(_), Some(_)) => {
                let keys: Vec<&str> = map.keys().map(String::as_str).collect();
                return Err(ParseError::MultipleKeys {
                    keys: keys.join(", "),
                });
            }
        };

        if let Some(operator) = classify::resolve_alias(key) {
            let depth = depth + 1;
            if depth > self.max_depth {
                return Err(ParseError::DepthExceeded {
                    limit: self.max_depth,
                });
            }

            let operands = self
                .node(value, depth, 0, Position::UnderOperator)?
                .into_operands();
            if operands.is_empty() {
                return Err(ParseError::EmptyOperands {
                    operator: key.clone(),
                });
            }
            return Ok(Node::Expression(Expression::new(operator, operands)?));
        }

        self.check_field(key, position)?;
        let nesting = enter_container(nesting)?;

        let mut operands = OperandList::new();
        operands.push(Operand::variable(key.as_str()));
        operands.extend(
            self.node(value, depth, nesting, Position::InSequence)?
                .into_operands(),
        );
        Ok(Node::Operands(operands))
    }

    fn check_field(&self, key: &str, position: Position) -> Result<(), ParseError> {
        match self.field_fallback {
            FieldFallback::Permissive => {
                if classify::looks_like_operator(key) {
                    warn!(token = key, "Unrecognized operator token treated as a field name");
                }
                Ok(())
            }
            FieldFallback::Strict => {
                if classify::looks_like_operator(key) {
                    return Err(ParseError::UnrecognizedOperator {
                        token: key.to_string(),
                    });
                }
                if position != Position::UnderOperator || !classify::is_field_name(key) {
                    return Err(ParseError::AmbiguousFieldFallback {
                        key: key.to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

fn enter_container(nesting: usize) -> Result<usize, ParseError> {
    let nesting = nesting + 1;
    if nesting > MAX_CONTAINER_NESTING {
        return Err(ParseError::NestingExceeded {
            limit: MAX_CONTAINER_NESTING,
        });
    }
    Ok(nesting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{FunctionalOperator, LogicalOperator, Operator, OperatorFamily};
    use crate::notation::{nested_map, Notation, PolishNotation, SearchQueryStrategy};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn strict() -> PolishNotationTransformer {
        PolishNotationTransformer::default()
    }

    fn permissive() -> PolishNotationTransformer {
        PolishNotationTransformer::new(DEFAULT_MAX_DEPTH, FieldFallback::Permissive)
    }

    fn polish(expr: &Expression) -> String {
        PolishNotation::default().render_expression(expr).unwrap()
    }

    #[test]
    fn test_single_field_under_operator() {
        let expr = strict().transform(&json!({"==": {"id": 5}})).unwrap();
        assert_eq!(expr.family(), OperatorFamily::Relational);
        assert_eq!(polish(&expr), "== id 5");
        assert_eq!(
            expr.operands().as_slice(),
            &[Operand::variable("id"), Operand::value(5)]
        );
    }

    #[test]
    fn test_classification_order() {
        let payload = json!({"OR": [{"IN": {"id": [1, 2, 3]}}, {"==": {"id": 5}}]});
        let expr = strict().transform(&payload).unwrap();

        assert_eq!(expr.operator(), Operator::Logical(LogicalOperator::Or));
        let children: Vec<&Expression> = expr
            .operands()
            .iter()
            .filter_map(Operand::as_expression)
            .collect();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].operator(), Operator::Functional(FunctionalOperator::In));
        assert_eq!(children[1].operator(), Operator::Relational(RelationalOperator::Eq));
        assert_eq!(polish(&expr), "|| IN id 1 2 3 == id 5");
    }

    #[test]
    fn test_case_insensitive_tokens() {
        let expr = strict()
            .transform(&json!({"and": [{"=": {"a": 1}}, {"gte": {"b": 2}}]}))
            .unwrap();
        assert_eq!(polish(&expr), "&& == a 1 >= b 2");
    }

    #[test]
    fn test_literal_sequence() {
        let expr = strict().transform(&json!({"==": [1, 2]})).unwrap();
        assert_eq!(polish(&expr), "== 1 2");
    }

    #[test]
    fn test_not_with_single_child() {
        let expr = strict()
            .transform(&json!({"NOT": {"==": {"SEEN": true}}}))
            .unwrap();
        assert_eq!(expr.operator(), Operator::Logical(LogicalOperator::Not));
        assert_eq!(expr.operands().len(), 1);
        assert_eq!(
            SearchQueryStrategy::default().render_expression(&expr).unwrap(),
            "NOT (SEEN)"
        );
    }

    #[test]
    fn test_search_query_from_payload() {
        let payload = json!({"OR": [{"==": {"RECENT": true}}, {">=": {"UID": 1000}}]});
        let expr = strict().transform(&payload).unwrap();
        assert_eq!(
            SearchQueryStrategy::default().render_expression(&expr).unwrap(),
            "OR (RECENT) (UID 1000:*)"
        );
    }

    #[test]
    fn test_strict_rejects_operator_typo() {
        let err = strict().transform(&json!({"==": {"=>": 5}})).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnrecognizedOperator {
                token: "=>".to_string()
            }
        );
    }

    #[test]
    fn test_strict_rejects_field_outside_operator() {
        let err = strict().transform(&json!({"id": 5})).unwrap_err();
        assert_eq!(
            err,
            ParseError::AmbiguousFieldFallback {
                key: "id".to_string()
            }
        );

        let err = strict()
            .transform(&json!({"AND": [{"a": 1}, {"b": 2}]}))
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::AmbiguousFieldFallback {
                key: "a".to_string()
            }
        );
    }

    #[test]
    fn test_strict_rejects_misspelled_keyword() {
        // "ORR" looks like a field name but sits where operators belong
        let err = strict()
            .transform(&json!({"ORR": [{"==": {"a": 1}}]}))
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::AmbiguousFieldFallback {
                key: "ORR".to_string()
            }
        );
    }

    #[test]
    fn test_permissive_operator_typo_becomes_field() {
        let expr = permissive().transform(&json!({"==": {"=>": 5}})).unwrap();
        assert_eq!(polish(&expr), "== => 5");
    }

    #[test]
    fn test_permissive_root_field_is_implicit_equality() {
        let expr = permissive().transform(&json!({"id": 5})).unwrap();
        assert_eq!(expr.operator(), Operator::Relational(RelationalOperator::Eq));
        assert_eq!(polish(&expr), "== id 5");
    }

    #[test]
    fn test_permissive_fields_in_sequence_flatten() {
        let expr = permissive()
            .transform(&json!({"AND": [{"a": 1}, {"b": 2}]}))
            .unwrap();
        assert_eq!(polish(&expr), "&& a 1 b 2");
    }

    #[test]
    fn test_not_an_expression() {
        assert_eq!(strict().transform(&json!(5)).unwrap_err(), ParseError::NotAnExpression);
        assert_eq!(
            permissive().transform(&json!([1, 2])).unwrap_err(),
            ParseError::NotAnExpression
        );
    }

    #[test]
    fn test_empty_and_multi_key_objects() {
        assert_eq!(strict().transform(&json!({})).unwrap_err(), ParseError::EmptyNode);
        assert!(matches!(
            strict().transform(&json!({"==": {"a": 1, "b": 2}})),
            Err(ParseError::MultipleKeys { .. })
        ));
    }

    #[test]
    fn test_empty_operands() {
        assert_eq!(
            strict().transform(&json!({"AND": []})).unwrap_err(),
            ParseError::EmptyOperands {
                operator: "AND".to_string()
            }
        );
    }

    #[test]
    fn test_depth_limit() {
        let payload = json!({"NOT": {"NOT": {"NOT": {"==": {"a": 1}}}}});
        assert!(PolishNotationTransformer::new(4, FieldFallback::Strict)
            .transform(&payload)
            .is_ok());
        assert_eq!(
            PolishNotationTransformer::new(3, FieldFallback::Strict)
                .transform(&payload)
                .unwrap_err(),
            ParseError::DepthExceeded { limit: 3 }
        );
    }

    #[test]
    fn test_depth_limit_matches_renderers() {
        let mut expr = Expression::eq(Operand::variable("a"), Operand::value(1));
        for _ in 1..DEFAULT_MAX_DEPTH {
            expr = Expression::not(expr);
        }
        assert_eq!(expr.depth(), DEFAULT_MAX_DEPTH);

        let rendered = PolishNotation::default().render_expression(&expr).unwrap();
        let payload = nested_map::to_nested_map(&expr).unwrap();
        let parsed = strict().transform(&payload).unwrap();
        assert_eq!(parsed, expr);
        assert_eq!(
            PolishNotation::default().render_expression(&parsed).unwrap(),
            rendered
        );

        let deeper = Expression::not(expr);
        assert_eq!(
            PolishNotation::default().render_expression(&deeper).unwrap_err(),
            NotationError::DepthExceeded {
                limit: DEFAULT_MAX_DEPTH
            }
        );
        let payload = json!({ "!": nested_map::to_nested_map(&parsed).unwrap() });
        assert_eq!(
            strict().transform(&payload).unwrap_err(),
            ParseError::DepthExceeded {
                limit: DEFAULT_MAX_DEPTH
            }
        );
    }

    #[test]
    fn test_large_unsigned_values_survive() {
        let payload = json!({"IN": {"UID": [1, 18446744073709551615u64]}});
        let expr = strict().transform(&payload).unwrap();
        assert_eq!(
            PolishNotation::default().render_expression(&expr).unwrap(),
            "IN UID 1 18446744073709551615"
        );
        assert_eq!(nested_map::to_nested_map(&expr).unwrap(), payload);
    }

    #[test]
    fn test_nested_arrays_without_operator() {
        let flat = json!({"IN": ["id", [[1, 2], [3]]]});
        let expr = strict().transform(&flat).unwrap();
        assert_eq!(expr.operands().len(), 4);

        let mut operands = json!([1]);
        for _ in 0..MAX_CONTAINER_NESTING {
            operands = json!([operands]);
        }
        assert_eq!(
            strict().transform(&json!({ "IN": operands })).unwrap_err(),
            ParseError::NestingExceeded {
                limit: MAX_CONTAINER_NESTING
            }
        );
    }

    #[test]
    fn test_nested_compound_field_value() {
        let err = strict()
            .transform(&json!({"==": {"id": {"x": 1}}}))
            .unwrap_err();
        assert_eq!(
            err,
            ParseError::AmbiguousFieldFallback {
                key: "x".to_string()
            }
        );
    }
}
