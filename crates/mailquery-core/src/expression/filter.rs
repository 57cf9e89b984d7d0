//! Filter wrapper around a parsed expression

use mailquery_common::{FilterConfig, NotationKind};
use serde_json::Value as JsonValue;
use std::fmt;
use tracing::debug;

use super::node::Expression;
use crate::notation::{self, nested_map, NotationError, ParseError, PolishNotationTransformer};

/// A search filter submitted by a client
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    expression: Expression,
}

impl Filter {
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }

    /// Parse a decoded JSON payload
    pub fn from_json(payload: &JsonValue, config: &FilterConfig) -> Result<Self, ParseError> {
        PolishNotationTransformer::from_config(config)
            .transform(payload)
            .map(Self::new)
    }

    /// Decode and parse a raw JSON payload
    pub fn from_json_str(payload: &str, config: &FilterConfig) -> mailquery_common::Result<Self> {
        let value: JsonValue = serde_json::from_str(payload)?;
        Ok(Self::from_json(&value, config)?)
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn into_expression(self) -> Expression {
        self.expression
    }

    /// Render in the given notation
    pub fn to_string_with(&self, kind: NotationKind, max_depth: usize) -> Result<String, NotationError> {
        debug!(notation = %kind, "Rendering filter");
        notation::strategy(kind, max_depth).render_expression(&self.expression)
    }

    /// Render in the notation and depth limit named by `config`
    pub fn render(&self, config: &FilterConfig) -> Result<String, NotationError> {
        self.to_string_with(config.notation, config.max_depth)
    }

    /// Export to the nested-map wire format under the configured depth limit
    pub fn to_json(&self, config: &FilterConfig) -> Result<JsonValue, NotationError> {
        nested_map::to_nested_map_with_depth(&self.expression, config.max_depth)
    }
}

impl From<Expression> for Filter {
    fn from(expression: Expression) -> Self {
        Self::new(expression)
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expression)
    }
}

impl From<ParseError> for mailquery_common::Error {
    fn from(err: ParseError) -> Self {
        mailquery_common::Error::Parse(err.to_string())
    }
}

impl From<NotationError> for mailquery_common::Error {
    fn from(err: NotationError) -> Self {
        mailquery_common::Error::Render(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::Operand;
    use mailquery_common::FieldFallback;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_from_json_str_renders_both_notations() {
        let config = FilterConfig::default();
        let filter =
            Filter::from_json_str(r#"{"OR": [{"==": {"RECENT": true}}, {"IN": {"UID": [1000, 1001]}}]}"#, &config)
                .unwrap();

        assert_eq!(
            filter.to_string_with(NotationKind::Polish, 8).unwrap(),
            "|| == RECENT true IN UID 1000 1001"
        );
        assert_eq!(
            filter.to_string_with(NotationKind::SearchQuery, 8).unwrap(),
            "OR (RECENT) (UID 1000:1001)"
        );
    }

    #[test]
    fn test_render_uses_config() {
        let config = FilterConfig {
            notation: NotationKind::SearchQuery,
            ..FilterConfig::default()
        };
        let filter = Filter::from(Expression::ge(Operand::variable("UID"), Operand::value(1000)));
        assert_eq!(filter.render(&config).unwrap(), "(UID 1000:*)");
        assert_eq!(filter.to_string(), ">= UID 1000");
    }

    #[test]
    fn test_malformed_json_is_validation_error() {
        let err = Filter::from_json_str("{\"==\":", &FilterConfig::default()).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_parse_error_converts_to_client_error() {
        let err = Filter::from_json_str(r#"{"id": 5}"#, &FilterConfig::default()).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.code(), "INVALID_FILTER");

        let config = FilterConfig {
            field_fallback: FieldFallback::Permissive,
            ..FilterConfig::default()
        };
        let filter = Filter::from_json_str(r#"{"id": 5}"#, &config).unwrap();
        assert_eq!(filter.to_string(), "== id 5");
    }

    #[test]
    fn test_to_json_round_trip() {
        let payload = json!({"&&": [{"==": {"SEEN": false}}, {">=": {"UID": 7}}]});
        let filter = Filter::from_json(&payload, &FilterConfig::default()).unwrap();
        assert_eq!(filter.to_json(&FilterConfig::default()).unwrap(), payload);
        assert_eq!(filter.clone().into_expression(), *filter.expression());
    }

    #[test]
    fn test_to_json_uses_configured_depth() {
        let payload = json!({"!": [{"!": [{"==": {"SEEN": false}}]}]});
        let config = FilterConfig {
            max_depth: 3,
            ..FilterConfig::default()
        };
        let filter = Filter::from_json(&payload, &config).unwrap();
        assert_eq!(filter.to_json(&config).unwrap(), payload);

        let shallow = FilterConfig {
            max_depth: 2,
            ..FilterConfig::default()
        };
        assert_eq!(
            filter.to_json(&shallow).unwrap_err(),
            NotationError::DepthExceeded { limit: 2 }
        );
        assert!(filter.render(&shallow).is_err());
    }
}
