//! Notation strategies
//!
//! Renderers turn an [`Expression`] tree (or a bare operator or operand)
//! into a dialect string. The parser in [`transformer`] goes the other way,
//! from the nested-map wire format back to a tree.
//!
//! Supported dialects:
//! - Polish notation: `== id 5`, `|| == a 1 == b 2`
//! - IMAP SEARCH subset: `(UID 1000:*)`, `OR (RECENT) (UID 1000:1001)`

pub mod nested_map;
pub mod polish;
pub mod search_query;
pub mod transformer;

use mailquery_common::NotationKind;
use thiserror::Error;

use crate::expression::{Expression, Operand, Operator};

pub use nested_map::to_nested_map;
pub use polish::PolishNotation;
pub use search_query::SearchQueryStrategy;
pub use transformer::{ParseError, PolishNotationTransformer};

/// Default nesting limit for renderers and the parser
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Rendering errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("Unexpected node type: expected Expression, Operator, or Operand, got {0}")]
    UnexpectedNodeType(String),

    #[error("Expression nesting exceeds the maximum depth of {limit}")]
    DepthExceeded { limit: usize },
}

/// Anything a notation strategy can render
#[derive(Debug, Clone, Copy)]
pub enum Renderable<'a> {
    Expression(&'a Expression),
    Operator(Operator),
    Operand(&'a Operand),
}

impl<'a> From<&'a Expression> for Renderable<'a> {
    fn from(expr: &'a Expression) -> Self {
        Renderable::Expression(expr)
    }
}

impl<'a> From<&'a Operand> for Renderable<'a> {
    fn from(operand: &'a Operand) -> Self {
        Renderable::Operand(operand)
    }
}

impl From<Operator> for Renderable<'_> {
    fn from(operator: Operator) -> Self {
        Renderable::Operator(operator)
    }
}

/// A rendering strategy
pub trait Notation {
    /// Render a target to a dialect string
    fn render(&self, target: Renderable<'_>) -> Result<String, NotationError>;

    fn render_expression(&self, expr: &Expression) -> Result<String, NotationError> {
        self.render(Renderable::Expression(expr))
    }
}

/// Create the strategy for a notation kind
pub fn strategy(kind: NotationKind, max_depth: usize) -> Box<dyn Notation + Send + Sync> {
    match kind {
        NotationKind::Polish => Box::new(PolishNotation::new(max_depth)),
        NotationKind::SearchQuery => Box::new(SearchQueryStrategy::new(max_depth)),
    }
}

pub(crate) fn check_depth(depth: usize, limit: usize) -> Result<(), NotationError> {
    if depth > limit {
        return Err(NotationError::DepthExceeded { limit });
    }
    Ok(())
}
