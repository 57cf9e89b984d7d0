//! MailQuery Core - Expression algebra and notation
//!
//! This crate provides the typed expression tree used to describe mail
//! search filters, the renderers that turn a tree into Polish notation or
//! the IMAP SEARCH dialect, and the parser that rebuilds a tree from the
//! nested-map JSON wire format.

pub mod expression;
pub mod notation;

pub use expression::{
    Expression, Filter, FunctionalOperator, LogicalOperator, Operand, OperandList, Operator,
    OperatorFamily, RelationalOperator, ScalarValue,
};
pub use notation::{
    Notation, NotationError, ParseError, PolishNotation, PolishNotationTransformer, Renderable,
    SearchQueryStrategy,
};
