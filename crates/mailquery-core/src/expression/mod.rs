//! Expression algebra
//!
//! An expression is one operator applied to an ordered list of operands,
//! where an operand may itself be an expression. Operators come from three
//! closed families: relational (`==`, `!=`, `>`, `<`, `<=`, `>=`), logical
//! (`&&`, `||`, `!`) and functional (`IN`).

pub mod classify;
pub mod filter;
pub mod node;
pub mod operand;
pub mod operator;

pub use filter::Filter;
pub use node::{Expression, ExpressionError, OperandList};
pub use operand::{Operand, ScalarValue};
pub use operator::{
    FunctionalOperator, LogicalOperator, Operator, OperatorError, OperatorFamily,
    RelationalOperator,
};
