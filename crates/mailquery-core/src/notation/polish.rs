//! Polish (prefix) notation renderer

use super::{check_depth, Notation, NotationError, Renderable, DEFAULT_MAX_DEPTH};
use crate::expression::{Expression, Operand};

/// Renders `operator operand...` with no parentheses, recursing pre-order
/// through nested expressions.
#[derive(Debug, Clone, Copy)]
pub struct PolishNotation {
    max_depth: usize,
}

impl PolishNotation {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn expression(&self, expr: &Expression, depth: usize) -> Result<String, NotationError> {
        check_depth(depth, self.max_depth)?;

        let mut out = expr.operator().symbol().to_string();
        for operand in expr.operands() {
            out.push(' ');
            out.push_str(&self.operand(operand, depth)?);
        }
        Ok(out)
    }

    fn operand(&self, operand: &Operand, depth: usize) -> Result<String, NotationError> {
        match operand {
            Operand::Expression(expr) => self.expression(expr, depth + 1),
            leaf => Ok(leaf.to_string()),
        }
    }
}

impl Default for PolishNotation {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Notation for PolishNotation {
    fn render(&self, target: Renderable<'_>) -> Result<String, NotationError> {
        match target {
            Renderable::Expression(expr) => self.expression(expr, 1),
            Renderable::Operator(op) => Ok(op.symbol().to_string()),
            Renderable::Operand(operand) => self.operand(operand, 0),
        }
    }
}
