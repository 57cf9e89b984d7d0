//! IMAP SEARCH dialect renderer
//!
//! Same prefix shape as [`PolishNotation`](super::PolishNotation), with
//! rewrites for the forms the protocol spells specially. Checked in order
//! against relational and functional expressions:
//!
//! 1. `>= UID n`        renders `(UID n:*)`
//! 2. `IN UID a b`      renders `(UID a:b)`
//! 3. `== FLAG <bool>`  renders `(FLAG)`; the boolean itself is not printed
//!
//! Anything else falls back to prefix rendering with logical connectives
//! spelled as keywords (`OR`, `AND`, `NOT`).

use super::{check_depth, Notation, NotationError, Renderable, DEFAULT_MAX_DEPTH};
use crate::expression::{Expression, FunctionalOperator, Operand, Operator, RelationalOperator};

const UID: &str = "UID";

#[derive(Debug, Clone, Copy)]
pub struct SearchQueryStrategy {
    max_depth: usize,
}

impl SearchQueryStrategy {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    fn expression(&self, expr: &Expression, depth: usize) -> Result<String, NotationError> {
        check_depth(depth, self.max_depth)?;

        if let Some(rewritten) = self.rewrite(expr, depth)? {
            return Ok(rewritten);
        }

        let mut out = self.operator(expr.operator()).to_string();
        for operand in expr.operands() {
            out.push(' ');
            out.push_str(&self.operand(operand, depth)?);
        }
        Ok(out)
    }

    fn rewrite(&self, expr: &Expression, depth: usize) -> Result<Option<String>, NotationError> {
        let operands = expr.operands().as_slice();
        let on_uid = operands.first().and_then(Operand::as_variable_name) == Some(UID);

        match expr.operator() {
            Operator::Relational(RelationalOperator::Ge) if on_uid => {
                let range = self.join(&operands[1..], ":", depth)?;
                Ok(Some(format!("({} {}:*)", UID, range)))
            }
            Operator::Functional(FunctionalOperator::In) if on_uid => {
                let range = self.join(&operands[1..], ":", depth)?;
                Ok(Some(format!("({} {})", UID, range)))
            }
            Operator::Relational(RelationalOperator::Eq) if is_bool_flag(operands) => {
                let flag = self.operand(&operands[0], depth)?;
                Ok(Some(format!("({})", flag)))
            }
            _ => Ok(None),
        }
    }

    fn join(&self, operands: &[Operand], sep: &str, depth: usize) -> Result<String, NotationError> {
        let parts = operands
            .iter()
            .map(|operand| self.operand(operand, depth))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(parts.join(sep))
    }

    fn operator(&self, operator: Operator) -> &'static str {
        match operator {
            Operator::Logical(op) => op.keyword(),
            other => other.symbol(),
        }
    }

    fn operand(&self, operand: &Operand, depth: usize) -> Result<String, NotationError> {
        match operand {
            Operand::Expression(expr) => self.expression(expr, depth + 1),
            leaf => Ok(leaf.to_string()),
        }
    }
}

fn is_bool_flag(operands: &[Operand]) -> bool {
    operands
        .get(1)
        .and_then(Operand::as_value)
        .and_then(|value| value.as_bool())
        .is_some()
}

impl Default for SearchQueryStrategy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl Notation for SearchQueryStrategy {
    fn render(&self, target: Renderable<'_>) -> Result<String, NotationError> {
        match target {
            Renderable::Expression(expr) => self.expression(expr, 1),
            Renderable::Operator(op) => Ok(self.operator(op).to_string()),
            Renderable::Operand(operand) => self.operand(operand, 0),
        }
    }
}
