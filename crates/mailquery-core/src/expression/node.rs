//! Expression tree nodes

use serde_json::Value as JsonValue;
use std::fmt;
use thiserror::Error;

use super::operand::{expression_json, Operand};
use super::operator::{
    FunctionalOperator, LogicalOperator, Operator, OperatorFamily, RelationalOperator,
};

/// Expression construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("Operator '{operator}' requires at least one operand")]
    EmptyOperands { operator: String },
}

/// Ordered operands of an expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperandList(Vec<Operand>);

impl OperandList {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, operand: impl Into<Operand>) {
        self.0.push(operand.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Operand> {
        self.0.get(index)
    }

    pub fn first(&self) -> Option<&Operand> {
        self.0.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Operand> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Operand] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<Operand> {
        self.0
    }
}

impl From<Vec<Operand>> for OperandList {
    fn from(operands: Vec<Operand>) -> Self {
        Self(operands)
    }
}

impl FromIterator<Operand> for OperandList {
    fn from_iter<I: IntoIterator<Item = Operand>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Operand> for OperandList {
    fn extend<I: IntoIterator<Item = Operand>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for OperandList {
    type Item = Operand;
    type IntoIter = std::vec::IntoIter<Operand>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a OperandList {
    type Item = &'a Operand;
    type IntoIter = std::slice::Iter<'a, Operand>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// An operator applied to an ordered, non-empty operand list.
///
/// The family of the expression is the family of its operator, so a
/// relational expression can never carry a logical operator. Nodes are
/// immutable once built and own their operands exclusively.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    operator: Operator,
    operands: OperandList,
}

impl Expression {
    /// Build an expression from any operator and operand list
    pub fn new(
        operator: impl Into<Operator>,
        operands: impl Into<OperandList>,
    ) -> Result<Self, ExpressionError> {
        let operator = operator.into();
        let operands = operands.into();
        if operands.is_empty() {
            return Err(ExpressionError::EmptyOperands {
                operator: operator.symbol().to_string(),
            });
        }
        Ok(Self { operator, operands })
    }

    /// Build a relational expression
    pub fn relational(
        operator: RelationalOperator,
        operands: impl Into<OperandList>,
    ) -> Result<Self, ExpressionError> {
        Self::new(operator, operands)
    }

    /// Build a logical expression
    pub fn logical(
        operator: LogicalOperator,
        operands: impl Into<OperandList>,
    ) -> Result<Self, ExpressionError> {
        Self::new(operator, operands)
    }

    /// Build a functional expression
    pub fn functional(
        operator: FunctionalOperator,
        operands: impl Into<OperandList>,
    ) -> Result<Self, ExpressionError> {
        Self::new(operator, operands)
    }

    fn binary(operator: impl Into<Operator>, lhs: Operand, rhs: Operand) -> Self {
        Self {
            operator: operator.into(),
            operands: OperandList(vec![lhs, rhs]),
        }
    }

    pub fn eq(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Self {
        Self::binary(RelationalOperator::Eq, lhs.into(), rhs.into())
    }

    pub fn ne(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Self {
        Self::binary(RelationalOperator::Ne, lhs.into(), rhs.into())
    }

    pub fn gt(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Self {
        Self::binary(RelationalOperator::Gt, lhs.into(), rhs.into())
    }

    pub fn lt(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Self {
        Self::binary(RelationalOperator::Lt, lhs.into(), rhs.into())
    }

    pub fn le(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Self {
        Self::binary(RelationalOperator::Le, lhs.into(), rhs.into())
    }

    pub fn ge(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Self {
        Self::binary(RelationalOperator::Ge, lhs.into(), rhs.into())
    }

    pub fn and(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Self {
        Self::binary(LogicalOperator::And, lhs.into(), rhs.into())
    }

    pub fn or(lhs: impl Into<Operand>, rhs: impl Into<Operand>) -> Self {
        Self::binary(LogicalOperator::Or, lhs.into(), rhs.into())
    }

    pub fn not(operand: impl Into<Operand>) -> Self {
        Self {
            operator: LogicalOperator::Not.into(),
            operands: OperandList(vec![operand.into()]),
        }
    }

    /// `IN` over a subject followed by its candidate values
    pub fn is_in<I>(subject: impl Into<Operand>, candidates: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Operand>,
    {
        let mut operands = vec![subject.into()];
        operands.extend(candidates.into_iter().map(Into::into));
        Self {
            operator: FunctionalOperator::In.into(),
            operands: OperandList(operands),
        }
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operands(&self) -> &OperandList {
        &self.operands
    }

    pub fn family(&self) -> OperatorFamily {
        self.operator.family()
    }

    /// Nesting depth, a leaf-only expression has depth 1
    pub fn depth(&self) -> usize {
        1 + self
            .operands
            .iter()
            .filter_map(Operand::as_expression)
            .map(Expression::depth)
            .max()
            .unwrap_or(0)
    }

    /// Structural JSON export: `{"operator": "==", "operands": [..]}`
    pub fn to_json(&self) -> JsonValue {
        expression_json(self.operator.symbol(), self.operands.as_slice())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operator)?;
        for operand in &self.operands {
            write!(f, " {}", operand)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_smart_constructors_fix_operator() {
        let expr = Expression::eq(Operand::variable("id"), Operand::value(5));
        assert_eq!(expr.operator(), Operator::Relational(RelationalOperator::Eq));
        assert_eq!(expr.family(), OperatorFamily::Relational);
        assert_eq!(expr.operands().len(), 2);

        let expr = Expression::or(expr.clone(), expr);
        assert_eq!(expr.family(), OperatorFamily::Logical);

        let expr = Expression::is_in(Operand::variable("UID"), [Operand::value(1), Operand::value(2)]);
        assert_eq!(expr.family(), OperatorFamily::Functional);
        assert_eq!(expr.operands().len(), 3);
    }

    #[test]
    fn test_new_rejects_empty_operands() {
        let err = Expression::new(LogicalOperator::And, OperandList::new()).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::EmptyOperands {
                operator: "&&".to_string()
            }
        );
    }

    #[test]
    fn test_family_constructors() {
        let expr = Expression::functional(
            FunctionalOperator::In,
            vec![Operand::variable("id"), Operand::value(1)],
        )
        .unwrap();
        assert_eq!(expr.family(), OperatorFamily::Functional);

        let expr = Expression::logical(LogicalOperator::Not, vec![Operand::value(true)]).unwrap();
        assert_eq!(expr.operator(), Operator::Logical(LogicalOperator::Not));
    }

    #[test]
    fn test_display_is_prefix() {
        let expr = Expression::le(
            Expression::ne(Operand::variable("x"), Operand::variable("y")),
            Expression::gt(Operand::variable("a"), Operand::variable("b")),
        );
        assert_eq!(expr.to_string(), "<= != x y > a b");
    }

    #[test]
    fn test_depth() {
        let leaf = Expression::eq(Operand::variable("id"), Operand::value(5));
        assert_eq!(leaf.depth(), 1);
        let tree = Expression::not(Expression::or(leaf.clone(), leaf));
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn test_to_json() {
        let expr = Expression::and(
            Expression::eq(Operand::variable("id"), Operand::value(5)),
            Operand::value(true),
        );
        assert_eq!(
            expr.to_json(),
            json!({
                "operator": "&&",
                "operands": [
                    {"operator": "==", "operands": ["id", 5]},
                    true
                ]
            })
        );
    }
}
