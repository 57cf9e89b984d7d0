//! Operator taxonomy
//!
//! Three closed operator families. Every variant has a canonical symbol and
//! a fixed table of alias tokens, matched case-insensitively.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::classify;

/// Operator lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    #[error("No operator matches token '{token}'")]
    NoMatchingOperator { token: String },
}

impl OperatorError {
    fn no_match(token: &str) -> Self {
        OperatorError::NoMatchingOperator {
            token: token.to_string(),
        }
    }
}

fn matches_alias(aliases: &[&str], token: &str) -> bool {
    aliases.iter().any(|alias| alias.eq_ignore_ascii_case(token))
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationalOperator {
    Eq,
    Ne,
    Gt,
    Lt,
    Le,
    Ge,
}

impl RelationalOperator {
    pub const ALL: [RelationalOperator; 6] = [
        RelationalOperator::Eq,
        RelationalOperator::Ne,
        RelationalOperator::Gt,
        RelationalOperator::Lt,
        RelationalOperator::Le,
        RelationalOperator::Ge,
    ];

    /// Canonical symbol
    pub fn symbol(self) -> &'static str {
        match self {
            RelationalOperator::Eq => "==",
            RelationalOperator::Ne => "!=",
            RelationalOperator::Gt => ">",
            RelationalOperator::Lt => "<",
            RelationalOperator::Le => "<=",
            RelationalOperator::Ge => ">=",
        }
    }

    /// Accepted tokens, canonical symbol first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            RelationalOperator::Eq => &["==", "=", "EQ"],
            RelationalOperator::Ne => &["!=", "<>", "NE", "NEQ"],
            RelationalOperator::Gt => &[">", "GT"],
            RelationalOperator::Lt => &["<", "LT"],
            RelationalOperator::Le => &["<=", "LE", "LTE"],
            RelationalOperator::Ge => &[">=", "GE", "GTE"],
        }
    }

    /// Resolve an alias token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| matches_alias(op.aliases(), token))
    }
}

/// Boolean connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
    Not,
}

impl LogicalOperator {
    pub const ALL: [LogicalOperator; 3] = [
        LogicalOperator::And,
        LogicalOperator::Or,
        LogicalOperator::Not,
    ];

    /// Canonical symbol
    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOperator::And => "&&",
            LogicalOperator::Or => "||",
            LogicalOperator::Not => "!",
        }
    }

    /// Accepted tokens, canonical symbol first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            LogicalOperator::And => &["&&", "AND"],
            LogicalOperator::Or => &["||", "OR"],
            LogicalOperator::Not => &["!", "NOT"],
        }
    }

    /// Keyword form used by dialects without symbolic connectives
    pub fn keyword(self) -> &'static str {
        match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Not => "NOT",
        }
    }

    /// Resolve an alias token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| matches_alias(op.aliases(), token))
    }
}

/// Function-style operators taking an operand list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionalOperator {
    In,
}

impl FunctionalOperator {
    pub const ALL: [FunctionalOperator; 1] = [FunctionalOperator::In];

    /// Canonical symbol
    pub fn symbol(self) -> &'static str {
        match self {
            FunctionalOperator::In => "IN",
        }
    }

    /// Accepted tokens, canonical symbol first
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FunctionalOperator::In => &["IN"],
        }
    }

    /// Resolve an alias token
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|op| matches_alias(op.aliases(), token))
    }
}

/// Operator family tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorFamily {
    Relational,
    Logical,
    Functional,
}

impl fmt::Display for OperatorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorFamily::Relational => write!(f, "relational"),
            OperatorFamily::Logical => write!(f, "logical"),
            OperatorFamily::Functional => write!(f, "functional"),
        }
    }
}

/// Any operator, tagged by family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Relational(RelationalOperator),
    Logical(LogicalOperator),
    Functional(FunctionalOperator),
}

impl Operator {
    pub fn family(self) -> OperatorFamily {
        match self {
            Operator::Relational(_) => OperatorFamily::Relational,
            Operator::Logical(_) => OperatorFamily::Logical,
            Operator::Functional(_) => OperatorFamily::Functional,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Relational(op) => op.symbol(),
            Operator::Logical(op) => op.symbol(),
            Operator::Functional(op) => op.symbol(),
        }
    }
}

impl From<RelationalOperator> for Operator {
    fn from(op: RelationalOperator) -> Self {
        Operator::Relational(op)
    }
}

impl From<LogicalOperator> for Operator {
    fn from(op: LogicalOperator) -> Self {
        Operator::Logical(op)
    }
}

impl From<FunctionalOperator> for Operator {
    fn from(op: FunctionalOperator) -> Self {
        Operator::Functional(op)
    }
}

impl fmt::Display for RelationalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for FunctionalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for RelationalOperator {
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| OperatorError::no_match(s))
    }
}

impl FromStr for LogicalOperator {
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| OperatorError::no_match(s))
    }
}

impl FromStr for FunctionalOperator {
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_token(s).ok_or_else(|| OperatorError::no_match(s))
    }
}

impl FromStr for Operator {
    type Err = OperatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        classify::resolve_alias(s).ok_or_else(|| OperatorError::no_match(s))
    }
}
