use exprfind_syntax::SyntaxError;
use thiserror::Error;

/// An operand that is not a valid pattern under the active mode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid pattern {operand:?}: {reason}")]
pub struct PatternError {
    pub operand: String,
    pub reason: String,
}

impl PatternError {
    pub(crate) fn new(operand: &str, reason: impl Into<String>) -> Self {
        Self {
            operand: operand.to_string(),
            reason: reason.into(),
        }
    }
}

/// Everything that can go wrong while compiling an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error("{source} (at byte {position})")]
    Pattern {
        source: PatternError,
        position: usize,
    },
}

pub type Result<T> = std::result::Result<T, ExprError>;
