use thiserror::Error;

/// A malformed boolean expression, with the byte offset the problem was
/// detected at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (at byte {position})")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub position: usize,
}

impl SyntaxError {
    pub(crate) fn new(kind: SyntaxErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// The expression contains no tokens at all.
    #[error("empty expression")]
    EmptyExpression,
    /// A `/.../` span never saw its closing slash.
    #[error("unterminated operand")]
    UnterminatedOperand,
    #[error("unbalanced parenthesis")]
    UnbalancedParenthesis,
    /// `()` with nothing inside.
    #[error("empty group")]
    EmptyGroup,
    /// `AND`/`OR` with nothing usable on one of its sides.
    #[error("missing operand")]
    MissingOperand,
    /// One or more `NOT` with nothing after them.
    #[error("dangling NOT")]
    DanglingNot,
    /// Two operands (or groups) next to each other without `AND`/`OR`.
    #[error("expected AND or OR between operands")]
    AdjacentOperands,
    /// Too many nested groups, or an operator chain too long to evaluate.
    #[error("expression nested too deeply")]
    NestingTooDeep,
}
