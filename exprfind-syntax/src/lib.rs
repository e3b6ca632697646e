//! # Boolean expression syntax for exprfind
//!
//! `exprfind-syntax` turns expressions such as `foo AND NOT (bar OR /x OR y/)`
//! into a binary expression tree. Operands are handed to a caller-supplied
//! builder while parsing, so the tree leaves can be anything from the raw
//! operand text (handy in tests) to fully compiled matchers.
//!
//! Precedence from loosest to tightest is `OR`, `AND`, `NOT`. `AND` must be
//! spelled out: `foo bar` is a syntax error rather than an implicit
//! conjunction.
//!
//! ## Example
//! ```
//! use exprfind_syntax::{parse_outline, Node};
//!
//! let tree = parse_outline("a OR b AND NOT c").unwrap();
//! let Node::Or(left, right) = tree else { panic!() };
//! assert_eq!(*left, Node::Operand("a".to_string()));
//! assert!(matches!(*right, Node::And(_, _)));
//! ```

mod error;
mod lexer;

pub use error::{SyntaxError, SyntaxErrorKind};
pub use lexer::{Operand, Token, TokenKind, tokenize};

use std::fmt;

/// Expression tree over leaves of type `T`.
///
/// Binary nodes are built left-associatively, so `a AND b AND c` becomes
/// `And(And(a, b), c)`. Parentheses only steer the shape and never appear as
/// nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node<T> {
    Operand(T),
    Not(Box<Node<T>>),
    And(Box<Node<T>>, Box<Node<T>>),
    Or(Box<Node<T>>, Box<Node<T>>),
}

impl<T> Node<T> {
    /// Number of leaves in the tree.
    pub fn operand_count(&self) -> usize {
        match self {
            Node::Operand(_) => 1,
            Node::Not(inner) => inner.operand_count(),
            Node::And(left, right) | Node::Or(left, right) => {
                left.operand_count() + right.operand_count()
            }
        }
    }
}

/// Fully parenthesized rendering, e.g. `(a AND (NOT b))`.
impl<T: fmt::Display> fmt::Display for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Operand(value) => write!(f, "{value}"),
            Node::Not(inner) => write!(f, "(NOT {inner})"),
            Node::And(left, right) => write!(f, "({left} AND {right})"),
            Node::Or(left, right) => write!(f, "({left} OR {right})"),
        }
    }
}

/// Tokenizes and parses `input`, building every leaf with `build`.
///
/// `build` receives the operand and the byte offset it starts at. Its error
/// type only has to absorb [`SyntaxError`], which lets pattern compilers
/// report their own failures through the same `Result`.
pub fn parse<T, E, F>(input: &str, build: F) -> Result<Node<T>, E>
where
    F: FnMut(&Operand, usize) -> Result<T, E>,
    E: From<SyntaxError>,
{
    let tokens = tokenize(input)?;
    parse_tokens(&tokens, input.len(), build)
}

/// Parses an already tokenized expression. `end` is the byte length of the
/// source and is used to position errors found after the last token.
pub fn parse_tokens<T, E, F>(tokens: &[Token], end: usize, build: F) -> Result<Node<T>, E>
where
    F: FnMut(&Operand, usize) -> Result<T, E>,
    E: From<SyntaxError>,
{
    Parser {
        tokens,
        index: 0,
        end,
        groups: 0,
        build,
    }
    .parse()
}

/// Parses into a tree whose leaves are the operand texts. Mostly useful for
/// inspecting how an expression groups.
pub fn parse_outline(input: &str) -> Result<Node<String>, SyntaxError> {
    parse(input, |operand, _| Ok(operand.text.clone()))
}

/// Deepest parenthesis nesting accepted by the parser.
pub const MAX_GROUP_DEPTH: usize = 256;

/// Deepest tree accepted by the parser. Every binary operator and every
/// surviving `NOT` adds one level, so this also caps the length of a single
/// `AND`/`OR` chain.
pub const MAX_TREE_DEPTH: usize = 2048;

/// Hand-rolled recursive descent over the token slice. Each precedence level
/// gets its own method; binary levels fold their operands left to right.
///
/// Every level returns the depth of the subtree it built alongside it.
struct Parser<'t, F> {
    tokens: &'t [Token],
    index: usize,
    end: usize,
    groups: usize,
    build: F,
}

impl<'t, T, E, F> Parser<'t, F>
where
    F: FnMut(&Operand, usize) -> Result<T, E>,
    E: From<SyntaxError>,
{
    fn parse(mut self) -> Result<Node<T>, E> {
        if self.tokens.is_empty() {
            return Err(SyntaxError::new(SyntaxErrorKind::EmptyExpression, 0).into());
        }
        let (expr, _) = self.parse_or()?;
        match self.peek() {
            None => Ok(expr),
            Some(token) if token.kind == TokenKind::RParen => Err(self
                .error(SyntaxErrorKind::UnbalancedParenthesis, token.span.start)
                .into()),
            // parse_and already rejects anything that could start an operand
            Some(token) => Err(self
                .error(SyntaxErrorKind::AdjacentOperands, token.span.start)
                .into()),
        }
    }

    fn parse_or(&mut self) -> Result<(Node<T>, usize), E> {
        let (mut left, mut depth) = self.parse_and()?;
        while self.eat(&TokenKind::Or) {
            let operator_at = self.expect_operand_after_operator()?;
            let (right, right_depth) = self.parse_and()?;
            depth = self.one_level_up(depth.max(right_depth), operator_at)?;
            left = Node::Or(Box::new(left), Box::new(right));
        }
        Ok((left, depth))
    }

    fn parse_and(&mut self) -> Result<(Node<T>, usize), E> {
        let (mut left, mut depth) = self.parse_not()?;
        loop {
            if self.eat(&TokenKind::And) {
                let operator_at = self.expect_operand_after_operator()?;
                let (right, right_depth) = self.parse_not()?;
                depth = self.one_level_up(depth.max(right_depth), operator_at)?;
                left = Node::And(Box::new(left), Box::new(right));
                continue;
            }
            match self.peek() {
                Some(token) if starts_operand(&token.kind) => {
                    return Err(self
                        .error(SyntaxErrorKind::AdjacentOperands, token.span.start)
                        .into());
                }
                _ => return Ok((left, depth)),
            }
        }
    }

    // A run of NOTs collapses by parity: odd wraps once, even not at all.
    fn parse_not(&mut self) -> Result<(Node<T>, usize), E> {
        let mut negations = 0usize;
        let mut last_not = None;
        while let Some(token) = self.peek() {
            if token.kind != TokenKind::Not {
                break;
            }
            last_not = Some(token.span.start);
            negations += 1;
            self.index += 1;
        }

        let Some(position) = last_not else {
            return self.parse_atom();
        };
        let dangling = match self.peek() {
            None => true,
            Some(token) => !starts_operand(&token.kind),
        };
        if dangling {
            return Err(self.error(SyntaxErrorKind::DanglingNot, position).into());
        }

        let (atom, depth) = self.parse_atom()?;
        if negations % 2 == 1 {
            let depth = self.one_level_up(depth, position)?;
            Ok((Node::Not(Box::new(atom)), depth))
        } else {
            Ok((atom, depth))
        }
    }

    fn parse_atom(&mut self) -> Result<(Node<T>, usize), E> {
        let Some(token) = self.peek() else {
            return Err(self.error(SyntaxErrorKind::MissingOperand, self.end).into());
        };
        let start = token.span.start;
        match &token.kind {
            TokenKind::Operand(operand) => {
                self.index += 1;
                let leaf = (self.build)(operand, start)?;
                Ok((Node::Operand(leaf), 1))
            }
            TokenKind::LParen => {
                self.index += 1;
                if let Some(next) = self.peek() {
                    if next.kind == TokenKind::RParen {
                        return Err(self.error(SyntaxErrorKind::EmptyGroup, start).into());
                    }
                }
                if self.groups == MAX_GROUP_DEPTH {
                    return Err(self.error(SyntaxErrorKind::NestingTooDeep, start).into());
                }
                self.groups += 1;
                let inner = self.parse_or()?;
                self.groups -= 1;
                if self.eat(&TokenKind::RParen) {
                    Ok(inner)
                } else {
                    Err(self
                        .error(SyntaxErrorKind::UnbalancedParenthesis, start)
                        .into())
                }
            }
            TokenKind::RParen => Err(self
                .error(SyntaxErrorKind::UnbalancedParenthesis, start)
                .into()),
            TokenKind::And | TokenKind::Or | TokenKind::Not => {
                Err(self.error(SyntaxErrorKind::MissingOperand, start).into())
            }
        }
    }

    // `foo AND`, `foo OR )` and `foo AND OR bar` all land here: the token after
    // a binary operator has to be able to start an operand. Returns where the
    // operator starts.
    fn expect_operand_after_operator(&self) -> Result<usize, E> {
        let operator_at = self.tokens[self.index - 1].span.start;
        match self.peek() {
            Some(token) if starts_operand(&token.kind) => Ok(operator_at),
            _ => Err(self
                .error(SyntaxErrorKind::MissingOperand, operator_at)
                .into()),
        }
    }

    fn one_level_up(&self, depth: usize, position: usize) -> Result<usize, E> {
        if depth >= MAX_TREE_DEPTH {
            return Err(self.error(SyntaxErrorKind::NestingTooDeep, position).into());
        }
        Ok(depth + 1)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        match self.peek() {
            Some(token) if &token.kind == kind => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.index)
    }

    fn error(&self, kind: SyntaxErrorKind, position: usize) -> SyntaxError {
        SyntaxError::new(kind, position)
    }
}

fn starts_operand(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Operand(_) | TokenKind::LParen | TokenKind::Not
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> Node<String> {
        Node::Operand(text.to_string())
    }

    fn not(inner: Node<String>) -> Node<String> {
        Node::Not(Box::new(inner))
    }

    fn and(left: Node<String>, right: Node<String>) -> Node<String> {
        Node::And(Box::new(left), Box::new(right))
    }

    fn or(left: Node<String>, right: Node<String>) -> Node<String> {
        Node::Or(Box::new(left), Box::new(right))
    }

    fn err_kind(input: &str) -> SyntaxErrorKind {
        parse_outline(input).unwrap_err().kind
    }

    #[test]
    fn parses_single_operand() {
        assert_eq!(parse_outline("report").unwrap(), leaf("report"));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        assert_eq!(
            parse_outline("a OR b AND c").unwrap(),
            or(leaf("a"), and(leaf("b"), leaf("c")))
        );
        assert_eq!(
            parse_outline("a AND b OR c").unwrap(),
            or(and(leaf("a"), leaf("b")), leaf("c"))
        );
    }

    #[test]
    fn chains_are_left_associative() {
        assert_eq!(
            parse_outline("a AND b AND c").unwrap(),
            and(and(leaf("a"), leaf("b")), leaf("c"))
        );
        assert_eq!(
            parse_outline("a OR b OR c").unwrap(),
            or(or(leaf("a"), leaf("b")), leaf("c"))
        );
    }

    #[test]
    fn not_binds_tighter_than_and() {
        assert_eq!(
            parse_outline("NOT a AND b").unwrap(),
            and(not(leaf("a")), leaf("b"))
        );
        assert_eq!(
            parse_outline("a AND NOT b").unwrap(),
            and(leaf("a"), not(leaf("b")))
        );
        assert_eq!(
            parse_outline("a OR NOT b").unwrap(),
            or(leaf("a"), not(leaf("b")))
        );
    }

    #[test]
    fn groups_override_precedence() {
        assert_eq!(
            parse_outline("(a OR b) AND c").unwrap(),
            and(or(leaf("a"), leaf("b")), leaf("c"))
        );
        assert_eq!(
            parse_outline("NOT (a OR b)").unwrap(),
            not(or(leaf("a"), leaf("b")))
        );
        assert_eq!(parse_outline("((a))").unwrap(), leaf("a"));
    }

    #[test]
    fn not_runs_fold_by_parity() {
        assert_eq!(parse_outline("NOT NOT x").unwrap(), leaf("x"));
        assert_eq!(parse_outline("NOT NOT NOT x").unwrap(), not(leaf("x")));
        assert_eq!(parse_outline("not Not NOT nOt x").unwrap(), leaf("x"));
    }

    #[test]
    fn delimited_operand_is_a_single_leaf() {
        assert_eq!(
            parse_outline("/foo OR bar/ AND baz").unwrap(),
            and(leaf("foo OR bar"), leaf("baz"))
        );
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(err_kind(""), SyntaxErrorKind::EmptyExpression);
        assert_eq!(err_kind("   "), SyntaxErrorKind::EmptyExpression);
    }

    #[test]
    fn missing_operands_are_rejected() {
        assert_eq!(err_kind("foo AND"), SyntaxErrorKind::MissingOperand);
        assert_eq!(err_kind("foo OR"), SyntaxErrorKind::MissingOperand);
        assert_eq!(err_kind("AND foo"), SyntaxErrorKind::MissingOperand);
        assert_eq!(err_kind("foo AND OR bar"), SyntaxErrorKind::MissingOperand);
        assert_eq!(err_kind("(foo AND)"), SyntaxErrorKind::MissingOperand);
    }

    #[test]
    fn dangling_not_is_rejected() {
        assert_eq!(err_kind("NOT"), SyntaxErrorKind::DanglingNot);
        assert_eq!(err_kind("foo AND NOT"), SyntaxErrorKind::DanglingNot);
        assert_eq!(err_kind("NOT NOT AND foo"), SyntaxErrorKind::DanglingNot);
    }

    #[test]
    fn adjacency_is_not_an_implicit_and() {
        assert_eq!(err_kind("foo bar"), SyntaxErrorKind::AdjacentOperands);
        assert_eq!(err_kind("foo (bar)"), SyntaxErrorKind::AdjacentOperands);
        assert_eq!(err_kind("(foo) bar"), SyntaxErrorKind::AdjacentOperands);
        assert_eq!(err_kind("foo NOT bar"), SyntaxErrorKind::AdjacentOperands);
    }

    #[test]
    fn unbalanced_parentheses_are_rejected() {
        assert_eq!(err_kind("(foo OR bar"), SyntaxErrorKind::UnbalancedParenthesis);
        assert_eq!(err_kind("foo OR bar)"), SyntaxErrorKind::UnbalancedParenthesis);
        assert_eq!(err_kind(")"), SyntaxErrorKind::UnbalancedParenthesis);
        assert_eq!(err_kind("((a)"), SyntaxErrorKind::UnbalancedParenthesis);
    }

    #[test]
    fn empty_group_is_rejected() {
        assert_eq!(err_kind("()"), SyntaxErrorKind::EmptyGroup);
        assert_eq!(err_kind("a AND ()"), SyntaxErrorKind::EmptyGroup);
    }

    #[test]
    fn error_positions_point_at_the_culprit() {
        let err = parse_outline("(foo OR bar").unwrap_err();
        assert_eq!(err.position, 0);
        let err = parse_outline("foo bar").unwrap_err();
        assert_eq!(err.position, 4);
        let err = parse_outline("foo AND").unwrap_err();
        assert_eq!(err.position, 4);
        assert_eq!(err.to_string(), "missing operand (at byte 4)");
    }

    #[test]
    fn builder_sees_every_operand_once_in_order() {
        let mut seen = Vec::new();
        let tree: Node<usize> = parse("a AND (b OR NOT c) OR /d e/", |operand, start| {
            seen.push((operand.text.clone(), start));
            Ok::<_, SyntaxError>(seen.len())
        })
        .unwrap();
        assert_eq!(tree.operand_count(), 4);
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 7),
                ("c".to_string(), 16),
                ("d e".to_string(), 22),
            ]
        );
    }

    #[test]
    fn builder_errors_abort_parsing() {
        #[derive(Debug, PartialEq)]
        enum BuildError {
            Syntax(SyntaxError),
            Rejected(String),
        }
        impl From<SyntaxError> for BuildError {
            fn from(err: SyntaxError) -> Self {
                BuildError::Syntax(err)
            }
        }

        let result: Result<Node<()>, BuildError> = parse("good OR bad OR later", |operand, _| {
            if operand.text == "bad" {
                Err(BuildError::Rejected(operand.text.clone()))
            } else {
                Ok(())
            }
        });
        assert_eq!(result.unwrap_err(), BuildError::Rejected("bad".to_string()));
    }

    #[test]
    fn display_is_fully_parenthesized() {
        let tree = parse_outline("a AND NOT b OR c").unwrap();
        assert_eq!(tree.to_string(), "((a AND (NOT b)) OR c)");
    }
}
