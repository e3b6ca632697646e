#![allow(dead_code)]
//! Shared helpers for `exprfind-syntax` integration tests.

use exprfind_syntax::*;

pub fn parse_ok(input: &str) -> Node<String> {
    match parse_outline(input) {
        Ok(tree) => tree,
        Err(err) => panic!("failed to parse {input:?}: {err}"),
    }
}

pub fn parse_err(input: &str) -> SyntaxError {
    match parse_outline(input) {
        Ok(tree) => panic!("expected {input:?} to fail, got: {tree}"),
        Err(err) => err,
    }
}

pub fn as_and(expr: &Node<String>) -> (&Node<String>, &Node<String>) {
    match expr {
        Node::And(left, right) => (left, right),
        other => panic!("expected And, got: {other:?}"),
    }
}

pub fn as_or(expr: &Node<String>) -> (&Node<String>, &Node<String>) {
    match expr {
        Node::Or(left, right) => (left, right),
        other => panic!("expected Or, got: {other:?}"),
    }
}

pub fn as_not(expr: &Node<String>) -> &Node<String> {
    match expr {
        Node::Not(inner) => inner,
        other => panic!("expected Not, got: {other:?}"),
    }
}

pub fn operand_is(expr: &Node<String>, expected: &str) {
    match expr {
        Node::Operand(text) => assert_eq!(text, expected),
        other => panic!("expected Operand, got: {other:?}"),
    }
}

/// Leaves in left-to-right order.
pub fn leaves(expr: &Node<String>) -> Vec<String> {
    fn walk(expr: &Node<String>, out: &mut Vec<String>) {
        match expr {
            Node::Operand(text) => out.push(text.clone()),
            Node::Not(inner) => walk(inner, out),
            Node::And(left, right) | Node::Or(left, right) => {
                walk(left, out);
                walk(right, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(expr, &mut out);
    out
}

pub fn operand_tokens(input: &str) -> Vec<Operand> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .filter_map(|token| match token.kind {
            TokenKind::Operand(operand) => Some(operand),
            _ => None,
        })
        .collect()
}
