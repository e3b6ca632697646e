use crate::Matcher;
use exprfind_syntax::Node;

/// Anything that can sit in a tree leaf and be tested against a subject.
pub trait Predicate {
    fn test(&self, subject: &str) -> bool;
}

impl Predicate for Matcher {
    fn test(&self, subject: &str) -> bool {
        Matcher::test(self, subject)
    }
}

impl<F> Predicate for F
where
    F: Fn(&str) -> bool,
{
    fn test(&self, subject: &str) -> bool {
        self(subject)
    }
}

/// Evaluates `node` against `subject`.
///
/// The right side of `And` is never tested when the left side is false, and
/// the right side of `Or` is never tested when the left side is true.
pub fn evaluate<P: Predicate>(node: &Node<P>, subject: &str) -> bool {
    match node {
        Node::Operand(predicate) => predicate.test(subject),
        Node::Not(inner) => !evaluate(inner, subject),
        Node::And(left, right) => evaluate(left, subject) && evaluate(right, subject),
        Node::Or(left, right) => evaluate(left, subject) || evaluate(right, subject),
    }
}
