//! Compiles exprfind boolean expressions into reusable matchers.
//!
//! ```
//! use exprfind_match::{compile, MatchFlags, Mode};
//!
//! let expr = compile(r"\.pl$ OR \.pm$", Mode::Regex, MatchFlags::empty()).unwrap();
//! assert!(expr.matches("script.pl"));
//! assert!(expr.matches("Module.pm"));
//! assert!(!expr.matches("notes.txt"));
//! ```

mod error;
mod eval;
mod operand;

pub use error::{ExprError, PatternError, Result};
pub use eval::{Predicate, evaluate};
pub use exprfind_syntax::{MAX_GROUP_DEPTH, MAX_TREE_DEPTH, Node, SyntaxError, SyntaxErrorKind};
pub use operand::{MatchFlags, Matcher, Mode, PlainKind, compile_operand};

use tracing::debug;

/// A parsed expression whose operands are compiled matchers.
///
/// Holds no interior mutability, so one instance can be shared by reference
/// across threads and tested against any number of subjects.
#[derive(Debug, Clone)]
pub struct CompiledExpression {
    root: Node<Matcher>,
    source: String,
    mode: Mode,
    flags: MatchFlags,
}

/// Tokenizes and parses `expression`, compiling every operand with `mode` and
/// `flags`. Fails on the first syntax or pattern error.
pub fn compile(expression: &str, mode: Mode, flags: MatchFlags) -> Result<CompiledExpression> {
    let root = exprfind_syntax::parse(expression, |operand, position| {
        compile_operand(&operand.text, mode, flags)
            .map_err(|source| ExprError::Pattern { source, position })
    })?;
    debug!(
        expression,
        ?mode,
        ?flags,
        operands = root.operand_count(),
        "compiled expression"
    );
    Ok(CompiledExpression {
        root,
        source: expression.to_string(),
        mode,
        flags,
    })
}

impl CompiledExpression {
    pub fn matches(&self, subject: &str) -> bool {
        evaluate(&self.root, subject)
    }

    pub fn root(&self) -> &Node<Matcher> {
        &self.root
    }

    /// The expression text this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn flags(&self) -> MatchFlags {
        self.flags
    }
}
