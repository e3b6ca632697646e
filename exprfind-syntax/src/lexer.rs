use crate::{SyntaxError, SyntaxErrorKind};
use std::ops::Range;

/// One lexical unit of a boolean expression together with the byte range it
/// was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Operand(Operand),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

/// Pattern text awaiting compilation.
///
/// `text` is what the matcher is built from; `raw` is the untouched source
/// slice, slashes and escapes included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    pub text: String,
    pub raw: String,
    /// Read from a `/.../` span, so operator words and parentheses inside it
    /// were not interpreted.
    pub delimited: bool,
}

/// Splits an expression into tokens.
///
/// Parenthesis balance is not checked here; only the lexical shape is.
///
/// ```
/// use exprfind_syntax::{tokenize, TokenKind};
/// let tokens = tokenize("/foo OR bar/ AND NOT baz").unwrap();
/// assert_eq!(tokens.len(), 4);
/// assert!(matches!(&tokens[0].kind, TokenKind::Operand(op) if op.text == "foo OR bar"));
/// assert!(matches!(tokens[2].kind, TokenKind::Not));
/// ```
pub fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_ws();
            let start = self.pos;
            let Some(ch) = self.peek_char() else {
                break;
            };
            let kind = match ch {
                '(' => {
                    self.advance_char();
                    TokenKind::LParen
                }
                ')' => {
                    self.advance_char();
                    TokenKind::RParen
                }
                '/' => TokenKind::Operand(self.delimited_operand()?),
                _ => self.word(),
            };
            tokens.push(Token {
                kind,
                span: start..self.pos,
            });
        }
        Ok(tokens)
    }

    // A bare run of characters. Operator keywords only count when they make up
    // the whole run, so `ANDROID` or `NOTES` stay operands.
    fn word(&mut self) -> TokenKind {
        let start = self.pos;
        while let Some(ch) = self.peek_char() {
            if is_word_breaker(ch) {
                break;
            }
            self.advance_char();
        }
        let text = &self.input[start..self.pos];
        if text.eq_ignore_ascii_case("AND") {
            TokenKind::And
        } else if text.eq_ignore_ascii_case("OR") {
            TokenKind::Or
        } else if text.eq_ignore_ascii_case("NOT") {
            TokenKind::Not
        } else {
            TokenKind::Operand(Operand {
                text: text.to_string(),
                raw: text.to_string(),
                delimited: false,
            })
        }
    }

    // `/.../` spans are verbatim apart from `\/`. Any other backslash is kept
    // together with the character after it so regex escapes such as `\.` or
    // `\\` reach the pattern compiler untouched.
    fn delimited_operand(&mut self) -> Result<Operand, SyntaxError> {
        let open = self.pos;
        self.advance_char(); // opening slash
        let mut text = String::new();
        while let Some(ch) = self.peek_char() {
            self.advance_char();
            match ch {
                '/' => {
                    return Ok(Operand {
                        text,
                        raw: self.input[open..self.pos].to_string(),
                        delimited: true,
                    });
                }
                '\\' => match self.peek_char() {
                    Some('/') => {
                        self.advance_char();
                        text.push('/');
                    }
                    Some(next) => {
                        self.advance_char();
                        text.push('\\');
                        text.push(next);
                    }
                    None => text.push('\\'),
                },
                _ => text.push(ch),
            }
        }

        Err(SyntaxError::new(SyntaxErrorKind::UnterminatedOperand, open))
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance_char();
            } else {
                break;
            }
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }
}

fn is_word_breaker(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')')
}
