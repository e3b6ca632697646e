use crate::PatternError;
use bitflags::bitflags;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// How every operand of one expression is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Plain text.
    Literal,
    /// Shell wildcards: `*`, `?` and `[...]` classes.
    Glob,
    /// Regular expressions in `regex` crate syntax.
    #[default]
    Regex,
}

bitflags! {
    /// Matching options applied uniformly to all operands of an expression.
    pub struct MatchFlags: u8 {
        const IGNORE_CASE = 0b001;
        /// Operand must start and end on word boundaries.
        const WHOLE_WORD = 0b010;
        /// Operand must span the entire subject. Wins over `WHOLE_WORD`.
        const WHOLE_LINE = 0b100;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlainKind {
    Substr,
    Exact,
}

/// A compiled operand.
///
/// Case-sensitive literals without word anchoring stay plain string
/// comparisons; everything else goes through a [`Regex`].
#[derive(Clone, Debug)]
pub enum Matcher {
    Plain { kind: PlainKind, needle: String },
    Regex { regex: Regex },
}

impl Matcher {
    pub fn test(&self, subject: &str) -> bool {
        match self {
            Matcher::Plain { kind, needle } => match kind {
                PlainKind::Substr => subject.contains(needle.as_str()),
                PlainKind::Exact => subject == needle,
            },
            Matcher::Regex { regex } => regex.is_match(subject),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Plain {
                kind: PlainKind::Substr,
                needle,
            } => write!(f, "{needle:?}"),
            Matcher::Plain {
                kind: PlainKind::Exact,
                needle,
            } => write!(f, "={needle:?}"),
            Matcher::Regex { regex } => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// Compiles a single operand under `mode` and `flags`.
///
/// Glob patterns cover the whole subject unless `WHOLE_WORD` is requested, in
/// which case they float between word boundaries instead.
pub fn compile_operand(
    text: &str,
    mode: Mode,
    flags: MatchFlags,
) -> Result<Matcher, PatternError> {
    let ignore_case = flags.contains(MatchFlags::IGNORE_CASE);
    let whole_line = flags.contains(MatchFlags::WHOLE_LINE);
    let whole_word = flags.contains(MatchFlags::WHOLE_WORD) && !whole_line;

    let body = match mode {
        Mode::Literal => {
            if !ignore_case && !whole_word {
                let kind = if whole_line {
                    PlainKind::Exact
                } else {
                    PlainKind::Substr
                };
                return Ok(Matcher::Plain {
                    kind,
                    needle: text.to_string(),
                });
            }
            regex::escape(text)
        }
        Mode::Glob => glob_to_regex(text).map_err(|reason| PatternError::new(text, reason))?,
        Mode::Regex => text.to_string(),
    };

    let pattern = if whole_line || (mode == Mode::Glob && !whole_word) {
        format!("^(?:{body})$")
    } else if whole_word {
        format!(r"\b(?:{body})\b")
    } else {
        body.clone()
    };

    // Wrapping can turn a broken user pattern such as `a)|(b` into a valid
    // one, so the bare pattern has to compile on its own first.
    if mode == Mode::Regex && pattern != body {
        build_regex(&body, ignore_case).map_err(|err| PatternError::new(text, err.to_string()))?;
    }

    build_regex(&pattern, ignore_case)
        .map(|regex| Matcher::Regex { regex })
        .map_err(|err| PatternError::new(text, err.to_string()))
}

fn build_regex(pattern: &str, ignore_case: bool) -> Result<Regex, regex::Error> {
    let mut builder = RegexBuilder::new(pattern);
    builder.case_insensitive(ignore_case);
    builder.build()
}

/// Translates a glob into an unanchored regex body.
pub(crate) fn glob_to_regex(pattern: &str) -> Result<String, String> {
    let mut regex = String::with_capacity(pattern.len() + 8);
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' => {
                // `**` means the same as `*` here
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                regex.push_str(".*");
            }
            '?' => regex.push('.'),
            '[' => {
                let mut class = String::from("[");
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    class.push('^');
                }
                // A leading `]` is part of the class, not its end.
                if chars.peek() == Some(&']') {
                    chars.next();
                    class.push_str(r"\]");
                }
                let mut closed = false;
                for inner in chars.by_ref() {
                    match inner {
                        ']' => {
                            closed = true;
                            break;
                        }
                        '\\' | '[' | '&' | '~' | '^' => {
                            class.push('\\');
                            class.push(inner);
                        }
                        _ => class.push(inner),
                    }
                }
                if !closed {
                    return Err("unterminated character class".to_string());
                }
                class.push(']');
                regex.push_str(&class);
            }
            '\\' => match chars.next() {
                Some(escaped) => push_escaped(&mut regex, escaped),
                None => regex.push_str(r"\\"),
            },
            _ => push_escaped(&mut regex, ch),
        }
    }
    Ok(regex)
}

fn push_escaped(regex: &mut String, ch: char) {
    let mut buf = [0u8; 4];
    let encoded = ch.encode_utf8(&mut buf);
    regex.push_str(&regex::escape(encoded));
}
