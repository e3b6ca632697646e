use crate::search::{CandidateSource, SearchConfig};
use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use exprfind_match::{CompiledExpression, MatchFlags, Mode, compile};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(name = "exprfind", version)]
/// Filter files by boolean expressions over their names and contents.
pub struct Cli {
    #[clap(default_value = ".")]
    /// Roots to walk. Ignored when `--from` is given.
    pub paths: Vec<PathBuf>,
    #[clap(short = 'n', long)]
    /// Expression tested against each file name.
    pub name: Option<String>,
    #[clap(short = 'c', long)]
    /// Expression tested against each line of each file.
    pub content: Option<String>,
    #[clap(short = 'm', long, value_enum, default_value = "regex")]
    pub mode: ModeArg,
    #[clap(long, value_enum)]
    /// Overrides `--mode` for the name expression.
    pub name_mode: Option<ModeArg>,
    #[clap(long, value_enum)]
    /// Overrides `--mode` for the content expression.
    pub content_mode: Option<ModeArg>,
    #[clap(short = 'i', long)]
    pub ignore_case: bool,
    #[clap(short = 'w', long)]
    /// Operands only match whole words.
    pub word_regexp: bool,
    #[clap(short = 'x', long)]
    /// Operands must match the whole subject. Wins over `--word-regexp`.
    pub line_regexp: bool,
    #[clap(long)]
    /// Test the name expression against the last path component only.
    pub basename: bool,
    #[clap(long, value_name = "FILE")]
    /// Read candidate names from FILE instead of walking. `-` reads stdin.
    pub from: Option<PathBuf>,
    #[clap(short = 'd', long, value_parser = parse_delimiter, default_value = "\\n")]
    /// Name list delimiter: a single byte, or one of `\n`, `\t`, `\0`.
    pub delimiter: u8,
    #[clap(short = '0', long)]
    /// Shorthand for `--delimiter '\0'`.
    pub null: bool,
    #[clap(long, value_name = "DIR")]
    /// Directory to skip while walking: a full path or a bare name. Repeatable.
    pub exclude: Vec<PathBuf>,
    #[clap(short = 'j', long)]
    /// Worker threads. Defaults to one per core.
    pub threads: Option<usize>,
    #[clap(long)]
    /// Terminate output records with NUL instead of newline.
    pub print0: bool,
    #[clap(long)]
    /// Print the parsed expression trees and exit.
    pub explain: bool,
    #[clap(short = 'v', long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Literal,
    Glob,
    Regex,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Literal => Mode::Literal,
            ModeArg::Glob => Mode::Glob,
            ModeArg::Regex => Mode::Regex,
        }
    }
}

pub fn parse_delimiter(value: &str) -> Result<u8> {
    match value {
        "\\n" => Ok(b'\n'),
        "\\t" => Ok(b'\t'),
        "\\0" => Ok(b'\0'),
        _ => match value.as_bytes() {
            [byte] => Ok(*byte),
            _ => bail!("delimiter must be a single byte, got {value:?}"),
        },
    }
}

impl Cli {
    pub fn match_flags(&self) -> MatchFlags {
        let mut flags = MatchFlags::empty();
        flags.set(MatchFlags::IGNORE_CASE, self.ignore_case);
        flags.set(MatchFlags::WHOLE_WORD, self.word_regexp);
        flags.set(MatchFlags::WHOLE_LINE, self.line_regexp);
        flags
    }

    pub fn name_delimiter(&self) -> u8 {
        if self.null { b'\0' } else { self.delimiter }
    }

    pub fn to_config(&self) -> Result<SearchConfig> {
        let flags = self.match_flags();
        let name = compile_arg(
            "--name",
            self.name.as_deref(),
            self.name_mode.unwrap_or(self.mode),
            flags,
        )?;
        let content = compile_arg(
            "--content",
            self.content.as_deref(),
            self.content_mode.unwrap_or(self.mode),
            flags,
        )?;
        let source = match &self.from {
            Some(path) => CandidateSource::List {
                path: path.clone(),
                delimiter: self.name_delimiter(),
            },
            None => CandidateSource::Walk {
                roots: self.paths.clone(),
                exclude: self.exclude.clone(),
            },
        };
        Ok(SearchConfig {
            source,
            name,
            content,
            basename: self.basename,
        })
    }
}

fn compile_arg(
    option: &str,
    expression: Option<&str>,
    mode: ModeArg,
    flags: MatchFlags,
) -> Result<Option<CompiledExpression>> {
    expression
        .map(|expression| {
            compile(expression, mode.into(), flags)
                .with_context(|| format!("invalid {option} expression {expression:?}"))
        })
        .transpose()
}
