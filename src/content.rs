use exprfind_match::CompiledExpression;
use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};
use tracing::debug;

pub(crate) const CONTENT_BUFFER_BYTES: usize = 64 * 1024;

/// Whether any line of the file at `path` satisfies `expr`.
///
/// Files that cannot be opened or read never match.
pub fn file_matches(path: &Path, expr: &CompiledExpression) -> bool {
    let scanned = File::open(path)
        .and_then(|file| lines_match(BufReader::with_capacity(CONTENT_BUFFER_BYTES, file), expr));
    match scanned {
        Ok(hit) => hit,
        Err(error) => {
            debug!(?path, %error, "skipping unreadable file");
            false
        }
    }
}

/// Tests `expr` against each `\n`-terminated line, stopping at the first hit.
///
/// Line terminators (`\n` or `\r\n`) are not part of the subject and invalid
/// UTF-8 is replaced lossily. An empty input has no lines and never matches.
pub fn lines_match<R: BufRead>(mut reader: R, expr: &CompiledExpression) -> io::Result<bool> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(false);
        }
        let mut bytes = line.as_slice();
        if let Some(stripped) = bytes.strip_suffix(b"\n") {
            bytes = stripped;
        }
        if let Some(stripped) = bytes.strip_suffix(b"\r") {
            bytes = stripped;
        }
        if expr.matches(&String::from_utf8_lossy(bytes)) {
            return Ok(true);
        }
    }
}
