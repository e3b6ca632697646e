use std::{io::Read, iter};

/// Reads a whole name list and splits it on `delimiter`. See [`split_names`].
pub fn read_names<R: Read>(mut reader: R, delimiter: u8) -> std::io::Result<Vec<String>> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(split_names(&buffer, delimiter))
}

/// Splits `bytes` into names.
///
/// Empty records are dropped. With a newline delimiter a trailing `\r` is
/// stripped as well, so CRLF lists work. Invalid UTF-8 is replaced lossily.
pub fn split_names(bytes: &[u8], delimiter: u8) -> Vec<String> {
    let mut names = Vec::new();
    let mut start = 0;
    for end in memchr::memchr_iter(delimiter, bytes).chain(iter::once(bytes.len())) {
        let mut record = &bytes[start..end];
        start = end + 1;
        if delimiter == b'\n' {
            if let Some(stripped) = record.strip_suffix(b"\r") {
                record = stripped;
            }
        }
        if record.is_empty() {
            continue;
        }
        names.push(String::from_utf8_lossy(record).into_owned());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newlines() {
        assert_eq!(split_names(b"a.rs\nb.rs\n", b'\n'), vec!["a.rs", "b.rs"]);
        assert_eq!(split_names(b"a.rs\nb.rs", b'\n'), vec!["a.rs", "b.rs"]);
    }

    #[test]
    fn strips_carriage_returns_for_newline_lists() {
        assert_eq!(split_names(b"a\r\nb\r\n", b'\n'), vec!["a", "b"]);
        // other delimiters keep the byte
        assert_eq!(split_names(b"a\r,b", b','), vec!["a\r", "b"]);
    }

    #[test]
    fn nul_delimited_names_may_contain_newlines() {
        assert_eq!(
            split_names(b"odd\nname\0plain\0", b'\0'),
            vec!["odd\nname", "plain"]
        );
    }

    #[test]
    fn empty_records_are_dropped() {
        assert_eq!(split_names(b"\n\na\n\n\nb\n", b'\n'), vec!["a", "b"]);
        assert!(split_names(b"", b'\n').is_empty());
        assert!(split_names(b"\0\0", b'\0').is_empty());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        assert_eq!(split_names(b"ok\n\xffbad\n", b'\n'), vec!["ok", "\u{fffd}bad"]);
    }

    #[test]
    fn reads_from_any_reader() {
        let input: &[u8] = b"one two three";
        assert_eq!(
            read_names(input, b' ').unwrap(),
            vec!["one", "two", "three"]
        );
    }
}
