//! Env-definition file parsing.

use std::path::Path;

use super::ConfigError;

/// The parsed contents of one env file.
///
/// Entries keep file order, duplicates included. Which occurrence wins is
/// decided when the file is applied to a [`ProcessConfig`](super::ProcessConfig).
/// Values are stored as written: `$NAME` and `${NAME}` are not expanded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
    skipped: usize,
}

impl EnvFile {
    /// Parses env-file text, skipping malformed entries.
    pub fn parse_str(contents: &str) -> Self {
        // Only strict parsing fails.
        Self::parse(contents.as_bytes(), Path::new("<str>"), false).unwrap_or_default()
    }

    /// Reads and parses the env file at `path`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist and `required` is false.
    /// With `strict`, the first malformed entry fails the read; otherwise it is
    /// logged and skipped.
    pub fn read(path: &Path, required: bool, strict: bool) -> Result<Option<Self>, ConfigError> {
        match std::fs::read(path) {
            Ok(bytes) => Self::parse(&bytes, path, strict).map(Some),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if required {
                    Err(ConfigError::FileNotFound(path.to_path_buf()))
                } else {
                    Ok(None)
                }
            }
            Err(e) => Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    fn parse(bytes: &[u8], path: &Path, strict: bool) -> Result<Self, ConfigError> {
        let mut file = Self::default();
        let mut text = String::with_capacity(bytes.len());

        for (idx, line) in bytes.split_inclusive(|b| *b == b'\n').enumerate() {
            match std::str::from_utf8(line) {
                Ok(line) => text.push_str(line),
                Err(_) if strict => {
                    return Err(ConfigError::InvalidUtf8 {
                        path: path.to_path_buf(),
                        line: idx + 1,
                    });
                }
                Err(_) => {
                    tracing::warn!(
                        path = %path.display(),
                        line = idx + 1,
                        "skipping env line that is not valid UTF-8"
                    );
                    file.skipped += 1;
                }
            }
        }

        let literal = escape_dollars(&text);
        for (idx, item) in dotenvy::from_read_iter(literal.as_bytes()).enumerate() {
            let entry = idx + 1;
            match item {
                Ok(pair) => file.entries.push(pair),
                // The error payload carries the offending line; never log it.
                Err(_) if strict => {
                    return Err(ConfigError::ParseError {
                        path: path.to_path_buf(),
                        entry,
                    });
                }
                Err(dotenvy::Error::Io(source)) => {
                    tracing::warn!(path = %path.display(), error = %source, "env parsing stopped early");
                    file.skipped += 1;
                    break;
                }
                Err(_) => {
                    tracing::warn!(path = %path.display(), entry, "skipping malformed env entry");
                    file.skipped += 1;
                }
            }
        }

        Ok(file)
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the value of the last occurrence of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of malformed entries dropped while parsing.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

/// Escapes every `$` that `dotenvy` would expand, so values stay literal.
///
/// Single-quoted text is never expanded and is left alone. Existing escape
/// pairs and comments are copied unchanged.
fn escape_dollars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut in_comment = false;
    let mut after_space = true;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if in_comment {
            out.push(c);
            if c == '\n' {
                in_comment = false;
                after_space = true;
            }
            continue;
        }

        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                    after_space = next.is_whitespace();
                }
                continue;
            }
            '$' if quote != Some('\'') => out.push_str("\\$"),
            '\'' | '"' if quote.is_none() => {
                quote = Some(c);
                out.push(c);
            }
            _ if quote == Some(c) => {
                quote = None;
                out.push(c);
            }
            '#' if quote.is_none() && after_space => {
                in_comment = true;
                out.push(c);
            }
            _ => out.push(c),
        }
        after_space = c.is_whitespace();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_simple_pairs() {
        let file = EnvFile::parse_str("FOO=bar\nBAZ=qux\n");

        assert_eq!(file.len(), 2);
        assert_eq!(file.get("FOO"), Some("bar"));
        assert_eq!(file.get("BAZ"), Some("qux"));
        assert_eq!(file.skipped(), 0);
    }

    #[test]
    fn test_parse_keeps_file_order() {
        let file = EnvFile::parse_str("B_KEY=2\nA_KEY=1\nC_KEY=3\n");
        let keys: Vec<&str> = file.iter().map(|(k, _)| k).collect();

        assert_eq!(keys, vec!["B_KEY", "A_KEY", "C_KEY"]);
    }

    #[test]
    fn test_parse_skips_blank_and_comment_lines() {
        let file = EnvFile::parse_str("# leading comment\n\nFOO=bar\n   \n# FOO=shadowed\n");

        assert_eq!(file.len(), 1);
        assert_eq!(file.get("FOO"), Some("bar"));
    }

    #[test]
    fn test_parse_duplicate_keys_last_wins() {
        let file = EnvFile::parse_str("FOO=first\nFOO=second\n");

        assert_eq!(file.len(), 2);
        assert_eq!(file.get("FOO"), Some("second"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let file = EnvFile::parse_str("GREETING=\"hello world\"\nSINGLE='a b'\n");

        assert_eq!(file.get("GREETING"), Some("hello world"));
        assert_eq!(file.get("SINGLE"), Some("a b"));
    }

    #[test]
    fn test_parse_skips_malformed_line() {
        let file = EnvFile::parse_str("FOO=bar\nNOT_A_PAIR\nBAZ=qux\n");

        assert_eq!(file.get("FOO"), Some("bar"));
        assert_eq!(file.get("BAZ"), Some("qux"));
        assert_eq!(file.get("NOT_A_PAIR"), None);
        assert_eq!(file.skipped(), 1);
    }

    #[test]
    fn test_parse_keeps_dollar_literal() {
        let file = EnvFile::parse_str(
            "DB_PASSWORD=pa$word1\nOTHER=x${ENVSEED_NEVER_SET}y\nQUOTED=\"a$b\"\nSINGLE='$c'\n",
        );

        assert_eq!(file.get("DB_PASSWORD"), Some("pa$word1"));
        assert_eq!(file.get("OTHER"), Some("x${ENVSEED_NEVER_SET}y"));
        assert_eq!(file.get("QUOTED"), Some("a$b"));
        assert_eq!(file.get("SINGLE"), Some("$c"));
        assert_eq!(file.skipped(), 0);
    }

    #[test]
    fn test_parse_does_not_expand_earlier_entries() {
        let file = EnvFile::parse_str("HOST=db\nURL=postgres://$HOST/app\n");

        assert_eq!(file.get("URL"), Some("postgres://$HOST/app"));
    }

    #[test]
    fn test_parse_keeps_escaped_dollar() {
        let file = EnvFile::parse_str("PRICE=\\$5\n");

        assert_eq!(file.get("PRICE"), Some("$5"));
    }

    #[test]
    fn test_parse_comment_with_quote_does_not_affect_next_line() {
        let file = EnvFile::parse_str("# don't expand\nTOKEN=a$b\n");

        assert_eq!(file.get("TOKEN"), Some("a$b"));
    }

    #[test]
    fn test_read_skips_non_utf8_line() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"FOO=bar\nBAD=\xff\xfe\nBAZ=qux\n").unwrap();

        let file = EnvFile::read(tmp.path(), false, false).unwrap().unwrap();

        assert_eq!(file.get("FOO"), Some("bar"));
        assert_eq!(file.get("BAZ"), Some("qux"));
        assert_eq!(file.get("BAD"), None);
        assert_eq!(file.skipped(), 1);
    }

    #[test]
    fn test_read_strict_rejects_non_utf8_line() {
        let mut tmp = NamedTempFile::new().unwrap();
        tmp.write_all(b"FOO=bar\nBAD=\xff\xfe\n").unwrap();

        let result = EnvFile::read(tmp.path(), false, true);

        assert!(matches!(
            result,
            Err(ConfigError::InvalidUtf8 { line: 2, .. })
        ));
    }

    #[test]
    fn test_parse_skips_dashed_key() {
        let file = EnvFile::parse_str("my-key=v\nspring.datasource.url=jdbc\n");

        assert_eq!(file.get("my-key"), None);
        assert_eq!(file.get("spring.datasource.url"), Some("jdbc"));
        assert_eq!(file.skipped(), 1);
    }

    #[test]
    fn test_read_valid_file() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "FOO=bar").unwrap();

        let file = EnvFile::read(tmp.path(), true, false).unwrap().unwrap();

        assert_eq!(file.get("FOO"), Some("bar"));
    }

    #[test]
    fn test_read_optional_missing() {
        let result = EnvFile::read(Path::new("/nonexistent/path/.env"), false, false).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_read_required_missing() {
        let result = EnvFile::read(Path::new("/nonexistent/path/.env"), true, false);

        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_read_strict_rejects_malformed_entry() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "FOO=bar\nNOT_A_PAIR\n").unwrap();

        let result = EnvFile::read(tmp.path(), false, true);

        assert!(matches!(
            result,
            Err(ConfigError::ParseError { entry: 2, .. })
        ));
    }

    #[test]
    fn test_parse_error_does_not_leak_line() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "TOKEN=ok\nsupersecret_token_12345\n").unwrap();

        let err = EnvFile::read(tmp.path(), false, true).unwrap_err();

        assert!(!err.to_string().contains("supersecret_token_12345"));
    }

    #[test]
    fn test_read_directory_is_read_error() {
        let dir = TempDir::new().unwrap();

        let result = EnvFile::read(dir.path(), false, false);

        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
