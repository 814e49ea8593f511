//! Line handling shared by the plain-text formats.

use std::io::BufRead;
use std::str::FromStr;

use crate::error::{LoadError, LoadResult};

/// A non-empty line with comments stripped, with its 1-based line number.
pub(crate) struct Line {
    pub number: usize,
    pub text: String,
}

impl Line {
    /// Whitespace-separated tokens.
    pub fn tokens(&self) -> std::str::SplitWhitespace<'_> {
        self.text.split_whitespace()
    }

    /// Parses every token as a finite number.
    pub fn parse_all_finite<T>(&self) -> LoadResult<Vec<T>>
    where
        T: FromStr + Copy + Into<f64>,
        T::Err: std::fmt::Display,
    {
        self.tokens().map(|token| self.parse_finite(token)).collect()
    }

    /// Parses one token as a number, rejecting `NaN` and infinities.
    pub fn parse_finite<T>(&self, token: &str) -> LoadResult<T>
    where
        T: FromStr + Copy + Into<f64>,
        T::Err: std::fmt::Display,
    {
        let value: T = self.parse(token)?;
        if Into::<f64>::into(value).is_finite() {
            Ok(value)
        } else {
            Err(LoadError::at_line(self.number, format!("'{token}' is not a finite number")))
        }
    }

    /// Parses one token as `T`, reporting this line on failure.
    pub fn parse<T: FromStr>(&self, token: &str) -> LoadResult<T>
    where
        T::Err: std::fmt::Display,
    {
        token
            .parse()
            .map_err(|e| LoadError::at_line(self.number, format!("'{token}': {e}")))
    }
}

/// Reads all content lines, dropping `#` comments and blank lines.
pub(crate) fn content_lines<R: BufRead>(reader: R) -> LoadResult<Vec<Line>> {
    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.split_once('#').map_or(line.as_str(), |(before, _)| before).trim();
        if !text.is_empty() {
            lines.push(Line {
                number: index + 1,
                text: text.to_string(),
            });
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_comments_and_blanks_dropped() {
        let lines = content_lines("# header\n\n1 2 3 # trailing\n   \n4\n".as_bytes()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 3);
        assert_eq!(lines[0].text, "1 2 3");
        assert_eq!(lines[1].number, 5);
    }

    #[test]
    fn test_parse_finite_rejects_nan_and_inf() {
        let lines = content_lines("1.5 NaN inf -inf\n".as_bytes()).unwrap();
        let line = &lines[0];
        assert_eq!(line.parse_finite::<f32>("1.5").unwrap(), 1.5);
        for token in ["NaN", "inf", "-inf"] {
            let err = line.parse_finite::<f64>(token).unwrap_err();
            assert!(err.to_string().contains("not a finite number"), "{err}");
        }
        assert!(line.parse_all_finite::<f64>().is_err());
    }

    #[test]
    fn test_parse_reports_line() {
        let lines = content_lines("\n1.5 abc\n".as_bytes()).unwrap();
        let err = lines[0].parse_all_finite::<f64>().unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(err.to_string().contains("abc"));
    }
}
