use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("invalid line selection '{input}' (expected N or START:END)")]
    Parse { input: String },
    #[error("line numbers start at 1")]
    ZeroLine,
    #[error("selection end {end} is before start {start}")]
    Reversed { start: usize, end: usize },
    #[error("selection ends at line {end} but the text has {line_count} lines")]
    OutOfRange { end: usize, line_count: usize },
}

/// 1-based inclusive line range, e.g. `3:7` or `5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSelection {
    start: usize,
    end: usize,
}

impl LineSelection {
    pub fn new(start: usize, end: usize) -> Result<Self, SelectionError> {
        if start == 0 || end == 0 {
            return Err(SelectionError::ZeroLine);
        }
        if end < start {
            return Err(SelectionError::Reversed { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// The selected lines without the terminator of the last one.
    pub fn slice<'a>(&self, text: &'a str) -> Result<&'a str, SelectionError> {
        let range = self.byte_range(text)?;
        Ok(&text[range])
    }

    /// Replaces the selected lines, keeping everything around them
    /// byte-for-byte.
    pub fn replace(&self, text: &str, replacement: &str) -> Result<String, SelectionError> {
        let range = self.byte_range(text)?;
        let mut replaced = String::with_capacity(text.len() + replacement.len());
        replaced.push_str(&text[..range.start]);
        replaced.push_str(replacement);
        replaced.push_str(&text[range.end..]);
        Ok(replaced)
    }

    fn byte_range(&self, text: &str) -> Result<Range<usize>, SelectionError> {
        let mut offset = 0;
        let mut start = None;
        let mut line_count = 0;

        for (index, line) in text.split_inclusive('\n').enumerate() {
            let number = index + 1;
            line_count = number;
            if number == self.start {
                start = Some(offset);
            }
            if number == self.end
                && let Some(start) = start
            {
                let content = line
                    .strip_suffix('\n')
                    .map(|line| line.strip_suffix('\r').unwrap_or(line))
                    .unwrap_or(line);
                return Ok(start..offset + content.len());
            }
            offset += line.len();
        }

        Err(SelectionError::OutOfRange {
            end: self.end,
            line_count,
        })
    }
}

impl FromStr for LineSelection {
    type Err = SelectionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parse_error = || SelectionError::Parse {
            input: value.to_string(),
        };
        let parse_line = |part: &str| part.trim().parse::<usize>().map_err(|_| parse_error());

        match value.split_once(':') {
            Some((start, end)) => Self::new(parse_line(start)?, parse_line(end)?),
            None => {
                let line = parse_line(value)?;
                Self::new(line, line)
            }
        }
    }
}

impl fmt::Display for LineSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}:{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LineSelection, SelectionError};

    const SOURCE: &str = "fn main() {\n    let x = 1;\n    let y = 2;\n}\n";

    #[test]
    fn parses_single_line_and_range() {
        assert_eq!(
            "5".parse::<LineSelection>().expect("single line should parse"),
            LineSelection::new(5, 5).expect("valid")
        );
        assert_eq!(
            " 3 : 7 ".parse::<LineSelection>().expect("range should parse"),
            LineSelection::new(3, 7).expect("valid")
        );
        assert_eq!(LineSelection::new(3, 7).expect("valid").to_string(), "3:7");
        assert_eq!(LineSelection::new(4, 4).expect("valid").to_string(), "4");
    }

    #[test]
    fn rejects_malformed_selections() {
        assert!(matches!(
            "a:b".parse::<LineSelection>(),
            Err(SelectionError::Parse { .. })
        ));
        assert_eq!("0".parse::<LineSelection>(), Err(SelectionError::ZeroLine));
        assert_eq!(
            "7:3".parse::<LineSelection>(),
            Err(SelectionError::Reversed { start: 7, end: 3 })
        );
    }

    #[test]
    fn slice_returns_selected_lines_without_final_terminator() {
        let selection = LineSelection::new(2, 3).expect("valid");

        assert_eq!(
            selection.slice(SOURCE).expect("slice should succeed"),
            "    let x = 1;\n    let y = 2;"
        );
    }

    #[test]
    fn slice_handles_crlf_and_missing_trailing_newline() {
        let text = "a\r\nb\r\nc";

        assert_eq!(LineSelection::new(2, 2).expect("valid").slice(text), Ok("b"));
        assert_eq!(LineSelection::new(3, 3).expect("valid").slice(text), Ok("c"));
    }

    #[test]
    fn replace_keeps_surrounding_text() {
        let selection = LineSelection::new(2, 3).expect("valid");

        let replaced = selection
            .replace(SOURCE, "    let sum = 3;")
            .expect("replace should succeed");

        assert_eq!(replaced, "fn main() {\n    let sum = 3;\n}\n");
    }

    #[test]
    fn out_of_range_selection_is_rejected() {
        let selection = LineSelection::new(3, 9).expect("valid");

        assert_eq!(
            selection.slice(SOURCE),
            Err(SelectionError::OutOfRange {
                end: 9,
                line_count: 4
            })
        );
    }
}
