//! Tokenizer for SVG path drawing commands (`d` attribute).
//!
//! Only the structure needed to recognise marker shapes is recovered: each
//! command letter with the numbers that follow it. Arguments are not
//! validated against the command's arity.

use thiserror::Error;

const COMMAND_LETTERS: &[u8] = b"MmZzLlHhVvCcSsQqTtAa";

/// A single drawing command with its numeric arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct PathCommand {
    /// Command letter as written (`M`, `c`, `z`, ...).
    pub letter: char,
    /// Numbers following the letter, in order.
    pub args: Vec<f64>,
}

impl PathCommand {
    /// Whether this is a move command (`M` or `m`).
    #[must_use]
    pub fn is_move(&self) -> bool {
        matches!(self.letter, 'M' | 'm')
    }

    /// Whether this is a cubic Bézier command (`C` or `c`).
    #[must_use]
    pub fn is_cubic(&self) -> bool {
        matches!(self.letter, 'C' | 'c')
    }

    /// Whether this is a close-path command (`Z` or `z`).
    #[must_use]
    pub fn is_close(&self) -> bool {
        matches!(self.letter, 'Z' | 'z')
    }
}

/// Path data that could not be tokenized.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathDataError {
    /// A number appeared before any command letter.
    #[error("number at offset {offset} precedes any command")]
    NumberBeforeCommand {
        /// Byte offset of the number.
        offset: usize,
    },

    /// A character that is neither a command, a number nor a separator.
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset of the character.
        offset: usize,
    },

    /// A numeric token that does not form a valid number.
    #[error("malformed number {token:?} at offset {offset}")]
    MalformedNumber {
        /// The scanned token.
        token: String,
        /// Byte offset of the token.
        offset: usize,
    },
}

/// Tokenize path data into commands.
///
/// # Example
///
/// ```
/// use marker_merge::svg::path_data::parse_path_data;
///
/// let commands = parse_path_data("M 0 1.5 C 1,2 3,4 5,6 z").unwrap();
/// assert_eq!(commands.len(), 3);
/// assert_eq!(commands[0].args, vec![0.0, 1.5]);
/// assert!(commands[2].is_close());
/// ```
pub fn parse_path_data(d: &str) -> Result<Vec<PathCommand>, PathDataError> {
    let bytes = d.as_bytes();
    let mut commands: Vec<PathCommand> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        if b.is_ascii_whitespace() || b == b',' {
            i += 1;
        } else if COMMAND_LETTERS.contains(&b) {
            commands.push(PathCommand {
                letter: char::from(b),
                args: Vec::new(),
            });
            i += 1;
        } else if b == b'+' || b == b'-' || b == b'.' || b.is_ascii_digit() {
            let (value, next) = scan_number(d, i)?;
            match commands.last_mut() {
                Some(command) => command.args.push(value),
                None => return Err(PathDataError::NumberBeforeCommand { offset: i }),
            }
            i = next;
        } else {
            // Everything consumed so far is ASCII, so `i` is a char boundary.
            let ch = d[i..].chars().next().unwrap_or('\u{fffd}');
            return Err(PathDataError::UnexpectedChar { ch, offset: i });
        }
    }

    Ok(commands)
}

/// Scan one number starting at `start`, returning its value and the offset
/// just past it.
fn scan_number(d: &str, start: usize) -> Result<(f64, usize), PathDataError> {
    let bytes = d.as_bytes();
    let mut j = start;
    let mut digits = 0;

    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
        j += 1;
    }
    while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
        digits += 1;
    }
    // A second '.' starts the next number ("1.5.5" is 1.5 then .5).
    if j < bytes.len() && bytes[j] == b'.' {
        j += 1;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
            digits += 1;
        }
    }
    if digits > 0 && j < bytes.len() && (bytes[j] == b'e' || bytes[j] == b'E') {
        let mut k = j + 1;
        if k < bytes.len() && (bytes[k] == b'+' || bytes[k] == b'-') {
            k += 1;
        }
        if k < bytes.len() && bytes[k].is_ascii_digit() {
            while k < bytes.len() && bytes[k].is_ascii_digit() {
                k += 1;
            }
            j = k;
        }
    }

    let token = &d[start..j];
    if digits == 0 {
        return Err(PathDataError::MalformedNumber {
            token: token.to_string(),
            offset: start,
        });
    }
    token
        .parse::<f64>()
        .map(|value| (value, j))
        .map_err(|_| PathDataError::MalformedNumber {
            token: token.to_string(),
            offset: start,
        })
}

/// Whether parsed commands look like a filled circle marker: at least one
/// cubic curve and a closing command at the end.
#[must_use]
pub fn is_circle_marker(commands: &[PathCommand]) -> bool {
    commands.iter().any(PathCommand::is_cubic) && commands.last().is_some_and(PathCommand::is_close)
}

/// The point of the leading move command, if the path starts with one that
/// carries at least two numbers.
#[must_use]
pub fn leading_move(commands: &[PathCommand]) -> Option<(f64, f64)> {
    let first = commands.first()?;
    if !first.is_move() || first.args.len() < 2 {
        return None;
    }
    Some((first.args[0], first.args[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATPLOTLIB_MARKER: &str = "M 0 1.581139
C 0.419323 1.581139 0.821528 1.414541 1.118034 1.118034
C 1.414541 0.821528 1.581139 0.419323 1.581139 0
C 1.581139 -0.419323 1.414541 -0.821528 1.118034 -1.118034
C 0.821528 -1.414541 0.419323 -1.581139 0 -1.581139
C -0.419323 -1.581139 -0.821528 -1.414541 -1.118034 -1.118034
C -1.414541 -0.821528 -1.581139 -0.419323 -1.581139 0
C -1.581139 0.419323 -1.414541 0.821528 -1.118034 1.118034
C -0.821528 1.414541 -0.419323 1.581139 0 1.581139
z
";

    #[test]
    fn test_parse_matplotlib_marker() {
        let commands = parse_path_data(MATPLOTLIB_MARKER).unwrap();
        assert_eq!(commands.len(), 10);
        assert_eq!(commands[0].letter, 'M');
        assert_eq!(commands[1].args.len(), 6);
        assert!(is_circle_marker(&commands));
        assert_eq!(leading_move(&commands), Some((0.0, 1.581139)));
    }

    #[test]
    fn test_compact_numbers() {
        let commands = parse_path_data("M1.5.5-2e1L+3,4E-1").unwrap();
        assert_eq!(commands[0].args, vec![1.5, 0.5, -20.0]);
        assert_eq!(commands[1].args, vec![3.0, 0.4]);
    }

    #[test]
    fn test_rectangle_is_not_marker() {
        let commands = parse_path_data("M 0 360 L 576 360 L 576 0 L 0 0 z").unwrap();
        assert!(!is_circle_marker(&commands));
    }

    #[test]
    fn test_unclosed_curve_is_not_marker() {
        let commands = parse_path_data("M 0 1 C 1 1 1 0 1 0").unwrap();
        assert!(!is_circle_marker(&commands));
    }

    #[test]
    fn test_uppercase_close_is_accepted() {
        let commands = parse_path_data("M 0 2 C 1 2 2 1 2 0 Z").unwrap();
        assert!(is_circle_marker(&commands));
    }

    #[test]
    fn test_number_before_command() {
        assert_eq!(
            parse_path_data("1 2 M 0 0"),
            Err(PathDataError::NumberBeforeCommand { offset: 0 })
        );
    }

    #[test]
    fn test_unexpected_char() {
        let err = parse_path_data("M 0 0 X 1").unwrap_err();
        assert_eq!(err, PathDataError::UnexpectedChar { ch: 'X', offset: 6 });
    }

    #[test]
    fn test_lone_sign_is_malformed() {
        let err = parse_path_data("M - 1").unwrap_err();
        assert!(matches!(err, PathDataError::MalformedNumber { offset: 2, .. }));
    }

    #[test]
    fn test_leading_move_requires_two_numbers() {
        let commands = parse_path_data("M 3 C 1 1 1 1 1 1 z").unwrap();
        assert_eq!(leading_move(&commands), None);

        let commands = parse_path_data("L 0 1 C 1 1 1 1 1 1 z").unwrap();
        assert_eq!(leading_move(&commands), None);
    }
}
