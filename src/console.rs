//! Blocking line-oriented terminal interaction.
//!
//! Everything is generic over `BufRead`/`Write` so the interactive flows can be driven from
//! in-memory buffers in tests.

use std::io::{BufRead, Write};

/// ANSI "clear screen, cursor home".
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Print `prompt` (no newline) and read one line.
///
/// Returns `None` on end of input. The trailing line terminator is removed.
pub fn read_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> std::io::Result<Option<String>> {
    write!(output, "{prompt}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

/// Ask a yes/no question. Only `y`/`yes` (any case) confirm; EOF counts as "no".
pub fn confirm<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    question: &str,
) -> std::io::Result<bool> {
    let answer = read_line(input, output, &format!("{question} (y/n): "))?;
    Ok(answer.is_some_and(|a| is_affirmative(&a)))
}

/// Block until the user presses Enter (or input ends).
pub fn pause<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    message: &str,
) -> std::io::Result<()> {
    read_line(input, output, message).map(|_| ())
}

pub fn clear_screen<W: Write>(output: &mut W) -> std::io::Result<()> {
    write!(output, "{CLEAR_SCREEN}")?;
    output.flush()
}

pub fn is_affirmative(answer: &str) -> bool {
    let a = answer.trim();
    a.eq_ignore_ascii_case("y") || a.eq_ignore_ascii_case("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_line_strips_terminators_and_reports_eof() {
        let mut input = Cursor::new("abc\r\n");
        let mut out = Vec::new();
        assert_eq!(
            read_line(&mut input, &mut out, "> ").unwrap().as_deref(),
            Some("abc")
        );
        assert_eq!(read_line(&mut input, &mut out, "> ").unwrap(), None);
        assert_eq!(String::from_utf8(out).unwrap(), "> > ");
    }

    #[test]
    fn only_explicit_yes_confirms() {
        for (answer, expected) in [
            ("y\n", true),
            ("YES\n", true),
            (" Y \n", true),
            ("n\n", false),
            ("\n", false),
            ("yep\n", false),
            ("", false),
        ] {
            let mut input = Cursor::new(answer);
            let mut out = Vec::new();
            assert_eq!(
                confirm(&mut input, &mut out, "sure?").unwrap(),
                expected,
                "answer {answer:?}"
            );
        }
    }
}
