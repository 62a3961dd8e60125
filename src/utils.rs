// SPDX-License-Identifier: GPL-3.0-only

//! Interactive prompt helpers

use std::io::{self, BufRead, Write};

/// Ask a yes/no question and read the answer from `input`
///
/// Accepts `y`, `ye`, `yes`, `n` and `no` in any case. An empty answer picks
/// `default` when there is one; otherwise the question is repeated. End of
/// input counts as "no".
pub fn query_yes_no<R, W>(
    question: &str,
    default: Option<bool>,
    mut input: R,
    mut output: W,
) -> io::Result<bool>
where
    R: BufRead,
    W: Write,
{
    let hint = match default {
        None => " [y/n] ",
        Some(true) => " [Y/n] ",
        Some(false) => " [y/N] ",
    };

    loop {
        write!(output, "{}{}", question, hint)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(false);
        }

        match (line.trim().to_lowercase().as_str(), default) {
            ("", Some(answer)) => return Ok(answer),
            ("y" | "ye" | "yes", _) => return Ok(true),
            ("n" | "no", _) => return Ok(false),
            _ => writeln!(output, "Please respond with 'yes' or 'no' (or 'y' or 'n').")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answers: &str, default: Option<bool>) -> (bool, String) {
        let mut out = Vec::new();
        let answer = query_yes_no("Continue?", default, answers.as_bytes(), &mut out).unwrap();
        (answer, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_accepts_variants() {
        assert!(ask("y\n", None).0);
        assert!(ask("YES\n", None).0);
        assert!(ask("ye\n", None).0);
        assert!(!ask("n\n", None).0);
        assert!(!ask("No\n", None).0);
    }

    #[test]
    fn test_reprompts_on_invalid() {
        let (answer, printed) = ask("maybe\n\nyes\n", None);
        assert!(answer);
        assert_eq!(printed.matches("Continue? [y/n]").count(), 3);
        assert!(printed.contains("Please respond with 'yes' or 'no'"));
    }

    #[test]
    fn test_default_on_empty() {
        assert!(ask("\n", Some(true)).0);
        assert!(!ask("\n", Some(false)).0);
        assert!(ask("\n", Some(true)).1.contains("[Y/n]"));
    }

    #[test]
    fn test_eof_is_no() {
        assert!(!ask("", None).0);
        assert!(!ask("", Some(true)).0);
    }
}
