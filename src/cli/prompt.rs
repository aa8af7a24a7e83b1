//! Small stdin prompts.

use std::io::{self, BufRead, Write};

/// Ask a yes/no question on stderr; anything but `y`/`yes` is no.
pub fn confirm(question: &str) -> io::Result<bool> {
    confirm_with(&mut io::stdin().lock(), &mut io::stderr(), question)
}

pub fn confirm_with(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> io::Result<bool> {
    write!(output, "{question} [y/N] ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Ask for a line of text, falling back to `default` on empty input.
pub fn ask(question: &str, default: Option<&str>) -> io::Result<String> {
    ask_with(&mut io::stdin().lock(), &mut io::stderr(), question, default)
}

pub fn ask_with(
    input: &mut impl BufRead,
    output: &mut impl Write,
    question: &str,
    default: Option<&str>,
) -> io::Result<String> {
    match default {
        Some(d) if !d.is_empty() => write!(output, "{question} ({d}): ")?,
        _ => write!(output, "{question}: ")?,
    }
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let answer = line.trim();
    if answer.is_empty() {
        Ok(default.unwrap_or_default().to_string())
    } else {
        Ok(answer.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn confirm_str(input: &str) -> bool {
        let mut output = Vec::new();
        confirm_with(&mut input.as_bytes(), &mut output, "Create it?").unwrap()
    }

    #[test]
    fn test_confirm() {
        assert!(confirm_str("y\n"));
        assert!(confirm_str("YES\n"));
        assert!(!confirm_str("\n"));
        assert!(!confirm_str("nope\n"));
        // EOF is a no
        assert!(!confirm_str(""));
    }

    #[test]
    fn test_confirm_prompt_text() {
        let mut output = Vec::new();
        confirm_with(&mut "n\n".as_bytes(), &mut output, "Create locales/de.md?").unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "Create locales/de.md? [y/N] ");
    }

    #[test]
    fn test_ask_default() {
        let mut output = Vec::new();
        let answer = ask_with(&mut "\n".as_bytes(), &mut output, "License", Some("MIT")).unwrap();
        assert_eq!(answer, "MIT");
        assert_eq!(String::from_utf8(output).unwrap(), "License (MIT): ");

        let answer = ask_with(&mut "  Apache-2.0 \n".as_bytes(), &mut Vec::new(), "License", Some("MIT")).unwrap();
        assert_eq!(answer, "Apache-2.0");

        let answer = ask_with(&mut "".as_bytes(), &mut Vec::new(), "Author", None).unwrap();
        assert_eq!(answer, "");
    }
}
