//! Shell-style word splitting for command strings.
//!
//! Turns `sh -c "echo 'hi there'"` into `["sh", "-c", "echo 'hi there'"]`
//! following POSIX shell quoting: single quotes are literal, double quotes
//! honour backslash escapes of `$`, `` ` ``, `"`, `\` and newline, and a
//! bare backslash escapes the next character.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{anychar, char, multispace0},
    multi::fold_many1,
    sequence::{delimited, preceded},
};

use stevedore_common::error::{Result, StevedoreError};

const fn is_bare(c: char) -> bool {
    !c.is_whitespace() && c != '\'' && c != '"' && c != '\\'
}

/// Unquoted run of ordinary characters.
fn bare(input: &str) -> IResult<&str, String> {
    take_while1(is_bare)
        .map(str::to_string)
        .parse(input)
}

/// Backslash outside quotes: the next character is taken literally.
fn escaped(input: &str) -> IResult<&str, String> {
    preceded(char('\\'), anychar)
        .map(String::from)
        .parse(input)
}

/// `'...'`: everything up to the closing quote, verbatim.
fn single_quoted(input: &str) -> IResult<&str, String> {
    delimited(char('\''), take_while(|c| c != '\''), char('\''))
        .map(str::to_string)
        .parse(input)
}

/// `"..."` with the limited escape set of double-quoted shell strings.
fn double_quoted(input: &str) -> IResult<&str, String> {
    let (input, _) = char('"')(input)?;
    let mut result = String::new();
    let mut chars = input.char_indices();
    loop {
        match chars.next() {
            Some((idx, '"')) => return Ok((&input[idx + 1..], result)),
            Some((_, '\\')) => match chars.next() {
                Some((_, c @ ('$' | '`' | '"' | '\\' | '\n'))) => result.push(c),
                Some((_, c)) => {
                    result.push('\\');
                    result.push(c);
                }
                None => break,
            },
            Some((_, c)) => result.push(c),
            None => break,
        }
    }
    Err(nom::Err::Failure(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// One shell word: adjacent quoted and unquoted pieces glued together.
fn word(input: &str) -> IResult<&str, String> {
    fold_many1(
        alt((bare, single_quoted, double_quoted, escaped)),
        String::new,
        |mut acc, piece| {
            acc.push_str(&piece);
            acc
        },
    )
    .parse(input)
}

/// Splits a command line into its argument vector.
///
/// # Errors
///
/// Returns [`StevedoreError::InvalidOption`] on an unterminated quote or a
/// trailing lone backslash.
pub fn split(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut remaining = line;

    loop {
        let (rest, _) = multispace0::<&str, nom::error::Error<&str>>(remaining)
            .map_err(|e| unmatched(line, &e.to_string()))?;
        remaining = rest;

        if remaining.is_empty() {
            break;
        }

        let (rest, w) = word(remaining).map_err(|e| unmatched(line, &e.to_string()))?;
        words.push(w);
        remaining = rest;
    }

    Ok(words)
}

fn unmatched(line: &str, detail: &str) -> StevedoreError {
    StevedoreError::InvalidOption {
        operation: "create container",
        message: format!("unmatched quote or escape in command {line:?} ({detail})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_words() {
        let words = split("echo hello world").expect("should split");
        assert_eq!(words, vec!["echo", "hello", "world"]);
    }

    #[test]
    fn split_collapses_whitespace() {
        let words = split("  ls \t -la\n/tmp  ").expect("should split");
        assert_eq!(words, vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn split_keeps_single_quoted_text_verbatim() {
        let words = split(r"sh -c 'echo $HOME \n'").expect("should split");
        assert_eq!(words, vec!["sh", "-c", r"echo $HOME \n"]);
    }

    #[test]
    fn split_double_quotes_honour_shell_escapes() {
        let words = split(r#"echo "a \"quoted\" \$var \x""#).expect("should split");
        assert_eq!(words, vec!["echo", r#"a "quoted" $var \x"#]);
    }

    #[test]
    fn split_glues_adjacent_pieces() {
        let words = split(r#"--name="my app"'s'"#).expect("should split");
        assert_eq!(words, vec!["--name=my apps"]);
    }

    #[test]
    fn split_backslash_escapes_space() {
        let words = split(r"cat my\ file.txt").expect("should split");
        assert_eq!(words, vec!["cat", "my file.txt"]);
    }

    #[test]
    fn split_empty_quotes_yield_empty_word() {
        let words = split(r#"printf '' """#).expect("should split");
        assert_eq!(words, vec!["printf", "", ""]);
    }

    #[test]
    fn split_empty_input() {
        assert!(split("").expect("should split").is_empty());
        assert!(split("   ").expect("should split").is_empty());
    }

    #[test]
    fn split_rejects_unterminated_single_quote() {
        assert!(split("echo 'oops").is_err());
    }

    #[test]
    fn split_rejects_unterminated_double_quote() {
        let err = split(r#"echo "oops"#).unwrap_err();
        assert!(matches!(err, StevedoreError::InvalidOption { .. }));
    }

    #[test]
    fn split_rejects_trailing_backslash() {
        assert!(split(r"echo \").is_err());
    }
}
