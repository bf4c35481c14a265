//! # Shell-like Lexing Utilities
//!
//! Tokenizes the pass-through argument blob of a `curl` command the way a
//! POSIX shell would group words: single quotes are literal, double quotes
//! honor backslash escapes, and an unquoted backslash escapes the next byte.
//! Tokens keep their quotes and byte ranges so callers can rewrite spans of the
//! original text in place.

/// Token with original byte positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexToken<'a> {
    /// The text content of the token, quotes included
    pub text: &'a str,
    /// The starting byte position in the original string
    pub start: usize,
    /// The ending byte position in the original string
    pub end: usize,
}

impl LexToken<'_> {
    /// Returns the opening quote byte when the token starts with `'` or `"`.
    pub fn leading_quote(&self) -> Option<u8> {
        match self.text.as_bytes().first() {
            Some(b'\'') => Some(b'\''),
            Some(b'"') => Some(b'"'),
            _ => None,
        }
    }
}

/// Tokenize input returning borrowed slices and byte ranges.
///
/// # Example
/// ```rust
/// use thunder_mcp_util::shell_lexing::lex_shell_like_ranged;
///
/// let tokens = lex_shell_like_ranged("--data 'a b'");
/// assert_eq!(tokens[1].text, "'a b'");
/// assert_eq!(tokens[1].start, 7);
/// assert_eq!(tokens[1].end, 12);
/// ```
pub fn lex_shell_like_ranged(input: &str) -> Vec<LexToken<'_>> {
    let mut tokens = Vec::new();
    let mut current_index = 0usize;
    let bytes = input.as_bytes();

    while current_index < bytes.len() {
        current_index = skip_whitespace(bytes, current_index);

        if current_index >= bytes.len() {
            break;
        }

        let start = current_index;
        current_index = parse_token(bytes, current_index);

        tokens.push(LexToken {
            text: &input[start..current_index],
            start,
            end: current_index,
        });
    }

    tokens
}

fn skip_whitespace(bytes: &[u8], start_index: usize) -> usize {
    let mut index = start_index;
    while index < bytes.len() && bytes[index].is_ascii_whitespace() {
        index += 1;
    }
    index
}

/// Parses a single token from the input bytes and returns the index after it.
///
/// Unterminated quotes run to the end of input.
fn parse_token(bytes: &[u8], start_index: usize) -> usize {
    let mut index = start_index;
    let mut in_single_quotes = false;
    let mut in_double_quotes = false;

    while index < bytes.len() {
        let byte = bytes[index];

        // Backslash is literal inside single quotes.
        if byte == b'\\' && !in_single_quotes && index + 1 < bytes.len() {
            index += 2;
            continue;
        }

        if byte == b'\'' && !in_double_quotes {
            in_single_quotes = !in_single_quotes;
            index += 1;
            continue;
        }

        if byte == b'"' && !in_single_quotes {
            in_double_quotes = !in_double_quotes;
            index += 1;
            continue;
        }

        if !in_single_quotes && !in_double_quotes && byte.is_ascii_whitespace() {
            break;
        }

        index += 1;
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_shell_like(input: &str) -> Vec<&str> {
        lex_shell_like_ranged(input).into_iter().map(|token| token.text).collect()
    }

    #[test]
    fn splits_curl_arguments_on_whitespace() {
        let tokens = lex_shell_like("-X POST https://api.example.com/x");
        assert_eq!(tokens, vec!["-X", "POST", "https://api.example.com/x"]);
    }

    #[test]
    fn keeps_quoted_payloads_together() {
        let tokens = lex_shell_like("-H 'Content-Type: application/json' -d \"{\\\"a\\\": 1}\"");
        assert_eq!(tokens, vec!["-H", "'Content-Type: application/json'", "-d", "\"{\\\"a\\\": 1}\""]);
    }

    #[test]
    fn backslash_is_literal_inside_single_quotes() {
        let tokens = lex_shell_like(r"-d 'C:\path\' next");
        assert_eq!(tokens, vec!["-d", r"'C:\path\'", "next"]);
    }

    #[test]
    fn escaped_whitespace_does_not_split() {
        let tokens = lex_shell_like("path\\ with\\ spaces");
        assert_eq!(tokens, vec!["path\\ with\\ spaces"]);
    }

    #[test]
    fn empty_and_blank_input_yield_no_tokens() {
        assert!(lex_shell_like("").is_empty());
        assert!(lex_shell_like("   \t  \n  ").is_empty());
    }

    #[test]
    fn ranges_point_back_into_the_input() {
        let input = "-d 'x y' --data-raw z";
        let tokens = lex_shell_like_ranged(input);
        assert_eq!(tokens.len(), 4);
        for token in &tokens {
            assert_eq!(&input[token.start..token.end], token.text);
        }
        assert_eq!(tokens[1].leading_quote(), Some(b'\''));
        assert_eq!(tokens[3].leading_quote(), None);
    }
}
