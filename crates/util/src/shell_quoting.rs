//! Quoting rules for the shells used to launch the Thunder Client CLI.
//!
//! POSIX hosts run commands through `sh -c`, which honors single-quote literals.
//! Windows hosts run them through `cmd /S /C`, which reads the line twice over:
//! `cmd.exe` first looks for `&`, `|`, `<`, `>` and `^` outside its own quote
//! state, then the child splits what remains with the MSVCRT rules, where single
//! quotes mean nothing and a literal double quote is written as `\"`.
//! [`normalize_data_payloads`] rewrites only the payloads of curl data flags
//! for the MSVCRT layer and [`quote_cmd_command_line`] protects the finished
//! line from `cmd.exe`, so a request body written for a POSIX shell reaches
//! the CLI unchanged.
//!
//! `%NAME%` inside `cmd.exe` quotes is still expanded; `cmd` has no escape for it there.

use crate::shell_lexing::{LexToken, lex_shell_like_ranged};

/// Curl flags whose argument is a request body.
pub const DATA_FLAGS: [&str; 3] = ["-d", "--data", "--data-raw"];

/// Shell family that will interpret an assembled command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShellFlavor {
    Posix,
    Windows,
}

impl ShellFlavor {
    /// The flavor of the shell available on the compiling host.
    pub fn host() -> Self {
        if cfg!(windows) { Self::Windows } else { Self::Posix }
    }
}

/// Rewrites every quoted data-flag payload in `args` for the given shell.
///
/// POSIX input is returned untouched. For Windows, each `-d`, `--data` or
/// `--data-raw` followed by a quoted argument has that argument, up to its
/// first closing quote, decoded with POSIX rules and re-encoded with
/// [`quote_windows_argument`]. Everything outside those spans is copied
/// verbatim. Unterminated quotes are left alone.
pub fn normalize_data_payloads(args: &str, flavor: ShellFlavor) -> String {
    if flavor == ShellFlavor::Posix {
        return args.to_string();
    }

    let tokens = lex_shell_like_ranged(args);
    let mut output = String::with_capacity(args.len() + 16);
    let mut cursor = 0usize;

    for pair in tokens.windows(2) {
        let (flag, value) = (&pair[0], &pair[1]);
        if flag.start < cursor || !DATA_FLAGS.contains(&flag.text) {
            continue;
        }
        let Some((consumed, payload)) = decode_quoted_prefix(value) else {
            continue;
        };
        output.push_str(&args[cursor..value.start]);
        output.push_str(&quote_windows_argument(&payload));
        cursor = value.start + consumed;
    }

    output.push_str(&args[cursor..]);
    output
}

/// Decodes the leading quoted segment of a token.
///
/// Returns the number of bytes the segment occupies (quotes included) and the
/// literal payload it denotes.
fn decode_quoted_prefix(token: &LexToken<'_>) -> Option<(usize, String)> {
    let quote = token.leading_quote()?;
    let body = &token.text[1..];

    if quote == b'\'' {
        let close = body.find('\'')?;
        return Some((close + 2, body[..close].to_string()));
    }

    let mut payload = String::with_capacity(body.len());
    let mut chars = body.char_indices();
    while let Some((index, ch)) = chars.next() {
        match ch {
            '"' => return Some((index + 2, payload)),
            '\\' => match chars.clone().next() {
                Some((_, next @ ('"' | '\\' | '$' | '`'))) => {
                    payload.push(next);
                    chars.next();
                }
                Some((_, '\n')) => {
                    chars.next();
                }
                _ => payload.push('\\'),
            },
            other => payload.push(other),
        }
    }
    None
}

/// Wraps `value` in double quotes so MSVCRT argument parsing yields it back
/// byte for byte.
///
/// Backslashes are only special when they precede a double quote, so runs of
/// them are doubled before an escaped quote and before the closing quote.
pub fn quote_windows_argument(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    let mut pending_backslashes = 0usize;

    for ch in value.chars() {
        match ch {
            '\\' => pending_backslashes += 1,
            '"' => {
                push_backslashes(&mut quoted, pending_backslashes * 2 + 1);
                quoted.push('"');
                pending_backslashes = 0;
            }
            other => {
                push_backslashes(&mut quoted, pending_backslashes);
                quoted.push(other);
                pending_backslashes = 0;
            }
        }
    }

    push_backslashes(&mut quoted, pending_backslashes * 2);
    quoted.push('"');
    quoted
}

/// Wraps `value` in double quotes for a POSIX shell, escaping the characters
/// that stay special inside them.
pub fn quote_posix_argument(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Double-quotes a flag value for the given shell.
pub fn quote_flag_value(value: &str, flavor: ShellFlavor) -> String {
    match flavor {
        ShellFlavor::Posix => quote_posix_argument(value),
        ShellFlavor::Windows => quote_windows_argument(value),
    }
}

/// Characters `cmd.exe` acts on when they appear outside its quotes.
const CMD_METACHARACTERS: [char; 6] = ['&', '|', '<', '>', '^', '%'];

/// Prepares an assembled command line for `cmd /S /C`.
///
/// `cmd.exe` flips its quote state at every `"`, backslash or not, so the
/// parity is tracked over the whole line and each metacharacter that lands
/// outside quotes is escaped with `^`. The result is wrapped in the outer
/// quote pair that `/S` strips, which keeps a quoted program path intact.
pub fn quote_cmd_command_line(line: &str) -> String {
    let mut quoted = String::with_capacity(line.len() + 8);
    quoted.push('"');
    let mut in_quotes = false;
    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if !in_quotes && CMD_METACHARACTERS.contains(&ch) {
            quoted.push('^');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

fn push_backslashes(target: &mut String, count: usize) {
    target.extend(std::iter::repeat_n('\\', count));
}
