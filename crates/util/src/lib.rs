//! Helpers shared by the Thunder Client MCP server: shell-style lexing,
//! per-shell quoting, and working-directory resolution.

pub mod path_processing;
pub mod shell_lexing;
pub mod shell_quoting;

pub use path_processing::{expand_tilde, resolve_working_directory};
pub use shell_lexing::{LexToken, lex_shell_like_ranged};
pub use shell_quoting::{ShellFlavor, normalize_data_payloads, quote_cmd_command_line, quote_flag_value, quote_windows_argument};
