pub mod classes;
pub mod matcher;
pub mod outcome;

pub use classes::{expand_named_classes, NamedClass};
pub use matcher::Matcher;
pub use outcome::{MatchKind, MatchResult, SyntaxError, UnknownMatchKind};

/// Matches `text` against the shell-style glob `pattern`.
///
/// Supported syntax:
/// - `?` matches any single byte
/// - `*` matches any run of bytes, including an empty one
/// - `[abc]`, `[a-z]`, `[!abc]` match one byte against a bracket group
/// - `[:alpha:]` and the other POSIX class names expand inside bracket groups
/// - `\` makes the next character literal
///
/// # Examples
///
/// ```
/// use globcheck::{glob, MatchResult};
///
/// assert_eq!(glob("main.?", "main.c"), MatchResult::Matched);
/// assert_eq!(glob("Law*", "GrokLaw"), MatchResult::Unmatched);
/// assert!(glob("[abc", "a").is_syntax_error());
/// ```
pub fn glob(pattern: impl AsRef<[u8]>, text: impl AsRef<[u8]>) -> MatchResult {
    Matcher::new(pattern).matches(text)
}
