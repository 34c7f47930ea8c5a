use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A structural problem in a glob pattern.
///
/// Offsets are byte positions in the expanded pattern (after named classes
/// were substituted), pointing at the start of the malformed construct.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxError {
    #[error("unterminated bracket class at offset {offset}")]
    UnterminatedClass { offset: usize },
    #[error("dangling escape at offset {offset}")]
    DanglingEscape { offset: usize },
}

impl SyntaxError {
    pub fn offset(&self) -> usize {
        match *self {
            Self::UnterminatedClass { offset } | Self::DanglingEscape { offset } => offset,
        }
    }
}

/// Verdict of matching one text against one pattern.
///
/// A malformed pattern is never reported as [`MatchResult::Unmatched`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchResult {
    Matched,
    Unmatched,
    SyntaxError(SyntaxError),
}

impl MatchResult {
    pub fn kind(&self) -> MatchKind {
        match self {
            Self::Matched => MatchKind::Matched,
            Self::Unmatched => MatchKind::Unmatched,
            Self::SyntaxError(_) => MatchKind::SyntaxError,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched)
    }

    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Self::SyntaxError(_))
    }

    /// Converts the verdict into a `Result`, so a malformed pattern can be
    /// propagated with `?` while a plain non-match stays `Ok(false)`.
    pub fn into_result(self) -> Result<bool, SyntaxError> {
        match self {
            Self::Matched => Ok(true),
            Self::Unmatched => Ok(false),
            Self::SyntaxError(err) => Err(err),
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().label()
    }
}

impl From<SyntaxError> for MatchResult {
    fn from(err: SyntaxError) -> Self {
        Self::SyntaxError(err)
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// [`MatchResult`] without the syntax error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    Matched,
    Unmatched,
    SyntaxError,
}

impl MatchKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Matched => "GLOB_MATCHED",
            Self::Unmatched => "GLOB_UNMATCHED",
            Self::SyntaxError => "GLOB_SYNTAX_ERROR",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown match kind {0:?}, use any of \"matched\", \"unmatched\" or \"syntax-error\"")]
pub struct UnknownMatchKind(String);

impl FromStr for MatchKind {
    type Err = UnknownMatchKind;

    // Accepts both the short names and the display labels.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.strip_prefix("glob-").unwrap_or(normalized.as_str()) {
            "matched" => Ok(Self::Matched),
            "unmatched" => Ok(Self::Unmatched),
            "syntax-error" => Ok(Self::SyntaxError),
            _ => Err(UnknownMatchKind(s.to_owned())),
        }
    }
}
