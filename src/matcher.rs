use bytes::Bytes;

use crate::classes::expand_named_classes;
use crate::outcome::{MatchResult, SyntaxError};

/// A glob pattern with its named classes already expanded.
///
/// Useful when one pattern is checked against many texts. The pattern is
/// still scanned from the start on every call; nothing is compiled.
///
/// # Examples
///
/// ```
/// use globcheck::{MatchResult, Matcher};
///
/// let matcher = Matcher::new("*.[ch]");
/// assert_eq!(matcher.matches("main.c"), MatchResult::Matched);
/// assert_eq!(matcher.matches("glob.h"), MatchResult::Matched);
/// assert_eq!(matcher.matches("main.rs"), MatchResult::Unmatched);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matcher {
    pattern: Bytes,
}

impl Matcher {
    pub fn new(pattern: impl AsRef<[u8]>) -> Self {
        Self {
            pattern: expand_named_classes(pattern),
        }
    }

    /// The expanded pattern.
    pub fn pattern(&self) -> &[u8] {
        &self.pattern
    }

    pub fn matches(&self, text: impl AsRef<[u8]>) -> MatchResult {
        match_text(&self.pattern, text.as_ref())
    }
}

// Resume point of the most recent `*`: the pattern position right after it
// and the text position its tail was last tried from.
#[derive(Debug, Clone, Copy)]
struct Backtrack {
    p: usize,
    t: usize,
}

// Matches the whole `text` against the whole expanded `pattern`.
//
// Only the most recent `*` is kept as a backtrack point. Retrying an earlier
// star can only rescan tails of the latest one from further into the text,
// and a malformed construct always runs to the end of the pattern, so no
// syntax error is missed by dropping older stars.
fn match_text(pattern: &[u8], text: &[u8]) -> MatchResult {
    let mut p = 0;
    let mut t = 0;
    let mut star: Option<Backtrack> = None;

    loop {
        let advanced = if p < pattern.len() && t < text.len() {
            match pattern[p] {
                b'?' => {
                    p += 1;
                    t += 1;
                    true
                }
                b'*' => {
                    p += 1;
                    star = Some(Backtrack { p, t });
                    true
                }
                b'[' => match BracketClass::new(pattern, p).test(text[t]) {
                    Ok((true, next)) => {
                        p = next;
                        t += 1;
                        true
                    }
                    Ok((false, _)) => false,
                    Err(err) => {
                        log::trace!("{}", err);
                        return err.into();
                    }
                },
                b'\\' => {
                    let Some(&escaped) = pattern.get(p + 1) else {
                        let err = SyntaxError::DanglingEscape { offset: p };
                        log::trace!("{}", err);
                        return err.into();
                    };
                    let equal = escaped == text[t];
                    if equal {
                        p += 2;
                        t += 1;
                    }
                    equal
                }
                literal => {
                    let equal = literal == text[t];
                    if equal {
                        p += 1;
                        t += 1;
                    }
                    equal
                }
            }
        } else if t == text.len() {
            // Trailing stars match the empty remainder.
            while pattern.get(p) == Some(&b'*') {
                p += 1;
            }
            if p == pattern.len() {
                return MatchResult::Matched;
            }
            false
        } else {
            false
        };

        if advanced {
            continue;
        }

        // Let the latest star swallow one more byte and rescan its tail.
        match star.as_mut() {
            Some(retry) if retry.t < text.len() => {
                retry.t += 1;
                log::trace!("star before offset {} resumes at text byte {}", retry.p, retry.t);
                p = retry.p;
                t = retry.t;
            }
            _ => return MatchResult::Unmatched,
        }
    }
}

/// Scanner for one bracket group, e.g. `[a-z_]` or `[!0-9]`.
///
/// The first member after `[` or `[!` is always taken literally, so `]` in
/// that position does not close the group. A `-` right before the closing
/// `]` is a literal member too.
struct BracketClass<'a> {
    pattern: &'a [u8],
    pos: usize,
    open: usize,
}

impl<'a> BracketClass<'a> {
    /// Starts scanning at the `[` located at `open`.
    fn new(pattern: &'a [u8], open: usize) -> Self {
        Self {
            pattern,
            pos: open,
            open,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.pattern.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    /// Tests `ch` against the group.
    ///
    /// Returns whether it is a member, together with the position right
    /// after the closing `]`.
    fn test(mut self, ch: u8) -> Result<(bool, usize), SyntaxError> {
        let unterminated = SyntaxError::UnterminatedClass { offset: self.open };

        self.advance(); // consume '['
        let negated = self.peek() == Some(b'!');
        if negated {
            self.advance();
        }

        let first = self.advance().ok_or(unterminated)?;
        let mut matched = first == ch;
        let mut prev = first;

        loop {
            match self.peek() {
                None => return Err(unterminated),
                Some(b']') => break,
                Some(b'-') => {
                    self.advance();
                    match self.peek() {
                        None => return Err(unterminated),
                        // Left for the outer check to close the group.
                        Some(b']') => matched |= ch == b'-',
                        Some(hi) => {
                            matched |= prev <= ch && ch <= hi;
                            prev = hi;
                            self.advance();
                        }
                    }
                }
                Some(member) => {
                    matched |= member == ch;
                    prev = member;
                    self.advance();
                }
            }
        }

        self.advance(); // consume ']'
        Ok((matched != negated, self.pos))
    }
}
