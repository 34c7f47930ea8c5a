use bytes::{BufMut, Bytes, BytesMut};

/// POSIX named character class, written as `[:name:]` inside a bracket group.
///
/// Classes are ASCII only; each one stands for a fixed run of bracket-group
/// members (single characters and ranges).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedClass {
    Alnum,
    Alpha,
    Blank,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Print,
    Punct,
    Space,
    Upper,
    Xdigit,
}

impl NamedClass {
    pub const ALL: [NamedClass; 12] = [
        Self::Alnum,
        Self::Alpha,
        Self::Blank,
        Self::Cntrl,
        Self::Digit,
        Self::Graph,
        Self::Lower,
        Self::Print,
        Self::Punct,
        Self::Space,
        Self::Upper,
        Self::Xdigit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Alnum => "alnum",
            Self::Alpha => "alpha",
            Self::Blank => "blank",
            Self::Cntrl => "cntrl",
            Self::Digit => "digit",
            Self::Graph => "graph",
            Self::Lower => "lower",
            Self::Print => "print",
            Self::Punct => "punct",
            Self::Space => "space",
            Self::Upper => "upper",
            Self::Xdigit => "xdigit",
        }
    }

    /// The token as it appears in a pattern, e.g. `[:digit:]`.
    pub fn token(self) -> &'static str {
        match self {
            Self::Alnum => "[:alnum:]",
            Self::Alpha => "[:alpha:]",
            Self::Blank => "[:blank:]",
            Self::Cntrl => "[:cntrl:]",
            Self::Digit => "[:digit:]",
            Self::Graph => "[:graph:]",
            Self::Lower => "[:lower:]",
            Self::Print => "[:print:]",
            Self::Punct => "[:punct:]",
            Self::Space => "[:space:]",
            Self::Upper => "[:upper:]",
            Self::Xdigit => "[:xdigit:]",
        }
    }

    /// Bracket-group members the token is rewritten to.
    ///
    /// `Punct` leads with `]` and ends with `-`, so it only reads as intended
    /// when it opens the bracket group.
    pub fn replacement(self) -> &'static str {
        match self {
            Self::Alnum => "A-Za-z0-9",
            Self::Alpha => "A-Za-z",
            Self::Blank => " \t",
            Self::Cntrl => "\x00-\x1F\x7F",
            Self::Digit => "0-9",
            Self::Graph => "!-~",
            Self::Lower => "a-z",
            Self::Print => " -~",
            Self::Punct => "][!\"#$%&'()*+,./:;<=>?@\\^_`{|}~-",
            Self::Space => " \t\r\n\x0B\x0C",
            Self::Upper => "A-Z",
            Self::Xdigit => "A-Fa-f0-9",
        }
    }

    /// Recognizes a class token at the very start of `input`.
    pub fn from_token(input: &[u8]) -> Option<Self> {
        if !input.starts_with(b"[:") {
            return None;
        }
        Self::ALL
            .into_iter()
            .find(|class| input.starts_with(class.token().as_bytes()))
    }
}

/// Rewrites every named class token in `pattern` into its literal members.
///
/// This is plain text substitution in a single left-to-right pass: tokens
/// are replaced wherever they occur, text produced by a replacement is not
/// scanned again, and unknown `[:name:]` tokens are copied through. The
/// result is not validated; a malformed bracket group is reported later by
/// the matcher.
///
/// # Examples
///
/// ```
/// use globcheck::expand_named_classes;
///
/// assert_eq!(expand_named_classes("[[:digit:]]"), "[0-9]");
/// assert_eq!(expand_named_classes("[[:upper:][:digit:]_]"), "[A-Z0-9_]");
/// assert_eq!(expand_named_classes("plain"), "plain");
/// ```
pub fn expand_named_classes(pattern: impl AsRef<[u8]>) -> Bytes {
    let pattern = pattern.as_ref();
    let mut expanded = BytesMut::with_capacity(pattern.len());
    let mut replaced = 0;
    let mut pos = 0;

    while pos < pattern.len() {
        let rest = &pattern[pos..];
        match NamedClass::from_token(rest) {
            Some(class) => {
                expanded.put_slice(class.replacement().as_bytes());
                pos += class.token().len();
                replaced += 1;
            }
            None => {
                expanded.put_u8(rest[0]);
                pos += 1;
            }
        }
    }

    if replaced != 0 {
        log::trace!("expanded {} named class token(s)", replaced);
    }

    expanded.freeze()
}
