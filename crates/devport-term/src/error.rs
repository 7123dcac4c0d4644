/// Errors that can occur while encoding or decoding a term.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    /// The payload was empty.
    #[error("empty term payload")]
    Empty,

    /// The payload does not start with the format version byte.
    #[error("unsupported term format version {0} (expected 131)")]
    BadVersion(u8),

    /// The payload ended inside a term.
    #[error("truncated term (needed {needed} bytes, {remaining} remaining)")]
    Truncated { needed: usize, remaining: usize },

    /// A tag byte this codec does not handle.
    #[error("unsupported term tag {0}")]
    UnknownTag(u8),

    /// An atom whose text is not valid UTF-8.
    #[error("atom is not valid utf-8")]
    InvalidAtom,

    /// An atom longer than the format allows.
    #[error("atom has {chars} characters (at most 255 allowed)")]
    AtomTooLong { chars: usize },

    /// A length that does not fit its length field.
    #[error("{what} length {len} does not fit the term format")]
    TooLarge { what: &'static str, len: usize },

    /// A bignum that does not fit in 64 bits.
    #[error("integer does not fit in 64 bits ({digits} digit bytes)")]
    IntegerOverflow { digits: usize },

    /// Tuples nested deeper than the decoder allows.
    #[error("term nesting exceeds {0} levels")]
    TooDeep(usize),

    /// Bytes left over after the top-level term.
    #[error("{0} trailing bytes after term")]
    TrailingBytes(usize),
}

pub type Result<T> = std::result::Result<T, TermError>;
