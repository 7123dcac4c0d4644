use std::fmt;

use bytes::Bytes;

/// A decoded protocol value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Atom(String),
    Integer(i64),
    Binary(Bytes),
    Tuple(Vec<Term>),
    Reference(Reference),
}

/// An opaque correlation id minted by the controlling process.
///
/// Never interpreted, only echoed. The creation width is kept so an echoed
/// reference is byte-identical to the one received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Name of the node that created the reference.
    pub node: String,
    pub creation: Creation,
    pub id: Vec<u32>,
}

/// Node incarnation stamp of a reference, in the width it was encoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Creation {
    /// `NEW_REFERENCE_EXT`: one byte.
    Narrow(u8),
    /// `NEWER_REFERENCE_EXT`: four bytes.
    Wide(u32),
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    pub fn binary(data: impl Into<Bytes>) -> Self {
        Term::Binary(data.into())
    }

    pub fn tuple(elements: impl Into<Vec<Term>>) -> Self {
        Term::Tuple(elements.into())
    }

    /// `{Tag, Value}`, the shape of every error reply and event.
    pub fn tagged(tag: &str, value: Term) -> Self {
        Term::Tuple(vec![Term::atom(tag), value])
    }

    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Term::Atom(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Term::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&Bytes> {
        match self {
            Term::Binary(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Term]> {
        match self {
            Term::Tuple(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Term::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Short name of the variant, for protocol error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Atom(_) => "atom",
            Term::Integer(_) => "integer",
            Term::Binary(_) => "binary",
            Term::Tuple(_) => "tuple",
            Term::Reference(_) => "reference",
        }
    }
}

impl From<i64> for Term {
    fn from(value: i64) -> Self {
        Term::Integer(value)
    }
}

impl From<Reference> for Term {
    fn from(reference: Reference) -> Self {
        Term::Reference(reference)
    }
}

/// Erlang-style rendering, used in log lines.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write!(f, "{name}"),
            Term::Integer(value) => write!(f, "{value}"),
            Term::Binary(data) => {
                write!(f, "<<")?;
                for (i, byte) in data.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{byte}")?;
                }
                write!(f, ">>")
            }
            Term::Tuple(elements) => {
                write!(f, "{{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "}}")
            }
            Term::Reference(reference) => {
                write!(f, "#Ref<{}", reference.node)?;
                for word in reference.id.iter().rev() {
                    write!(f, ".{word}")?;
                }
                write!(f, ">")
            }
        }
    }
}
