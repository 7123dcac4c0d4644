use bytes::{Buf, Bytes};

use crate::encode::MAX_ATOM_CHARS;
use crate::error::{Result, TermError};
use crate::tag;
use crate::term::{Creation, Reference, Term};

/// Deepest tuple nesting accepted. Requests nest two levels.
pub const MAX_DEPTH: usize = 32;

/// Decode a complete payload (version byte included) into one term.
///
/// The whole payload must be consumed; anything left over is an error.
pub fn decode(payload: &[u8]) -> Result<Term> {
    let mut src = payload;
    let version = *src.first().ok_or(TermError::Empty)?;
    if version != tag::VERSION {
        return Err(TermError::BadVersion(version));
    }
    src.advance(1);

    let term = get_term(&mut src, 0)?;
    if src.has_remaining() {
        return Err(TermError::TrailingBytes(src.remaining()));
    }
    Ok(term)
}

fn need(src: &&[u8], needed: usize) -> Result<()> {
    if src.remaining() < needed {
        return Err(TermError::Truncated {
            needed,
            remaining: src.remaining(),
        });
    }
    Ok(())
}

fn get_term(src: &mut &[u8], depth: usize) -> Result<Term> {
    need(src, 1)?;
    match src.get_u8() {
        tag::SMALL_INTEGER_EXT => {
            need(src, 1)?;
            Ok(Term::Integer(src.get_u8() as i64))
        }
        tag::INTEGER_EXT => {
            need(src, 4)?;
            Ok(Term::Integer(src.get_i32() as i64))
        }
        tag::SMALL_BIG_EXT => get_small_big(src).map(Term::Integer),
        tag::BINARY_EXT => {
            need(src, 4)?;
            let len = src.get_u32() as usize;
            need(src, len)?;
            let data = Bytes::copy_from_slice(&src[..len]);
            src.advance(len);
            Ok(Term::Binary(data))
        }
        tag::SMALL_TUPLE_EXT => {
            need(src, 1)?;
            let arity = src.get_u8() as usize;
            get_elements(src, arity, depth)
        }
        tag::LARGE_TUPLE_EXT => {
            need(src, 4)?;
            let arity = src.get_u32() as usize;
            get_elements(src, arity, depth)
        }
        tag::NEW_REFERENCE_EXT => get_reference(src, false).map(Term::Reference),
        tag::NEWER_REFERENCE_EXT => get_reference(src, true).map(Term::Reference),
        other => get_atom_body(src, other).map(Term::Atom),
    }
}

fn get_elements(src: &mut &[u8], arity: usize, depth: usize) -> Result<Term> {
    if depth >= MAX_DEPTH {
        return Err(TermError::TooDeep(MAX_DEPTH));
    }
    // Every element takes at least two bytes; reject impossible arities
    // before allocating for them.
    need(src, arity.saturating_mul(2))?;
    let mut elements = Vec::with_capacity(arity);
    for _ in 0..arity {
        elements.push(get_term(src, depth + 1)?);
    }
    Ok(Term::Tuple(elements))
}

fn get_small_big(src: &mut &[u8]) -> Result<i64> {
    need(src, 2)?;
    let digits = src.get_u8() as usize;
    let negative = src.get_u8() != 0;
    need(src, digits)?;

    let mut magnitude = [0u8; 8];
    for (i, byte) in src[..digits].iter().enumerate() {
        if i >= magnitude.len() {
            if *byte != 0 {
                return Err(TermError::IntegerOverflow { digits });
            }
            continue;
        }
        magnitude[i] = *byte;
    }
    src.advance(digits);

    let magnitude = u64::from_le_bytes(magnitude);
    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    value.ok_or(TermError::IntegerOverflow { digits })
}

fn get_atom(src: &mut &[u8]) -> Result<String> {
    need(src, 1)?;
    let tag = src.get_u8();
    get_atom_body(src, tag)
}

fn get_atom_body(src: &mut &[u8], tag: u8) -> Result<String> {
    let (len, latin1) = match tag {
        tag::ATOM_EXT => {
            need(src, 2)?;
            (src.get_u16() as usize, true)
        }
        tag::SMALL_ATOM_EXT => {
            need(src, 1)?;
            (src.get_u8() as usize, true)
        }
        tag::ATOM_UTF8_EXT => {
            need(src, 2)?;
            (src.get_u16() as usize, false)
        }
        tag::SMALL_ATOM_UTF8_EXT => {
            need(src, 1)?;
            (src.get_u8() as usize, false)
        }
        other => return Err(TermError::UnknownTag(other)),
    };

    need(src, len)?;
    let text = &src[..len];
    let name = if latin1 {
        text.iter().map(|b| char::from(*b)).collect()
    } else {
        std::str::from_utf8(text)
            .map_err(|_| TermError::InvalidAtom)?
            .to_owned()
    };
    src.advance(len);

    let chars = name.chars().count();
    if chars > MAX_ATOM_CHARS {
        return Err(TermError::AtomTooLong { chars });
    }
    Ok(name)
}

fn get_reference(src: &mut &[u8], wide: bool) -> Result<Reference> {
    need(src, 2)?;
    let len = src.get_u16() as usize;
    let node = get_atom(src)?;
    let creation = if wide {
        need(src, 4)?;
        Creation::Wide(src.get_u32())
    } else {
        need(src, 1)?;
        Creation::Narrow(src.get_u8())
    };
    need(src, len.saturating_mul(4))?;
    let id = (0..len).map(|_| src.get_u32()).collect();
    Ok(Reference { node, creation, id })
}
