use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Result, TermError};
use crate::tag;
use crate::term::{Creation, Reference, Term};

/// Longest atom the format allows, counted in characters.
pub const MAX_ATOM_CHARS: usize = 255;

/// Encode a term as a complete payload (version byte included).
///
/// Fails on terms the format cannot represent: atoms over
/// [`MAX_ATOM_CHARS`] characters, or lengths that overflow their
/// length field.
pub fn encode(term: &Term) -> Result<Bytes> {
    let mut dst = BytesMut::with_capacity(encoded_len_hint(term));
    dst.put_u8(tag::VERSION);
    put_term(term, &mut dst)?;
    Ok(dst.freeze())
}

fn put_term(term: &Term, dst: &mut BytesMut) -> Result<()> {
    match term {
        Term::Atom(name) => put_atom(name, dst)?,
        Term::Integer(value) => put_integer(*value, dst),
        Term::Binary(data) => {
            dst.put_u8(tag::BINARY_EXT);
            dst.put_u32(length::<u32>("binary", data.len())?);
            dst.put_slice(data);
        }
        Term::Tuple(elements) => {
            if let Ok(arity) = u8::try_from(elements.len()) {
                dst.put_u8(tag::SMALL_TUPLE_EXT);
                dst.put_u8(arity);
            } else {
                dst.put_u8(tag::LARGE_TUPLE_EXT);
                dst.put_u32(length::<u32>("tuple", elements.len())?);
            }
            for element in elements {
                put_term(element, dst)?;
            }
        }
        Term::Reference(reference) => put_reference(reference, dst)?,
    }
    Ok(())
}

fn length<T: TryFrom<usize>>(what: &'static str, len: usize) -> Result<T> {
    T::try_from(len).map_err(|_| TermError::TooLarge { what, len })
}

fn put_atom(name: &str, dst: &mut BytesMut) -> Result<()> {
    let chars = name.chars().count();
    if chars > MAX_ATOM_CHARS {
        return Err(TermError::AtomTooLong { chars });
    }

    // At most 255 characters, so at most 1020 bytes.
    if let Ok(len) = u8::try_from(name.len()) {
        dst.put_u8(tag::SMALL_ATOM_UTF8_EXT);
        dst.put_u8(len);
    } else {
        dst.put_u8(tag::ATOM_UTF8_EXT);
        dst.put_u16(length::<u16>("atom", name.len())?);
    }
    dst.put_slice(name.as_bytes());
    Ok(())
}

fn put_integer(value: i64, dst: &mut BytesMut) {
    if let Ok(value) = u8::try_from(value) {
        dst.put_u8(tag::SMALL_INTEGER_EXT);
        dst.put_u8(value);
    } else if let Ok(value) = i32::try_from(value) {
        dst.put_u8(tag::INTEGER_EXT);
        dst.put_i32(value);
    } else {
        let magnitude = value.unsigned_abs().to_le_bytes();
        let digits = 8 - magnitude.iter().rev().take_while(|b| **b == 0).count();
        dst.put_u8(tag::SMALL_BIG_EXT);
        dst.put_u8(digits as u8);
        dst.put_u8(u8::from(value < 0));
        dst.put_slice(&magnitude[..digits]);
    }
}

fn put_reference(reference: &Reference, dst: &mut BytesMut) -> Result<()> {
    let tag = match reference.creation {
        Creation::Narrow(_) => tag::NEW_REFERENCE_EXT,
        Creation::Wide(_) => tag::NEWER_REFERENCE_EXT,
    };
    dst.put_u8(tag);
    dst.put_u16(length::<u16>("reference id", reference.id.len())?);
    put_atom(&reference.node, dst)?;
    match reference.creation {
        Creation::Narrow(creation) => dst.put_u8(creation),
        Creation::Wide(creation) => dst.put_u32(creation),
    }
    for word in &reference.id {
        dst.put_u32(*word);
    }
    Ok(())
}

fn encoded_len_hint(term: &Term) -> usize {
    match term {
        Term::Binary(data) => 6 + data.len(),
        _ => 64,
    }
}
