//! Requests decoded from terms.
//!
//! Decoding is exhaustive: a term that does not match one of these shapes
//! exactly is a [`PortError::Protocol`] and ends the port. Direction and
//! edge atoms are carried as given; the port answers ones it does not know
//! with an error reply.

use bytes::Bytes;
use devport_term::{Reference, Term};

use crate::error::{PortError, Result};

/// A request to a GPIO port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioRequest {
    /// `{init, Pin, input | output}`
    Init { pin: u32, direction: String },
    /// `{cast, release}`
    Release,
    /// `{call, Ref, Op}`
    Call { reference: Reference, call: GpioCall },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GpioCall {
    /// `{write, Value}`; any non-zero value drives the pin high.
    Write { high: bool },
    /// `{read}`
    Read,
    /// `{set_int, rising | falling | both | none}`
    SetInt { mode: String },
}

/// A request to an I2C port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cRequest {
    /// `{call, Ref, Op}`
    Call { reference: Reference, call: I2cCall },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cCall {
    /// `{i2c_write, Data}`
    Write { data: Bytes },
    /// `{i2c_read, Length}`
    Read { len: usize },
}

impl GpioRequest {
    pub fn from_term(term: &Term) -> Result<Self> {
        let elements = tuple(term, "gpio request")?;
        let (kind, args) = discriminator(elements, "gpio request")?;
        match kind {
            "init" => {
                let [pin, direction] = arity::<2>(args, "init")?;
                let pin = integer(pin, "init pin")?;
                let pin = u32::try_from(pin)
                    .map_err(|_| PortError::protocol(format!("init: pin {pin} out of range")))?;
                let direction = atom(direction, "init direction")?.to_owned();
                Ok(GpioRequest::Init { pin, direction })
            }
            "cast" => {
                let [command] = arity::<1>(args, "cast")?;
                match atom(command, "cast command")? {
                    "release" => Ok(GpioRequest::Release),
                    other => Err(PortError::protocol(format!("cast: unknown command {other}"))),
                }
            }
            "call" => {
                let (reference, op) = call_envelope(args)?;
                let op = tuple(op, "call operation")?;
                let (name, op_args) = discriminator(op, "call operation")?;
                let call = match name {
                    "write" => {
                        let [value] = arity::<1>(op_args, "write")?;
                        GpioCall::Write {
                            high: integer(value, "write value")? != 0,
                        }
                    }
                    "read" => {
                        let [] = arity::<0>(op_args, "read")?;
                        GpioCall::Read
                    }
                    "set_int" => {
                        let [mode] = arity::<1>(op_args, "set_int")?;
                        GpioCall::SetInt {
                            mode: atom(mode, "set_int mode")?.to_owned(),
                        }
                    }
                    other => {
                        return Err(PortError::protocol(format!(
                            "call: unknown gpio operation {other}"
                        )))
                    }
                };
                Ok(GpioRequest::Call { reference, call })
            }
            other => Err(PortError::protocol(format!(
                "unknown gpio request type {other}"
            ))),
        }
    }
}

impl I2cRequest {
    pub fn from_term(term: &Term) -> Result<Self> {
        let elements = tuple(term, "i2c request")?;
        let (kind, args) = discriminator(elements, "i2c request")?;
        if kind != "call" {
            return Err(PortError::protocol(format!(
                "unknown i2c request type {kind}"
            )));
        }

        let (reference, op) = call_envelope(args)?;
        let op = tuple(op, "call operation")?;
        let (name, op_args) = discriminator(op, "call operation")?;
        let call = match name {
            "i2c_write" => {
                let [data] = arity::<1>(op_args, "i2c_write")?;
                let data = data.as_binary().ok_or_else(|| {
                    PortError::protocol(format!("i2c_write: expected binary, got {}", data.kind()))
                })?;
                I2cCall::Write { data: data.clone() }
            }
            "i2c_read" => {
                let [len] = arity::<1>(op_args, "i2c_read")?;
                let len = integer(len, "i2c_read length")?;
                let len = usize::try_from(len)
                    .map_err(|_| PortError::protocol(format!("i2c_read: negative length {len}")))?;
                I2cCall::Read { len }
            }
            other => {
                return Err(PortError::protocol(format!(
                    "call: unknown i2c operation {other}"
                )))
            }
        };
        Ok(I2cRequest::Call { reference, call })
    }
}

fn tuple<'a>(term: &'a Term, what: &str) -> Result<&'a [Term]> {
    term.as_tuple()
        .ok_or_else(|| PortError::protocol(format!("{what}: expected tuple, got {}", term.kind())))
}

fn atom<'a>(term: &'a Term, what: &str) -> Result<&'a str> {
    term.as_atom()
        .ok_or_else(|| PortError::protocol(format!("{what}: expected atom, got {}", term.kind())))
}

fn integer(term: &Term, what: &str) -> Result<i64> {
    term.as_integer().ok_or_else(|| {
        PortError::protocol(format!("{what}: expected integer, got {}", term.kind()))
    })
}

/// Split `{Tag, Args...}` into the tag atom and the remaining elements.
fn discriminator<'a>(elements: &'a [Term], what: &str) -> Result<(&'a str, &'a [Term])> {
    let (first, rest) = elements
        .split_first()
        .ok_or_else(|| PortError::protocol(format!("{what}: empty tuple")))?;
    Ok((atom(first, what)?, rest))
}

fn arity<'a, const N: usize>(args: &'a [Term], what: &str) -> Result<&'a [Term; N]> {
    args.try_into().map_err(|_| {
        PortError::protocol(format!(
            "{what}: expected {N} arguments, got {}",
            args.len()
        ))
    })
}

/// `Ref, Op` of a `{call, Ref, Op}` request.
fn call_envelope(args: &[Term]) -> Result<(Reference, &Term)> {
    let [reference, op] = arity::<2>(args, "call")?;
    let reference = reference.as_reference().ok_or_else(|| {
        PortError::protocol(format!(
            "call: expected reference, got {}",
            reference.kind()
        ))
    })?;
    Ok((reference.clone(), op))
}
