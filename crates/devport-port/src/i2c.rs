use std::fs::File;
use std::io::{Read, Write};

use devport_device::{I2cDevice, I2cError};
use devport_term::Term;
use tracing::warn;

use crate::error::{PortError, Result};
use crate::reply;
use crate::request::{I2cCall, I2cRequest};
use crate::runner::Port;

/// Serves one I2C slave on an already-bound device.
#[derive(Debug)]
pub struct I2cPort<T = File> {
    device: I2cDevice<T>,
}

impl<T: Read + Write> I2cPort<T> {
    pub fn new(device: I2cDevice<T>) -> Self {
        Self { device }
    }

    fn call(&mut self, call: I2cCall) -> Result<Term> {
        match call {
            I2cCall::Write { data } => {
                let result = self.device.write(&data).map(|()| reply::ok());
                self.answer(result, reply::I2C_WRITE_FAILED)
            }
            I2cCall::Read { len } => {
                let result = self.device.read(len).map(Term::Binary);
                self.answer(result, reply::I2C_READ_FAILED)
            }
        }
    }

    fn answer(&self, result: std::result::Result<Term, I2cError>, reason: &str) -> Result<Term> {
        match result {
            Ok(term) => Ok(term),
            Err(err) if err.is_fatal() => Err(PortError::I2c(err)),
            Err(err) => {
                warn!(
                    address = format_args!("0x{:02x}", self.device.address()),
                    error = %err,
                    reason,
                    "i2c request failed"
                );
                Ok(reply::error(reason))
            }
        }
    }
}

impl<T: Read + Write> Port for I2cPort<T> {
    fn name(&self) -> &'static str {
        "i2c"
    }

    fn handle(&mut self, request: &Term) -> Result<Option<Term>> {
        let I2cRequest::Call { reference, call } = I2cRequest::from_term(request)?;
        let result = self.call(call)?;
        Ok(Some(reply::port_reply(reference, result)))
    }
}
