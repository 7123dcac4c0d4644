use std::io::{Read, Write};
use std::os::fd::{AsFd, BorrowedFd};

use devport_frame::{FrameReader, FrameWriter};
use devport_term::Term;
use devport_transport::wait_ready;
use tracing::{debug, info, trace};

use crate::error::Result;

/// One device's request handler, as driven by [`serve`].
pub trait Port {
    /// Name used in log lines.
    fn name(&self) -> &'static str;

    /// Handle one decoded request; `Some` is written back as the reply.
    fn handle(&mut self, request: &Term) -> Result<Option<Term>>;

    /// Extra descriptor to wait on for `POLLPRI`, when the device has one
    /// armed.
    fn priority_fd(&self) -> Option<BorrowedFd<'_>> {
        None
    }

    /// Called after the priority descriptor fired; `Some` is sent as an
    /// unsolicited event.
    fn on_priority(&mut self) -> Result<Option<Term>> {
        Ok(None)
    }
}

/// Serve `port` until the control channel closes.
///
/// Each iteration blocks in one `poll(2)` over the control channel and the
/// port's priority descriptor, then runs whichever handlers are ready to
/// completion. Returns `Ok(())` when the controller closes the channel on
/// a frame boundary; every other error is fatal for the port.
pub fn serve<P, R, W>(
    port: &mut P,
    reader: &mut FrameReader<R>,
    writer: &mut FrameWriter<W>,
) -> Result<()>
where
    P: Port,
    R: Read + AsFd,
    W: Write,
{
    info!(port = port.name(), "serving");
    loop {
        let ready = wait_ready(reader.get_ref().as_fd(), port.priority_fd())?;

        if ready.control {
            let payload = match reader.read_frame() {
                Ok(payload) => payload,
                Err(err) if err.is_eof() => {
                    info!(port = port.name(), "control channel closed");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };
            dispatch(port, writer, &payload)?;

            // poll(2) can't see frames already pulled into the read buffer.
            while let Some(payload) = reader.next_buffered()? {
                dispatch(port, writer, &payload)?;
            }
        }

        if ready.priority {
            if let Some(event) = port.on_priority()? {
                debug!(port = port.name(), %event, "event");
                send(writer, &event)?;
            }
        }
    }
}

fn dispatch<P, W>(port: &mut P, writer: &mut FrameWriter<W>, payload: &[u8]) -> Result<()>
where
    P: Port,
    W: Write,
{
    let request = devport_term::decode(payload)?;
    trace!(port = port.name(), %request, "request");

    if let Some(reply) = port.handle(&request)? {
        trace!(port = port.name(), %reply, "reply");
        send(writer, &reply)?;
    }
    Ok(())
}

fn send<W: Write>(writer: &mut FrameWriter<W>, term: &Term) -> Result<()> {
    writer.send(&devport_term::encode(term)?)?;
    Ok(())
}
