use std::os::fd::BorrowedFd;

use devport_device::{Direction, EdgeMode, GpioConfig, GpioError, GpioPin, PinState};
use devport_term::Term;
use tracing::{debug, warn};

use crate::error::{PortError, Result};
use crate::reply;
use crate::request::{GpioCall, GpioRequest};
use crate::runner::Port;

/// Serves one sysfs GPIO pin.
#[derive(Debug)]
pub struct GpioPort {
    pin: GpioPin,
}

impl GpioPort {
    pub fn new(config: GpioConfig) -> Self {
        Self {
            pin: GpioPin::new(config),
        }
    }

    pub fn pin(&self) -> &GpioPin {
        &self.pin
    }

    fn call(&mut self, call: &GpioCall) -> Result<Term> {
        match call {
            GpioCall::Write { high } => {
                let result = self.pin.write(*high).map(|()| reply::ok());
                answer(result, reply::GPIO_WRITE_FAILED)
            }
            GpioCall::Read => {
                let result = self.pin.read().map(|level| Term::from(i64::from(level)));
                answer(result, reply::GPIO_READ_FAILED)
            }
            GpioCall::SetInt { mode } => {
                let result = match EdgeMode::from_atom(mode) {
                    Some(mode) => self.pin.set_int(mode),
                    None => Err(GpioError::UnknownEdgeMode(mode.clone())),
                };
                let result = result.map(|()| reply::ok());
                answer(result, reply::GPIO_SET_INT_FAILED)
            }
        }
    }
}

impl Port for GpioPort {
    fn name(&self) -> &'static str {
        "gpio"
    }

    fn handle(&mut self, request: &Term) -> Result<Option<Term>> {
        match GpioRequest::from_term(request)? {
            GpioRequest::Init { pin, direction } => {
                let result = match Direction::from_atom(&direction) {
                    Some(direction) => self.pin.open(pin, direction),
                    None => {
                        // Same outcome as a failed open: nothing stays open.
                        self.pin.release();
                        Err(GpioError::UnknownDirection(direction))
                    }
                };
                let result = result.map(|()| reply::ok());
                answer(result, reply::GPIO_INIT_FAIL).map(Some)
            }
            GpioRequest::Release => {
                self.pin.release();
                Ok(None)
            }
            GpioRequest::Call { reference, call } => {
                let result = self.call(&call)?;
                Ok(Some(reply::port_reply(reference, result)))
            }
        }
    }

    fn priority_fd(&self) -> Option<BorrowedFd<'_>> {
        self.pin.interrupt_fd()
    }

    fn on_priority(&mut self) -> Result<Option<Term>> {
        // A release or disarm earlier in the same round wins.
        if self.pin.state() != PinState::InputWithInterrupts {
            debug!("priority wakeup on disarmed pin ignored");
            return Ok(None);
        }
        let edge = self.pin.interrupt_event().map_err(PortError::Gpio)?;
        debug!(pin = ?self.pin.pin_number(), edge = edge.as_str(), "gpio interrupt");
        Ok(Some(reply::gpio_interrupt(edge)))
    }
}

/// Turn an operational failure into `{error, reason}`; fatal ones end the port.
fn answer(result: std::result::Result<Term, GpioError>, reason: &str) -> Result<Term> {
    match result {
        Ok(term) => Ok(term),
        Err(err) if err.is_fatal() => Err(PortError::Gpio(err)),
        Err(err) => {
            warn!(error = %err, reason, "gpio request failed");
            Ok(reply::error(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use devport_device::GpioPaths;
    use devport_term::{Creation, Reference};

    use super::*;

    struct FakeSysfs {
        root: PathBuf,
    }

    impl FakeSysfs {
        fn new(tag: &str) -> Self {
            let root = std::env::temp_dir().join(format!(
                "devport-gpio-port-{tag}-{}-{}",
                std::process::id(),
                std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap()
                    .as_nanos()
            ));
            std::fs::create_dir_all(&root).unwrap();
            std::fs::write(root.join("export"), b"").unwrap();
            std::fs::write(root.join("unexport"), b"").unwrap();
            Self { root }
        }

        fn add_pin(&self, pin: u32) -> GpioPaths {
            let paths = GpioPaths::new(&self.root, pin);
            std::fs::create_dir_all(paths.pin_dir()).unwrap();
            std::fs::write(paths.value(), b"0\n").unwrap();
            std::fs::write(paths.direction(), b"in\n").unwrap();
            std::fs::write(paths.edge(), b"none\n").unwrap();
            paths
        }

        fn port(&self) -> GpioPort {
            GpioPort::new(GpioConfig {
                sysfs_root: self.root.clone(),
            })
        }
    }

    impl Drop for FakeSysfs {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.root);
        }
    }

    fn reference(id: u32) -> Reference {
        Reference {
            node: "nonode@nohost".into(),
            creation: Creation::Narrow(1),
            id: vec![id, 0, 0],
        }
    }

    fn init(pin: i64, direction: &str) -> Term {
        Term::tuple(vec![
            Term::atom("init"),
            Term::from(pin),
            Term::atom(direction),
        ])
    }

    fn call(id: u32, op: Vec<Term>) -> Term {
        Term::tuple(vec![
            Term::atom("call"),
            Term::Reference(reference(id)),
            Term::tuple(op),
        ])
    }

    #[test]
    fn output_pin_write_then_read() {
        let sysfs = FakeSysfs::new("output");
        sysfs.add_pin(17);
        let mut port = sysfs.port();

        assert_eq!(
            port.handle(&init(17, "output")).unwrap(),
            Some(reply::ok())
        );
        assert_eq!(
            port.handle(&call(1, vec![Term::atom("write"), Term::from(1)]))
                .unwrap(),
            Some(reply::port_reply(reference(1), reply::ok()))
        );
        assert_eq!(
            port.handle(&call(2, vec![Term::atom("read")])).unwrap(),
            Some(reply::port_reply(reference(2), Term::from(1)))
        );
    }

    #[test]
    fn init_failure_is_answered() {
        let sysfs = FakeSysfs::new("init-fail");
        std::fs::remove_file(sysfs.root.join("export")).unwrap();
        let mut port = sysfs.port();

        assert_eq!(
            port.handle(&init(9, "input")).unwrap(),
            Some(reply::error(reply::GPIO_INIT_FAIL))
        );
        assert_eq!(port.pin().state(), PinState::Closed);
    }

    #[test]
    fn unknown_direction_is_answered_and_leaves_pin_released() {
        let sysfs = FakeSysfs::new("bad-direction");
        sysfs.add_pin(17);
        let mut port = sysfs.port();

        port.handle(&init(17, "output")).unwrap();
        assert_eq!(port.pin().state(), PinState::Output);

        assert_eq!(
            port.handle(&init(12, "sideways")).unwrap(),
            Some(reply::error(reply::GPIO_INIT_FAIL))
        );
        assert_eq!(port.pin().state(), PinState::Closed);
        assert_eq!(port.pin().pin_number(), None);
        assert_eq!(
            std::fs::read_to_string(sysfs.root.join("export")).unwrap(),
            ""
        );

        // Still serving: the next call is answered, not fatal.
        assert_eq!(
            port.handle(&call(1, vec![Term::atom("read")])).unwrap(),
            Some(reply::port_reply(
                reference(1),
                reply::error(reply::GPIO_READ_FAILED)
            ))
        );
    }

    #[test]
    fn unknown_edge_mode_is_answered_and_keeps_state() {
        let sysfs = FakeSysfs::new("bad-edge");
        let paths = sysfs.add_pin(27);
        let mut port = sysfs.port();

        port.handle(&init(27, "input")).unwrap();
        assert_eq!(
            port.handle(&call(1, vec![Term::atom("set_int"), Term::atom("level")]))
                .unwrap(),
            Some(reply::port_reply(
                reference(1),
                reply::error(reply::GPIO_SET_INT_FAILED)
            ))
        );
        assert_eq!(port.pin().state(), PinState::Input);
        assert_eq!(std::fs::read_to_string(paths.edge()).unwrap(), "none\n");

        port.handle(&call(2, vec![Term::atom("set_int"), Term::atom("rising")]))
            .unwrap();
        assert_eq!(
            port.handle(&call(3, vec![Term::atom("set_int"), Term::atom("level")]))
                .unwrap(),
            Some(reply::port_reply(
                reference(3),
                reply::error(reply::GPIO_SET_INT_FAILED)
            ))
        );
        assert_eq!(port.pin().state(), PinState::InputWithInterrupts);
        assert_eq!(std::fs::read_to_string(paths.edge()).unwrap(), "rising");
        assert!(port.priority_fd().is_some());
    }

    #[test]
    fn write_to_input_pin_is_answered() {
        let sysfs = FakeSysfs::new("write-input");
        sysfs.add_pin(5);
        let mut port = sysfs.port();

        port.handle(&init(5, "input")).unwrap();
        assert_eq!(
            port.handle(&call(3, vec![Term::atom("write"), Term::from(1)]))
                .unwrap(),
            Some(reply::port_reply(
                reference(3),
                reply::error(reply::GPIO_WRITE_FAILED)
            ))
        );
    }

    #[test]
    fn calls_before_init_are_answered() {
        let sysfs = FakeSysfs::new("uninit");
        let mut port = sysfs.port();

        assert_eq!(
            port.handle(&call(4, vec![Term::atom("read")])).unwrap(),
            Some(reply::port_reply(
                reference(4),
                reply::error(reply::GPIO_READ_FAILED)
            ))
        );
        assert_eq!(
            port.handle(&call(5, vec![Term::atom("set_int"), Term::atom("both")]))
                .unwrap(),
            Some(reply::port_reply(
                reference(5),
                reply::error(reply::GPIO_SET_INT_FAILED)
            ))
        );
    }

    #[test]
    fn armed_input_reports_edges() {
        let sysfs = FakeSysfs::new("interrupt");
        let paths = sysfs.add_pin(27);
        let mut port = sysfs.port();

        port.handle(&init(27, "input")).unwrap();
        assert!(port.priority_fd().is_none());

        assert_eq!(
            port.handle(&call(6, vec![Term::atom("set_int"), Term::atom("rising")]))
                .unwrap(),
            Some(reply::port_reply(reference(6), reply::ok()))
        );
        assert!(port.priority_fd().is_some());

        std::fs::write(paths.value(), b"1\n").unwrap();
        assert_eq!(
            port.on_priority().unwrap(),
            Some(Term::tagged("gpio_interrupt", Term::atom("rising")))
        );
    }

    #[test]
    fn release_stops_events_and_sends_nothing() {
        let sysfs = FakeSysfs::new("release");
        sysfs.add_pin(27);
        let mut port = sysfs.port();

        port.handle(&init(27, "input")).unwrap();
        port.handle(&call(7, vec![Term::atom("set_int"), Term::atom("both")]))
            .unwrap();

        let release = Term::tuple(vec![Term::atom("cast"), Term::atom("release")]);
        assert_eq!(port.handle(&release).unwrap(), None);
        assert!(port.priority_fd().is_none());
        assert_eq!(port.on_priority().unwrap(), None);
    }

    #[test]
    fn short_value_read_is_fatal() {
        let sysfs = FakeSysfs::new("short");
        let paths = sysfs.add_pin(8);
        let mut port = sysfs.port();

        port.handle(&init(8, "input")).unwrap();
        std::fs::write(paths.value(), b"").unwrap();

        let err = port
            .handle(&call(8, vec![Term::atom("read")]))
            .unwrap_err();
        assert!(matches!(err, PortError::Gpio(GpioError::ShortIo { .. })));
    }

    #[test]
    fn malformed_request_is_a_protocol_error() {
        let sysfs = FakeSysfs::new("malformed");
        let mut port = sysfs.port();
        assert!(matches!(
            port.handle(&Term::atom("hello")),
            Err(PortError::Protocol(_))
        ));
    }
}
