use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::fd::{AsFd, BorrowedFd};
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{GpioError, GpioResult};
use crate::naming::{GpioPaths, DEFAULT_GPIO_SYSFS_ROOT};

/// Requested pin direction, as named on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// `input` / `output`.
    pub fn from_atom(atom: &str) -> Option<Self> {
        match atom {
            "input" => Some(Direction::Input),
            "output" => Some(Direction::Output),
            _ => None,
        }
    }

    /// What the sysfs `direction` attribute expects.
    pub fn sysfs_value(self) -> &'static str {
        match self {
            Direction::Input => "in",
            Direction::Output => "out",
        }
    }
}

/// Contents written to the sysfs `edge` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeMode {
    /// Disarm interrupts.
    None,
    Rising,
    Falling,
    Both,
}

impl EdgeMode {
    pub fn from_atom(atom: &str) -> Option<Self> {
        match atom {
            "none" => Some(EdgeMode::None),
            "rising" => Some(EdgeMode::Rising),
            "falling" => Some(EdgeMode::Falling),
            "both" => Some(EdgeMode::Both),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EdgeMode::None => "none",
            EdgeMode::Rising => "rising",
            EdgeMode::Falling => "falling",
            EdgeMode::Both => "both",
        }
    }
}

/// Edge reported by an interrupt, judged from the value read after it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

impl Edge {
    pub fn as_str(self) -> &'static str {
        match self {
            Edge::Rising => "rising",
            Edge::Falling => "falling",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinState {
    Closed,
    Output,
    Input,
    InputWithInterrupts,
}

/// GPIO controller configuration.
#[derive(Debug, Clone)]
pub struct GpioConfig {
    /// Root of the GPIO sysfs class. Default: `/sys/class/gpio`.
    pub sysfs_root: PathBuf,
}

impl Default for GpioConfig {
    fn default() -> Self {
        Self {
            sysfs_root: PathBuf::from(DEFAULT_GPIO_SYSFS_ROOT),
        }
    }
}

/// One sysfs GPIO pin and everything this process holds open for it.
///
/// Dropping the pin releases it, so an exported pin is unexported on the
/// way out of the process.
#[derive(Debug)]
pub struct GpioPin {
    config: GpioConfig,
    state: PinState,
    paths: Option<GpioPaths>,
    value: Option<File>,
    /// True when this process wrote to `export`; only then is the pin
    /// unexported on release.
    exported_here: bool,
}

impl GpioPin {
    pub fn new(config: GpioConfig) -> Self {
        Self {
            config,
            state: PinState::Closed,
            paths: None,
            value: None,
            exported_here: false,
        }
    }

    pub fn state(&self) -> PinState {
        self.state
    }

    pub fn pin_number(&self) -> Option<u32> {
        self.paths.as_ref().map(GpioPaths::pin)
    }

    pub fn exported_here(&self) -> bool {
        self.exported_here
    }

    /// Export (if needed) and configure `pin`, releasing any pin already open.
    ///
    /// On failure the pin is left released: nothing stays exported or open.
    pub fn open(&mut self, pin: u32, direction: Direction) -> GpioResult<()> {
        self.release();

        let paths = GpioPaths::new(&self.config.sysfs_root, pin);
        let already_exported = paths.value().exists();
        if !already_exported {
            debug!(pin, "exporting gpio");
            sysfs_write(&paths.export(), &pin.to_string())
                .map_err(|source| GpioError::Export { pin, source })?;
        }

        self.exported_here = !already_exported;
        self.state = match direction {
            Direction::Input => PinState::Input,
            Direction::Output => PinState::Output,
        };
        self.paths = Some(paths.clone());

        if let Err(err) = self.configure(&paths, direction) {
            self.release();
            return Err(err);
        }

        info!(pin, ?direction, exported_here = self.exported_here, "gpio opened");
        Ok(())
    }

    fn configure(&mut self, paths: &GpioPaths, direction: Direction) -> GpioResult<()> {
        let direction_path = paths.direction();
        if direction_path.exists() {
            sysfs_write(&direction_path, direction.sysfs_value()).map_err(|source| {
                GpioError::Direction {
                    path: direction_path.clone(),
                    source,
                }
            })?;
        } else {
            debug!(path = ?direction_path, "no direction attribute; direction is fixed");
        }

        let value_path = paths.value();
        let file = OpenOptions::new()
            .read(true)
            .write(direction == Direction::Output)
            .open(&value_path)
            .map_err(|source| GpioError::OpenValue {
                path: value_path,
                source,
            })?;
        self.value = Some(file);
        Ok(())
    }

    /// Close the value file and unexport the pin if this process exported it.
    ///
    /// Releasing a closed pin does nothing.
    pub fn release(&mut self) {
        if self.state == PinState::Closed {
            return;
        }

        self.value = None;

        if let Some(paths) = self.paths.take() {
            if self.exported_here {
                debug!(pin = paths.pin(), "unexporting gpio");
                if let Err(err) = sysfs_write(&paths.unexport(), &paths.pin().to_string()) {
                    warn!(pin = paths.pin(), error = %err, "failed to unexport gpio");
                }
            }
            info!(pin = paths.pin(), "gpio released");
        }

        self.exported_here = false;
        self.state = PinState::Closed;
    }

    /// Drive an output pin high (`true`) or low.
    pub fn write(&mut self, high: bool) -> GpioResult<()> {
        if self.state != PinState::Output {
            return Err(GpioError::NotOutput(self.state));
        }
        let file = self.value.as_ref().ok_or(GpioError::NotOpen)?;

        let buf = [if high { b'1' } else { b'0' }];
        let written = file
            .write_at(&buf, 0)
            .map_err(|source| GpioError::ValueIo {
                op: "write",
                source,
            })?;
        if written != buf.len() {
            return Err(GpioError::ShortIo {
                op: "write",
                expected: buf.len(),
                actual: written,
            });
        }
        Ok(())
    }

    /// Current level: 1 if the value file reads `'1'`, otherwise 0.
    pub fn read(&self) -> GpioResult<u8> {
        if self.state == PinState::Closed {
            return Err(GpioError::NotOpen);
        }
        let file = self.value.as_ref().ok_or(GpioError::NotOpen)?;

        let mut buf = [0u8; 1];
        let read = file
            .read_at(&mut buf, 0)
            .map_err(|source| GpioError::ValueIo { op: "read", source })?;
        if read != buf.len() {
            return Err(GpioError::ShortIo {
                op: "read",
                expected: buf.len(),
                actual: read,
            });
        }
        Ok(u8::from(buf[0] == b'1'))
    }

    /// Arm (or with [`EdgeMode::None`], disarm) edge interrupts on an input pin.
    pub fn set_int(&mut self, mode: EdgeMode) -> GpioResult<()> {
        if !matches!(self.state, PinState::Input | PinState::InputWithInterrupts) {
            return Err(GpioError::NotInput(self.state));
        }
        let edge_path = self.paths.as_ref().ok_or(GpioError::NotOpen)?.edge();

        sysfs_write(&edge_path, mode.as_str()).map_err(|source| GpioError::Edge {
            path: edge_path,
            source,
        })?;

        self.state = match mode {
            EdgeMode::None => PinState::Input,
            _ => PinState::InputWithInterrupts,
        };
        debug!(pin = ?self.pin_number(), mode = mode.as_str(), "gpio edge set");
        Ok(())
    }

    /// Descriptor to wait on for `POLLPRI`, only while interrupts are armed.
    pub fn interrupt_fd(&self) -> Option<BorrowedFd<'_>> {
        if self.state != PinState::InputWithInterrupts {
            return None;
        }
        self.value.as_ref().map(|file| file.as_fd())
    }

    /// Read the pin after a priority wakeup and classify the edge.
    ///
    /// Reading from offset 0 also acknowledges the sysfs notification.
    pub fn interrupt_event(&self) -> GpioResult<Edge> {
        match self.read()? {
            1 => Ok(Edge::Rising),
            _ => Ok(Edge::Falling),
        }
    }
}

impl Drop for GpioPin {
    fn drop(&mut self) {
        self.release();
    }
}

/// Write a whole attribute value in one `write(2)`, as sysfs requires.
fn sysfs_write(path: &Path, value: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).open(path)?;
    let written = file.write(value.as_bytes())?;
    if written != value.len() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::WriteZero,
            format!("wrote {written} of {} bytes to {}", value.len(), path.display()),
        ));
    }
    Ok(())
}
