//! Logical identifiers to OS device paths.

use std::path::{Path, PathBuf};

/// Where the kernel exposes the GPIO sysfs class.
pub const DEFAULT_GPIO_SYSFS_ROOT: &str = "/sys/class/gpio";

/// Where i2c-dev creates bus nodes.
pub const DEFAULT_DEV_DIR: &str = "/dev";

/// Bus node name prefix used by i2c-dev.
pub const I2C_PREFIX: &str = "i2c";

/// Control file paths for one pin under a sysfs root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpioPaths {
    root: PathBuf,
    pin: u32,
}

impl GpioPaths {
    pub fn new(root: impl Into<PathBuf>, pin: u32) -> Self {
        Self {
            root: root.into(),
            pin,
        }
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }

    pub fn export(&self) -> PathBuf {
        self.root.join("export")
    }

    pub fn unexport(&self) -> PathBuf {
        self.root.join("unexport")
    }

    /// `gpio<N>`, present only while the pin is exported.
    pub fn pin_dir(&self) -> PathBuf {
        self.root.join(format!("gpio{}", self.pin))
    }

    pub fn value(&self) -> PathBuf {
        self.pin_dir().join("value")
    }

    /// Missing on pins whose direction is fixed in hardware.
    pub fn direction(&self) -> PathBuf {
        self.pin_dir().join("direction")
    }

    pub fn edge(&self) -> PathBuf {
        self.pin_dir().join("edge")
    }
}

/// Parse `<prefix>-<integer>` into the integer.
pub fn parse_bus_name(name: &str, prefix: &str) -> Option<u32> {
    let digits = name.strip_prefix(prefix)?.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Bus numbers of the `<prefix>-<integer>` entries in `dir`, ascending.
pub fn enumerate_buses(dir: &Path, prefix: &str) -> std::io::Result<Vec<u32>> {
    let mut buses = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if let Some(bus) = name.to_str().and_then(|name| parse_bus_name(name, prefix)) {
            buses.push(bus);
        }
    }
    buses.sort_unstable();
    Ok(buses)
}

/// Parse a slave address the way `strtoul(text, NULL, 0)` would: `0x` hex,
/// leading-zero octal, otherwise decimal. The whole string must parse.
pub fn parse_address(text: &str) -> Option<u16> {
    let text = text.trim();
    let (digits, radix) = if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        (hex, 16)
    } else if text.len() > 1 && text.starts_with('0') {
        (&text[1..], 8)
    } else {
        (text, 10)
    };
    u16::from_str_radix(digits, radix).ok()
}
