//! Reply and event terms.

use devport_device::Edge;
use devport_term::{Reference, Term};

pub const GPIO_INIT_FAIL: &str = "gpio_init_fail";
pub const GPIO_WRITE_FAILED: &str = "gpio_write_failed";
pub const GPIO_READ_FAILED: &str = "gpio_read_failed";
pub const GPIO_SET_INT_FAILED: &str = "gpio_set_int_failed";
pub const I2C_WRITE_FAILED: &str = "i2c_write_failed";
pub const I2C_READ_FAILED: &str = "i2c_read_failed";

/// `ok`
pub fn ok() -> Term {
    Term::atom("ok")
}

/// `{error, Reason}`
pub fn error(reason: &str) -> Term {
    Term::tagged("error", Term::atom(reason))
}

/// `{port_reply, Ref, Result}`, with `reference` echoed untouched.
pub fn port_reply(reference: Reference, result: Term) -> Term {
    Term::tuple(vec![
        Term::atom("port_reply"),
        Term::Reference(reference),
        result,
    ])
}

/// `{gpio_interrupt, rising | falling}`
pub fn gpio_interrupt(edge: Edge) -> Term {
    Term::tagged("gpio_interrupt", Term::atom(edge.as_str()))
}
