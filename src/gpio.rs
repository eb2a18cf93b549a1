// Copyright (c) 2017-2019 Rene van der Meer
//
// Permission is hereby granted, free of charge, to any person obtaining a
// copy of this software and associated documentation files (the "Software"),
// to deal in the Software without restriction, including without limitation
// the rights to use, copy, modify, merge, publish, distribute, sublicense,
// and/or sell copies of the Software, and to permit persons to whom the
// Software is furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
// THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
// DEALINGS IN THE SOFTWARE.

//! Read-only access to the GPIO peripheral.
//!
//! [`Gpio`] maps the GPIO registers through either `/dev/gpiomem` or `/dev/mem`,
//! and reads a pin's function select and logic level directly from the
//! registers. Nothing is ever written to the peripheral.
//!
//! Pins are addressed through a [`PinHandle`], which is translated to the
//! SoC's native GPIO number using the detected board's header table. Pins that
//! can't be translated, or that don't exist on the SoC, read as
//! [`Mode::Input`] and [`Level::Low`].
//!
//! ## Troubleshooting
//!
//! ### Permission denied
//!
//! Users that are part of the `gpio` group can access `/dev/gpiomem` without
//! needing additional permissions. `/dev/mem`, which is used as a fallback, and
//! which is the only option on the Banana Pi, requires superuser privileges.
//!
//! [`Gpio`]: struct.Gpio.html
//! [`PinHandle`]: ../readall/enum.PinHandle.html
//! [`Mode::Input`]: enum.Mode.html#variant.Input
//! [`Level::Low`]: enum.Level.html#variant.Low

use std::error;
use std::fmt;
use std::io;
use std::result;

use log::debug;

mod gpiomem;

use crate::readall::{BoardVariant, Header, PinHandle, PinQuery};
use crate::system::{BoardId, SoC};

/// Errors that can occur when accessing the GPIO peripheral.
#[derive(Debug)]
pub enum Error {
    /// Permission denied when opening `/dev/gpiomem` or `/dev/mem` for read access.
    ///
    /// More information on possible causes for this error can be found [here].
    ///
    /// [here]: index.html#permission-denied
    PermissionDenied(String),
    /// I/O error.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::PermissionDenied(ref path) => write!(f, "Permission denied: {}", path),
            Error::Io(ref err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::Io(err)
    }
}

/// Result type returned from methods that can have `gpio_readall::gpio::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// Pin function select modes.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[repr(u8)]
pub enum Mode {
    Input = 0,
    Output = 1,
    Alt0 = 2,
    Alt1 = 3,
    Alt2 = 4,
    Alt3 = 5,
    Alt4 = 6,
    Alt5 = 7,
}

/// Pin logic levels.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[repr(u8)]
pub enum Level {
    Low = 0,
    High = 1,
}

impl From<bool> for Level {
    fn from(e: bool) -> Level {
        if e {
            Level::High
        } else {
            Level::Low
        }
    }
}

/// Provides read-only access to the GPIO peripheral of the detected board.
#[derive(Debug)]
pub struct Gpio {
    regs: Box<dyn gpiomem::GpioRegisters>,
    header: Option<Header>,
}

impl Gpio {
    /// Constructs a new `Gpio` for `board`.
    ///
    /// The register backend is selected based on the board's SoC. Boards
    /// without a known header table can still be queried by native number.
    pub fn new(board: &BoardId) -> Result<Gpio> {
        let regs: Box<dyn gpiomem::GpioRegisters> = match board.soc() {
            SoC::Bcm2835 | SoC::Bcm2836 | SoC::Bcm2837 => {
                Box::new(gpiomem::bcm::GpioMem::open(board.soc())?)
            }
            SoC::A20 => Box::new(gpiomem::sunxi::PioMem::open(board.soc())?),
        };

        Ok(Gpio::with_registers(regs, BoardVariant::from(board).header()))
    }

    fn with_registers(regs: Box<dyn gpiomem::GpioRegisters>, header: Option<Header>) -> Gpio {
        Gpio { regs, header }
    }

    /// Translates `pin` to the SoC's native GPIO number.
    pub fn native(&self, pin: PinHandle) -> Option<u16> {
        let native = match pin {
            PinHandle::Native(native) => Some(native),
            PinHandle::Logical(logical) => self.header?.logical_to_native(logical),
            PinHandle::Physical(physical) => self.header?.physical_to_native(physical),
        };

        native.filter(|&native| native < self.regs.pin_count())
    }
}

impl PinQuery for Gpio {
    fn level(&self, pin: PinHandle) -> Level {
        match self.native(pin) {
            Some(native) => self.regs.level(native),
            None => {
                debug!("{:?} doesn't map to a native GPIO, reading as Low", pin);
                Level::Low
            }
        }
    }

    fn mode(&self, pin: PinHandle) -> Mode {
        match self.native(pin) {
            Some(native) => self.regs.mode(native),
            None => {
                debug!("{:?} doesn't map to a native GPIO, reading as Input", pin);
                Mode::Input
            }
        }
    }

    fn physical_to_native(&self, physical: u8) -> Option<u16> {
        self.native(PinHandle::Physical(physical))
    }
}
