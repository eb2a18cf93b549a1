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

use std::fmt;
use std::io;

use log::{debug, warn};

use super::{GpioRegisters, MemMap};
use crate::gpio::{Error, Level, Mode, Result};
use crate::system::SoC;

const PATH_DEV_GPIOMEM: &str = "/dev/gpiomem";
const PATH_DEV_MEM: &str = "/dev/mem";

// The BCM2835 has 41 32-bit registers related to the GPIO (datasheet @ 6.1).
const GPIO_MEM_REGISTERS: usize = 41;
const GPIO_MEM_SIZE: usize = GPIO_MEM_REGISTERS * std::mem::size_of::<u32>();

const GPFSEL0: usize = 0x00;
const GPLEV0: usize = 0x34 / std::mem::size_of::<u32>();

const GPIO_PINS: u16 = 54;

// Function select values in register order (datasheet @ 6.2)
const FSEL_MODES: [Mode; 8] = [
    Mode::Input,
    Mode::Output,
    Mode::Alt5,
    Mode::Alt4,
    Mode::Alt0,
    Mode::Alt1,
    Mode::Alt2,
    Mode::Alt3,
];

/// Decodes the function select bits for `pin` from its GPFSELn register.
pub(crate) fn decode_mode(reg_value: u32, pin: u16) -> Mode {
    let shift = (pin % 10) * 3;

    FSEL_MODES[((reg_value >> shift) & 0b111) as usize]
}

/// Decodes the level bit for `pin` from its GPLEVn register.
pub(crate) fn decode_level(reg_value: u32, pin: u16) -> Level {
    Level::from((reg_value >> (pin % 32)) & 0b1 != 0)
}

pub struct GpioMem {
    mem: MemMap,
}

impl fmt::Debug for GpioMem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpioMem").field("mem", &self.mem).finish()
    }
}

impl GpioMem {
    pub fn open(soc: SoC) -> Result<GpioMem> {
        // Try /dev/gpiomem first. If that fails, try /dev/mem instead. If neither works,
        // report back the error that's the most relevant.
        let mem = match MemMap::open(PATH_DEV_GPIOMEM, 0, GPIO_MEM_SIZE) {
            Ok(mem) => {
                debug!("Mapped {}", PATH_DEV_GPIOMEM);
                mem
            }
            Err(gpiomem_err) => {
                warn!(
                    "Can't map {} ({}), falling back to {}",
                    PATH_DEV_GPIOMEM, gpiomem_err, PATH_DEV_MEM
                );

                match MemMap::open(PATH_DEV_MEM, soc.gpio_base(), GPIO_MEM_SIZE) {
                    Ok(mem) => mem,
                    Err(Error::Io(ref e)) if e.kind() == io::ErrorKind::PermissionDenied => {
                        // Did /dev/gpiomem also give us a Permission Denied error? If so, return
                        // that path instead of /dev/mem. Solving /dev/gpiomem issues should be
                        // preferred (add user to gpio group) over /dev/mem (use sudo).
                        match gpiomem_err {
                            Error::Io(ref e) if e.kind() == io::ErrorKind::PermissionDenied => {
                                return Err(Error::PermissionDenied(String::from(
                                    PATH_DEV_GPIOMEM,
                                )));
                            }
                            _ => return Err(Error::PermissionDenied(String::from(PATH_DEV_MEM))),
                        }
                    }
                    Err(_) => return Err(gpiomem_err),
                }
            }
        };

        Ok(GpioMem { mem })
    }
}

impl GpioRegisters for GpioMem {
    fn pin_count(&self) -> u16 {
        GPIO_PINS
    }

    #[inline(always)]
    fn level(&self, pin: u16) -> Level {
        let offset = GPLEV0 + pin as usize / 32;

        decode_level(self.mem.read(offset), pin)
    }

    fn mode(&self, pin: u16) -> Mode {
        let offset = GPFSEL0 + pin as usize / 10;

        decode_mode(self.mem.read(offset), pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fsel_order() {
        // GPIO 14 and 15 set to ALT0 (UART), GPIO 17 output, GPIO 18 ALT5
        let gpfsel1 = (0b100 << 12) | (0b100 << 15) | (0b001 << 21) | (0b010 << 24);

        assert_eq!(decode_mode(gpfsel1, 10), Mode::Input);
        assert_eq!(decode_mode(gpfsel1, 14), Mode::Alt0);
        assert_eq!(decode_mode(gpfsel1, 15), Mode::Alt0);
        assert_eq!(decode_mode(gpfsel1, 17), Mode::Output);
        assert_eq!(decode_mode(gpfsel1, 18), Mode::Alt5);
        assert_eq!(decode_mode(0b011 << 27, 19), Mode::Alt4);
        assert_eq!(decode_mode(0b111, 30), Mode::Alt3);
    }

    #[test]
    fn level_bits() {
        let gplev0 = (1 << 4) | (1 << 31);

        assert_eq!(decode_level(gplev0, 4), Level::High);
        assert_eq!(decode_level(gplev0, 5), Level::Low);
        assert_eq!(decode_level(gplev0, 31), Level::High);
        // GPLEV1 holds GPIO 32-53
        assert_eq!(decode_level(0b1, 32), Level::High);
    }
}
