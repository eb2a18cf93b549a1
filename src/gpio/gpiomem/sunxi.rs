use std::fmt;
use std::io;

use log::debug;

use super::{GpioRegisters, MemMap};
use crate::gpio::{Error, Level, Mode, Result};
use crate::system::SoC;

const PATH_DEV_MEM: &str = "/dev/mem";

const REG_SIZE: usize = std::mem::size_of::<u32>();
const PAGE_SIZE: u32 = 0x1000;

// Ports A through I, 32 pins each (A20 user manual @ 1.19.2)
const PIO_BANKS: u16 = 9;
const PIO_BANK_PINS: u16 = 32;
const PIO_BANK_SIZE: usize = 0x24;

// Pn_CFG0..3 hold 8 pins each, 4 bits per pin
const PIO_CFG0: usize = 0x00;
const PIO_DAT: usize = 0x10;

/// Decodes the multi-driving select bits for `pin` from its Pn_CFGx register.
///
/// Values 2 through 6 select a peripheral function, 7 disables the pin.
pub(crate) fn decode_mode(reg_value: u32, pin: u16) -> Mode {
    let shift = (pin % 8) * 4;

    match (reg_value >> shift) & 0b111 {
        0 => Mode::Input,
        1 => Mode::Output,
        2 => Mode::Alt0,
        3 => Mode::Alt1,
        4 => Mode::Alt2,
        5 => Mode::Alt3,
        6 => Mode::Alt4,
        _ => Mode::Alt5,
    }
}

/// Decodes the data bit for `pin` from its Pn_DAT register.
pub(crate) fn decode_level(reg_value: u32, pin: u16) -> Level {
    Level::from((reg_value >> (pin % PIO_BANK_PINS)) & 0b1 != 0)
}

/// Returns the byte offset of `pin`'s Pn_CFGx register within the PIO block.
pub(crate) fn cfg_offset(pin: u16) -> usize {
    bank_offset(pin) + PIO_CFG0 + ((pin % PIO_BANK_PINS) as usize / 8) * REG_SIZE
}

/// Returns the byte offset of `pin`'s Pn_DAT register within the PIO block.
pub(crate) fn dat_offset(pin: u16) -> usize {
    bank_offset(pin) + PIO_DAT
}

fn bank_offset(pin: u16) -> usize {
    (pin / PIO_BANK_PINS) as usize * PIO_BANK_SIZE
}

pub struct PioMem {
    mem: MemMap,
    // Word offset of the PIO block within the mapped page
    base: usize,
}

impl fmt::Debug for PioMem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PioMem")
            .field("mem", &self.mem)
            .field("base", &self.base)
            .finish()
    }
}

impl PioMem {
    pub fn open(soc: SoC) -> Result<PioMem> {
        let gpio_base = soc.gpio_base();
        let page = gpio_base & !(PAGE_SIZE - 1);

        let mem = MemMap::open(PATH_DEV_MEM, page, PAGE_SIZE as usize).map_err(|e| match e {
            Error::Io(ref err) if err.kind() == io::ErrorKind::PermissionDenied => {
                Error::PermissionDenied(String::from(PATH_DEV_MEM))
            }
            e => e,
        })?;

        debug!("Mapped {} at {:#010x}", PATH_DEV_MEM, page);

        Ok(PioMem {
            mem,
            base: (gpio_base - page) as usize / REG_SIZE,
        })
    }

    // Word offset within the mapping of the register at byte `offset`
    #[inline(always)]
    fn word(&self, offset: usize) -> usize {
        self.base + offset / REG_SIZE
    }
}

impl GpioRegisters for PioMem {
    fn pin_count(&self) -> u16 {
        PIO_BANKS * PIO_BANK_PINS
    }

    fn level(&self, pin: u16) -> Level {
        decode_level(self.mem.read(self.word(dat_offset(pin))), pin)
    }

    fn mode(&self, pin: u16) -> Mode {
        decode_mode(self.mem.read(self.word(cfg_offset(pin))), pin)
    }
}
