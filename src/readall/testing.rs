// Test doubles for the pin state queries and external nodes.

use std::cell::Cell;
use std::collections::HashMap;

use crate::gpio::{Level, Mode};
use crate::node::ExternalNode;

use super::{Header, PinHandle, PinQuery};

/// Returns preset states, and `Input`/`Low` for everything else.
#[derive(Debug, Default)]
pub(crate) struct FakePins {
    states: HashMap<PinHandle, (Mode, Level)>,
    header: Option<Header>,
    queries: Cell<usize>,
}

impl FakePins {
    pub(crate) fn with(mut self, pin: PinHandle, mode: Mode, level: Level) -> FakePins {
        self.states.insert(pin, (mode, level));
        self
    }

    /// Translates physical positions through `header`.
    pub(crate) fn with_header(mut self, header: Header) -> FakePins {
        self.header = Some(header);
        self
    }

    /// Number of `level` and `mode` calls so far.
    pub(crate) fn queries(&self) -> usize {
        self.queries.get()
    }

    fn state(&self, pin: PinHandle) -> (Mode, Level) {
        self.queries.set(self.queries.get() + 1);

        self.states
            .get(&pin)
            .copied()
            .unwrap_or((Mode::Input, Level::Low))
    }
}

impl PinQuery for FakePins {
    fn level(&self, pin: PinHandle) -> Level {
        self.state(pin).1
    }

    fn mode(&self, pin: PinHandle) -> Mode {
        self.state(pin).0
    }

    fn physical_to_native(&self, physical: u8) -> Option<u16> {
        self.header?.physical_to_native(physical)
    }
}

/// Odd pins read high, analog values are `(pin - pin_base) * 10`.
#[derive(Debug)]
pub(crate) struct FakeNode {
    pin_base: u16,
    pin_max: u16,
    reads: Cell<usize>,
}

impl FakeNode {
    pub(crate) fn new(pin_base: u16, pin_max: u16) -> FakeNode {
        FakeNode {
            pin_base,
            pin_max,
            reads: Cell::new(0),
        }
    }

    /// Number of digital and analog reads so far.
    pub(crate) fn reads(&self) -> usize {
        self.reads.get()
    }
}

impl ExternalNode for FakeNode {
    fn pin_base(&self) -> u16 {
        self.pin_base
    }

    fn pin_max(&self) -> u16 {
        self.pin_max
    }

    fn digital_read(&self, pin: u16) -> Level {
        self.reads.set(self.reads.get() + 1);
        Level::from((pin - self.pin_base) % 2 == 1)
    }

    fn analog_read(&self, pin: u16) -> i32 {
        self.reads.set(self.reads.get() + 1);
        i32::from(pin - self.pin_base) * 10
    }
}
