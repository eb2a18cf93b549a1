use crate::gpio::{Level, Mode};

use super::topology::Header;
use super::PinQuery;

/// Pin numbering schemes.
///
/// The numbering mode only selects which number is handed to the
/// [`PinQuery`] collaborator. Reports always show every numbering column.
///
/// [`PinQuery`]: trait.PinQuery.html
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum NumberingMode {
    /// The SoC's native GPIO numbers.
    Native,
    /// Physical positions on the header.
    Physical,
    /// Sequential logical pin numbers.
    #[default]
    Logical,
}

/// A pin number tagged with the numbering scheme it belongs to.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
pub enum PinHandle {
    Native(u16),
    Physical(u8),
    Logical(u8),
}

// Indexed by `Mode as usize`
const FUNCTION_LABELS: [&str; 8] = ["IN", "OUT", "ALT0", "ALT1", "ALT2", "ALT3", "ALT4", "ALT5"];

/// Returns the report label for `mode`.
pub fn function_label(mode: Mode) -> &'static str {
    FUNCTION_LABELS[mode as usize]
}

/// Resolves header positions to pin handles, and performs the live queries
/// for a single report.
///
/// Nothing is cached. Every call to [`function_label`] or [`level`] reads the
/// current hardware state.
///
/// [`function_label`]: #method.function_label
/// [`level`]: #method.level
pub struct Resolver<'a, P: ?Sized> {
    pins: &'a P,
    mode: NumberingMode,
    header: Header,
}

impl<'a, P: PinQuery + ?Sized> Resolver<'a, P> {
    pub fn new(pins: &'a P, mode: NumberingMode, header: Header) -> Resolver<'a, P> {
        Resolver { pins, mode, header }
    }

    pub fn header(&self) -> Header {
        self.header
    }

    pub fn pins(&self) -> &'a P {
        self.pins
    }

    /// Returns the handle used to query `physical`, or `None` if the position
    /// has no logical pin.
    pub fn resolve(&self, physical: u8) -> Option<PinHandle> {
        let logical = self.header.physical_to_logical(physical)?;

        match self.mode {
            NumberingMode::Native => self
                .header
                .physical_to_native(physical)
                .map(PinHandle::Native),
            NumberingMode::Physical => Some(PinHandle::Physical(physical)),
            NumberingMode::Logical => Some(PinHandle::Logical(logical)),
        }
    }

    /// Interprets `number` in the active numbering scheme.
    pub fn handle(&self, number: u8) -> PinHandle {
        match self.mode {
            NumberingMode::Native => PinHandle::Native(u16::from(number)),
            NumberingMode::Physical => PinHandle::Physical(number),
            NumberingMode::Logical => PinHandle::Logical(number),
        }
    }

    pub fn function_label(&self, pin: PinHandle) -> &'static str {
        function_label(self.pins.mode(pin))
    }

    pub fn level(&self, pin: PinHandle) -> Level {
        self.pins.level(pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::readall::testing::FakePins;

    #[test]
    fn labels() {
        assert_eq!(function_label(Mode::Input), "IN");
        assert_eq!(function_label(Mode::Output), "OUT");
        assert_eq!(function_label(Mode::Alt0), "ALT0");
        assert_eq!(function_label(Mode::Alt5), "ALT5");
    }

    #[test]
    fn resolve_per_mode() {
        let pins = FakePins::default();
        let header = Header::classic_rev2();

        // Physical pin 11 is logical 0, native 17
        let native = Resolver::new(&pins, NumberingMode::Native, header);
        let physical = Resolver::new(&pins, NumberingMode::Physical, header);
        let logical = Resolver::new(&pins, NumberingMode::Logical, header);

        assert_eq!(native.resolve(11), Some(PinHandle::Native(17)));
        assert_eq!(physical.resolve(11), Some(PinHandle::Physical(11)));
        assert_eq!(logical.resolve(11), Some(PinHandle::Logical(0)));
    }

    #[test]
    fn unmapped_positions_resolve_to_none() {
        let pins = FakePins::default();

        for mode in [
            NumberingMode::Native,
            NumberingMode::Physical,
            NumberingMode::Logical,
        ] {
            let resolver = Resolver::new(&pins, mode, Header::classic_rev2());

            assert_eq!(resolver.resolve(1), None);
            assert_eq!(resolver.resolve(6), None);
            assert_eq!(resolver.resolve(27), None);
        }
    }

    #[test]
    fn queries_go_through_the_collaborator() {
        let pins = FakePins::default()
            .with(PinHandle::Logical(7), Mode::Alt0, Level::High)
            .with(PinHandle::Native(4), Mode::Output, Level::Low);

        let logical = Resolver::new(&pins, NumberingMode::Logical, Header::classic_rev2());
        let handle = logical.resolve(7).unwrap();
        assert_eq!(logical.function_label(handle), "ALT0");
        assert_eq!(logical.level(handle), Level::High);

        let native = Resolver::new(&pins, NumberingMode::Native, Header::classic_rev2());
        let handle = native.resolve(7).unwrap();
        assert_eq!(native.function_label(handle), "OUT");
        assert_eq!(native.level(handle), Level::Low);

        assert_eq!(pins.queries(), 4);
    }

    #[test]
    fn handle_follows_mode() {
        let pins = FakePins::default();
        let header = Header::compute_module();

        assert_eq!(
            Resolver::new(&pins, NumberingMode::Native, header).handle(30),
            PinHandle::Native(30)
        );
        assert_eq!(
            Resolver::new(&pins, NumberingMode::Logical, header).handle(30),
            PinHandle::Logical(30)
        );
    }
}
