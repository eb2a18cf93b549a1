//! Header tables translating between physical, logical and native pin numbers.
//!
//! Each supported board layout owns a static table of [`Contact`]s, grouped in
//! [`Block`]s of consecutive physical positions. Power and ground contacts,
//! and positions outside every block, have no logical or native number.
//!
//! [`Contact`]: enum.Contact.html
//! [`Block`]: struct.Block.html

/// A single contact on a header.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Contact {
    /// A GPIO pin with its logical index, native GPIO number and label.
    Gpio {
        logical: u8,
        native: u16,
        label: &'static str,
    },
    /// A power or ground contact.
    Supply(&'static str),
}

impl Contact {
    pub fn label(&self) -> &'static str {
        match *self {
            Contact::Gpio { label, .. } => label,
            Contact::Supply(label) => label,
        }
    }

    pub fn logical(&self) -> Option<u8> {
        match *self {
            Contact::Gpio { logical, .. } => Some(logical),
            Contact::Supply(_) => None,
        }
    }

    pub fn native(&self) -> Option<u16> {
        match *self {
            Contact::Gpio { native, .. } => Some(native),
            Contact::Supply(_) => None,
        }
    }
}

const fn gpio(logical: u8, native: u16, label: &'static str) -> Contact {
    Contact::Gpio {
        logical,
        native,
        label,
    }
}

const fn supply(label: &'static str) -> Contact {
    Contact::Supply(label)
}

/// Consecutive physical positions starting at `first`.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Block {
    first: u8,
    contacts: &'static [Contact],
}

impl Block {
    /// Returns the first physical position.
    pub fn first(&self) -> u8 {
        self.first
    }

    /// Returns the last physical position.
    pub fn last(&self) -> u8 {
        self.first + self.contacts.len() as u8 - 1
    }

    fn get(&self, physical: u8) -> Option<&'static Contact> {
        let idx = physical.checked_sub(self.first)?;

        self.contacts.get(idx as usize)
    }

    fn positions(&self) -> impl Iterator<Item = (u8, &'static Contact)> {
        let first = self.first;
        let contacts: &'static [Contact] = self.contacts;

        contacts
            .iter()
            .enumerate()
            .map(move |(idx, contact)| (first + idx as u8, contact))
    }
}

static CLASSIC_REV1: [Contact; 26] = [
    supply("3.3v"),         // Physical pin 1
    supply("5v"),           // Physical pin 2
    gpio(8, 0, "SDA.0"),    // Physical pin 3
    supply("5v"),           // Physical pin 4
    gpio(9, 1, "SCL.0"),    // Physical pin 5
    supply("0v"),           // Physical pin 6
    gpio(7, 4, "GPIO. 7"),  // Physical pin 7
    gpio(15, 14, "TxD"),    // Physical pin 8
    supply("0v"),           // Physical pin 9
    gpio(16, 15, "RxD"),    // Physical pin 10
    gpio(0, 17, "GPIO. 0"), // Physical pin 11
    gpio(1, 18, "GPIO. 1"), // Physical pin 12
    gpio(2, 21, "GPIO. 2"), // Physical pin 13
    supply("0v"),           // Physical pin 14
    gpio(3, 22, "GPIO. 3"), // Physical pin 15
    gpio(4, 23, "GPIO. 4"), // Physical pin 16
    supply("3.3v"),         // Physical pin 17
    gpio(5, 24, "GPIO. 5"), // Physical pin 18
    gpio(12, 10, "MOSI"),   // Physical pin 19
    supply("0v"),           // Physical pin 20
    gpio(13, 9, "MISO"),    // Physical pin 21
    gpio(6, 25, "GPIO. 6"), // Physical pin 22
    gpio(14, 11, "SCLK"),   // Physical pin 23
    gpio(10, 8, "CE0"),     // Physical pin 24
    supply("0v"),           // Physical pin 25
    gpio(11, 7, "CE1"),     // Physical pin 26
];

// Rev 2 moved I2C to bus 1, and replaced GPIO 21 with GPIO 27
static CLASSIC_REV2: [Contact; 26] = [
    supply("3.3v"),         // Physical pin 1
    supply("5v"),           // Physical pin 2
    gpio(8, 2, "SDA.1"),    // Physical pin 3
    supply("5v"),           // Physical pin 4
    gpio(9, 3, "SCL.1"),    // Physical pin 5
    supply("0v"),           // Physical pin 6
    gpio(7, 4, "GPIO. 7"),  // Physical pin 7
    gpio(15, 14, "TxD"),    // Physical pin 8
    supply("0v"),           // Physical pin 9
    gpio(16, 15, "RxD"),    // Physical pin 10
    gpio(0, 17, "GPIO. 0"), // Physical pin 11
    gpio(1, 18, "GPIO. 1"), // Physical pin 12
    gpio(2, 27, "GPIO. 2"), // Physical pin 13
    supply("0v"),           // Physical pin 14
    gpio(3, 22, "GPIO. 3"), // Physical pin 15
    gpio(4, 23, "GPIO. 4"), // Physical pin 16
    supply("3.3v"),         // Physical pin 17
    gpio(5, 24, "GPIO. 5"), // Physical pin 18
    gpio(12, 10, "MOSI"),   // Physical pin 19
    supply("0v"),           // Physical pin 20
    gpio(13, 9, "MISO"),    // Physical pin 21
    gpio(6, 25, "GPIO. 6"), // Physical pin 22
    gpio(14, 11, "SCLK"),   // Physical pin 23
    gpio(10, 8, "CE0"),     // Physical pin 24
    supply("0v"),           // Physical pin 25
    gpio(11, 7, "CE1"),     // Physical pin 26
];

// P5 pads 3 through 6
static P5: [Contact; 4] = [
    gpio(17, 28, "GPIO.17"), // Physical pin 51
    gpio(18, 29, "GPIO.18"), // Physical pin 52
    gpio(19, 30, "GPIO.19"), // Physical pin 53
    gpio(20, 31, "GPIO.20"), // Physical pin 54
];

static PLUS_EXTENSION: [Contact; 14] = [
    gpio(30, 0, "SDA.0"),    // Physical pin 27
    gpio(31, 1, "SCL.0"),    // Physical pin 28
    gpio(21, 5, "GPIO.21"),  // Physical pin 29
    supply("0v"),            // Physical pin 30
    gpio(22, 6, "GPIO.22"),  // Physical pin 31
    gpio(26, 12, "GPIO.26"), // Physical pin 32
    gpio(23, 13, "GPIO.23"), // Physical pin 33
    supply("0v"),            // Physical pin 34
    gpio(24, 19, "GPIO.24"), // Physical pin 35
    gpio(27, 16, "GPIO.27"), // Physical pin 36
    gpio(25, 26, "GPIO.25"), // Physical pin 37
    gpio(28, 20, "GPIO.28"), // Physical pin 38
    supply("0v"),            // Physical pin 39
    gpio(29, 21, "GPIO.29"), // Physical pin 40
];

// Native numbers are Allwinner A20 port pins, (port - 'A') * 32 + index.
// Positions 27 through 30 are the UART7 contacts on J12.
static BANANA_PI_M1: [Contact; 30] = [
    supply("3.3v"),           // Physical pin 1
    supply("5v"),             // Physical pin 2
    gpio(8, 53, "SDA.1"),     // Physical pin 3, PB21
    supply("5V"),             // Physical pin 4
    gpio(9, 52, "SCL.1"),     // Physical pin 5, PB20
    supply("GND"),            // Physical pin 6
    gpio(7, 259, "PWM"),      // Physical pin 7, PI3
    gpio(15, 224, "Tx.3"),    // Physical pin 8, PH0
    supply("GND"),            // Physical pin 9
    gpio(16, 225, "Rx.3"),    // Physical pin 10, PH1
    gpio(0, 275, "Rx.2"),     // Physical pin 11, PI19
    gpio(1, 226, "GEN1"),     // Physical pin 12, PH2
    gpio(2, 274, "Tx.2"),     // Physical pin 13, PI18
    supply("GND"),            // Physical pin 14
    gpio(3, 273, "CTS.2"),    // Physical pin 15, PI17
    gpio(4, 244, "GEN4"),     // Physical pin 16, PH20
    supply("3.3v"),           // Physical pin 17
    gpio(5, 245, "GEN5"),     // Physical pin 18, PH21
    gpio(12, 268, "MOSI"),    // Physical pin 19, PI12
    supply("GND"),            // Physical pin 20
    gpio(13, 269, "MISO"),    // Physical pin 21, PI13
    gpio(6, 272, "RTS.2"),    // Physical pin 22, PI16
    gpio(14, 267, "SCLK"),    // Physical pin 23, PI11
    gpio(10, 266, "CS0"),     // Physical pin 24, PI10
    supply("GND"),            // Physical pin 25
    gpio(11, 270, "CS1"),     // Physical pin 26, PI14
    gpio(21, 276, "J12TX.7"), // Physical pin 27, PI20
    gpio(22, 227, "J12PH03"), // Physical pin 28, PH3
    gpio(23, 277, "J12RX.7"), // Physical pin 29, PI21
    gpio(24, 229, "J12PH05"), // Physical pin 30, PH5
];

static CLASSIC_REV1_BLOCKS: [Block; 1] = [Block {
    first: 1,
    contacts: &CLASSIC_REV1,
}];

static CLASSIC_REV2_BLOCKS: [Block; 2] = [
    Block {
        first: 1,
        contacts: &CLASSIC_REV2,
    },
    Block {
        first: 51,
        contacts: &P5,
    },
];

static PLUS_BLOCKS: [Block; 2] = [
    Block {
        first: 1,
        contacts: &CLASSIC_REV2,
    },
    Block {
        first: 27,
        contacts: &PLUS_EXTENSION,
    },
];

static BANANA_PI_M1_BLOCKS: [Block; 1] = [Block {
    first: 1,
    contacts: &BANANA_PI_M1,
}];

// The compute module's logical numbers are its native GPIO numbers
const COMPUTE_MODULE_PINS: u16 = 54;

/// A board's pin numbering layout.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Header {
    /// A physical connector, made up of one or more blocks.
    Connector(&'static [Block]),
    /// No physical connector. Logical and native numbers are identical for
    /// the first `pins` GPIOs.
    Direct { pins: u16 },
}

impl Header {
    /// 26-pin header on the Model B rev 1.
    pub fn classic_rev1() -> Header {
        Header::Connector(&CLASSIC_REV1_BLOCKS)
    }

    /// 26-pin header plus the P5 pads on rev 2 boards.
    pub fn classic_rev2() -> Header {
        Header::Connector(&CLASSIC_REV2_BLOCKS)
    }

    /// 40-pin header on the A+, B+ and 2.
    pub fn plus() -> Header {
        Header::Connector(&PLUS_BLOCKS)
    }

    /// 26-pin header plus J12 on the Banana Pi M1.
    pub fn banana_pi_m1() -> Header {
        Header::Connector(&BANANA_PI_M1_BLOCKS)
    }

    pub fn compute_module() -> Header {
        Header::Direct {
            pins: COMPUTE_MODULE_PINS,
        }
    }

    /// Returns the connector blocks. `Direct` headers have none.
    pub fn blocks(&self) -> &'static [Block] {
        match *self {
            Header::Connector(blocks) => blocks,
            Header::Direct { .. } => &[],
        }
    }

    /// Returns the highest physical position.
    pub fn last_position(&self) -> Option<u8> {
        self.blocks().iter().map(Block::last).max()
    }

    /// Returns every physical position and its contact, in ascending order.
    pub fn positions(&self) -> impl Iterator<Item = (u8, &'static Contact)> {
        self.blocks().iter().flat_map(Block::positions)
    }

    fn contact(&self, physical: u8) -> Option<&'static Contact> {
        self.blocks().iter().find_map(|block| block.get(physical))
    }

    /// Returns the connector label for `physical`.
    pub fn label(&self, physical: u8) -> Option<&'static str> {
        self.contact(physical).map(Contact::label)
    }

    pub fn physical_to_logical(&self, physical: u8) -> Option<u8> {
        self.contact(physical).and_then(Contact::logical)
    }

    pub fn physical_to_native(&self, physical: u8) -> Option<u16> {
        self.contact(physical).and_then(Contact::native)
    }

    pub fn logical_to_physical(&self, logical: u8) -> Option<u8> {
        self.positions()
            .find(|(_, contact)| contact.logical() == Some(logical))
            .map(|(physical, _)| physical)
    }

    pub fn logical_to_native(&self, logical: u8) -> Option<u16> {
        match *self {
            Header::Connector(_) => self
                .positions()
                .find_map(|(_, contact)| match *contact {
                    Contact::Gpio {
                        logical: l, native, ..
                    } if l == logical => Some(native),
                    _ => None,
                }),
            Header::Direct { pins } => Some(u16::from(logical)).filter(|&native| native < pins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    fn connectors() -> Vec<(&'static str, Header)> {
        vec![
            ("classic rev 1", Header::classic_rev1()),
            ("classic rev 2", Header::classic_rev2()),
            ("plus", Header::plus()),
            ("banana pi m1", Header::banana_pi_m1()),
        ]
    }

    #[test]
    fn lookups_are_deterministic() {
        for (name, header) in connectors() {
            for physical in 0..=64 {
                assert_eq!(
                    header.physical_to_logical(physical),
                    header.physical_to_logical(physical),
                    "{} pin {}",
                    name,
                    physical
                );
            }
        }
    }

    #[test]
    fn logical_and_native_are_injective() {
        for (name, header) in connectors() {
            let mut logical = HashSet::new();
            let mut native = HashSet::new();

            for (physical, _) in header.positions() {
                if let Some(l) = header.physical_to_logical(physical) {
                    assert!(logical.insert(l), "{}: logical {} used twice", name, l);
                }
                if let Some(n) = header.physical_to_native(physical) {
                    assert!(native.insert(n), "{}: native {} used twice", name, n);
                }
            }
        }
    }

    #[test]
    fn logical_round_trip() {
        for (name, header) in connectors() {
            for (physical, _) in header.positions() {
                if let Some(logical) = header.physical_to_logical(physical) {
                    assert_eq!(
                        header.logical_to_physical(logical),
                        Some(physical),
                        "{} pin {}",
                        name,
                        physical
                    );
                    assert_eq!(
                        header.logical_to_native(logical),
                        header.physical_to_native(physical)
                    );
                }
            }
        }
    }

    #[test]
    fn supply_contacts_are_unmapped() {
        let header = Header::classic_rev2();

        for physical in [1, 2, 4, 6, 9, 14, 17, 20, 25] {
            assert_eq!(header.physical_to_logical(physical), None);
            assert_eq!(header.physical_to_native(physical), None);
            assert!(header.label(physical).is_some());
        }

        assert_eq!(header.label(1), Some("3.3v"));
        assert_eq!(header.label(6), Some("0v"));
    }

    #[test]
    fn positions_outside_blocks() {
        let header = Header::classic_rev2();

        for physical in [0, 27, 50, 55, 64, 255] {
            assert_eq!(header.label(physical), None);
            assert_eq!(header.physical_to_logical(physical), None);
            assert_eq!(header.physical_to_native(physical), None);
        }

        assert_eq!(Header::classic_rev1().label(51), None);
    }

    #[test]
    fn revision_specific_natives() {
        assert_eq!(Header::classic_rev1().physical_to_native(3), Some(0));
        assert_eq!(Header::classic_rev2().physical_to_native(3), Some(2));
        assert_eq!(Header::classic_rev1().physical_to_native(13), Some(21));
        assert_eq!(Header::classic_rev2().physical_to_native(13), Some(27));
        assert_eq!(Header::classic_rev2().physical_to_logical(53), Some(19));
    }

    #[test]
    fn header_sizes() {
        assert_eq!(Header::classic_rev1().last_position(), Some(26));
        assert_eq!(Header::classic_rev2().last_position(), Some(54));
        assert_eq!(Header::plus().last_position(), Some(40));
        assert_eq!(Header::banana_pi_m1().last_position(), Some(30));
        assert_eq!(Header::compute_module().last_position(), None);
    }

    #[test]
    fn compute_module_is_direct() {
        let header = Header::compute_module();

        assert_eq!(header.logical_to_native(0), Some(0));
        assert_eq!(header.logical_to_native(53), Some(53));
        assert_eq!(header.logical_to_native(54), None);
        assert_eq!(header.physical_to_logical(1), None);
        assert_eq!(header.logical_to_physical(1), None);
    }

    #[test]
    fn labels_fit_name_column() {
        for (name, header) in connectors() {
            for (physical, contact) in header.positions() {
                assert!(contact.label().len() <= 7, "{} pin {}", name, physical);
            }
        }
    }
}
