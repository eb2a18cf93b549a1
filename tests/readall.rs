use std::cell::RefCell;

use gpio_readall::gpio::{Level, Mode};
use gpio_readall::node::{ExternalNode, NodeRegistry};
use gpio_readall::readall::{NumberingMode, Outcome, PinHandle, PinQuery, ReadAll};
use gpio_readall::system::{BoardId, Maker, Model, Revision, SoC};

// Logical pin 0 is an output driven high, everything else reads as a low input.
// Every query is recorded.
#[derive(Default)]
struct Pins {
    queried: RefCell<Vec<PinHandle>>,
}

impl Pins {
    fn state(&self, pin: PinHandle) -> (Mode, Level) {
        self.queried.borrow_mut().push(pin);

        match pin {
            PinHandle::Logical(0) | PinHandle::Native(17) | PinHandle::Physical(11) => {
                (Mode::Output, Level::High)
            }
            _ => (Mode::Input, Level::Low),
        }
    }
}

impl PinQuery for Pins {
    fn level(&self, pin: PinHandle) -> Level {
        self.state(pin).1
    }

    fn mode(&self, pin: PinHandle) -> Mode {
        self.state(pin).0
    }

    fn physical_to_native(&self, _physical: u8) -> Option<u16> {
        None
    }
}

struct Adc {
    pin_base: u16,
}

impl ExternalNode for Adc {
    fn pin_base(&self) -> u16 {
        self.pin_base
    }

    fn pin_max(&self) -> u16 {
        self.pin_base + 3
    }

    fn digital_read(&self, _pin: u16) -> Level {
        Level::High
    }

    fn analog_read(&self, pin: u16) -> i32 {
        i32::from(pin - self.pin_base) * 256
    }
}

fn board(model: Model, revision: Revision) -> BoardId {
    BoardId::from_parts(model, revision, 512, Maker::Sony, false, SoC::Bcm2835)
}

fn report(pins: &Pins, mode: NumberingMode, board: BoardId) -> (Outcome, Vec<String>) {
    let mut out = Vec::new();
    let outcome = ReadAll::new(pins, mode).run(&mut out, || board).unwrap();

    let lines = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(String::from)
        .collect();

    (outcome, lines)
}

#[test]
fn model_b_rev2() {
    let pins = Pins::default();
    let (outcome, lines) = report(
        &pins,
        NumberingMode::Logical,
        board(Model::RaspberryPiB, Revision::V2),
    );

    assert_eq!(outcome, Outcome::Classic);
    assert_eq!(lines.len(), 22);
    assert_eq!(
        lines[8],
        " |  17 |   0 | GPIO. 0 |  OUT | 1 | 11 || 12 | 0 | IN   | GPIO. 1 | 1   | 18  |"
    );
    assert_eq!(
        lines[9],
        " |  27 |   2 | GPIO. 2 |   IN | 0 | 13 || 14 |   |      | 0v      |     |     |"
    );

    // 17 logical pins on the P1 header, 4 on P5, each queried for mode and level
    let queried = pins.queried.borrow();
    assert_eq!(queried.len(), 21 * 2);
    assert!(queried
        .iter()
        .all(|pin| matches!(pin, PinHandle::Logical(_))));
}

#[test]
fn numbering_mode_selects_query_input() {
    for (mode, expected) in [
        (NumberingMode::Native, PinHandle::Native(17)),
        (NumberingMode::Physical, PinHandle::Physical(11)),
        (NumberingMode::Logical, PinHandle::Logical(0)),
    ] {
        let pins = Pins::default();
        let (_, lines) = report(&pins, mode, board(Model::RaspberryPiB, Revision::V2));

        assert!(pins.queried.borrow().contains(&expected));
        assert!(lines[8].contains("|  OUT | 1 | 11 ||"));
    }
}

#[test]
fn plus_board() {
    let pins = Pins::default();
    let (outcome, lines) = report(
        &pins,
        NumberingMode::Logical,
        board(Model::RaspberryPi2B, Revision::V1_1),
    );

    assert_eq!(outcome, Outcome::Plus);
    assert_eq!(lines.len(), 26);
    assert!(lines[0].contains("---Pi 2---"));
    assert!(lines[21].contains("| 37 || 38 |"));
}

#[test]
fn compute_module() {
    let pins = Pins::default();
    let (outcome, lines) = report(
        &pins,
        NumberingMode::Logical,
        board(Model::RaspberryPiComputeModule, Revision::V1_2),
    );

    assert_eq!(outcome, Outcome::ComputeModule);
    assert_eq!(lines.len(), 32);
    assert_eq!(pins.queried.borrow().len(), 56 * 2);
}

#[test]
fn unknown_board() {
    let pins = Pins::default();
    let (outcome, lines) = report(
        &pins,
        NumberingMode::Logical,
        board(Model::RaspberryPiAlpha, Revision::V1),
    );

    assert_eq!(outcome, Outcome::UnknownBoard(Model::RaspberryPiAlpha));
    assert_eq!(lines, ["Unable to determine board type... model: Alpha"]);
    assert!(pins.queried.borrow().is_empty());
}

#[test]
fn external_node() {
    let mut nodes = NodeRegistry::new();
    nodes.register(Box::new(Adc { pin_base: 100 })).unwrap();

    let pins = Pins::default();
    let mut out = Vec::new();
    let outcome = ReadAll::new(&pins, NumberingMode::Logical)
        .with_node(nodes.current())
        .run(&mut out, || unreachable!())
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(outcome, Outcome::External);
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[3], "|  100 |     1   |     0  |");
    assert_eq!(lines[6], "|  103 |     1   |   768  |");
    assert!(pins.queried.borrow().is_empty());
}
