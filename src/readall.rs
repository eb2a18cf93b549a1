//! Pin status reports.
//!
//! [`ReadAll`] prints the function select mode and logic level of every pin on
//! the board's GPIO header, next to its native, logical and physical numbers.
//! The table layout is selected by [`BoardVariant`]. When an
//! [`ExternalNode`] is supplied, its pins are reported instead, and the board
//! isn't identified at all.
//!
//! Live pin state is read through the [`PinQuery`] trait, implemented for the
//! hardware by [`Gpio`].
//!
//! ## Examples
//!
//! ```no_run
//! use std::io;
//!
//! use gpio_readall::gpio::Gpio;
//! use gpio_readall::readall::{NumberingMode, ReadAll};
//! use gpio_readall::system::BoardId;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let board = BoardId::new()?;
//! let gpio = Gpio::new(&board)?;
//!
//! ReadAll::new(&gpio, NumberingMode::Logical).run(&mut io::stdout(), || board)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`ReadAll`]: struct.ReadAll.html
//! [`BoardVariant`]: enum.BoardVariant.html
//! [`ExternalNode`]: ../node/trait.ExternalNode.html
//! [`PinQuery`]: trait.PinQuery.html
//! [`Gpio`]: ../gpio/struct.Gpio.html

use std::io::{self, Write};

use log::debug;

mod external;
mod layout;
mod resolver;
#[cfg(test)]
pub(crate) mod testing;
mod topology;

use crate::gpio::{Level, Mode};
use crate::node::ExternalNode;
use crate::system::{BoardId, Model, Revision};

pub use self::resolver::{function_label, NumberingMode, PinHandle, Resolver};
pub use self::topology::{Block, Contact, Header};

/// Live pin state queries.
///
/// Every call reads the current hardware state. Implementations return
/// [`Level::Low`] and [`Mode::Input`] for pins they can't address.
///
/// [`Level::Low`]: ../gpio/enum.Level.html#variant.Low
/// [`Mode::Input`]: ../gpio/enum.Mode.html#variant.Input
pub trait PinQuery {
    /// Reads the pin's logic level.
    fn level(&self, pin: PinHandle) -> Level;

    /// Reads the pin's function select mode.
    fn mode(&self, pin: PinHandle) -> Mode;

    /// Translates a physical position to a native GPIO number, based on the
    /// detected board.
    ///
    /// Reports show the native number from their own header table, and only
    /// log a warning when this translation disagrees. [`Gpio`] translates with
    /// the same table, so it never disagrees.
    ///
    /// [`Gpio`]: ../gpio/struct.Gpio.html
    fn physical_to_native(&self, physical: u8) -> Option<u16>;
}

/// Board layouts.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum BoardVariant {
    /// 26-pin header on the Model A and B.
    Classic { model: Model, revision: Revision },
    /// Single-block header on the A+, B+, 2 and Banana Pi M1.
    Plus(Model),
    /// Compute module, without a physical header.
    ComputeModule,
    /// No known layout.
    Unknown(Model),
}

impl From<&BoardId> for BoardVariant {
    fn from(board: &BoardId) -> BoardVariant {
        match board.model() {
            model @ (Model::RaspberryPiA | Model::RaspberryPiB) => BoardVariant::Classic {
                model,
                revision: board.revision(),
            },
            model @ (Model::RaspberryPiAPlus
            | Model::RaspberryPiBPlus
            | Model::RaspberryPi2B
            | Model::BananaPiM1) => BoardVariant::Plus(model),
            Model::RaspberryPiComputeModule => BoardVariant::ComputeModule,
            model => BoardVariant::Unknown(model),
        }
    }
}

impl BoardVariant {
    /// Returns the variant's header table.
    pub fn header(&self) -> Option<Header> {
        match *self {
            BoardVariant::Classic { revision, .. } => Some(classic_header(revision)),
            BoardVariant::Plus(model) => Some(plus_header(model)),
            BoardVariant::ComputeModule => Some(Header::compute_module()),
            BoardVariant::Unknown(_) => None,
        }
    }
}

fn classic_header(revision: Revision) -> Header {
    if revision == Revision::V2 {
        Header::classic_rev2()
    } else {
        Header::classic_rev1()
    }
}

fn plus_header(model: Model) -> Header {
    if model == Model::BananaPiM1 {
        Header::banana_pi_m1()
    } else {
        Header::plus()
    }
}

/// The table a report produced.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Outcome {
    External,
    Classic,
    Plus,
    ComputeModule,
    /// The board's model has no known layout. Only a diagnostic line was
    /// written.
    UnknownBoard(Model),
}

/// Writes a status report for every pin.
pub struct ReadAll<'a, P: ?Sized> {
    pins: &'a P,
    mode: NumberingMode,
    node: Option<&'a dyn ExternalNode>,
}

impl<'a, P: PinQuery + ?Sized> ReadAll<'a, P> {
    /// Constructs a new `ReadAll`, querying `pins` in the `mode` numbering scheme.
    pub fn new(pins: &'a P, mode: NumberingMode) -> ReadAll<'a, P> {
        ReadAll {
            pins,
            mode,
            node: None,
        }
    }

    /// Reports the pins of `node` instead of the board's header.
    pub fn with_node(mut self, node: Option<&'a dyn ExternalNode>) -> ReadAll<'a, P> {
        self.node = node;
        self
    }

    /// Writes the report to `out`.
    ///
    /// `identify` is only called if no external node was supplied.
    pub fn run<W, F>(&self, out: &mut W, identify: F) -> io::Result<Outcome>
    where
        W: Write,
        F: FnOnce() -> BoardId,
    {
        if let Some(node) = self.node {
            debug!(
                "Reporting external node {}..={}",
                node.pin_base(),
                node.pin_max()
            );
            external::render(out, node)?;

            return Ok(Outcome::External);
        }

        let board = identify();
        let variant = BoardVariant::from(&board);
        debug!("Reporting {:?}", variant);

        let resolver = |header| Resolver::new(self.pins, self.mode, header);

        match variant {
            BoardVariant::Classic { model, revision } => {
                layout::classic(out, &resolver(classic_header(revision)), model, revision)?;
                Ok(Outcome::Classic)
            }
            BoardVariant::Plus(model) => {
                layout::plus(out, &resolver(plus_header(model)), model)?;
                Ok(Outcome::Plus)
            }
            BoardVariant::ComputeModule => {
                layout::compute_module(out, &resolver(Header::compute_module()))?;
                Ok(Outcome::ComputeModule)
            }
            BoardVariant::Unknown(model) => {
                writeln!(out, "Unable to determine board type... model: {}", model)?;
                Ok(Outcome::UnknownBoard(model))
            }
        }
    }
}
