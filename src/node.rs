//! External pin expander nodes.
//!
//! An expander (an I/O extender, ADC, or any other device providing pins)
//! implements [`ExternalNode`] and occupies a contiguous range of pin numbers
//! above the native numbering. Registered nodes are kept in a
//! [`NodeRegistry`]; reports only consult the most recently registered one.
//!
//! [`ExternalNode`]: trait.ExternalNode.html
//! [`NodeRegistry`]: struct.NodeRegistry.html

use std::error;
use std::fmt;
use std::result;

use log::debug;

use crate::gpio::Level;

/// Pin numbers below this value are reserved for native pins.
pub const NODE_PIN_BASE_MIN: u16 = 64;

/// Errors that can occur when registering a node.
#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    /// The node's pin range starts inside the native pin numbers.
    PinBaseReserved(u16),
    /// `pin_max` is lower than `pin_base`.
    InvalidRange { pin_base: u16, pin_max: u16 },
    /// The node's pin range overlaps with an already registered node.
    Overlap { pin_base: u16, pin_max: u16 },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::PinBaseReserved(pin_base) => {
                write!(f, "Pin base {} overlaps native pins", pin_base)
            }
            Error::InvalidRange { pin_base, pin_max } => {
                write!(f, "Invalid pin range {}..={}", pin_base, pin_max)
            }
            Error::Overlap { pin_base, pin_max } => write!(
                f,
                "Pin range {}..={} overlaps a registered node",
                pin_base, pin_max
            ),
        }
    }
}

impl error::Error for Error {}

/// Result type returned from methods that can have `node::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// A device providing the pins `pin_base..=pin_max`.
pub trait ExternalNode {
    fn pin_base(&self) -> u16;

    fn pin_max(&self) -> u16;

    fn digital_read(&self, pin: u16) -> Level;

    /// Reads the analog value of `pin`.
    ///
    /// Nodes without analog inputs return a fixed sentinel value instead of
    /// failing.
    fn analog_read(&self, pin: u16) -> i32;
}

/// Registered external nodes, in registration order.
#[derive(Default)]
pub struct NodeRegistry {
    nodes: Vec<Box<dyn ExternalNode>>,
}

impl fmt::Debug for NodeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<_> = self
            .nodes
            .iter()
            .map(|node| node.pin_base()..=node.pin_max())
            .collect();

        f.debug_struct("NodeRegistry")
            .field("nodes", &ranges)
            .finish()
    }
}

impl NodeRegistry {
    pub fn new() -> NodeRegistry {
        NodeRegistry::default()
    }

    /// Registers `node`, making it the current node.
    pub fn register(&mut self, node: Box<dyn ExternalNode>) -> Result<()> {
        let (pin_base, pin_max) = (node.pin_base(), node.pin_max());

        if pin_base < NODE_PIN_BASE_MIN {
            return Err(Error::PinBaseReserved(pin_base));
        }

        if pin_max < pin_base {
            return Err(Error::InvalidRange { pin_base, pin_max });
        }

        if self
            .nodes
            .iter()
            .any(|other| pin_base <= other.pin_max() && other.pin_base() <= pin_max)
        {
            return Err(Error::Overlap { pin_base, pin_max });
        }

        debug!("Registered node for pins {}..={}", pin_base, pin_max);
        self.nodes.push(node);

        Ok(())
    }

    /// Returns the most recently registered node.
    pub fn current(&self) -> Option<&dyn ExternalNode> {
        self.nodes.last().map(|node| node.as_ref())
    }
}
