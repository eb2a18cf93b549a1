//! gpio-readall reports the function select mode and logic level of every pin
//! on a single-board computer's GPIO header, next to the pin's native,
//! logical and physical numbers.
//!
//! The Raspberry Pi Model A, B, A+, B+, 2B and Compute Module are supported,
//! as well as the Banana Pi M1. Pins provided by external expanders can be
//! reported through the [`ExternalNode`] trait.
//!
//! The GPIO peripheral is only ever read. Pin state is accessed by mapping the
//! GPIO registers through `/dev/gpiomem` or `/dev/mem`, which requires
//! Raspberry Pi OS or any similar, recent, Linux distribution.
//!
//! [`ExternalNode`]: node/trait.ExternalNode.html

pub mod gpio;
pub mod node;
pub mod readall;
pub mod system;
