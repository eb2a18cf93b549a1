//! Connector and compute module tables.
//!
//! Connector rows cover two adjacent physical positions, the odd position on
//! the left and the even position mirrored on the right:
//!
//! ```text
//! | BCM | wPi |   Name  | Mode | V | Physical | V | Mode | Name    | wPi | BCM |
//! ```
//!
//! Positions without a logical pin leave the number, mode and level cells
//! blank.

use std::io::{self, Write};

use log::warn;

use crate::gpio::Level;
use crate::system::{Model, Revision};

use super::resolver::Resolver;
use super::PinQuery;

const SEPARATOR: &str =
    " +-----+-----+---------+------+---+----++----+---+------+---------+-----+-----+";
const P5_MARKER: &str = "----P5----";

const CM_FRAME: &str = "+-----+------+-------+      +-----+------+-------+";
const CM_TITLES: &str = "| Pin | Mode | Value |      | Pin | Mode | Value |";
const CM_BLOCK: u8 = 28;

// Left, then right-hand cells for a single physical position
struct Cells {
    native: String,
    logical: String,
    label: &'static str,
    mode: &'static str,
    level: String,
}

fn cells<P: PinQuery + ?Sized>(resolver: &Resolver<'_, P>, physical: u8) -> Cells {
    let header = resolver.header();
    let native = header.physical_to_native(physical);

    if let Some(global) = resolver.pins().physical_to_native(physical) {
        if Some(global) != native {
            warn!(
                "Physical pin {} maps to GPIO {}, header table says {:?}",
                physical, global, native
            );
        }
    }

    let (mode, level) = match resolver.resolve(physical) {
        Some(pin) => (
            resolver.function_label(pin),
            (resolver.level(pin) as u8).to_string(),
        ),
        None => ("", String::new()),
    };

    Cells {
        native: native.map(|n| n.to_string()).unwrap_or_default(),
        logical: header
            .physical_to_logical(physical)
            .map(|l| l.to_string())
            .unwrap_or_default(),
        label: header.label(physical).unwrap_or(""),
        mode,
        level,
    }
}

fn write_row<W: Write, P: PinQuery + ?Sized>(
    out: &mut W,
    resolver: &Resolver<'_, P>,
    physical: u8,
) -> io::Result<()> {
    let left = cells(resolver, physical);
    let right = cells(resolver, physical + 1);

    writeln!(
        out,
        " | {:>3} | {:>3} | {:>7} | {:>4} | {:>1} | {:>2} || {:<2} | {:<1} | {:<4} | {:<7} | {:<3} | {:<3} |",
        left.native,
        left.logical,
        left.label,
        left.mode,
        left.level,
        physical,
        physical + 1,
        right.level,
        right.mode,
        right.label,
        right.logical,
        right.native,
    )
}

fn write_rows<W: Write, P: PinQuery + ?Sized>(
    out: &mut W,
    resolver: &Resolver<'_, P>,
    first: u8,
    last: u8,
) -> io::Result<()> {
    for physical in (first..=last).step_by(2) {
        write_row(out, resolver, physical)?;
    }

    Ok(())
}

fn marker_line(marker: &str) -> String {
    format!(
        " +-----+-----+---------+------+---+{}+---+------+---------+-----+-----+",
        marker
    )
}

fn titles(native: &str) -> String {
    format!(
        " | {0} | wPi |   Name  | Mode | V | Physical | V | Mode | Name    | wPi | {0} |",
        native
    )
}

fn classic_marker(model: Model, revision: Revision) -> String {
    let board = match (model, revision) {
        (Model::RaspberryPiA, _) => " A",
        (_, Revision::V2) => "B2",
        _ => "B1",
    };

    format!("-Model {}-", board)
}

/// Renders the 26-pin header of the Model A and B, followed by the P5 pads on
/// rev 2 boards.
///
/// The P5 rows don't get a header and footer pair of their own. A single
/// `----P5----` marker line separates them from the P1 rows, and the table's
/// footer closes both.
pub(crate) fn classic<W: Write, P: PinQuery + ?Sized>(
    out: &mut W,
    resolver: &Resolver<'_, P>,
    model: Model,
    revision: Revision,
) -> io::Result<()> {
    let marker = marker_line(&classic_marker(model, revision));

    writeln!(out, "{}", marker)?;
    writeln!(out, "{}", titles("BCM"))?;
    writeln!(out, "{}", SEPARATOR)?;
    write_rows(out, resolver, 1, 26)?;

    if revision == Revision::V2 {
        writeln!(out, "{}", marker_line(P5_MARKER))?;
        write_rows(out, resolver, 51, 54)?;
    }

    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "{}", titles("BCM"))?;
    writeln!(out, "{}", marker)
}

fn plus_marker(model: Model) -> &'static str {
    match model {
        Model::RaspberryPiAPlus => "--A Plus--",
        Model::RaspberryPiBPlus => "--B Plus--",
        Model::BananaPiM1 => "--BPi M1--",
        _ => "---Pi 2---",
    }
}

/// Renders the single-block header of the A+, B+, 2 and Banana Pi M1.
pub(crate) fn plus<W: Write, P: PinQuery + ?Sized>(
    out: &mut W,
    resolver: &Resolver<'_, P>,
    model: Model,
) -> io::Result<()> {
    let marker = marker_line(plus_marker(model));
    let native = if model == Model::BananaPiM1 {
        "CPU"
    } else {
        "BCM"
    };
    let last = resolver.header().last_position().unwrap_or(0);

    writeln!(out, "{}", marker)?;
    writeln!(out, "{}", titles(native))?;
    writeln!(out, "{}", SEPARATOR)?;
    write_rows(out, resolver, 1, last)?;
    writeln!(out, "{}", SEPARATOR)?;
    writeln!(out, "{}", titles(native))?;
    writeln!(out, "{}", marker)
}

fn cm_level(level: Level) -> &'static str {
    match level {
        Level::High => "High",
        Level::Low => "Low",
    }
}

/// Renders the compute module's pins side by side in two blocks of 28.
pub(crate) fn compute_module<W: Write, P: PinQuery + ?Sized>(
    out: &mut W,
    resolver: &Resolver<'_, P>,
) -> io::Result<()> {
    writeln!(out, "{}", CM_FRAME)?;
    writeln!(out, "{}", CM_TITLES)?;
    writeln!(out, "{}", CM_FRAME)?;

    for number in 0..CM_BLOCK {
        let left = resolver.handle(number);
        let right = resolver.handle(number + CM_BLOCK);

        writeln!(
            out,
            "| {:>3} | {:<4} | {:<4}  |      | {:>3} | {:<4} | {:<4}  |",
            number,
            resolver.function_label(left),
            cm_level(resolver.level(left)),
            number + CM_BLOCK,
            resolver.function_label(right),
            cm_level(resolver.level(right)),
        )?;
    }

    writeln!(out, "{}", CM_FRAME)
}
