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

//! Board identification.
//!
//! Use [`BoardId`] to identify the board's model, revision, memory size, maker
//! and SoC.
//!
//! [`BoardId`]: struct.BoardId.html

use std::error;
use std::fmt;
use std::fs;
use std::result;

use log::debug;

const PATH_PROC_CPUINFO: &str = "/proc/cpuinfo";
const PATH_BASE_MODEL: &str = "/sys/firmware/devicetree/base/model";

const PERIPHERAL_BASE_BCM2835: u32 = 0x2000_0000;
const PERIPHERAL_BASE_BCM2836: u32 = 0x3f00_0000;
const GPIO_OFFSET_BCM: u32 = 0x20_0000;

const PIO_BASE_A20: u32 = 0x01c2_0000;
const PIO_OFFSET_A20: u32 = 0x800;

// New-style revision codes (bit 23 set) are bit fields:
// NOQuuuWuFMMMCCCCPPPPTTTTTTTTRRRR
const FLAG_NEW_STYLE: u32 = 1 << 23;
const FLAG_WARRANTY: u32 = 1 << 25;

/// Errors that can occur when trying to identify the board.
#[derive(Debug)]
pub enum Error {
    /// Unknown board.
    ///
    /// `BoardId` was unable to identify the board based on the contents of
    /// `/proc/cpuinfo` and `/sys/firmware/devicetree/base/model`. Boards with an
    /// unrecognized SoC are rejected, so a non-Pi SBC isn't misidentified based
    /// on a revision field alone.
    UnknownBoard,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::UnknownBoard => write!(f, "Unknown board"),
        }
    }
}

impl error::Error for Error {}

/// Result type returned from methods that can have `system::Error`s.
pub type Result<T> = result::Result<T, Error>;

/// Board models.
///
/// Broadcom boards with a board type this crate doesn't have a header layout
/// for are reported as `Other`, carrying the raw type field of the revision
/// code.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Model {
    RaspberryPiA,
    RaspberryPiB,
    RaspberryPiAPlus,
    RaspberryPiBPlus,
    RaspberryPi2B,
    RaspberryPiAlpha,
    RaspberryPiComputeModule,
    BananaPiM1,
    Other(u8),
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Model::RaspberryPiA => write!(f, "Model A"),
            Model::RaspberryPiB => write!(f, "Model B"),
            Model::RaspberryPiAPlus => write!(f, "Model A+"),
            Model::RaspberryPiBPlus => write!(f, "Model B+"),
            Model::RaspberryPi2B => write!(f, "Model 2"),
            Model::RaspberryPiAlpha => write!(f, "Alpha"),
            Model::RaspberryPiComputeModule => write!(f, "Compute Module"),
            Model::BananaPiM1 => write!(f, "Banana Pi M1"),
            Model::Other(code) => write!(f, "{}", code),
        }
    }
}

/// PCB revisions.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone)]
pub enum Revision {
    V1,
    V1_1,
    V1_2,
    V2,
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Revision::V1 => write!(f, "1"),
            Revision::V1_1 => write!(f, "1.1"),
            Revision::V1_2 => write!(f, "1.2"),
            Revision::V2 => write!(f, "2"),
        }
    }
}

/// Board manufacturers.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Maker {
    Sony,
    Egoman,
    Embest,
    Qisda,
    LeMaker,
    Unknown,
}

impl fmt::Display for Maker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Maker::Sony => write!(f, "Sony"),
            Maker::Egoman => write!(f, "Egoman"),
            Maker::Embest => write!(f, "Embest"),
            Maker::Qisda => write!(f, "Qisda"),
            Maker::LeMaker => write!(f, "LeMaker"),
            Maker::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Identifiable SoCs.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum SoC {
    Bcm2835,
    Bcm2836,
    Bcm2837,
    A20,
}

impl fmt::Display for SoC {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SoC::Bcm2835 => write!(f, "BCM2835"),
            SoC::Bcm2836 => write!(f, "BCM2836"),
            SoC::Bcm2837 => write!(f, "BCM2837"),
            SoC::A20 => write!(f, "Allwinner A20"),
        }
    }
}

impl SoC {
    /// Returns the physical address of the GPIO register block.
    pub(crate) fn gpio_base(&self) -> u32 {
        match *self {
            SoC::Bcm2835 => PERIPHERAL_BASE_BCM2835 + GPIO_OFFSET_BCM,
            SoC::Bcm2836 | SoC::Bcm2837 => PERIPHERAL_BASE_BCM2836 + GPIO_OFFSET_BCM,
            SoC::A20 => PIO_BASE_A20 + PIO_OFFSET_A20,
        }
    }
}

// Old-style revision codes, indexed by the last 4 characters
fn parse_old_style(code: &str) -> Option<(Model, Revision, u32, Maker)> {
    use self::Maker::*;
    use self::Model::*;
    use self::Revision::*;

    let board = match code {
        "0002" => (RaspberryPiB, V1, 256, Egoman),
        "0003" => (RaspberryPiB, V1_1, 256, Egoman),
        "0004" => (RaspberryPiB, V2, 256, Sony),
        "0005" => (RaspberryPiB, V2, 256, Qisda),
        "0006" => (RaspberryPiB, V2, 256, Egoman),
        "0007" => (RaspberryPiA, V2, 256, Egoman),
        "0008" => (RaspberryPiA, V2, 256, Sony),
        "0009" => (RaspberryPiA, V2, 256, Qisda),
        "000d" => (RaspberryPiB, V2, 512, Egoman),
        "000e" => (RaspberryPiB, V2, 512, Sony),
        "000f" => (RaspberryPiB, V2, 512, Egoman),
        "0010" => (RaspberryPiBPlus, V1_2, 512, Sony),
        "0011" => (RaspberryPiComputeModule, V1_2, 512, Sony),
        "0012" => (RaspberryPiAPlus, V1_2, 256, Sony),
        "0013" => (RaspberryPiBPlus, V1_2, 512, Egoman),
        "0014" => (RaspberryPiComputeModule, V1_2, 512, Embest),
        "0015" => (RaspberryPiAPlus, V1_1, 256, Embest),
        _ => return None,
    };

    Some(board)
}

fn parse_new_style(code: u32) -> BoardId {
    let model = match ((code >> 4) & 0xff) as u8 {
        0 => Model::RaspberryPiA,
        1 => Model::RaspberryPiB,
        2 => Model::RaspberryPiAPlus,
        3 => Model::RaspberryPiBPlus,
        4 => Model::RaspberryPi2B,
        5 => Model::RaspberryPiAlpha,
        6 => Model::RaspberryPiComputeModule,
        other => Model::Other(other),
    };

    let revision = match code & 0xf {
        0 => Revision::V1,
        1 => Revision::V1_1,
        2 => Revision::V1_2,
        _ => Revision::V2,
    };

    let soc = match (code >> 12) & 0xf {
        0 => SoC::Bcm2835,
        1 => SoC::Bcm2836,
        _ => SoC::Bcm2837,
    };

    let maker = match (code >> 16) & 0xf {
        0 | 3 => Maker::Sony,
        1 => Maker::Egoman,
        2 | 4 => Maker::Embest,
        _ => Maker::Unknown,
    };

    BoardId {
        model,
        revision,
        memory: 256 << ((code >> 20) & 0b111),
        maker,
        over_volted: code & FLAG_WARRANTY != 0,
        soc,
    }
}

/// Parses the contents of `/proc/cpuinfo`.
pub(crate) fn parse_proc_cpuinfo(cpuinfo: &str) -> Result<BoardId> {
    let mut hardware = "";
    let mut revision = String::new();
    for line in cpuinfo.lines() {
        if let Some(value) = line.strip_prefix("Hardware\t: ") {
            hardware = value.trim();
        } else if let Some(value) = line.strip_prefix("Revision\t: ") {
            revision = value.trim().to_lowercase();
        }
    }

    match hardware {
        "BCM2708" | "BCM2835" | "BCM2709" | "BCM2836" | "BCM2710" | "BCM2837" => {}
        "sun7i" => return Ok(BoardId::banana_pi_m1()),
        _ => return Err(Error::UnknownBoard),
    }

    let code = u32::from_str_radix(&revision, 16).map_err(|_| Error::UnknownBoard)?;

    if code & FLAG_NEW_STYLE != 0 {
        return Ok(parse_new_style(code));
    }

    // Older revisions are 4 characters long, or 8 if they've been over-volted
    if revision.len() != 4 && revision.len() != 8 {
        return Err(Error::UnknownBoard);
    }

    let (model, revision_id, memory, maker) =
        parse_old_style(&revision[revision.len() - 4..]).ok_or(Error::UnknownBoard)?;

    Ok(BoardId {
        model,
        revision: revision_id,
        memory,
        maker,
        over_volted: revision.len() == 8 && code >> 24 != 0,
        soc: SoC::Bcm2835,
    })
}

/// Parses the contents of `/sys/firmware/devicetree/base/model`.
pub(crate) fn parse_base_model(base_model: &str) -> Result<BoardId> {
    let mut base_model = base_model.trim_end_matches('\0').trim();
    if let Some(idx) = base_model.find(" Rev ") {
        base_model = &base_model[..idx];
    }

    let (model, revision, memory, maker) = match base_model {
        "LeMaker Banana Pi" | "Banana Pi BPI-M1" => return Ok(BoardId::banana_pi_m1()),
        "Raspberry Pi Model B (no P5)" => (Model::RaspberryPiB, Revision::V1, 256, Maker::Unknown),
        "Raspberry Pi Model B" => (Model::RaspberryPiB, Revision::V1, 256, Maker::Unknown),
        "Raspberry Pi Model B rev2" => (Model::RaspberryPiB, Revision::V2, 512, Maker::Unknown),
        "Raspberry Pi Model A" => (Model::RaspberryPiA, Revision::V2, 256, Maker::Unknown),
        "Raspberry Pi Model A+" | "Raspberry Pi Model A Plus" => {
            (Model::RaspberryPiAPlus, Revision::V1_1, 256, Maker::Unknown)
        }
        "Raspberry Pi Model B+" | "Raspberry Pi Model B Plus" => {
            (Model::RaspberryPiBPlus, Revision::V1_2, 512, Maker::Unknown)
        }
        "Raspberry Pi 2 Model B" => (Model::RaspberryPi2B, Revision::V1_1, 1024, Maker::Unknown),
        "Raspberry Pi Compute Module" => (
            Model::RaspberryPiComputeModule,
            Revision::V1_2,
            512,
            Maker::Unknown,
        ),
        _ => return Err(Error::UnknownBoard),
    };

    let soc = if model == Model::RaspberryPi2B {
        SoC::Bcm2836
    } else {
        SoC::Bcm2835
    };

    Ok(BoardId {
        model,
        revision,
        memory,
        maker,
        over_volted: false,
        soc,
    })
}

/// Board identity: model, revision, memory size, maker, over-volt status and SoC.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct BoardId {
    model: Model,
    revision: Revision,
    memory: u32,
    maker: Maker,
    over_volted: bool,
    soc: SoC,
}

impl BoardId {
    /// Constructs a new `BoardId`.
    ///
    /// `new` attempts to identify the board based on the contents of
    /// `/proc/cpuinfo` and `/sys/firmware/devicetree/base/model`.
    pub fn new() -> Result<BoardId> {
        // Parse order from most-detailed to least-detailed info
        let board = fs::read_to_string(PATH_PROC_CPUINFO)
            .map_err(|_| Error::UnknownBoard)
            .and_then(|cpuinfo| parse_proc_cpuinfo(&cpuinfo))
            .or_else(|_| {
                debug!("{} not recognized, trying {}", PATH_PROC_CPUINFO, PATH_BASE_MODEL);

                fs::read_to_string(PATH_BASE_MODEL)
                    .map_err(|_| Error::UnknownBoard)
                    .and_then(|base_model| parse_base_model(&base_model))
            })?;

        debug!("Identified {:?}", board);

        Ok(board)
    }

    /// Constructs a `BoardId` from known values, bypassing detection.
    pub fn from_parts(
        model: Model,
        revision: Revision,
        memory: u32,
        maker: Maker,
        over_volted: bool,
        soc: SoC,
    ) -> BoardId {
        BoardId {
            model,
            revision,
            memory,
            maker,
            over_volted,
            soc,
        }
    }

    fn banana_pi_m1() -> BoardId {
        BoardId {
            model: Model::BananaPiM1,
            revision: Revision::V1_2,
            memory: 1024,
            maker: Maker::LeMaker,
            over_volted: false,
            soc: SoC::A20,
        }
    }

    /// Returns the board's model.
    pub fn model(&self) -> Model {
        self.model
    }

    /// Returns the board's PCB revision.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Returns the amount of memory in MB.
    pub fn memory(&self) -> u32 {
        self.memory
    }

    /// Returns the board's manufacturer.
    pub fn maker(&self) -> Maker {
        self.maker
    }

    /// Returns `true` if the board has been over-volted.
    pub fn over_volted(&self) -> bool {
        self.over_volted
    }

    /// Returns the board's SoC.
    pub fn soc(&self) -> SoC {
        self.soc
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type: {}, Revision: {}, Memory: {}MB, Maker: {}",
            self.model, self.revision, self.memory, self.maker
        )?;

        if self.over_volted {
            write!(f, " [OV]")?;
        }

        Ok(())
    }
}
