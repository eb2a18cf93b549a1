// readall
//
// Retrieves the mode and logic level for each of the pins on the board's GPIO
// header, and displays the results in an ASCII table.

use std::io::{self, Write};
use std::process::exit;

use clap::Parser;
use log::debug;

use gpio_readall::gpio::Gpio;
use gpio_readall::readall::{NumberingMode, ReadAll};
use gpio_readall::system::BoardId;

/// Reports the mode and logic level of every GPIO header pin
#[derive(Parser, Debug)]
#[command(name = "readall", version, long_about = None)]
struct Args {
    /// Query pins by native (BCM/CPU) GPIO number
    #[arg(short = 'g', long, conflicts_with = "physical")]
    native: bool,

    /// Query pins by physical header position
    #[arg(short = '1', long)]
    physical: bool,

    /// Print the detected board details instead of the pin table
    #[arg(short, long, default_value_t = false)]
    board: bool,

    /// Enable verbose logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn numbering_mode(&self) -> NumberingMode {
        if self.native {
            NumberingMode::Native
        } else if self.physical {
            NumberingMode::Physical
        } else {
            NumberingMode::Logical
        }
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();

    let board = BoardId::new().unwrap_or_else(|e| {
        eprintln!("Error: Can't identify board ({})", e);
        exit(1);
    });
    debug!("Detected {}", board);

    if args.board {
        println!("{}", board);
        return;
    }

    let gpio = Gpio::new(&board).unwrap_or_else(|e| {
        eprintln!("Error: Can't access GPIO peripheral ({})", e);
        exit(1);
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let outcome = ReadAll::new(&gpio, args.numbering_mode())
        .run(&mut out, || board)
        .and_then(|outcome| out.flush().map(|_| outcome))
        .unwrap_or_else(|e| {
            eprintln!("Error: Can't write report ({})", e);
            exit(1);
        });

    debug!("Report finished: {:?}", outcome);
}
