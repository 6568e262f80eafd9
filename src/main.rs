//! NES CPU core entry point.
//!
//! Loads a cartridge and executes one batch of instructions, tracing each
//! one to stdout. Usage: nescore [path/to/image.nes]

use std::env;
use std::io;
use std::process;

use ansi_term::Colour::Red;
use nescore::nes::{EmuMode, Nes};
use nescore::trace::WriterSink;

fn main() {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .unwrap_or_else(|| "test/nestest.nes".to_string());

    // nestest's CPU-only mode starts at the automated entry point instead of
    // the reset vector
    let mode = if path.contains("nestest") {
        EmuMode::Automated
    } else {
        EmuMode::Normal
    };

    let mut nes = Nes::with_trace(Some(Box::new(WriterSink::new(io::stdout()))));
    nes.power_on();

    if let Err(err) = nes.run(&path, mode) {
        eprintln!("{} {}", Red.bold().paint("ERROR"), err);
        process::exit(1);
    }
}
