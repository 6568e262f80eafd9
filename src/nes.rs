//! Top-level machine: CPU, address space, and cartridge wiring.

use crate::bus::AddressSpace;
use crate::cartridge::{Cartridge, LoadError};
use crate::cpu::cpu::CPU;
use crate::trace::TraceSink;

/// Entry point used by CPU test images driven without video; conformance
/// logs are recorded from here.
pub const AUTOMATED_ENTRY: u16 = 0xC000;

/// Instructions executed per [`Nes::run`] batch.
pub const RUN_BATCH: u32 = 5000;

/// How a run starts: from the reset vector, or forced to the automated-test
/// entry point for conformance against reference logs.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum EmuMode {
    Normal,
    Automated,
}

/// The machine. Owns the CPU, which owns the address space; the cartridge
/// is registered on the address space at load time and reached only through
/// it.
pub struct Nes {
    pub cpu: CPU<AddressSpace>,
}

impl Nes {
    pub fn new() -> Self {
        Self::with_trace(None)
    }

    pub fn with_trace(trace: Option<Box<dyn TraceSink>>) -> Self {
        Self {
            cpu: CPU::with_trace(AddressSpace::new(), trace),
        }
    }

    pub fn power_on(&mut self) {
        self.cpu.power_on();
    }

    /// Map a loaded cartridge over the whole cartridge window.
    pub fn insert_cartridge(&mut self, cart: Cartridge) {
        self.cpu.bus.map_range(Box::new(cart), 0x4020, 0x1_0000);
    }

    pub fn load_rom(&mut self, rom: &str) -> Result<(), LoadError> {
        let cart = Cartridge::load(rom)?;
        self.insert_cartridge(cart);
        Ok(())
    }

    /// Load a ROM, reset, and execute one batch of instructions.
    pub fn run(&mut self, rom: &str, mode: EmuMode) -> Result<(), LoadError> {
        self.load_rom(rom)?;
        self.cpu.reset();
        if mode == EmuMode::Automated {
            self.cpu.set_pc(AUTOMATED_ENTRY);
        }
        for _ in 0..RUN_BATCH {
            self.cpu.step();
        }
        Ok(())
    }

    pub fn step(&mut self) {
        self.cpu.step();
    }
}

impl Default for Nes {
    fn default() -> Self {
        Self::new()
    }
}
