//! Nescore: the instruction-execution core of the NES, written in Rust.
//!
//! Emulates the console's [6502](https://www.nesdev.org/wiki/CPU)-family CPU
//! (the Ricoh 2A03's instruction core, decimal mode inert) bit-for-bit and
//! cycle-for-cycle, together with the memory bus it fetches and stores
//! through. Video, audio, and input are external collaborators reached only
//! as memory-mapped peripherals; they are not implemented here.
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map):
//!   2 KiB internal RAM mirrored over `$0000-$1FFF`, routed peripheral space
//!   above
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) loading; fixed
//!   PRG bank, no mapper registers
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU) instruction set,
//!   table-driven decode, cycle penalties, nestest-compatible tracing
//! - **nes** – machine wiring and run modes
//! - **trace** – per-instruction trace records for conformance diffing

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod nes;
pub mod trace;
