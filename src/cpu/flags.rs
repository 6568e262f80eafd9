//! 6502 processor status register (P) flag bits.

pub const FLAG_CARRY: u8 = 1 << 0;
pub const FLAG_ZERO: u8 = 1 << 1;
pub const FLAG_INTERRUPT_DISABLE: u8 = 1 << 2;
pub const FLAG_DECIMAL: u8 = 1 << 3;   // Stored but inert; the 2A03 disables decimal mode
pub const FLAG_BREAK_LO: u8 = 1 << 4;  // "B" low bit; meaningful only in pushed flag bytes
pub const FLAG_BREAK_HI: u8 = 1 << 5;  // "B" high bit; reads as 1 on a real 6502
pub const FLAG_OVERFLOW: u8 = 1 << 6;
pub const FLAG_NEGATIVE: u8 = 1 << 7;
