//! Opcode decode table: 256 entries of fixed architecture knowledge.
//!
//! Each opcode byte maps to {operation, addressing mode, instruction size in
//! bytes, base cycle cost}. Undocumented opcodes carry the distinct
//! [`Operation::Invalid`] marker (size 0, 0 cycles) so callers can tell them
//! apart from real instructions.

/// Operation kind, decoupled from addressing mode.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operation {
    Invalid,
    Adc, And, Asl,
    Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy,
    Dec, Dex, Dey,
    Eor,
    Inc, Inx, Iny,
    Jmp, Jsr,
    Lda, Ldx, Ldy, Lsr,
    Nop,
    Ora,
    Pha, Php, Pla, Plp,
    Rol, Ror, Rti, Rts,
    Sbc, Sec, Sed, Sei, Sta, Stx, Sty,
    Tax, Tay, Tsx, Txa, Txs, Tya,
}

/// How the bytes following the opcode resolve to an effective address.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AddrMode {
    Invalid,
    Accumulator,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Immediate,
    Implied,
    Indirect,
    IndirectX,
    IndirectY,
    Relative,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
}

/// One decode-table row.
pub struct OpcodeEntry {
    pub op: Operation,
    pub name: &'static str,
    pub mode: AddrMode,
    pub size: u16,
    pub cycles: u64,
}

use AddrMode as M;
use Operation as O;

const fn entry(op: Operation, name: &'static str, mode: AddrMode, size: u16, cycles: u64) -> OpcodeEntry {
    OpcodeEntry { op, name, mode, size, cycles }
}

const INVALID: OpcodeEntry = entry(O::Invalid, "INVALID OPCODE", M::Invalid, 0, 0);

pub const OPCODE_TABLE: [OpcodeEntry; 256] = [
    /* 0x00 */ entry(O::Brk, "BRK", M::Implied, 1, 7),
    /* 0x01 */ entry(O::Ora, "ORA", M::IndirectX, 2, 6),
    /* 0x02 */ INVALID,
    /* 0x03 */ INVALID,
    /* 0x04 */ INVALID,
    /* 0x05 */ entry(O::Ora, "ORA", M::ZeroPage, 2, 3),
    /* 0x06 */ entry(O::Asl, "ASL", M::ZeroPage, 2, 5),
    /* 0x07 */ INVALID,
    /* 0x08 */ entry(O::Php, "PHP", M::Implied, 1, 3),
    /* 0x09 */ entry(O::Ora, "ORA", M::Immediate, 2, 2),
    /* 0x0A */ entry(O::Asl, "ASL", M::Accumulator, 1, 2),
    /* 0x0B */ INVALID,
    /* 0x0C */ INVALID,
    /* 0x0D */ entry(O::Ora, "ORA", M::Absolute, 3, 4),
    /* 0x0E */ entry(O::Asl, "ASL", M::Absolute, 3, 6),
    /* 0x0F */ INVALID,
    /* 0x10 */ entry(O::Bpl, "BPL", M::Relative, 2, 2),
    /* 0x11 */ entry(O::Ora, "ORA", M::IndirectY, 2, 5),
    /* 0x12 */ INVALID,
    /* 0x13 */ INVALID,
    /* 0x14 */ INVALID,
    /* 0x15 */ entry(O::Ora, "ORA", M::ZeroPageX, 2, 4),
    /* 0x16 */ entry(O::Asl, "ASL", M::ZeroPageX, 2, 6),
    /* 0x17 */ INVALID,
    /* 0x18 */ entry(O::Clc, "CLC", M::Implied, 1, 2),
    /* 0x19 */ entry(O::Ora, "ORA", M::AbsoluteY, 3, 4),
    /* 0x1A */ INVALID,
    /* 0x1B */ INVALID,
    /* 0x1C */ INVALID,
    /* 0x1D */ entry(O::Ora, "ORA", M::AbsoluteX, 3, 4),
    /* 0x1E */ entry(O::Asl, "ASL", M::AbsoluteX, 3, 7),
    /* 0x1F */ INVALID,
    /* 0x20 */ entry(O::Jsr, "JSR", M::Absolute, 3, 6),
    /* 0x21 */ entry(O::And, "AND", M::IndirectX, 2, 6),
    /* 0x22 */ INVALID,
    /* 0x23 */ INVALID,
    /* 0x24 */ entry(O::Bit, "BIT", M::ZeroPage, 2, 3),
    /* 0x25 */ entry(O::And, "AND", M::ZeroPage, 2, 3),
    /* 0x26 */ entry(O::Rol, "ROL", M::ZeroPage, 2, 5),
    /* 0x27 */ INVALID,
    /* 0x28 */ entry(O::Plp, "PLP", M::Implied, 1, 4),
    /* 0x29 */ entry(O::And, "AND", M::Immediate, 2, 2),
    /* 0x2A */ entry(O::Rol, "ROL", M::Accumulator, 1, 2),
    /* 0x2B */ INVALID,
    /* 0x2C */ entry(O::Bit, "BIT", M::Absolute, 3, 4),
    /* 0x2D */ entry(O::And, "AND", M::Absolute, 3, 4),
    /* 0x2E */ entry(O::Rol, "ROL", M::Absolute, 3, 6),
    /* 0x2F */ INVALID,
    /* 0x30 */ entry(O::Bmi, "BMI", M::Relative, 2, 2),
    /* 0x31 */ entry(O::And, "AND", M::IndirectY, 2, 5),
    /* 0x32 */ INVALID,
    /* 0x33 */ INVALID,
    /* 0x34 */ INVALID,
    /* 0x35 */ entry(O::And, "AND", M::ZeroPageX, 2, 4),
    /* 0x36 */ entry(O::Rol, "ROL", M::ZeroPageX, 2, 6),
    /* 0x37 */ INVALID,
    /* 0x38 */ entry(O::Sec, "SEC", M::Implied, 1, 2),
    /* 0x39 */ entry(O::And, "AND", M::AbsoluteY, 3, 4),
    /* 0x3A */ INVALID,
    /* 0x3B */ INVALID,
    /* 0x3C */ INVALID,
    /* 0x3D */ entry(O::And, "AND", M::AbsoluteX, 3, 4),
    /* 0x3E */ entry(O::Rol, "ROL", M::AbsoluteX, 3, 7),
    /* 0x3F */ INVALID,
    /* 0x40 */ entry(O::Rti, "RTI", M::Implied, 1, 6),
    /* 0x41 */ entry(O::Eor, "EOR", M::IndirectX, 2, 6),
    /* 0x42 */ INVALID,
    /* 0x43 */ INVALID,
    /* 0x44 */ INVALID,
    /* 0x45 */ entry(O::Eor, "EOR", M::ZeroPage, 2, 3),
    /* 0x46 */ entry(O::Lsr, "LSR", M::ZeroPage, 2, 5),
    /* 0x47 */ INVALID,
    /* 0x48 */ entry(O::Pha, "PHA", M::Implied, 1, 3),
    /* 0x49 */ entry(O::Eor, "EOR", M::Immediate, 2, 2),
    /* 0x4A */ entry(O::Lsr, "LSR", M::Accumulator, 1, 2),
    /* 0x4B */ INVALID,
    /* 0x4C */ entry(O::Jmp, "JMP", M::Absolute, 3, 3),
    /* 0x4D */ entry(O::Eor, "EOR", M::Absolute, 3, 4),
    /* 0x4E */ entry(O::Lsr, "LSR", M::Absolute, 3, 6),
    /* 0x4F */ INVALID,
    /* 0x50 */ entry(O::Bvc, "BVC", M::Relative, 2, 2),
    /* 0x51 */ entry(O::Eor, "EOR", M::IndirectY, 2, 5),
    /* 0x52 */ INVALID,
    /* 0x53 */ INVALID,
    /* 0x54 */ INVALID,
    /* 0x55 */ entry(O::Eor, "EOR", M::ZeroPageX, 2, 4),
    /* 0x56 */ entry(O::Lsr, "LSR", M::ZeroPageX, 2, 6),
    /* 0x57 */ INVALID,
    /* 0x58 */ entry(O::Cli, "CLI", M::Implied, 1, 2),
    /* 0x59 */ entry(O::Eor, "EOR", M::AbsoluteY, 3, 4),
    /* 0x5A */ INVALID,
    /* 0x5B */ INVALID,
    /* 0x5C */ INVALID,
    /* 0x5D */ entry(O::Eor, "EOR", M::AbsoluteX, 3, 4),
    /* 0x5E */ entry(O::Lsr, "LSR", M::AbsoluteX, 3, 7),
    /* 0x5F */ INVALID,
    /* 0x60 */ entry(O::Rts, "RTS", M::Implied, 1, 6),
    /* 0x61 */ entry(O::Adc, "ADC", M::IndirectX, 2, 6),
    /* 0x62 */ INVALID,
    /* 0x63 */ INVALID,
    /* 0x64 */ INVALID,
    /* 0x65 */ entry(O::Adc, "ADC", M::ZeroPage, 2, 3),
    /* 0x66 */ entry(O::Ror, "ROR", M::ZeroPage, 2, 5),
    /* 0x67 */ INVALID,
    /* 0x68 */ entry(O::Pla, "PLA", M::Implied, 1, 4),
    /* 0x69 */ entry(O::Adc, "ADC", M::Immediate, 2, 2),
    /* 0x6A */ entry(O::Ror, "ROR", M::Accumulator, 1, 2),
    /* 0x6B */ INVALID,
    /* 0x6C */ entry(O::Jmp, "JMP", M::Indirect, 3, 5),
    /* 0x6D */ entry(O::Adc, "ADC", M::Absolute, 3, 4),
    /* 0x6E */ entry(O::Ror, "ROR", M::Absolute, 3, 6),
    /* 0x6F */ INVALID,
    /* 0x70 */ entry(O::Bvs, "BVS", M::Relative, 2, 2),
    /* 0x71 */ entry(O::Adc, "ADC", M::IndirectY, 2, 5),
    /* 0x72 */ INVALID,
    /* 0x73 */ INVALID,
    /* 0x74 */ INVALID,
    /* 0x75 */ entry(O::Adc, "ADC", M::ZeroPageX, 2, 4),
    /* 0x76 */ entry(O::Ror, "ROR", M::ZeroPageX, 2, 6),
    /* 0x77 */ INVALID,
    /* 0x78 */ entry(O::Sei, "SEI", M::Implied, 1, 2),
    /* 0x79 */ entry(O::Adc, "ADC", M::AbsoluteY, 3, 4),
    /* 0x7A */ INVALID,
    /* 0x7B */ INVALID,
    /* 0x7C */ INVALID,
    /* 0x7D */ entry(O::Adc, "ADC", M::AbsoluteX, 3, 4),
    /* 0x7E */ entry(O::Ror, "ROR", M::AbsoluteX, 3, 7),
    /* 0x7F */ INVALID,
    /* 0x80 */ INVALID,
    /* 0x81 */ entry(O::Sta, "STA", M::IndirectX, 2, 6),
    /* 0x82 */ INVALID,
    /* 0x83 */ INVALID,
    /* 0x84 */ entry(O::Sty, "STY", M::ZeroPage, 2, 3),
    /* 0x85 */ entry(O::Sta, "STA", M::ZeroPage, 2, 3),
    /* 0x86 */ entry(O::Stx, "STX", M::ZeroPage, 2, 3),
    /* 0x87 */ INVALID,
    /* 0x88 */ entry(O::Dey, "DEY", M::Implied, 1, 2),
    /* 0x89 */ INVALID,
    /* 0x8A */ entry(O::Txa, "TXA", M::Implied, 1, 2),
    /* 0x8B */ INVALID,
    /* 0x8C */ entry(O::Sty, "STY", M::Absolute, 3, 4),
    /* 0x8D */ entry(O::Sta, "STA", M::Absolute, 3, 4),
    /* 0x8E */ entry(O::Stx, "STX", M::Absolute, 3, 4),
    /* 0x8F */ INVALID,
    /* 0x90 */ entry(O::Bcc, "BCC", M::Relative, 2, 2),
    /* 0x91 */ entry(O::Sta, "STA", M::IndirectY, 2, 6),
    /* 0x92 */ INVALID,
    /* 0x93 */ INVALID,
    /* 0x94 */ entry(O::Sty, "STY", M::ZeroPageX, 2, 4),
    /* 0x95 */ entry(O::Sta, "STA", M::ZeroPageX, 2, 4),
    /* 0x96 */ entry(O::Stx, "STX", M::ZeroPageY, 2, 4),
    /* 0x97 */ INVALID,
    /* 0x98 */ entry(O::Tya, "TYA", M::Implied, 1, 2),
    /* 0x99 */ entry(O::Sta, "STA", M::AbsoluteY, 3, 5),
    /* 0x9A */ entry(O::Txs, "TXS", M::Implied, 1, 2),
    /* 0x9B */ INVALID,
    /* 0x9C */ INVALID,
    /* 0x9D */ entry(O::Sta, "STA", M::AbsoluteX, 3, 5),
    /* 0x9E */ INVALID,
    /* 0x9F */ INVALID,
    /* 0xA0 */ entry(O::Ldy, "LDY", M::Immediate, 2, 2),
    /* 0xA1 */ entry(O::Lda, "LDA", M::IndirectX, 2, 6),
    /* 0xA2 */ entry(O::Ldx, "LDX", M::Immediate, 2, 2),
    /* 0xA3 */ INVALID,
    /* 0xA4 */ entry(O::Ldy, "LDY", M::ZeroPage, 2, 3),
    /* 0xA5 */ entry(O::Lda, "LDA", M::ZeroPage, 2, 3),
    /* 0xA6 */ entry(O::Ldx, "LDX", M::ZeroPage, 2, 3),
    /* 0xA7 */ INVALID,
    /* 0xA8 */ entry(O::Tay, "TAY", M::Implied, 1, 2),
    /* 0xA9 */ entry(O::Lda, "LDA", M::Immediate, 2, 2),
    /* 0xAA */ entry(O::Tax, "TAX", M::Implied, 1, 2),
    /* 0xAB */ INVALID,
    /* 0xAC */ entry(O::Ldy, "LDY", M::Absolute, 3, 4),
    /* 0xAD */ entry(O::Lda, "LDA", M::Absolute, 3, 4),
    /* 0xAE */ entry(O::Ldx, "LDX", M::Absolute, 3, 4),
    /* 0xAF */ INVALID,
    /* 0xB0 */ entry(O::Bcs, "BCS", M::Relative, 2, 2),
    /* 0xB1 */ entry(O::Lda, "LDA", M::IndirectY, 2, 5),
    /* 0xB2 */ INVALID,
    /* 0xB3 */ INVALID,
    /* 0xB4 */ entry(O::Ldy, "LDY", M::ZeroPageX, 2, 4),
    /* 0xB5 */ entry(O::Lda, "LDA", M::ZeroPageX, 2, 4),
    /* 0xB6 */ entry(O::Ldx, "LDX", M::ZeroPageY, 2, 4),
    /* 0xB7 */ INVALID,
    /* 0xB8 */ entry(O::Clv, "CLV", M::Implied, 1, 2),
    /* 0xB9 */ entry(O::Lda, "LDA", M::AbsoluteY, 3, 4),
    /* 0xBA */ entry(O::Tsx, "TSX", M::Implied, 1, 2),
    /* 0xBB */ INVALID,
    /* 0xBC */ entry(O::Ldy, "LDY", M::AbsoluteX, 3, 4),
    /* 0xBD */ entry(O::Lda, "LDA", M::AbsoluteX, 3, 4),
    /* 0xBE */ entry(O::Ldx, "LDX", M::AbsoluteY, 3, 4),
    /* 0xBF */ INVALID,
    /* 0xC0 */ entry(O::Cpy, "CPY", M::Immediate, 2, 2),
    /* 0xC1 */ entry(O::Cmp, "CMP", M::IndirectX, 2, 6),
    /* 0xC2 */ INVALID,
    /* 0xC3 */ INVALID,
    /* 0xC4 */ entry(O::Cpy, "CPY", M::ZeroPage, 2, 3),
    /* 0xC5 */ entry(O::Cmp, "CMP", M::ZeroPage, 2, 3),
    /* 0xC6 */ entry(O::Dec, "DEC", M::ZeroPage, 2, 5),
    /* 0xC7 */ INVALID,
    /* 0xC8 */ entry(O::Iny, "INY", M::Implied, 1, 2),
    /* 0xC9 */ entry(O::Cmp, "CMP", M::Immediate, 2, 2),
    /* 0xCA */ entry(O::Dex, "DEX", M::Implied, 1, 2),
    /* 0xCB */ INVALID,
    /* 0xCC */ entry(O::Cpy, "CPY", M::Absolute, 3, 4),
    /* 0xCD */ entry(O::Cmp, "CMP", M::Absolute, 3, 4),
    /* 0xCE */ entry(O::Dec, "DEC", M::Absolute, 3, 6),
    /* 0xCF */ INVALID,
    /* 0xD0 */ entry(O::Bne, "BNE", M::Relative, 2, 2),
    /* 0xD1 */ entry(O::Cmp, "CMP", M::IndirectY, 2, 5),
    /* 0xD2 */ INVALID,
    /* 0xD3 */ INVALID,
    /* 0xD4 */ INVALID,
    /* 0xD5 */ entry(O::Cmp, "CMP", M::ZeroPageX, 2, 4),
    /* 0xD6 */ entry(O::Dec, "DEC", M::ZeroPageX, 2, 6),
    /* 0xD7 */ INVALID,
    /* 0xD8 */ entry(O::Cld, "CLD", M::Implied, 1, 2),
    /* 0xD9 */ entry(O::Cmp, "CMP", M::AbsoluteY, 3, 4),
    /* 0xDA */ INVALID,
    /* 0xDB */ INVALID,
    /* 0xDC */ INVALID,
    /* 0xDD */ entry(O::Cmp, "CMP", M::AbsoluteX, 3, 4),
    /* 0xDE */ entry(O::Dec, "DEC", M::AbsoluteX, 3, 7),
    /* 0xDF */ INVALID,
    /* 0xE0 */ entry(O::Cpx, "CPX", M::Immediate, 2, 2),
    /* 0xE1 */ entry(O::Sbc, "SBC", M::IndirectX, 2, 6),
    /* 0xE2 */ INVALID,
    /* 0xE3 */ INVALID,
    /* 0xE4 */ entry(O::Cpx, "CPX", M::ZeroPage, 2, 3),
    /* 0xE5 */ entry(O::Sbc, "SBC", M::ZeroPage, 2, 3),
    /* 0xE6 */ entry(O::Inc, "INC", M::ZeroPage, 2, 5),
    /* 0xE7 */ INVALID,
    /* 0xE8 */ entry(O::Inx, "INX", M::Implied, 1, 2),
    /* 0xE9 */ entry(O::Sbc, "SBC", M::Immediate, 2, 2),
    /* 0xEA */ entry(O::Nop, "NOP", M::Implied, 1, 2),
    /* 0xEB */ INVALID,
    /* 0xEC */ entry(O::Cpx, "CPX", M::Absolute, 3, 4),
    /* 0xED */ entry(O::Sbc, "SBC", M::Absolute, 3, 4),
    /* 0xEE */ entry(O::Inc, "INC", M::Absolute, 3, 6),
    /* 0xEF */ INVALID,
    /* 0xF0 */ entry(O::Beq, "BEQ", M::Relative, 2, 2),
    /* 0xF1 */ entry(O::Sbc, "SBC", M::IndirectY, 2, 5),
    /* 0xF2 */ INVALID,
    /* 0xF3 */ INVALID,
    /* 0xF4 */ INVALID,
    /* 0xF5 */ entry(O::Sbc, "SBC", M::ZeroPageX, 2, 4),
    /* 0xF6 */ entry(O::Inc, "INC", M::ZeroPageX, 2, 6),
    /* 0xF7 */ INVALID,
    /* 0xF8 */ entry(O::Sed, "SED", M::Implied, 1, 2),
    /* 0xF9 */ entry(O::Sbc, "SBC", M::AbsoluteY, 3, 4),
    /* 0xFA */ INVALID,
    /* 0xFB */ INVALID,
    /* 0xFC */ INVALID,
    /* 0xFD */ entry(O::Sbc, "SBC", M::AbsoluteX, 3, 4),
    /* 0xFE */ entry(O::Inc, "INC", M::AbsoluteX, 3, 7),
    /* 0xFF */ INVALID,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_opcode_count() {
        let valid = OPCODE_TABLE.iter().filter(|e| e.op != Operation::Invalid).count();
        assert_eq!(valid, 151);
    }

    #[test]
    fn invalid_entries_are_distinguishable() {
        let e = &OPCODE_TABLE[0x02];
        assert_eq!(e.op, Operation::Invalid);
        assert_eq!(e.size, 0);
        assert_eq!(e.cycles, 0);
    }

    #[test]
    fn sizes_match_addressing_modes() {
        for e in OPCODE_TABLE.iter() {
            let expected = match e.mode {
                M::Invalid => 0,
                M::Accumulator | M::Implied => 1,
                M::Immediate | M::Relative | M::ZeroPage | M::ZeroPageX | M::ZeroPageY
                | M::IndirectX | M::IndirectY => 2,
                M::Absolute | M::AbsoluteX | M::AbsoluteY | M::Indirect => 3,
            };
            assert_eq!(e.size, expected, "{}", e.name);
        }
    }

    #[test]
    fn spot_check_reference_entries() {
        let jsr = &OPCODE_TABLE[0x20];
        assert_eq!((jsr.op, jsr.mode, jsr.size, jsr.cycles), (Operation::Jsr, M::Absolute, 3, 6));
        let lda = &OPCODE_TABLE[0xB1];
        assert_eq!((lda.op, lda.mode, lda.size, lda.cycles), (Operation::Lda, M::IndirectY, 2, 5));
        let sta = &OPCODE_TABLE[0x99];
        assert_eq!((sta.op, sta.mode, sta.size, sta.cycles), (Operation::Sta, M::AbsoluteY, 3, 5));
    }
}
