//! 6502 CPU core.
//!
//! Table-driven fetch/decode/execute over the [6502](https://www.nesdev.org/wiki/CPU)
//! instruction set as it behaves on the 2A03 (decimal mode stored but inert).
//! Each [`CPU::step`] executes exactly one instruction: opcode fetch, decode
//! through [`OPCODE_TABLE`], addressing-mode resolution, fixed PC/cycle
//! advance, then operation execution. Cycle accounting includes the
//! page-crossing and branch penalties of real hardware.

use crate::bus::Bus;
use crate::cpu::flags::{
    FLAG_BREAK_HI, FLAG_BREAK_LO, FLAG_CARRY, FLAG_DECIMAL, FLAG_INTERRUPT_DISABLE, FLAG_NEGATIVE,
    FLAG_OVERFLOW, FLAG_ZERO,
};
use crate::cpu::opcodes::{AddrMode, OPCODE_TABLE, Operation};
use crate::trace::{TraceRecord, TraceSink};

/// Little-endian address pair holding the post-reset entry point.
pub const RESET_VECTOR: u16 = 0xFFFC;

const STACK_BASE: u16 = 0x0100;

/// Cost charged for an invalid opcode byte, which executes as a one-byte
/// no-op instead of wedging the instruction stream.
const INVALID_OPCODE_CYCLES: u64 = 2;

/// The processor: architectural registers, flag and cycle bookkeeping, and
/// the bus it fetches and stores through.
///
/// All 8-bit registers wrap modulo 256 and PC wraps modulo 65536 on every
/// mutation. `step` is synchronous and never fails; every opcode byte, valid
/// or not, produces a deterministic state transition.
pub struct CPU<B: Bus> {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    pub cycles: u64,
    pub bus: B,
    trace: Option<Box<dyn TraceSink>>,
}

/// Transient result of addressing-mode resolution; recomputed each step.
struct Resolved {
    addr: u16,
    operand: u16,
    page_crossed: bool,
}

fn page_differs(a: u16, b: u16) -> bool {
    (a & 0xFF00) != (b & 0xFF00)
}

impl<B: Bus> CPU<B> {
    pub fn new(bus: B) -> Self {
        Self::with_trace(bus, None)
    }

    /// Construct with an optional per-instruction trace sink.
    pub fn with_trace(bus: B, trace: Option<Box<dyn TraceSink>>) -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            pc: 0,
            status: 0,
            cycles: 0,
            bus,
            trace,
        }
    }

    /// Architecture power-on register pattern. PC is not touched; follow
    /// with [`CPU::reset`].
    pub fn power_on(&mut self) {
        self.status = FLAG_INTERRUPT_DISABLE | FLAG_BREAK_HI;
        self.a = 0;
        self.x = 0;
        self.y = 0;
        self.sp = 0xFD;
    }

    /// Load PC from the reset vector at `$FFFC/$FFFD` and zero the cycle
    /// counter.
    pub fn reset(&mut self) {
        self.pc = self.bus.read16(RESET_VECTOR);
        self.cycles = 0;
    }

    /// Force PC to a fixed entry point, bypassing the reset vector.
    /// Test/automation use only (conformance runs against reference logs).
    pub fn set_pc(&mut self, addr: u16) {
        self.pc = addr;
    }

    pub fn flag(&self, flag: u8) -> bool {
        self.status & flag != 0
    }

    pub fn set_flag(&mut self, flag: u8) {
        self.status |= flag;
    }

    pub fn clear_flag(&mut self, flag: u8) {
        self.status &= !flag;
    }

    fn set_flag_if(&mut self, flag: u8, cond: bool) {
        if cond {
            self.set_flag(flag);
        } else {
            self.clear_flag(flag);
        }
    }

    /// Execute exactly one instruction.
    pub fn step(&mut self) {
        let opcode = self.bus.read8(self.pc);
        let entry = &OPCODE_TABLE[opcode as usize];
        let resolved = self.resolve_operand(entry.mode);

        if let Some(sink) = self.trace.as_deref_mut() {
            sink.emit(&TraceRecord {
                pc: self.pc,
                opcode,
                operand: resolved.operand,
                size: entry.size,
                mnemonic: entry.name,
                a: self.a,
                x: self.x,
                y: self.y,
                p: self.status,
                sp: self.sp,
                cycles: self.cycles,
            });
        }

        if entry.op == Operation::Invalid {
            log::warn!("invalid opcode ${:02X} at ${:04X}", opcode, self.pc);
            self.pc = self.pc.wrapping_add(1);
            self.cycles += INVALID_OPCODE_CYCLES;
            return;
        }

        self.pc = self.pc.wrapping_add(entry.size);
        self.cycles += entry.cycles;
        if resolved.page_crossed {
            self.cycles += 1;
        }

        self.execute(entry.op, entry.mode, &resolved);
    }

    /// Compute the effective address and raw operand for `mode`, reading
    /// the bytes after the opcode at the current PC. `page_crossed` is set
    /// only on the modes that charge the extra cycle.
    fn resolve_operand(&mut self, mode: AddrMode) -> Resolved {
        let arg = self.pc.wrapping_add(1);
        let mut page_crossed = false;
        let (addr, operand) = match mode {
            AddrMode::Absolute => {
                let operand = self.bus.read16(arg);
                (operand, operand)
            }
            AddrMode::AbsoluteX => {
                let operand = self.bus.read16(arg);
                let addr = operand.wrapping_add(self.x as u16);
                page_crossed = page_differs(addr, operand);
                (addr, operand)
            }
            AddrMode::AbsoluteY => {
                let operand = self.bus.read16(arg);
                let addr = operand.wrapping_add(self.y as u16);
                page_crossed = page_differs(addr, operand);
                (addr, operand)
            }
            AddrMode::Immediate => (arg, self.bus.read8(arg) as u16),
            AddrMode::Indirect => {
                let operand = self.bus.read16(arg);
                (self.bus.read16(operand), operand)
            }
            AddrMode::IndirectX => {
                let operand = self.bus.read8(arg) as u16;
                let ptr = operand.wrapping_add(self.x as u16) & 0x00FF;
                (self.bus.read16_zeropage_wrap(ptr), operand)
            }
            AddrMode::IndirectY => {
                let operand = self.bus.read8(arg) as u16;
                let base = self.bus.read16_zeropage_wrap(operand);
                let addr = base.wrapping_add(self.y as u16);
                page_crossed = page_differs(addr, base);
                (addr, operand)
            }
            AddrMode::Relative | AddrMode::ZeroPage => {
                let operand = self.bus.read8(arg) as u16;
                (operand, operand)
            }
            AddrMode::ZeroPageX => {
                let operand = self.bus.read8(arg) as u16;
                (operand.wrapping_add(self.x as u16) & 0x00FF, operand)
            }
            AddrMode::ZeroPageY => {
                let operand = self.bus.read8(arg) as u16;
                (operand.wrapping_add(self.y as u16) & 0x00FF, operand)
            }
            AddrMode::Accumulator | AddrMode::Implied | AddrMode::Invalid => (0, 0),
        };
        Resolved { addr, operand, page_crossed }
    }

    fn execute(&mut self, op: Operation, mode: AddrMode, r: &Resolved) {
        let addr = r.addr;
        let acc = mode == AddrMode::Accumulator;
        let offset = r.addr as u8 as i8;
        match op {
            Operation::Adc => self.adc(addr),
            Operation::And => self.and(addr),
            Operation::Asl => self.asl(addr, acc),

            Operation::Bcc => self.bcc(offset),
            Operation::Bcs => self.bcs(offset),
            Operation::Beq => self.beq(offset),
            Operation::Bit => self.bit(addr),
            Operation::Bmi => self.bmi(offset),
            Operation::Bne => self.bne(offset),
            Operation::Bpl => self.bpl(offset),
            Operation::Bvc => self.bvc(offset),
            Operation::Bvs => self.bvs(offset),

            Operation::Clc => self.clear_flag(FLAG_CARRY),
            Operation::Cld => self.clear_flag(FLAG_DECIMAL),
            Operation::Cli => self.clear_flag(FLAG_INTERRUPT_DISABLE),
            Operation::Clv => self.clear_flag(FLAG_OVERFLOW),
            Operation::Cmp => self.cmp(addr),
            Operation::Cpx => self.cpx(addr),
            Operation::Cpy => self.cpy(addr),

            Operation::Dec => self.dec(addr),
            Operation::Dex => self.dex(),
            Operation::Dey => self.dey(),

            Operation::Eor => self.eor(addr),

            Operation::Inc => self.inc(addr),
            Operation::Inx => self.inx(),
            Operation::Iny => self.iny(),

            Operation::Jmp => self.jmp(addr),
            Operation::Jsr => self.jsr(addr),

            Operation::Lda => self.lda(addr),
            Operation::Ldx => self.ldx(addr),
            Operation::Ldy => self.ldy(addr),
            Operation::Lsr => self.lsr(addr, acc),

            Operation::Ora => self.ora(addr),

            Operation::Pha => self.pha(),
            Operation::Php => self.php(),
            Operation::Pla => self.pla(),
            Operation::Plp => self.plp(),

            Operation::Rol => self.rol(addr, acc),
            Operation::Ror => self.ror(addr, acc),
            Operation::Rti => self.rti(),
            Operation::Rts => self.rts(),

            Operation::Sbc => self.sbc(addr),
            Operation::Sec => self.set_flag(FLAG_CARRY),
            Operation::Sed => self.set_flag(FLAG_DECIMAL),
            Operation::Sei => self.set_flag(FLAG_INTERRUPT_DISABLE),
            Operation::Sta => self.sta(addr),
            Operation::Stx => self.stx(addr),
            Operation::Sty => self.sty(addr),

            Operation::Tax => self.tax(),
            Operation::Tay => self.tay(),
            Operation::Tsx => self.tsx(),
            Operation::Txa => self.txa(),
            Operation::Txs => self.txs(),
            Operation::Tya => self.tya(),

            // BRK keeps its table cost; interrupt delivery beyond the reset
            // vector is out of scope. Invalid never reaches here: step()
            // short-circuits it before the PC advance.
            Operation::Nop | Operation::Brk | Operation::Invalid => {}
        }
    }

    pub(crate) fn push8(&mut self, val: u8) {
        self.bus.write8(STACK_BASE + self.sp as u16, val);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub(crate) fn pop8(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        self.bus.read8(STACK_BASE + self.sp as u16)
    }

    // High byte first, so the pair reads back little-endian from the stack
    pub(crate) fn push16(&mut self, val: u16) {
        self.push8((val >> 8) as u8);
        self.push8(val as u8);
    }

    pub(crate) fn pop16(&mut self) -> u16 {
        let lo = self.pop8() as u16;
        let hi = self.pop8() as u16;
        (hi << 8) | lo
    }

    fn update_zero_and_negative_flags(&mut self, val: u8) {
        self.set_flag_if(FLAG_ZERO, val == 0);
        self.set_flag_if(FLAG_NEGATIVE, val & 0x80 != 0);
    }

    /// Shared ADC/SBC datapath. Overflow iff the carry into bit 7 differs
    /// from the carry out of bit 7.
    fn add_with_carry(&mut self, val: u8) {
        let carry_in = self.flag(FLAG_CARRY) as u16;
        let sum = self.a as u16 + val as u16 + carry_in;
        let bit7_carry = ((self.a & 0x7F) as u16 + (val & 0x7F) as u16 + carry_in) & 0x80 != 0;
        let carry_out = sum > 0xFF;

        self.a = sum as u8;
        self.update_zero_and_negative_flags(self.a);
        self.set_flag_if(FLAG_CARRY, carry_out);
        self.set_flag_if(FLAG_OVERFLOW, bit7_carry != carry_out);
    }

    fn compare(&mut self, reg: u8, val: u8) {
        let diff = reg.wrapping_sub(val);
        self.update_zero_and_negative_flags(diff);
        self.set_flag_if(FLAG_CARRY, reg >= val);
    }

    /// Taken branches cost one extra cycle, two if the target sits on a
    /// different page than the fall-through PC.
    fn branch(&mut self, offset: i8, cond: bool) {
        if cond {
            let old_pc = self.pc;
            self.pc = self.pc.wrapping_add(offset as u16);
            self.cycles += 1;
            if page_differs(self.pc, old_pc) {
                self.cycles += 1;
            }
        }
    }

    /// PLP/RTI flag restore: every bit from the stack except the two break
    /// bits, which keep their pre-pull values.
    fn pull_status(&mut self) {
        const BREAK_BITS: u8 = FLAG_BREAK_HI | FLAG_BREAK_LO;
        let val = self.pop8();
        self.status = (self.status & BREAK_BITS) | (val & !BREAK_BITS);
    }

    fn adc(&mut self, addr: u16) {
        let val = self.bus.read8(addr);
        self.add_with_carry(val);
    }

    // SBC is ADC of the operand's one's complement; same carry/overflow path
    fn sbc(&mut self, addr: u16) {
        let val = !self.bus.read8(addr);
        self.add_with_carry(val);
    }

    fn and(&mut self, addr: u16) {
        self.a &= self.bus.read8(addr);
        self.update_zero_and_negative_flags(self.a);
    }

    fn ora(&mut self, addr: u16) {
        self.a |= self.bus.read8(addr);
        self.update_zero_and_negative_flags(self.a);
    }

    fn eor(&mut self, addr: u16) {
        self.a ^= self.bus.read8(addr);
        self.update_zero_and_negative_flags(self.a);
    }

    fn asl(&mut self, addr: u16, acc: bool) {
        let val = if acc { self.a } else { self.bus.read8(addr) };
        self.set_flag_if(FLAG_CARRY, val & 0x80 != 0);
        let result = val << 1;
        if acc {
            self.a = result;
        } else {
            self.bus.write8(addr, result);
        }
        self.update_zero_and_negative_flags(result);
    }

    fn lsr(&mut self, addr: u16, acc: bool) {
        let val = if acc { self.a } else { self.bus.read8(addr) };
        self.set_flag_if(FLAG_CARRY, val & 0x01 != 0);
        let result = val >> 1;
        if acc {
            self.a = result;
        } else {
            self.bus.write8(addr, result);
        }
        self.update_zero_and_negative_flags(result);
    }

    fn rol(&mut self, addr: u16, acc: bool) {
        let carry_in = self.flag(FLAG_CARRY) as u8;
        let val = if acc { self.a } else { self.bus.read8(addr) };
        self.set_flag_if(FLAG_CARRY, val & 0x80 != 0);
        let result = (val << 1) | carry_in;
        if acc {
            self.a = result;
        } else {
            self.bus.write8(addr, result);
        }
        self.update_zero_and_negative_flags(result);
    }

    fn ror(&mut self, addr: u16, acc: bool) {
        let carry_in = self.flag(FLAG_CARRY) as u8;
        let val = if acc { self.a } else { self.bus.read8(addr) };
        self.set_flag_if(FLAG_CARRY, val & 0x01 != 0);
        let result = (carry_in << 7) | (val >> 1);
        if acc {
            self.a = result;
        } else {
            self.bus.write8(addr, result);
        }
        self.update_zero_and_negative_flags(result);
    }

    fn bcc(&mut self, offset: i8) {
        let cond = !self.flag(FLAG_CARRY);
        self.branch(offset, cond);
    }

    fn bcs(&mut self, offset: i8) {
        let cond = self.flag(FLAG_CARRY);
        self.branch(offset, cond);
    }

    fn beq(&mut self, offset: i8) {
        let cond = self.flag(FLAG_ZERO);
        self.branch(offset, cond);
    }

    fn bne(&mut self, offset: i8) {
        let cond = !self.flag(FLAG_ZERO);
        self.branch(offset, cond);
    }

    fn bmi(&mut self, offset: i8) {
        let cond = self.flag(FLAG_NEGATIVE);
        self.branch(offset, cond);
    }

    fn bpl(&mut self, offset: i8) {
        let cond = !self.flag(FLAG_NEGATIVE);
        self.branch(offset, cond);
    }

    fn bvs(&mut self, offset: i8) {
        let cond = self.flag(FLAG_OVERFLOW);
        self.branch(offset, cond);
    }

    fn bvc(&mut self, offset: i8) {
        let cond = !self.flag(FLAG_OVERFLOW);
        self.branch(offset, cond);
    }

    /// N and V come from bits 7/6 of the unmodified memory operand; Z from
    /// the AND with A. Neither A nor memory changes.
    fn bit(&mut self, addr: u16) {
        let val = self.bus.read8(addr);
        self.set_flag_if(FLAG_NEGATIVE, val & 0x80 != 0);
        self.set_flag_if(FLAG_OVERFLOW, val & 0x40 != 0);
        self.set_flag_if(FLAG_ZERO, val & self.a == 0);
    }

    fn cmp(&mut self, addr: u16) {
        let val = self.bus.read8(addr);
        self.compare(self.a, val);
    }

    fn cpx(&mut self, addr: u16) {
        let val = self.bus.read8(addr);
        self.compare(self.x, val);
    }

    fn cpy(&mut self, addr: u16) {
        let val = self.bus.read8(addr);
        self.compare(self.y, val);
    }

    fn dec(&mut self, addr: u16) {
        let val = self.bus.read8(addr).wrapping_sub(1);
        self.bus.write8(addr, val);
        self.update_zero_and_negative_flags(val);
    }

    fn inc(&mut self, addr: u16) {
        let val = self.bus.read8(addr).wrapping_add(1);
        self.bus.write8(addr, val);
        self.update_zero_and_negative_flags(val);
    }

    fn dex(&mut self) {
        self.x = self.x.wrapping_sub(1);
        self.update_zero_and_negative_flags(self.x);
    }

    fn dey(&mut self) {
        self.y = self.y.wrapping_sub(1);
        self.update_zero_and_negative_flags(self.y);
    }

    fn inx(&mut self) {
        self.x = self.x.wrapping_add(1);
        self.update_zero_and_negative_flags(self.x);
    }

    fn iny(&mut self) {
        self.y = self.y.wrapping_add(1);
        self.update_zero_and_negative_flags(self.y);
    }

    fn jmp(&mut self, addr: u16) {
        self.pc = addr;
    }

    // The pushed return address is PC-1; RTS compensates with its +1
    fn jsr(&mut self, addr: u16) {
        self.push16(self.pc.wrapping_sub(1));
        self.pc = addr;
    }

    fn rts(&mut self) {
        self.pc = self.pop16().wrapping_add(1);
    }

    fn rti(&mut self) {
        self.pull_status();
        self.pc = self.pop16();
    }

    fn lda(&mut self, addr: u16) {
        self.a = self.bus.read8(addr);
        self.update_zero_and_negative_flags(self.a);
    }

    fn ldx(&mut self, addr: u16) {
        self.x = self.bus.read8(addr);
        self.update_zero_and_negative_flags(self.x);
    }

    fn ldy(&mut self, addr: u16) {
        self.y = self.bus.read8(addr);
        self.update_zero_and_negative_flags(self.y);
    }

    fn sta(&mut self, addr: u16) {
        self.bus.write8(addr, self.a);
    }

    fn stx(&mut self, addr: u16) {
        self.bus.write8(addr, self.x);
    }

    fn sty(&mut self, addr: u16) {
        self.bus.write8(addr, self.y);
    }

    fn pha(&mut self) {
        self.push8(self.a);
    }

    // The pushed copy always carries both break bits set
    fn php(&mut self) {
        self.push8(self.status | FLAG_BREAK_HI | FLAG_BREAK_LO);
    }

    fn pla(&mut self) {
        self.a = self.pop8();
        self.update_zero_and_negative_flags(self.a);
    }

    fn plp(&mut self) {
        self.pull_status();
    }

    fn tax(&mut self) {
        self.x = self.a;
        self.update_zero_and_negative_flags(self.x);
    }

    fn tay(&mut self) {
        self.y = self.a;
        self.update_zero_and_negative_flags(self.y);
    }

    fn tsx(&mut self) {
        self.x = self.sp;
        self.update_zero_and_negative_flags(self.x);
    }

    fn txa(&mut self) {
        self.a = self.x;
        self.update_zero_and_negative_flags(self.a);
    }

    // The only transfer with no flag effect
    fn txs(&mut self) {
        self.sp = self.x;
    }

    fn tya(&mut self) {
        self.a = self.y;
        self.update_zero_and_negative_flags(self.a);
    }
}
