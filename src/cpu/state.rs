/*!
state.rs - Canonical 65816 architectural state and inline-friendly helpers.

Overview
========
`CpuState` owns every architecturally visible register plus the little
bit of execution control the core needs (WAI latch, diagnostics
counters, the active opcode-table selector). It excludes:
  - Memory decode (bus module)
  - Opcode semantics (dispatch / execute modules)

Banks
=====
`pbr` and `dbr` are stored pre-shifted (`bank << 16`) so effective
addresses are composed with a single OR (`pbr | pc`). The 16-bit offset
and the bank wrap independently, which several addressing quirks rely on.

Mode Selector
=============
`ops` points at one of the five static opcode tables. It changes only in
`update_mode`, which must run after anything that can touch `e`, `m` or
`x` (XCE, SEP, REP, PLP, RTI, reset, register writes).

Stack Helpers
=============
Two push/pull flavours exist because the chip uses both in emulation mode:
  - `push` / `pull` step the full 16-bit S.
  - `push_low` / `pull_low` step only S's low byte, wrapping inside the
    current stack page.
*/

use crate::bus::Bus;
use crate::cpu::mode::CpuMode;
use crate::cpu::regs::{Reg16, StatusFlags};
use crate::cpu::table::{OPCODE_TABLES, OpHandler, OpTable};

/// Emulation-mode reset / IRQ-BRK / NMI / COP vectors (bank 0).
pub const VECTOR_RESET: u32 = 0xFFFC;
pub const VECTOR_EMU_IRQ: u32 = 0xFFFE;
pub const VECTOR_EMU_NMI: u32 = 0xFFFA;
pub const VECTOR_EMU_COP: u32 = 0xFFF4;

/// Native-mode vectors (offsets within the native vector bank).
pub const VECTOR_NATIVE_IRQ: u32 = 0xFFEE;
pub const VECTOR_NATIVE_NMI: u32 = 0xFFEA;
pub const VECTOR_NATIVE_BRK: u32 = 0xFFE6;
pub const VECTOR_NATIVE_COP: u32 = 0xFFE4;

/// Stack pointer after reset.
pub const STACK_RESET: u16 = 0x01FF;

#[derive(Clone)]
pub struct CpuState {
    pub a: Reg16,
    pub x: Reg16,
    pub y: Reg16,
    pub s: Reg16,
    pub pc: u16,
    /// Program bank, pre-shifted.
    pub pbr: u32,
    /// Data bank, pre-shifted.
    pub dbr: u32,
    pub dp: u16,
    pub p: StatusFlags,

    /// Set by WAI until an interrupt is taken.
    pub waiting: bool,
    /// Set by STP; only reset clears it.
    pub stopped: bool,
    /// Bank holding the native-mode vectors, pre-shifted.
    pub native_vector_bank: u32,

    /// Instructions executed since power-on.
    pub instructions: u64,
    /// PC of the most recently fetched opcode.
    pub last_pc: u16,

    mode: CpuMode,
    ops: &'static OpTable,
}

impl CpuState {
    /// Power-up state (registers cleared, emulation mode). Call `reset`
    /// with a bus to load the reset vector.
    pub fn new(native_vector_bank: u8) -> Self {
        let p = StatusFlags {
            i: true,
            m: true,
            x: true,
            e: true,
            ..Default::default()
        };
        Self {
            a: Reg16::default(),
            x: Reg16::default(),
            y: Reg16::default(),
            s: Reg16::new(STACK_RESET),
            pc: 0,
            pbr: 0,
            dbr: 0,
            dp: 0,
            p,
            waiting: false,
            stopped: false,
            native_vector_bank: (native_vector_bank as u32) << 16,
            instructions: 0,
            last_pc: 0,
            mode: CpuMode::Emulation,
            ops: &OPCODE_TABLES[CpuMode::Emulation.index()],
        }
    }

    /// Hardware reset: emulation mode, 8-bit widths, IRQs masked, decimal
    /// clear, S=$01FF, PC from the reset vector. Clears the cycle counter.
    pub fn reset(&mut self, bus: &mut Bus) {
        bus.reset_banking();
        self.pbr = 0;
        self.dbr = 0;
        self.dp = 0;
        self.s.set_w(STACK_RESET);
        self.a.set_w(0);
        self.x.set_w(0);
        self.y.set_w(0);
        self.p.e = true;
        self.p.i = true;
        self.p.d = false;
        self.p.m = true;
        self.p.x = true;
        self.waiting = false;
        self.stopped = false;
        self.update_mode();
        self.pc = bus.read_word(VECTOR_RESET);
        bus.set_cycles(0);
        log::info!("65816 reset, PC={:04X}", self.pc);
    }

    /// Re-derive the CPU mode from `e`, `m` and `x` and switch tables.
    ///
    /// 8-bit index widths (or emulation) zero the high bytes of X and Y;
    /// emulation also pins S to page 1.
    pub fn update_mode(&mut self) {
        self.mode = CpuMode::from_flags(&self.p);
        self.ops = &OPCODE_TABLES[self.mode.index()];
        if self.p.e || self.p.x {
            self.x.set_h(0);
            self.y.set_h(0);
        }
        if self.p.e {
            self.s.set_h(0x01);
        }
    }

    #[inline]
    pub fn mode(&self) -> CpuMode {
        self.mode
    }

    #[inline]
    pub(crate) fn handler(&self, opcode: u8) -> OpHandler {
        self.ops[opcode as usize]
    }

    /// Current 24-bit program address (`PBR | PC`).
    #[inline]
    pub fn program_address(&self) -> u32 {
        self.pbr | self.pc as u32
    }

    // ---------------------------------------------------------------------
    // Instruction stream
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn fetch_byte(&mut self, bus: &mut Bus) -> u8 {
        let v = bus.read(self.program_address());
        self.pc = self.pc.wrapping_add(1);
        v
    }

    #[inline]
    pub(crate) fn fetch_word(&mut self, bus: &mut Bus) -> u16 {
        let v = bus.read_word(self.program_address());
        self.pc = self.pc.wrapping_add(2);
        v
    }

    /// Read of the next program byte without consuming it (one cycle).
    #[inline]
    pub(crate) fn dummy_read(&mut self, bus: &mut Bus) {
        bus.read(self.program_address());
    }

    // ---------------------------------------------------------------------
    // Stack
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn push(&mut self, bus: &mut Bus, v: u8) {
        bus.write(self.s.w() as u32, v);
        self.s.set_w(self.s.w().wrapping_sub(1));
    }

    #[inline]
    pub(crate) fn push_low(&mut self, bus: &mut Bus, v: u8) {
        bus.write(self.s.w() as u32, v);
        self.s.set_l(self.s.l().wrapping_sub(1));
    }

    #[inline]
    pub(crate) fn pull(&mut self, bus: &mut Bus) -> u8 {
        self.s.set_w(self.s.w().wrapping_add(1));
        bus.read(self.s.w() as u32)
    }

    #[inline]
    pub(crate) fn pull_low(&mut self, bus: &mut Bus) -> u8 {
        self.s.set_l(self.s.l().wrapping_add(1));
        bus.read(self.s.w() as u32)
    }

    /// Push a word high byte first (16-bit S).
    #[inline]
    pub(crate) fn push_word(&mut self, bus: &mut Bus, v: u16) {
        self.push(bus, (v >> 8) as u8);
        self.push(bus, v as u8);
    }

    /// Push a word high byte first, wrapping within the stack page.
    #[inline]
    pub(crate) fn push_word_low(&mut self, bus: &mut Bus, v: u16) {
        self.push_low(bus, (v >> 8) as u8);
        self.push_low(bus, v as u8);
    }

    /// Pull a word low byte first (16-bit S).
    #[inline]
    pub(crate) fn pull_word(&mut self, bus: &mut Bus) -> u16 {
        let lo = self.pull(bus) as u16;
        let hi = self.pull(bus) as u16;
        lo | (hi << 8)
    }

    /// Pull a word low byte first, wrapping within the stack page.
    #[inline]
    pub(crate) fn pull_word_low(&mut self, bus: &mut Bus) -> u16 {
        let lo = self.pull_low(bus) as u16;
        let hi = self.pull_low(bus) as u16;
        lo | (hi << 8)
    }
}

impl std::fmt::Debug for CpuState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuState")
            .field("a", &format_args!("{:04X}", self.a.w()))
            .field("x", &format_args!("{:04X}", self.x.w()))
            .field("y", &format_args!("{:04X}", self.y.w()))
            .field("s", &format_args!("{:04X}", self.s.w()))
            .field("pc", &format_args!("{:02X}:{:04X}", self.pbr >> 16, self.pc))
            .field("dbr", &format_args!("{:02X}", self.dbr >> 16))
            .field("dp", &format_args!("{:04X}", self.dp))
            .field("p", &format_args!("{}", self.p))
            .field("mode", &self.mode)
            .field("waiting", &self.waiting)
            .field("stopped", &self.stopped)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_bus;

    #[test]
    fn reset_loads_vector_and_forces_emulation() {
        let mut bus = test_bus(&[]);
        let mut cpu = CpuState::new(0);
        cpu.p.e = false;
        cpu.p.d = true;
        cpu.dp = 0x1234;
        cpu.update_mode();
        cpu.reset(&mut bus);
        assert_eq!(cpu.pc, 0x8000);
        assert_eq!(cpu.mode(), CpuMode::Emulation);
        assert!(cpu.p.e && cpu.p.i && cpu.p.m && cpu.p.x);
        assert!(!cpu.p.d);
        assert_eq!(cpu.s.w(), 0x01FF);
        assert_eq!(cpu.dp, 0);
        assert_eq!(bus.cycles(), 0);
    }

    #[test]
    fn update_mode_zeroes_index_high_bytes() {
        let mut cpu = CpuState::new(0);
        cpu.p.e = false;
        cpu.p.x = false;
        cpu.p.m = false;
        cpu.update_mode();
        cpu.x.set_w(0x1234);
        cpu.y.set_w(0xABCD);
        assert_eq!(cpu.mode(), CpuMode::X0M0);
        cpu.p.x = true;
        cpu.update_mode();
        assert_eq!(cpu.mode(), CpuMode::X1M0);
        assert_eq!(cpu.x.w(), 0x0034);
        assert_eq!(cpu.y.w(), 0x00CD);
    }

    #[test]
    fn emulation_pins_stack_page() {
        let mut cpu = CpuState::new(0);
        cpu.p.e = false;
        cpu.update_mode();
        cpu.s.set_w(0x0AF0);
        cpu.p.e = true;
        cpu.update_mode();
        assert_eq!(cpu.s.w(), 0x01F0);
    }

    #[test]
    fn push_low_wraps_inside_page() {
        let mut bus = test_bus(&[]);
        let mut cpu = CpuState::new(0);
        cpu.s.set_w(0x0100);
        cpu.push_low(&mut bus, 0x42);
        assert_eq!(cpu.s.w(), 0x01FF);
        assert_eq!(bus.peek(0x0100), 0x42);
        assert_eq!(cpu.pull_low(&mut bus), 0x42);
        assert_eq!(cpu.s.w(), 0x0100);
    }

    #[test]
    fn push_crosses_page_with_full_stack_pointer() {
        let mut bus = test_bus(&[]);
        let mut cpu = CpuState::new(0);
        cpu.s.set_w(0x0100);
        cpu.push_word(&mut bus, 0xBEEF);
        assert_eq!(cpu.s.w(), 0x00FE);
        assert_eq!(cpu.pull_word(&mut bus), 0xBEEF);
        assert_eq!(cpu.s.w(), 0x0100);
    }
}
