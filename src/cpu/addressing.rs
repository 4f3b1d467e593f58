/*!
addressing.rs - 65816 addressing-mode resolvers.

Each resolver consumes its operand bytes at `PBR|PC` (advancing PC) and
returns a complete effective address with the bank already applied.
Extra cycles the real chip spends recomputing an address are charged here,
through `Bus::idle`, so handlers never have to know about them.

Resolvers are exposed twice:
  - as free functions (`direct`, `absolute_x`, ...) for handlers that need
    an address directly (PEI, JMP forms, block moves);
  - as zero-sized types implementing `Operand`, so a handler can be written
    once as `lda::<WIDE, M>` and instantiated per addressing mode in the
    opcode tables.

Cycle Rules
===========
- Direct-page forms (direct, direct+X, direct+Y): +1 when DP's low byte is
  non-zero.
- Absolute indexed and emulation (dp),Y: +1 when the index crosses a page
  OR index registers are 16-bit (`!x`).
- Emulation (dp,X) wraps the pointer address in page zero, ignoring DP's
  high byte. Emulation (dp),Y with operand $FF takes the pointer's high
  byte from DP itself, not DP+$100.

Everything else is a plain composition; none of these can fail, the bus
masks whatever comes out.
*/

use crate::bus::Bus;
use crate::cpu::state::CpuState;

/// An addressing mode usable as a generic handler parameter.
pub(crate) trait Operand {
    /// Immediate operands are read inline; the operand helpers advance PC
    /// by the operand width after reading.
    const IMMEDIATE: bool = false;

    fn address(cpu: &mut CpuState, bus: &mut Bus) -> u32;
}

// ---------------------------------------------------------------------------
// Operand access helpers
// ---------------------------------------------------------------------------

/// Read an 8- or 16-bit value at `addr`.
#[inline]
pub(crate) fn read_at<const WIDE: bool>(bus: &mut Bus, addr: u32) -> u16 {
    if WIDE {
        bus.read_word(addr)
    } else {
        bus.read(addr) as u16
    }
}

/// Write an 8- or 16-bit value at `addr`.
#[inline]
pub(crate) fn write_at<const WIDE: bool>(bus: &mut Bus, addr: u32, v: u16) {
    if WIDE {
        bus.write_word(addr, v);
    } else {
        bus.write(addr, v as u8);
    }
}

/// Resolve `M` and read the operand it designates.
#[inline]
pub(crate) fn read_operand<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) -> u16 {
    let addr = M::address(cpu, bus);
    let v = read_at::<WIDE>(bus, addr);
    if M::IMMEDIATE {
        cpu.pc = cpu.pc.wrapping_add(if WIDE { 2 } else { 1 });
    }
    v
}

// ---------------------------------------------------------------------------
// Direct page / stack
// ---------------------------------------------------------------------------

#[inline]
fn direct_page_penalty(cpu: &CpuState, bus: &mut Bus) {
    if cpu.dp & 0xFF != 0 {
        bus.idle(1);
    }
}

pub(crate) fn direct(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch_byte(bus) as u32;
    direct_page_penalty(cpu, bus);
    (offset + cpu.dp as u32) & 0xFFFF
}

#[inline]
fn direct_indexed(cpu: &mut CpuState, bus: &mut Bus, index: u16) -> u32 {
    let mut addr = cpu.fetch_byte(bus) as u32 + index as u32;
    if cpu.p.e {
        addr &= 0xFF;
    }
    addr += cpu.dp as u32;
    direct_page_penalty(cpu, bus);
    addr & 0xFFFF
}

pub(crate) fn direct_x(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let x = cpu.x.w();
    direct_indexed(cpu, bus, x)
}

pub(crate) fn direct_y(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let y = cpu.y.w();
    direct_indexed(cpu, bus, y)
}

pub(crate) fn stack_relative(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch_byte(bus) as u32;
    (offset + cpu.s.w() as u32) & 0xFFFF
}

pub(crate) fn stack_relative_indirect_y(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let ptr = stack_relative(cpu, bus);
    let base = bus.read_word(ptr) as u32;
    base + cpu.y.w() as u32 + cpu.dbr
}

// ---------------------------------------------------------------------------
// Absolute
// ---------------------------------------------------------------------------

pub(crate) fn absolute(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    cpu.fetch_word(bus) as u32 | cpu.dbr
}

#[inline]
fn absolute_indexed(cpu: &mut CpuState, bus: &mut Bus, index: u16) -> u32 {
    let base = cpu.dbr + cpu.fetch_word(bus) as u32;
    let addr = base + index as u32;
    if !cpu.p.x || (base ^ addr) & 0xFF_FF00 != 0 {
        bus.idle(1);
    }
    addr
}

pub(crate) fn absolute_x(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let x = cpu.x.w();
    absolute_indexed(cpu, bus, x)
}

pub(crate) fn absolute_y(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let y = cpu.y.w();
    absolute_indexed(cpu, bus, y)
}

pub(crate) fn absolute_long(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch_word(bus) as u32;
    let bank = cpu.fetch_byte(bus) as u32;
    offset | (bank << 16)
}

pub(crate) fn absolute_long_x(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch_word(bus) as u32;
    let bank = cpu.fetch_byte(bus) as u32;
    (offset + cpu.x.w() as u32) + (bank << 16)
}

// ---------------------------------------------------------------------------
// Direct-page indirect
// ---------------------------------------------------------------------------

/// Direct-page pointer location for the indirect forms (no DP penalty).
#[inline]
fn pointer_address(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch_byte(bus) as u32;
    (offset + cpu.dp as u32) & 0xFFFF
}

pub(crate) fn direct_indirect(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let ptr = pointer_address(cpu, bus);
    bus.read_word(ptr) as u32 + cpu.dbr
}

pub(crate) fn direct_indirect_x(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch_byte(bus) as u32;
    let ptr = (offset + cpu.dp as u32 + cpu.x.w() as u32) & 0xFFFF;
    bus.read_word(ptr) as u32 + cpu.dbr
}

/// (dp,X) in emulation mode: the pointer address wraps within page zero.
pub(crate) fn direct_indirect_x_emu(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch_byte(bus) as u32;
    let ptr = (offset + cpu.dp as u32 + cpu.x.l() as u32) & 0xFF;
    bus.read_word(ptr) as u32 + cpu.dbr
}

pub(crate) fn direct_indirect_y(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let ptr = pointer_address(cpu, bus);
    bus.read_word(ptr) as u32 + cpu.y.w() as u32 + cpu.dbr
}

/// (dp),Y in emulation mode, including the 6502 pointer wrap at $FF.
pub(crate) fn direct_indirect_y_emu(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let offset = cpu.fetch_byte(bus);
    let dp = cpu.dp as u32;
    let ptr = if offset == 0xFF {
        let lo = bus.read((dp + 0xFF) & 0xFFFF) as u32;
        let hi = bus.read(dp) as u32;
        lo | (hi << 8)
    } else {
        bus.read_word((dp + offset as u32) & 0xFFFF) as u32
    };
    let base = ptr + cpu.dbr;
    let addr = base + cpu.y.w() as u32;
    if !cpu.p.x || (base ^ addr) & 0xFF_FF00 != 0 {
        bus.idle(1);
    }
    addr & 0xFFFF
}

pub(crate) fn direct_indirect_long(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let ptr = pointer_address(cpu, bus);
    let offset = bus.read_word(ptr) as u32;
    let bank = bus.read(ptr + 2) as u32;
    offset | (bank << 16)
}

pub(crate) fn direct_indirect_long_y(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    direct_indirect_long(cpu, bus) + cpu.y.w() as u32
}

// ---------------------------------------------------------------------------
// Operand types
// ---------------------------------------------------------------------------

macro_rules! operand_modes {
    ($($(#[$doc:meta])* $name:ident => $resolve:ident;)*) => {
        $(
            $(#[$doc])*
            pub(crate) struct $name;

            impl Operand for $name {
                #[inline]
                fn address(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
                    $resolve(cpu, bus)
                }
            }
        )*
    };
}

/// `#imm`
pub(crate) struct Immediate;

impl Operand for Immediate {
    const IMMEDIATE: bool = true;

    #[inline]
    fn address(cpu: &mut CpuState, _bus: &mut Bus) -> u32 {
        cpu.program_address()
    }
}

operand_modes! {
    /// `dp`
    Direct => direct;
    /// `dp,X`
    DirectX => direct_x;
    /// `dp,Y`
    DirectY => direct_y;
    /// `sr,S`
    StackRelative => stack_relative;
    /// `(sr,S),Y`
    StackRelativeIndirectY => stack_relative_indirect_y;
    /// `abs`
    Absolute => absolute;
    /// `abs,X`
    AbsoluteX => absolute_x;
    /// `abs,Y`
    AbsoluteY => absolute_y;
    /// `long`
    AbsoluteLong => absolute_long;
    /// `long,X`
    AbsoluteLongX => absolute_long_x;
    /// `(dp)`
    DirectIndirect => direct_indirect;
    /// `(dp,X)`
    DirectIndirectX => direct_indirect_x;
    /// `(dp,X)` in emulation mode
    DirectIndirectXEmu => direct_indirect_x_emu;
    /// `(dp),Y`
    DirectIndirectY => direct_indirect_y;
    /// `(dp),Y` in emulation mode
    DirectIndirectYEmu => direct_indirect_y_emu;
    /// `[dp]`
    DirectIndirectLong => direct_indirect_long;
    /// `[dp],Y`
    DirectIndirectLongY => direct_indirect_long_y;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_bus;

    /// State running from RAM at $0200 with the given operand bytes.
    fn setup(operands: &[u8]) -> (CpuState, Bus) {
        let mut bus = test_bus(&[]);
        for (i, b) in operands.iter().enumerate() {
            bus.poke(0x0200 + i as u32, *b);
        }
        let mut cpu = CpuState::new(0);
        cpu.pc = 0x0200;
        (cpu, bus)
    }

    #[test]
    fn direct_charges_for_unaligned_dp() {
        let (mut cpu, mut bus) = setup(&[0x10]);
        bus.set_cycles(0);
        assert_eq!(direct(&mut cpu, &mut bus), 0x0010);
        assert_eq!(bus.cycles(), -1);

        let (mut cpu, mut bus) = setup(&[0x10]);
        cpu.dp = 0x0101;
        bus.set_cycles(0);
        assert_eq!(direct(&mut cpu, &mut bus), 0x0111);
        assert_eq!(bus.cycles(), -2);
        assert_eq!(cpu.pc, 0x0201);
    }

    #[test]
    fn direct_x_wraps_in_page_zero_only_in_emulation() {
        let (mut cpu, mut bus) = setup(&[0xF0]);
        cpu.p.e = true;
        cpu.x.set_w(0x20);
        cpu.dp = 0x1000;
        assert_eq!(direct_x(&mut cpu, &mut bus), 0x1010);

        let (mut cpu, mut bus) = setup(&[0xF0]);
        cpu.p.e = false;
        cpu.x.set_w(0x20);
        cpu.dp = 0x1000;
        assert_eq!(direct_x(&mut cpu, &mut bus), 0x1110);
    }

    #[test]
    fn direct_wraps_at_bank_zero_end() {
        let (mut cpu, mut bus) = setup(&[0x20]);
        cpu.dp = 0xFFF0;
        assert_eq!(direct(&mut cpu, &mut bus), 0x0010);
    }

    #[test]
    fn absolute_applies_data_bank() {
        let (mut cpu, mut bus) = setup(&[0x34, 0x12]);
        cpu.dbr = 0x05_0000;
        assert_eq!(absolute(&mut cpu, &mut bus), 0x05_1234);
        assert_eq!(cpu.pc, 0x0202);
    }

    #[test]
    fn absolute_x_page_cross_rule() {
        // 8-bit index, no crossing: no penalty.
        let (mut cpu, mut bus) = setup(&[0x00, 0x12]);
        cpu.p.x = true;
        cpu.x.set_w(0x10);
        bus.set_cycles(0);
        assert_eq!(absolute_x(&mut cpu, &mut bus), 0x1210);
        assert_eq!(bus.cycles(), -2);

        // 8-bit index, crossing: penalty.
        let (mut cpu, mut bus) = setup(&[0xF8, 0x12]);
        cpu.p.x = true;
        cpu.x.set_w(0x10);
        bus.set_cycles(0);
        assert_eq!(absolute_x(&mut cpu, &mut bus), 0x1308);
        assert_eq!(bus.cycles(), -3);

        // 16-bit index: always the penalty.
        let (mut cpu, mut bus) = setup(&[0x00, 0x12]);
        cpu.p.x = false;
        cpu.x.set_w(0x10);
        bus.set_cycles(0);
        absolute_x(&mut cpu, &mut bus);
        assert_eq!(bus.cycles(), -3);
    }

    #[test]
    fn absolute_y_carries_into_next_bank() {
        let (mut cpu, mut bus) = setup(&[0xFF, 0xFF]);
        cpu.p.x = false;
        cpu.dbr = 0x02_0000;
        cpu.y.set_w(0x0002);
        assert_eq!(absolute_y(&mut cpu, &mut bus), 0x03_0001);
    }

    #[test]
    fn long_forms_ignore_data_bank() {
        let (mut cpu, mut bus) = setup(&[0x00, 0x80, 0x07]);
        cpu.dbr = 0x05_0000;
        assert_eq!(absolute_long(&mut cpu, &mut bus), 0x07_8000);

        let (mut cpu, mut bus) = setup(&[0xFF, 0xFF, 0x01]);
        cpu.x.set_w(0x0001);
        assert_eq!(absolute_long_x(&mut cpu, &mut bus), 0x02_0000);
    }

    #[test]
    fn stack_relative_indirect_y_adds_y_and_bank() {
        let (mut cpu, mut bus) = setup(&[0x02]);
        cpu.s.set_w(0x01F0);
        bus.poke(0x01F2, 0x00);
        bus.poke(0x01F3, 0x30);
        cpu.y.set_w(0x0005);
        cpu.dbr = 0x01_0000;
        assert_eq!(stack_relative_indirect_y(&mut cpu, &mut bus), 0x01_3005);
    }

    #[test]
    fn indirect_forms_fetch_pointer_from_direct_page() {
        let (mut cpu, mut bus) = setup(&[0x10]);
        cpu.dp = 0x0300;
        bus.poke(0x0310, 0x78);
        bus.poke(0x0311, 0x56);
        bus.poke(0x0312, 0x04);
        cpu.dbr = 0x02_0000;
        assert_eq!(direct_indirect(&mut cpu, &mut bus), 0x02_5678);

        cpu.pc = 0x0200;
        cpu.y.set_w(0x0010);
        assert_eq!(direct_indirect_y(&mut cpu, &mut bus), 0x02_5688);

        cpu.pc = 0x0200;
        assert_eq!(direct_indirect_long(&mut cpu, &mut bus), 0x04_5678);

        cpu.pc = 0x0200;
        assert_eq!(direct_indirect_long_y(&mut cpu, &mut bus), 0x04_5688);
    }

    #[test]
    fn emulation_indirect_x_wraps_pointer_in_page_zero() {
        let (mut cpu, mut bus) = setup(&[0xFE]);
        cpu.x.set_w(0x03);
        bus.poke(0x0001, 0x00);
        bus.poke(0x0002, 0x40);
        assert_eq!(direct_indirect_x_emu(&mut cpu, &mut bus), 0x4000);

        let (mut cpu, mut bus) = setup(&[0xFE]);
        cpu.x.set_w(0x03);
        bus.poke(0x0101, 0x00);
        bus.poke(0x0102, 0x50);
        assert_eq!(direct_indirect_x(&mut cpu, &mut bus), 0x5000);
    }

    #[test]
    fn emulation_indirect_y_pointer_wraps_at_ff() {
        let (mut cpu, mut bus) = setup(&[0xFF]);
        cpu.p.e = true;
        cpu.p.x = true;
        cpu.dp = 0x0000;
        bus.poke(0x00FF, 0x34);
        bus.poke(0x0000, 0x12);
        bus.poke(0x0100, 0x99);
        cpu.y.set_w(0x0001);
        assert_eq!(direct_indirect_y_emu(&mut cpu, &mut bus), 0x1235);
    }

    #[test]
    fn emulation_indirect_y_drops_bank_and_charges_crossing() {
        let (mut cpu, mut bus) = setup(&[0x10]);
        cpu.p.x = true;
        cpu.dbr = 0x03_0000;
        bus.poke(0x0010, 0xF0);
        bus.poke(0x0011, 0x20);
        cpu.y.set_w(0x20);
        bus.set_cycles(0);
        assert_eq!(direct_indirect_y_emu(&mut cpu, &mut bus), 0x2110);
        // operand fetch + pointer word + page-cross
        assert_eq!(bus.cycles(), -4);
    }

    #[test]
    fn immediate_operand_advances_by_width() {
        let (mut cpu, mut bus) = setup(&[0x34, 0x12]);
        assert_eq!(read_operand::<true, Immediate>(&mut cpu, &mut bus), 0x1234);
        assert_eq!(cpu.pc, 0x0202);

        let (mut cpu, mut bus) = setup(&[0x34, 0x12]);
        assert_eq!(read_operand::<false, Immediate>(&mut cpu, &mut bus), 0x34);
        assert_eq!(cpu.pc, 0x0201);
    }
}
