/*!
misc.rs - Transfers, flag operations, mode switches and block moves.

Transfers:
  TAX AA, TAY A8, TXA 8A, TYA 98, TXY 9B, TYX BB, TSX BA, TXS 9A,
  TCS 1B, TSC 3B, TCD 5B, TDC 7B, XBA EB

Flag operations:
  CLC 18, SEC 38, CLI 58, SEI 78, CLD D8, SED F8, CLV B8,
  SEP E2, REP C2, XCE FB

Other:
  NOP EA, WDM 42, MVP 44, MVN 54

Widths
======
A transfer takes the width of its destination: TAX/TAY/TSX/TXY/TYX follow
the index width, TXA/TYA the accumulator width. TCS/TSC/TCD/TDC always
move 16 bits. TXS and TCS set no flags.

Every single-byte opcode here spends its second cycle on a dummy read of
the next program byte, except NOP which idles.
*/

use crate::bus::Bus;
use crate::cpu::regs::{
    ACCUM_8, CARRY, DECIMAL, INDEX_8, IRQ_DISABLE, NEGATIVE, OVERFLOW, ZERO,
};
use crate::cpu::state::CpuState;

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

pub(crate) fn tax<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let v = cpu.a.get::<WIDE>();
    cpu.x.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn tay<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let v = cpu.a.get::<WIDE>();
    cpu.y.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn txa<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let v = cpu.x.get::<WIDE>();
    cpu.a.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn tya<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let v = cpu.y.get::<WIDE>();
    cpu.a.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn txy<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let v = cpu.x.get::<WIDE>();
    cpu.y.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn tyx<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let v = cpu.y.get::<WIDE>();
    cpu.x.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn tsx<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let v = cpu.s.get::<WIDE>();
    cpu.x.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn txs<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let v = cpu.x.get::<WIDE>();
    cpu.s.set::<WIDE>(v);
}

/// TCS: in emulation only the low byte lands, S stays in page 1.
pub(crate) fn tcs(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.s.set_w(cpu.a.w());
    if cpu.p.e {
        cpu.s.set_h(0x01);
    }
}

pub(crate) fn tsc(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.a.set_w(cpu.s.w());
    cpu.p.set_zn16(cpu.a.w());
}

pub(crate) fn tcd(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.dp = cpu.a.w();
    cpu.p.set_zn16(cpu.dp);
}

pub(crate) fn tdc(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.a.set_w(cpu.dp);
    cpu.p.set_zn16(cpu.dp);
}

pub(crate) fn xba(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.a.set_w(cpu.a.w().rotate_left(8));
    cpu.p.set_zn8(cpu.a.l());
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

macro_rules! flag_op {
    ($name:ident, $flag:ident, $value:expr) => {
        pub(crate) fn $name(cpu: &mut CpuState, bus: &mut Bus) {
            cpu.dummy_read(bus);
            cpu.p.$flag = $value;
        }
    };
}

flag_op!(clc, c, false);
flag_op!(sec, c, true);
flag_op!(cli, i, false);
flag_op!(sei, i, true);
flag_op!(cld, d, false);
flag_op!(sed, d, true);
flag_op!(clv, v, false);

/// Apply SEP (`set = true`) or REP to the flags selected by `mask`.
fn change_flags(cpu: &mut CpuState, mask: u8, set: bool) {
    let p = &mut cpu.p;
    for (bit, flag) in [
        (CARRY, &mut p.c),
        (ZERO, &mut p.z),
        (IRQ_DISABLE, &mut p.i),
        (DECIMAL, &mut p.d),
        (OVERFLOW, &mut p.v),
        (NEGATIVE, &mut p.n),
    ] {
        if mask & bit != 0 {
            *flag = set;
        }
    }
    // Width flags are hard-wired to 1 in emulation mode.
    if !p.e {
        if mask & INDEX_8 != 0 {
            p.x = set;
        }
        if mask & ACCUM_8 != 0 {
            p.m = set;
        }
        cpu.update_mode();
    }
}

pub(crate) fn sep(cpu: &mut CpuState, bus: &mut Bus) {
    let mask = cpu.fetch_byte(bus);
    change_flags(cpu, mask, true);
}

pub(crate) fn rep(cpu: &mut CpuState, bus: &mut Bus) {
    let mask = cpu.fetch_byte(bus);
    change_flags(cpu, mask, false);
}

/// XCE: swap carry and emulation. Entering native mode (`c && !e` after
/// the swap) leaves both widths at 8 bits.
pub(crate) fn xce(cpu: &mut CpuState, bus: &mut Bus) {
    std::mem::swap(&mut cpu.p.c, &mut cpu.p.e);
    cpu.dummy_read(bus);
    if cpu.p.c && !cpu.p.e {
        cpu.p.x = true;
        cpu.p.m = true;
    }
    cpu.update_mode();
}

// ---------------------------------------------------------------------------
// NOP / WDM
// ---------------------------------------------------------------------------

pub(crate) fn nop(_cpu: &mut CpuState, bus: &mut Bus) {
    bus.idle(1);
}

/// WDM: reserved two-byte no-op. The signature byte is read through bank 0.
pub(crate) fn wdm(cpu: &mut CpuState, bus: &mut Bus) {
    bus.read(cpu.pc as u32);
    cpu.pc = cpu.pc.wrapping_add(1);
}

// ---------------------------------------------------------------------------
// Block moves
// ---------------------------------------------------------------------------

/// One byte of MVP/MVN. The opcode re-executes (PC backs up over it)
/// until A wraps past zero, so interrupts can land between bytes.
#[inline]
fn block_move<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus, step: u16) {
    cpu.dbr = (cpu.fetch_byte(bus) as u32) << 16;
    let src_bank = (cpu.fetch_byte(bus) as u32) << 16;
    let v = bus.read(src_bank | cpu.x.get::<WIDE>() as u32);
    bus.write(cpu.dbr | cpu.y.get::<WIDE>() as u32, v);
    let x = cpu.x.get::<WIDE>().wrapping_add(step);
    let y = cpu.y.get::<WIDE>().wrapping_add(step);
    cpu.x.set::<WIDE>(x);
    cpu.y.set::<WIDE>(y);
    cpu.a.set_w(cpu.a.w().wrapping_sub(1));
    if cpu.a.w() != 0xFFFF {
        cpu.pc = cpu.pc.wrapping_sub(3);
    }
    bus.idle(2);
}

pub(crate) fn mvp<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    block_move::<WIDE>(cpu, bus, 0xFFFF);
}

pub(crate) fn mvn<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    block_move::<WIDE>(cpu, bus, 1);
}
