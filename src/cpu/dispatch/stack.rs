/*!
stack.rs - Push / pull opcode family.

```text
PHA 48  PHX DA  PHY 5A  PHB 8B  PHK 4B  PHD 0B  PHP 08
PLA 68  PLX FA  PLY 7A  PLB AB  PLD 2B  PLP 28
PEA F4  PEI D4  PER 62
```

Stack Pointer Stepping
======================
Native handlers step the full 16-bit S. The `*_emu` variants used by the
emulation table step only the low byte, so the stack wraps inside page 1.
PEA, PEI, PER and PHD have no emulation variant and step the full S in
both modes, as does PLD.

Pulls spend one internal cycle before reading; PLP spends two.
*/

use crate::bus::Bus;
use crate::cpu::addressing::direct_indirect;
use crate::cpu::regs::{EMU_PUSH_BREAK, Reg16};
use crate::cpu::state::CpuState;

// ---------------------------------------------------------------------------
// Register pushes / pulls
// ---------------------------------------------------------------------------

#[inline]
fn push_reg<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus, r: Reg16) {
    cpu.dummy_read(bus);
    if WIDE {
        cpu.push_word(bus, r.w());
    } else {
        cpu.push(bus, r.l());
    }
}

#[inline]
fn pull_reg<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) -> u16 {
    cpu.dummy_read(bus);
    bus.idle(1);
    let v = if WIDE {
        cpu.pull_word(bus)
    } else {
        cpu.pull(bus) as u16
    };
    cpu.p.set_zn::<WIDE>(v);
    v
}

#[inline]
fn pull_reg_emu(cpu: &mut CpuState, bus: &mut Bus) -> u8 {
    cpu.dummy_read(bus);
    bus.idle(1);
    let v = cpu.pull_low(bus);
    cpu.p.set_zn8(v);
    v
}

pub(crate) fn pha<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    let a = cpu.a;
    push_reg::<WIDE>(cpu, bus, a);
}

pub(crate) fn phx<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    let x = cpu.x;
    push_reg::<WIDE>(cpu, bus, x);
}

pub(crate) fn phy<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    let y = cpu.y;
    push_reg::<WIDE>(cpu, bus, y);
}

pub(crate) fn pha_emu(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.push_low(bus, cpu.a.l());
}

pub(crate) fn phx_emu(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.push_low(bus, cpu.x.l());
}

pub(crate) fn phy_emu(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.push_low(bus, cpu.y.l());
}

pub(crate) fn pla<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = pull_reg::<WIDE>(cpu, bus);
    cpu.a.set::<WIDE>(v);
}

pub(crate) fn plx<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = pull_reg::<WIDE>(cpu, bus);
    cpu.x.set::<WIDE>(v);
}

pub(crate) fn ply<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = pull_reg::<WIDE>(cpu, bus);
    cpu.y.set::<WIDE>(v);
}

pub(crate) fn pla_emu(cpu: &mut CpuState, bus: &mut Bus) {
    let v = pull_reg_emu(cpu, bus);
    cpu.a.set_l(v);
}

pub(crate) fn plx_emu(cpu: &mut CpuState, bus: &mut Bus) {
    let v = pull_reg_emu(cpu, bus);
    cpu.x.set_l(v);
}

pub(crate) fn ply_emu(cpu: &mut CpuState, bus: &mut Bus) {
    let v = pull_reg_emu(cpu, bus);
    cpu.y.set_l(v);
}

// ---------------------------------------------------------------------------
// Bank and direct-page registers
// ---------------------------------------------------------------------------

pub(crate) fn phb(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.push(bus, (cpu.dbr >> 16) as u8);
}

pub(crate) fn phb_emu(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.push_low(bus, (cpu.dbr >> 16) as u8);
}

pub(crate) fn phk(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.push(bus, (cpu.pbr >> 16) as u8);
}

pub(crate) fn phk_emu(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.push_low(bus, (cpu.pbr >> 16) as u8);
}

pub(crate) fn plb(cpu: &mut CpuState, bus: &mut Bus) {
    let bank = pull_reg::<false>(cpu, bus);
    cpu.dbr = (bank as u32) << 16;
}

pub(crate) fn plb_emu(cpu: &mut CpuState, bus: &mut Bus) {
    let bank = pull_reg_emu(cpu, bus);
    cpu.dbr = (bank as u32) << 16;
}

pub(crate) fn phd(cpu: &mut CpuState, bus: &mut Bus) {
    let dp = cpu.dp;
    cpu.push_word(bus, dp);
}

pub(crate) fn pld(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dp = pull_reg::<true>(cpu, bus);
}

// ---------------------------------------------------------------------------
// Status register
// ---------------------------------------------------------------------------

pub(crate) fn php(cpu: &mut CpuState, bus: &mut Bus) {
    let p = cpu.p.pack_native();
    cpu.dummy_read(bus);
    cpu.push(bus, p);
}

pub(crate) fn php_emu(cpu: &mut CpuState, bus: &mut Bus) {
    let p = cpu.p.pack_emulation(EMU_PUSH_BREAK);
    cpu.dummy_read(bus);
    cpu.push_low(bus, p);
}

pub(crate) fn plp(cpu: &mut CpuState, bus: &mut Bus) {
    let p = cpu.pull(bus);
    cpu.p.unpack_native(p);
    bus.idle(2);
    cpu.update_mode();
}

pub(crate) fn plp_emu(cpu: &mut CpuState, bus: &mut Bus) {
    let p = cpu.pull_low(bus);
    cpu.p.unpack_emulation(p);
    bus.idle(2);
}

// ---------------------------------------------------------------------------
// Effective-address pushes
// ---------------------------------------------------------------------------

pub(crate) fn pea(cpu: &mut CpuState, bus: &mut Bus) {
    let v = cpu.fetch_word(bus);
    cpu.push_word(bus, v);
}

/// PEI (dp): pushes the 16-bit pointer found in the direct page.
pub(crate) fn pei(cpu: &mut CpuState, bus: &mut Bus) {
    let addr = direct_indirect(cpu, bus);
    cpu.push_word(bus, addr as u16);
}

/// PER: pushes PC + 16-bit displacement, relative to the next instruction.
pub(crate) fn per(cpu: &mut CpuState, bus: &mut Bus) {
    let disp = cpu.fetch_word(bus);
    let addr = cpu.pc.wrapping_add(disp);
    cpu.push_word(bus, addr);
}
