/*!
rmw.rs - Read-modify-write, shift and increment opcode family.

Memory targets (read, one internal cycle, write back):
    ASL: 06 16 0E 1E     LSR: 46 56 4E 5E
    ROL: 26 36 2E 3E     ROR: 66 76 6E 7E
    INC: E6 F6 EE FE     DEC: C6 D6 CE DE
    TSB: 04 0C           TRB: 14 1C

Register targets (one dummy program read):
    ASL A 0A, LSR A 4A, ROL A 2A, ROR A 6A, INC A 1A, DEC A 3A
    INX E8, INY C8, DEX CA, DEY 88

The memory cost is therefore 2 (or 4 at 16 bits) bus cycles plus one
internal cycle on top of the operand fetch.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Operand, read_at, write_at};
use crate::cpu::execute;
use crate::cpu::regs::StatusFlags;
use crate::cpu::state::CpuState;

#[inline]
fn modify<const WIDE: bool, M: Operand>(
    cpu: &mut CpuState,
    bus: &mut Bus,
    op: impl FnOnce(&mut StatusFlags, u16) -> u16,
) {
    let addr = M::address(cpu, bus);
    let v = read_at::<WIDE>(bus, addr);
    bus.idle(1);
    let r = op(&mut cpu.p, v);
    write_at::<WIDE>(bus, addr, r);
}

pub(crate) fn asl<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    modify::<WIDE, M>(cpu, bus, execute::asl::<WIDE>);
}

pub(crate) fn lsr<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    modify::<WIDE, M>(cpu, bus, execute::lsr::<WIDE>);
}

pub(crate) fn rol<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    modify::<WIDE, M>(cpu, bus, execute::rol::<WIDE>);
}

pub(crate) fn ror<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    modify::<WIDE, M>(cpu, bus, execute::ror::<WIDE>);
}

pub(crate) fn inc<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    modify::<WIDE, M>(cpu, bus, execute::inc::<WIDE>);
}

pub(crate) fn dec<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    modify::<WIDE, M>(cpu, bus, execute::dec::<WIDE>);
}

pub(crate) fn tsb<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let a = cpu.a.get::<WIDE>();
    modify::<WIDE, M>(cpu, bus, |p, v| execute::test_and_set::<WIDE>(p, a, v));
}

pub(crate) fn trb<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let a = cpu.a.get::<WIDE>();
    modify::<WIDE, M>(cpu, bus, |p, v| execute::test_and_reset::<WIDE>(p, a, v));
}

// ---------------------------------------------------------------------------
// Register targets
// ---------------------------------------------------------------------------

pub(crate) fn asl_a<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::asl::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>());
    cpu.a.set::<WIDE>(r);
}

pub(crate) fn lsr_a<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::lsr::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>());
    cpu.a.set::<WIDE>(r);
}

pub(crate) fn rol_a<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::rol::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>());
    cpu.a.set::<WIDE>(r);
}

pub(crate) fn ror_a<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::ror::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>());
    cpu.a.set::<WIDE>(r);
}

pub(crate) fn inc_a<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::inc::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>());
    cpu.a.set::<WIDE>(r);
}

pub(crate) fn dec_a<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::dec::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>());
    cpu.a.set::<WIDE>(r);
}

pub(crate) fn inx<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::inc::<WIDE>(&mut cpu.p, cpu.x.get::<WIDE>());
    cpu.x.set::<WIDE>(r);
}

pub(crate) fn iny<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::inc::<WIDE>(&mut cpu.p, cpu.y.get::<WIDE>());
    cpu.y.set::<WIDE>(r);
}

pub(crate) fn dex<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::dec::<WIDE>(&mut cpu.p, cpu.x.get::<WIDE>());
    cpu.x.set::<WIDE>(r);
}

pub(crate) fn dey<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    let r = execute::dec::<WIDE>(&mut cpu.p, cpu.y.get::<WIDE>());
    cpu.y.set::<WIDE>(r);
}
