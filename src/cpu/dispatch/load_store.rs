/*!
load_store.rs - Load / store opcode family.

Loads (set Z/N):
    LDA: A9 A5 B5 AD BD B9 A1 B1 B2 A7 B7 AF BF A3 B3
    LDX: A2 A6 B6 AE BE
    LDY: A0 A4 B4 AC BC

Stores (no flags):
    STA: 85 95 8D 9D 99 81 91 92 87 97 8F 9F 83 93
    STX: 86 96 8E
    STY: 84 94 8C
    STZ: 64 74 9C 9E

Each handler is generic over the operating width and the addressing mode;
`table.rs` picks the width per CPU mode (accumulator ops follow `m`, index
ops follow `x`). Cycle costs come entirely from the bus accesses and the
resolver penalties.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Operand, read_operand, write_at};
use crate::cpu::state::CpuState;

pub(crate) fn lda<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    cpu.a.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn ldx<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    cpu.x.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn ldy<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    cpu.y.set::<WIDE>(v);
    cpu.p.set_zn::<WIDE>(v);
}

pub(crate) fn sta<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let addr = M::address(cpu, bus);
    write_at::<WIDE>(bus, addr, cpu.a.get::<WIDE>());
}

pub(crate) fn stx<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let addr = M::address(cpu, bus);
    write_at::<WIDE>(bus, addr, cpu.x.get::<WIDE>());
}

pub(crate) fn sty<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let addr = M::address(cpu, bus);
    write_at::<WIDE>(bus, addr, cpu.y.get::<WIDE>());
}

pub(crate) fn stz<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let addr = M::address(cpu, bus);
    write_at::<WIDE>(bus, addr, 0);
}
