/*!
logical.rs - AND / ORA / EOR / BIT opcode family.

```text
AND: 29 25 35 2D 3D 39 21 31 32 27 37 2F 3F 23 33
ORA: 09 05 15 0D 1D 19 01 11 12 07 17 0F 1F 03 13
EOR: 49 45 55 4D 5D 59 41 51 52 47 57 4F 5F 43 53
BIT: 89 (immediate, Z only) 24 34 2C 3C
```
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Immediate, Operand, read_operand};
use crate::cpu::execute;
use crate::cpu::state::CpuState;

#[inline]
fn accumulate<const WIDE: bool, M: Operand>(
    cpu: &mut CpuState,
    bus: &mut Bus,
    op: impl FnOnce(u16, u16) -> u16,
) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    let r = op(cpu.a.get::<WIDE>(), v);
    cpu.a.set::<WIDE>(r);
    cpu.p.set_zn::<WIDE>(r);
}

pub(crate) fn and<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    accumulate::<WIDE, M>(cpu, bus, |a, v| a & v);
}

pub(crate) fn ora<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    accumulate::<WIDE, M>(cpu, bus, |a, v| a | v);
}

pub(crate) fn eor<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    accumulate::<WIDE, M>(cpu, bus, |a, v| a ^ v);
}

pub(crate) fn bit<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    execute::bit::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>(), v);
}

pub(crate) fn bit_immediate<const WIDE: bool>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, Immediate>(cpu, bus);
    execute::bit_immediate::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>(), v);
}
