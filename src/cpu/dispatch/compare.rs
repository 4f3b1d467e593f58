/*!
compare.rs - CMP / CPX / CPY opcode family.

```text
CMP: C9 C5 D5 CD DD D9 C1 D1 D2 C7 D7 CF DF C3 D3
CPX: E0 E4 EC
CPY: C0 C4 CC
```

CMP follows the accumulator width, CPX/CPY the index width.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Operand, read_operand};
use crate::cpu::execute::compare;
use crate::cpu::state::CpuState;

pub(crate) fn cmp<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    compare::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>(), v);
}

pub(crate) fn cpx<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    compare::<WIDE>(&mut cpu.p, cpu.x.get::<WIDE>(), v);
}

pub(crate) fn cpy<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    compare::<WIDE>(&mut cpu.p, cpu.y.get::<WIDE>(), v);
}
