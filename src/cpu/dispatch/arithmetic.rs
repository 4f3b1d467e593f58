/*!
arithmetic.rs - ADC / SBC opcode family.

```text
ADC: 69 65 75 6D 7D 79 61 71 72 67 77 6F 7F 63 73
SBC: E9 E5 F5 ED FD F9 E1 F1 F2 E7 F7 EF FF E3 F3
```

The flag math lives in `execute.rs`; these handlers only fetch the operand,
write the accumulator back at the current width and charge the extra
decimal-correction cycle when D is set.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{Operand, read_operand};
use crate::cpu::execute::{self, alu_cycle};
use crate::cpu::state::CpuState;

pub(crate) fn adc<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    let r = execute::adc::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>(), v);
    cpu.a.set::<WIDE>(r);
    alu_cycle(&cpu.p, bus);
}

pub(crate) fn sbc<const WIDE: bool, M: Operand>(cpu: &mut CpuState, bus: &mut Bus) {
    let v = read_operand::<WIDE, M>(cpu, bus);
    let r = execute::sbc::<WIDE>(&mut cpu.p, cpu.a.get::<WIDE>(), v);
    cpu.a.set::<WIDE>(r);
    alu_cycle(&cpu.p, bus);
}
