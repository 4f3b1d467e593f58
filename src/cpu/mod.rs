/*!
cpu - The 65816 core.

Layout
======
```text
regs.rs         Register and status-flag value types, `Register` names.
mode.rs         The five-state CPU mode machine.
state.rs        `CpuState`: architectural registers, stack and fetch helpers.
addressing.rs   Effective-address resolvers and the `Operand` mode types.
execute.rs      Flag-exact ALU primitives (binary/BCD add and subtract,
                compare, shifts, bit tests).
dispatch/       Opcode handlers by family, the per-instruction `step`
                and the NMI/IRQ entry sequences.
table.rs        The five compile-time opcode tables.
core/           `Cpu`, the owned façade over state and bus.
```

Hosts should only need `Cpu`, `Register` and `CpuMode`; everything else is
exposed for tests and tooling.
*/

pub mod addressing;
pub mod core;
pub mod dispatch;
pub mod execute;
pub mod mode;
pub mod regs;
pub mod state;
pub mod table;

pub use crate::cpu::core::Cpu;
pub use crate::cpu::mode::CpuMode;
pub use crate::cpu::regs::{Reg16, Register, StatusFlags};
pub use crate::cpu::state::CpuState;
