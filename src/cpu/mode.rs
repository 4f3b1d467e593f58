/*!
mode.rs - CPU mode state machine.

The active opcode table is chosen from `e`, `m` and `x` alone:

```text
e = 1              -> Emulation
e = 0, x, m        -> (x ? 0 : 2) | (m ? 0 : 1)
```

so `X1M1` is the all-8-bit native mode and `X0M0` the all-16-bit one.
*/

use crate::cpu::regs::StatusFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CpuMode {
    /// 8-bit index, 8-bit accumulator (native).
    X1M1 = 0,
    /// 8-bit index, 16-bit accumulator (native).
    X1M0 = 1,
    /// 16-bit index, 8-bit accumulator (native).
    X0M1 = 2,
    /// 16-bit index, 16-bit accumulator (native).
    X0M0 = 3,
    /// 6502 emulation mode.
    Emulation = 4,
}

impl CpuMode {
    pub const COUNT: usize = 5;

    pub fn from_flags(p: &StatusFlags) -> Self {
        if p.e {
            return CpuMode::Emulation;
        }
        match (p.x, p.m) {
            (true, true) => CpuMode::X1M1,
            (true, false) => CpuMode::X1M0,
            (false, true) => CpuMode::X0M1,
            (false, false) => CpuMode::X0M0,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True when the accumulator operates on 16 bits.
    #[inline]
    pub const fn wide_accumulator(self) -> bool {
        matches!(self, CpuMode::X1M0 | CpuMode::X0M0)
    }

    /// True when X and Y operate on 16 bits.
    #[inline]
    pub const fn wide_index(self) -> bool {
        matches!(self, CpuMode::X0M1 | CpuMode::X0M0)
    }
}
