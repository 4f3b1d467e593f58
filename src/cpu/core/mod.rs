/*!
core::Cpu - The co-processor façade: `CpuState` plus the `Bus` it drives.

Overview
========
`Cpu` is the single owned object a host talks to. It bundles the
architectural state and the memory system so callers never have to
thread a bus through every call:

```text
let mut cpu = Cpu::new(rom, 0, Box::new(NullTube::default()));
let used = cpu.exec(8);
```

Entry Points
============
- `new`         install ROM, tube and native vector bank, then reset.
- `reset`       hardware reset (emulation mode, vector at $FFFC).
- `exec`        run until the cycle budget is spent or a tube register
                is written; returns the cycles actually consumed.
- `step`        exactly one instruction (plus any interrupt entry).
- `get_register` / `set_register`, `peek` / `poke` for debuggers.

`exec` may overshoot its budget by the tail of the last instruction; the
bus counter simply goes negative.
*/

use crate::bus::Bus;
use crate::cpu::dispatch;
use crate::cpu::regs::Register;
use crate::cpu::state::CpuState;
use crate::rom::RomImage;
use crate::tube::Tube;

#[derive(Debug)]
pub struct Cpu {
    state: CpuState,
    bus: Bus,
}

impl Cpu {
    /// Build a core around `rom` and `tube` and perform a reset.
    pub fn new(rom: RomImage, native_vector_bank: u8, tube: Box<dyn Tube>) -> Self {
        let mut cpu = Self {
            state: CpuState::new(native_vector_bank),
            bus: Bus::new(rom, tube),
        };
        cpu.reset();
        cpu
    }

    pub fn reset(&mut self) {
        self.state.reset(&mut self.bus);
    }

    /// Run for `budget` cycles. Returns the cycles consumed, which may
    /// exceed the budget by part of one instruction or be short of it
    /// when a tube register write ended the slice.
    pub fn exec(&mut self, budget: i32) -> i32 {
        self.bus.set_cycles(budget);
        while self.bus.cycles() > 0 {
            dispatch::step(&mut self.state, &mut self.bus);
            if self.bus.take_end_of_slice() {
                break;
            }
        }
        budget.saturating_sub(self.bus.cycles())
    }

    /// Execute one instruction and return the cycles it took.
    pub fn step(&mut self) -> i32 {
        let before = self.bus.cycles();
        dispatch::step(&mut self.state, &mut self.bus);
        self.bus.take_end_of_slice();
        before - self.bus.cycles()
    }

    pub fn state(&self) -> &CpuState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CpuState {
        &mut self.state
    }

    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }

    pub fn instructions(&self) -> u64 {
        self.state.instructions
    }

    // ---------------------------------------------------------------------
    // Debugger access
    // ---------------------------------------------------------------------

    /// Register value; banks are returned unshifted and P in native layout.
    pub fn get_register(&self, reg: Register) -> u32 {
        let s = &self.state;
        match reg {
            Register::A => s.a.w() as u32,
            Register::X => s.x.w() as u32,
            Register::Y => s.y.w() as u32,
            Register::S => s.s.w() as u32,
            Register::P => s.p.pack_native() as u32,
            Register::Pc => s.pc as u32,
            Register::Dp => s.dp as u32,
            Register::Db => s.dbr >> 16,
            Register::Pb => s.pbr >> 16,
        }
    }

    /// Overwrite a register. Mode-affecting writes re-select the opcode
    /// table; `e` is not part of P and is left alone.
    pub fn set_register(&mut self, reg: Register, value: u32) {
        let s = &mut self.state;
        match reg {
            Register::A => s.a.set_w(value as u16),
            Register::X => s.x.set_w(value as u16),
            Register::Y => s.y.set_w(value as u16),
            Register::S => s.s.set_w(value as u16),
            Register::P => s.p.unpack_native(value as u8),
            Register::Pc => s.pc = value as u16,
            Register::Dp => s.dp = value as u16,
            Register::Db => s.dbr = (value & 0xFF) << 16,
            Register::Pb => s.pbr = (value & 0xFF) << 16,
        }
        s.update_mode();
    }

    /// Untimed read through the normal address decoder.
    pub fn peek(&mut self, addr: u32) -> u8 {
        self.bus.peek(addr)
    }

    /// Untimed write through the normal address decoder.
    pub fn poke(&mut self, addr: u32, val: u8) {
        self.bus.poke(addr, val);
    }
}
