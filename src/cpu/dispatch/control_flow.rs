/*!
control_flow.rs - Jumps, calls, returns, software interrupts, WAI / STP.

Opcodes
=======
```text
JMP abs 4C, JMP long 5C, JMP (abs) 6C, JMP (abs,X) 7C, JML [abs] DC
JSR abs 20, JSR (abs,X) FC, JSL long 22
RTS 60, RTL 6B, RTI 40
BRK 00, COP 02
WAI CB, STP DB
```

Emulation Variants
==================
The emulation table swaps in `*_emu` handlers for the calls, returns and
software interrupts. They differ in how S moves: calls and returns step
only S's low byte (wrapping inside page 1), RTI pulls a 3-byte frame, and
BRK/COP push a 3-byte frame with the emulation status layout and vector
through bank 0.

Return Addresses
================
JSR/JSL push the address of their last operand byte (return - 1);
RTS/RTL add one after pulling. RTS/RTL spend three internal cycles.
*/

use crate::bus::Bus;
use crate::cpu::regs::{EMU_PUSH_BREAK, EMU_PUSH_COP};
use crate::cpu::state::{
    CpuState, VECTOR_EMU_COP, VECTOR_EMU_IRQ, VECTOR_NATIVE_BRK, VECTOR_NATIVE_COP,
};

// ---------------------------------------------------------------------------
// Jumps
// ---------------------------------------------------------------------------

pub(crate) fn jmp(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.pc = bus.read_word(cpu.program_address());
}

pub(crate) fn jmp_long(cpu: &mut CpuState, bus: &mut Bus) {
    let at = cpu.program_address();
    let offset = bus.read_word(at);
    let bank = bus.read(at + 2) as u32;
    cpu.pc = offset;
    cpu.pbr = bank << 16;
}

/// JMP (abs): the pointer always lives in bank 0.
pub(crate) fn jmp_indirect(cpu: &mut CpuState, bus: &mut Bus) {
    let ptr = bus.read_word(cpu.program_address()) as u32;
    cpu.pc = bus.read_word(ptr);
}

/// JMP (abs,X): the pointer lives in the program bank.
pub(crate) fn jmp_indirect_x(cpu: &mut CpuState, bus: &mut Bus) {
    let base = bus.read_word(cpu.program_address()) as u32;
    cpu.pc = bus.read_word(base + cpu.x.w() as u32 + cpu.pbr);
}

pub(crate) fn jml_indirect(cpu: &mut CpuState, bus: &mut Bus) {
    let ptr = bus.read_word(cpu.program_address()) as u32;
    cpu.pc = bus.read_word(ptr);
    cpu.pbr = (bus.read(ptr + 2) as u32) << 16;
}

// ---------------------------------------------------------------------------
// Calls
// ---------------------------------------------------------------------------

/// Target of JSR (abs,X): two operand bytes plus X, in the program bank.
fn jsr_indirect_x_target(cpu: &mut CpuState, bus: &mut Bus) -> u32 {
    let at = cpu.program_address();
    let lo = bus.read(at) as u32;
    let hi = bus.read(at + 1) as u32;
    cpu.pc = cpu.pc.wrapping_add(2);
    (lo | (hi << 8)) + cpu.x.w() as u32 + cpu.pbr
}

pub(crate) fn jsr(cpu: &mut CpuState, bus: &mut Bus) {
    let target = bus.read_word(cpu.program_address());
    cpu.pc = cpu.pc.wrapping_add(1);
    cpu.dummy_read(bus);
    let ret = cpu.pc;
    cpu.push_word(bus, ret);
    cpu.pc = target;
}

pub(crate) fn jsr_emu(cpu: &mut CpuState, bus: &mut Bus) {
    let target = bus.read_word(cpu.program_address());
    cpu.pc = cpu.pc.wrapping_add(1);
    cpu.dummy_read(bus);
    let ret = cpu.pc;
    cpu.push_word_low(bus, ret);
    cpu.pc = target;
}

pub(crate) fn jsr_indirect_x(cpu: &mut CpuState, bus: &mut Bus) {
    let ptr = jsr_indirect_x_target(cpu, bus);
    cpu.pc = cpu.pc.wrapping_sub(1);
    let ret = cpu.pc;
    cpu.push_word(bus, ret);
    cpu.pc = bus.read_word(ptr);
}

pub(crate) fn jsr_indirect_x_emu(cpu: &mut CpuState, bus: &mut Bus) {
    let ptr = jsr_indirect_x_target(cpu, bus);
    cpu.pc = cpu.pc.wrapping_sub(1);
    let ret = cpu.pc;
    cpu.push_word_low(bus, ret);
    cpu.pc = bus.read_word(ptr);
}

pub(crate) fn jsl(cpu: &mut CpuState, bus: &mut Bus) {
    let target = cpu.fetch_word(bus);
    let bank = bus.read(cpu.program_address());
    cpu.push(bus, (cpu.pbr >> 16) as u8);
    let ret = cpu.pc;
    cpu.push_word(bus, ret);
    cpu.pc = target;
    cpu.pbr = (bank as u32) << 16;
}

pub(crate) fn jsl_emu(cpu: &mut CpuState, bus: &mut Bus) {
    let target = cpu.fetch_word(bus);
    let bank = bus.read(cpu.program_address());
    cpu.push_low(bus, (cpu.pbr >> 16) as u8);
    let ret = cpu.pc;
    cpu.push_word_low(bus, ret);
    cpu.pc = target;
    cpu.pbr = (bank as u32) << 16;
}

// ---------------------------------------------------------------------------
// Returns
// ---------------------------------------------------------------------------

pub(crate) fn rts(cpu: &mut CpuState, bus: &mut Bus) {
    bus.idle(3);
    cpu.pc = bus.read_word(cpu.s.w() as u32 + 1);
    cpu.s.set_w(cpu.s.w().wrapping_add(2));
    cpu.pc = cpu.pc.wrapping_add(1);
}

pub(crate) fn rts_emu(cpu: &mut CpuState, bus: &mut Bus) {
    bus.idle(3);
    cpu.pc = cpu.pull_word_low(bus).wrapping_add(1);
}

pub(crate) fn rtl(cpu: &mut CpuState, bus: &mut Bus) {
    bus.idle(3);
    cpu.pc = bus.read_word(cpu.s.w() as u32 + 1);
    cpu.s.set_w(cpu.s.w().wrapping_add(2));
    cpu.pbr = (cpu.pull(bus) as u32) << 16;
    cpu.pc = cpu.pc.wrapping_add(1);
}

pub(crate) fn rtl_emu(cpu: &mut CpuState, bus: &mut Bus) {
    bus.idle(3);
    cpu.pc = cpu.pull_word_low(bus);
    cpu.pbr = (cpu.pull_low(bus) as u32) << 16;
    cpu.pc = cpu.pc.wrapping_add(1);
}

pub(crate) fn rti(cpu: &mut CpuState, bus: &mut Bus) {
    bus.idle(1);
    let p = cpu.pull(bus);
    cpu.p.unpack_native(p);
    cpu.pc = cpu.pull_word(bus);
    cpu.pbr = (cpu.pull(bus) as u32) << 16;
    cpu.update_mode();
}

pub(crate) fn rti_emu(cpu: &mut CpuState, bus: &mut Bus) {
    bus.idle(1);
    let p = cpu.pull_low(bus);
    cpu.p.unpack_emulation(p);
    cpu.pc = cpu.pull_word_low(bus);
    cpu.update_mode();
}

// ---------------------------------------------------------------------------
// Software interrupts
// ---------------------------------------------------------------------------

/// Native BRK/COP frame: PBR, PC, P with 16-bit S, vector from the native bank.
fn software_interrupt_native(cpu: &mut CpuState, bus: &mut Bus, vector: u32) {
    cpu.pc = cpu.pc.wrapping_add(1);
    cpu.push(bus, (cpu.pbr >> 16) as u8);
    let ret = cpu.pc;
    cpu.push_word(bus, ret);
    let p = cpu.p.pack_native();
    cpu.push(bus, p);
    cpu.pc = bus.read_word(cpu.native_vector_bank | vector);
    cpu.pbr = 0;
    cpu.p.i = true;
    cpu.p.d = false;
}

/// Emulation BRK/COP frame: PC and P (16-bit S steps), bank-0 vector.
fn software_interrupt_emu(cpu: &mut CpuState, bus: &mut Bus, vector: u32, status_base: u8) {
    cpu.pc = cpu.pc.wrapping_add(1);
    let ret = cpu.pc;
    cpu.push_word(bus, ret);
    let p = cpu.p.pack_emulation(status_base);
    cpu.push(bus, p);
    cpu.pc = bus.read_word(vector);
    cpu.pbr = 0;
    cpu.p.i = true;
    cpu.p.d = false;
}

pub(crate) fn brk(cpu: &mut CpuState, bus: &mut Bus) {
    software_interrupt_native(cpu, bus, VECTOR_NATIVE_BRK);
}

pub(crate) fn brk_emu(cpu: &mut CpuState, bus: &mut Bus) {
    software_interrupt_emu(cpu, bus, VECTOR_EMU_IRQ, EMU_PUSH_BREAK);
}

pub(crate) fn cop(cpu: &mut CpuState, bus: &mut Bus) {
    software_interrupt_native(cpu, bus, VECTOR_NATIVE_COP);
}

pub(crate) fn cop_emu(cpu: &mut CpuState, bus: &mut Bus) {
    software_interrupt_emu(cpu, bus, VECTOR_EMU_COP, EMU_PUSH_COP);
}

// ---------------------------------------------------------------------------
// WAI / STP
// ---------------------------------------------------------------------------

/// Park on the WAI opcode until an interrupt is serviced.
pub(crate) fn wai(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    cpu.waiting = true;
    cpu.pc = cpu.pc.wrapping_sub(1);
}

/// Cycles burned by each pass over STP.
pub const STP_CYCLES: i32 = 600;

/// Halt for good: there is no reset circuitry to restart the clock.
pub(crate) fn stp(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.pc = cpu.pc.wrapping_sub(1);
    bus.idle(STP_CYCLES);
    if !cpu.stopped {
        cpu.stopped = true;
        log::warn!("STP at {:02X}:{:04X}, processor halted", cpu.pbr >> 16, cpu.pc);
    }
}
