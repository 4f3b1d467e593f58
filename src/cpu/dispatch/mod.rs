/*!
dispatch - One instruction step plus the interrupt sequencer.

Overview
========
`step` is the whole inner loop body:
1. Note `last_pc`, fetch the opcode at `PBR|PC` (1 cycle), advance PC.
2. Call the handler from the active opcode table.
3. Sample the tube's control lines. A pending NMI is taken (and
   acknowledged) before IRQ; IRQ is taken only when unmasked. A masked
   IRQ leaves a WAI parked.

Interrupts are therefore only ever recognised on an instruction boundary:
a line raised by a handler's own bus traffic is seen after that handler
returns.

Families
========
```text
arithmetic    ADC / SBC
branches      Bcc, BRA, BRL
compare       CMP / CPX / CPY
control_flow  JMP, JSR/JSL, RTS/RTL/RTI, BRK/COP, WAI/STP
load_store    LDA/LDX/LDY, STA/STX/STY/STZ
logical       AND / ORA / EOR / BIT
misc          transfers, flag ops, XCE/SEP/REP, NOP/WDM, MVN/MVP
rmw           shifts, rotates, INC/DEC, TSB/TRB
stack         pushes and pulls, PEA/PEI/PER
```

Cycle Ticking
=============
Handlers never count cycles themselves; every bus access and idle call
debits the bus counter. The interrupt entry sequences below do the same.
*/

use crate::bus::Bus;
use crate::cpu::regs::{EMU_PUSH_BREAK, EMU_PUSH_IRQ};
use crate::cpu::state::{
    CpuState, VECTOR_EMU_IRQ, VECTOR_EMU_NMI, VECTOR_NATIVE_IRQ, VECTOR_NATIVE_NMI,
};
use crate::tube::{IRQ_BIT, NMI_BIT};

pub(crate) mod arithmetic;
pub(crate) mod branches;
pub(crate) mod compare;
pub(crate) mod control_flow;
pub(crate) mod load_store;
pub(crate) mod logical;
pub(crate) mod misc;
pub(crate) mod rmw;
pub(crate) mod stack;

/// Execute one instruction and service any interrupt raised by the lines.
pub(crate) fn step(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.last_pc = cpu.pc;
    let opcode = bus.read(cpu.program_address());
    log::trace!(
        "{:02X}:{:04X} {:02X}  {:?}",
        cpu.pbr >> 16,
        cpu.pc,
        opcode,
        cpu
    );
    cpu.pc = cpu.pc.wrapping_add(1);
    let handler = cpu.handler(opcode);
    handler(cpu, bus);
    cpu.instructions += 1;

    let lines = bus.irq_state();
    if lines & NMI_BIT != 0 {
        service_nmi(cpu, bus);
        bus.ack_nmi();
    } else if lines & IRQ_BIT != 0 && !cpu.p.i {
        service_irq(cpu, bus);
    }
}

/// Push the interrupt frame and load the vector. The caller has already
/// handled the WAI latch.
fn enter_interrupt(
    cpu: &mut CpuState,
    bus: &mut Bus,
    native_vector: u32,
    emu_vector: u32,
    emu_status_base: u8,
) {
    if cpu.p.e {
        let ret = cpu.pc;
        cpu.push_word_low(bus, ret);
        let p = cpu.p.pack_emulation(emu_status_base);
        cpu.push_low(bus, p);
        cpu.pc = bus.read_word(emu_vector);
    } else {
        cpu.push(bus, (cpu.pbr >> 16) as u8);
        let ret = cpu.pc;
        cpu.push_word(bus, ret);
        let p = cpu.p.pack_native();
        cpu.push(bus, p);
        cpu.pc = bus.read_word(cpu.native_vector_bank | native_vector);
    }
    cpu.pbr = 0;
    cpu.p.i = true;
    cpu.p.d = false;
}

pub(crate) fn service_nmi(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    bus.idle(1);
    if cpu.waiting {
        cpu.pc = cpu.pc.wrapping_add(1);
        cpu.waiting = false;
    }
    log::trace!("NMI at {:02X}:{:04X}", cpu.pbr >> 16, cpu.pc);
    enter_interrupt(cpu, bus, VECTOR_NATIVE_NMI, VECTOR_EMU_NMI, EMU_PUSH_BREAK);
}

pub(crate) fn service_irq(cpu: &mut CpuState, bus: &mut Bus) {
    cpu.dummy_read(bus);
    bus.idle(1);
    if cpu.waiting {
        cpu.pc = cpu.pc.wrapping_add(1);
        cpu.waiting = false;
    }
    log::trace!("IRQ at {:02X}:{:04X}", cpu.pbr >> 16, cpu.pc);
    enter_interrupt(cpu, bus, VECTOR_NATIVE_IRQ, VECTOR_EMU_IRQ, EMU_PUSH_IRQ);
}
