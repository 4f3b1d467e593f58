/*!
branches.rs - Relative branch opcode family.

```text
BPL 10  BMI 30  BVC 50  BVS 70
BCC 90  BCS B0  BNE D0  BEQ F0
BRA 80  BRL 82 (16-bit displacement)
```

The displacement is added to the PC after the operand fetch and wraps
within the program bank. A taken branch costs one internal cycle; there is
no page-crossing penalty.
*/

use crate::bus::Bus;
use crate::cpu::state::CpuState;

#[inline]
fn branch_if(cpu: &mut CpuState, bus: &mut Bus, taken: bool) {
    let offset = cpu.fetch_byte(bus) as i8;
    if taken {
        cpu.pc = cpu.pc.wrapping_add_signed(offset as i16);
        bus.idle(1);
    }
}

pub(crate) fn bpl(cpu: &mut CpuState, bus: &mut Bus) {
    let taken = !cpu.p.n;
    branch_if(cpu, bus, taken);
}

pub(crate) fn bmi(cpu: &mut CpuState, bus: &mut Bus) {
    let taken = cpu.p.n;
    branch_if(cpu, bus, taken);
}

pub(crate) fn bvc(cpu: &mut CpuState, bus: &mut Bus) {
    let taken = !cpu.p.v;
    branch_if(cpu, bus, taken);
}

pub(crate) fn bvs(cpu: &mut CpuState, bus: &mut Bus) {
    let taken = cpu.p.v;
    branch_if(cpu, bus, taken);
}

pub(crate) fn bcc(cpu: &mut CpuState, bus: &mut Bus) {
    let taken = !cpu.p.c;
    branch_if(cpu, bus, taken);
}

pub(crate) fn bcs(cpu: &mut CpuState, bus: &mut Bus) {
    let taken = cpu.p.c;
    branch_if(cpu, bus, taken);
}

pub(crate) fn bne(cpu: &mut CpuState, bus: &mut Bus) {
    let taken = !cpu.p.z;
    branch_if(cpu, bus, taken);
}

pub(crate) fn beq(cpu: &mut CpuState, bus: &mut Bus) {
    let taken = cpu.p.z;
    branch_if(cpu, bus, taken);
}

pub(crate) fn bra(cpu: &mut CpuState, bus: &mut Bus) {
    branch_if(cpu, bus, true);
}

pub(crate) fn brl(cpu: &mut CpuState, bus: &mut Bus) {
    let offset = cpu.fetch_word(bus);
    cpu.pc = cpu.pc.wrapping_add(offset);
    bus.idle(1);
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{CpuTestExt, setup};

    #[test]
    fn taken_branch_costs_one_more_cycle() {
        // LDA #$00; BEQ +2; NOP; NOP
        let mut cpu = setup(&[0xA9, 0x00, 0xF0, 0x02, 0xEA, 0xEA]);
        cpu.step();
        assert_eq!(cpu.step(), 3);
        assert_eq!(cpu.state().pc, 0x8006);
    }

    #[test]
    fn not_taken_branch_falls_through() {
        // LDA #$01; BEQ +2
        let mut cpu = setup(&[0xA9, 0x01, 0xF0, 0x02]);
        cpu.step();
        assert_eq!(cpu.step(), 2);
        assert_eq!(cpu.state().pc, 0x8004);
    }

    #[test]
    fn backward_branch() {
        // NOP; BRA -3 (back to the NOP)
        let mut cpu = setup(&[0xEA, 0x80, 0xFD]);
        cpu.run_steps(2);
        assert_eq!(cpu.state().pc, 0x8000);
    }

    #[test]
    fn brl_uses_16bit_displacement() {
        // BRL +$1000
        let mut cpu = setup(&[0x82, 0x00, 0x10]);
        assert_eq!(cpu.step(), 4);
        assert_eq!(cpu.state().pc, 0x9003);
    }

    #[test]
    fn branch_from_ram_into_rom() {
        // JMP $7FF0; BRA +$10 (in RAM) lands back in the ROM window.
        let mut cpu = setup(&[0x4C, 0xF0, 0x7F]);
        cpu.poke(0x7FF0, 0x80);
        cpu.poke(0x7FF1, 0x10);
        cpu.run_steps(2);
        assert_eq!(cpu.state().pc, 0x8002);
    }
}
