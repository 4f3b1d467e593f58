/*!
table.rs - The five static opcode tables.

Purpose
=======
Each CPU mode gets its own 256-entry array of handler function pointers,
built at compile time by `build`. Operand widths are baked into each
entry (`lda::<true, Absolute>` vs `lda::<false, Absolute>`), so a handler
never tests `m` or `x` at run time; switching width means switching table
(see `CpuState::update_mode`).

Layout
======
```text
OPCODE_TABLES[CpuMode::X1M1]      8-bit A, 8-bit X/Y
OPCODE_TABLES[CpuMode::X1M0]      16-bit A, 8-bit X/Y
OPCODE_TABLES[CpuMode::X0M1]      8-bit A, 16-bit X/Y
OPCODE_TABLES[CpuMode::X0M0]      16-bit A, 16-bit X/Y
OPCODE_TABLES[CpuMode::Emulation] X1M1 with 6502-compatible stack,
                                  interrupt and (dp,X)/(dp),Y entries
```

Every slot is filled in every table; there is no illegal-opcode path.
*/

use crate::bus::Bus;
use crate::cpu::addressing::{
    Absolute, AbsoluteLong, AbsoluteLongX, AbsoluteX, AbsoluteY, Direct, DirectIndirect,
    DirectIndirectLong, DirectIndirectLongY, DirectIndirectX, DirectIndirectXEmu,
    DirectIndirectY, DirectIndirectYEmu, DirectX, DirectY, Immediate, StackRelative,
    StackRelativeIndirectY,
};
use crate::cpu::dispatch::arithmetic::{adc, sbc};
use crate::cpu::dispatch::branches::{bcc, bcs, beq, bmi, bne, bpl, bra, brl, bvc, bvs};
use crate::cpu::dispatch::compare::{cmp, cpx, cpy};
use crate::cpu::dispatch::control_flow::{
    brk, brk_emu, cop, cop_emu, jml_indirect, jmp, jmp_indirect, jmp_indirect_x, jmp_long, jsl,
    jsl_emu, jsr, jsr_emu, jsr_indirect_x, jsr_indirect_x_emu, rti, rti_emu, rtl, rtl_emu, rts,
    rts_emu, stp, wai,
};
use crate::cpu::dispatch::load_store::{lda, ldx, ldy, sta, stx, sty, stz};
use crate::cpu::dispatch::logical::{and, bit, bit_immediate, eor, ora};
use crate::cpu::dispatch::misc::{
    clc, cld, cli, clv, mvn, mvp, nop, rep, sec, sed, sei, sep, tax, tay, tcd, tcs, tdc, tsc, tsx,
    txa, txs, txy, tya, tyx, wdm, xba, xce,
};
use crate::cpu::dispatch::rmw::{
    asl, asl_a, dec, dec_a, dex, dey, inc, inc_a, inx, iny, lsr, lsr_a, rol, rol_a, ror, ror_a,
    trb, tsb,
};
use crate::cpu::dispatch::stack::{
    pea, pei, per, pha, pha_emu, phb, phb_emu, phd, phk, phk_emu, php, php_emu, phx, phx_emu, phy,
    phy_emu, pla, pla_emu, plb, plb_emu, pld, plp, plp_emu, plx, plx_emu, ply, ply_emu,
};
use crate::cpu::mode::CpuMode;
use crate::cpu::state::CpuState;

/// Handler for one opcode. The opcode byte has already been consumed.
pub type OpHandler = fn(&mut CpuState, &mut Bus);

/// One mode's complete opcode map.
pub type OpTable = [OpHandler; 256];

/// Tables indexed by `CpuMode::index()`.
pub static OPCODE_TABLES: [OpTable; CpuMode::COUNT] = [
    build(CpuMode::X1M1),
    build(CpuMode::X1M0),
    build(CpuMode::X0M1),
    build(CpuMode::X0M0),
    build(CpuMode::Emulation),
];

const fn build(mode: CpuMode) -> OpTable {
    let emu = matches!(mode, CpuMode::Emulation);
    let m16 = mode.wide_accumulator();
    let x16 = mode.wide_index();
    let mut t: OpTable = [nop as OpHandler; 256];

    // Fixed handler.
    macro_rules! op {
        ($code:expr, $f:expr) => {
            t[$code] = $f as OpHandler;
        };
    }
    // Accumulator-width handler with an addressing mode.
    macro_rules! acc {
        ($code:expr, $f:ident, $m:ty) => {
            t[$code] = if m16 {
                $f::<true, $m> as OpHandler
            } else {
                $f::<false, $m> as OpHandler
            };
        };
        ($code:expr, $f:ident) => {
            t[$code] = if m16 {
                $f::<true> as OpHandler
            } else {
                $f::<false> as OpHandler
            };
        };
    }
    // Index-width handler, optionally with an addressing mode.
    macro_rules! idx {
        ($code:expr, $f:ident, $m:ty) => {
            t[$code] = if x16 {
                $f::<true, $m> as OpHandler
            } else {
                $f::<false, $m> as OpHandler
            };
        };
        ($code:expr, $f:ident) => {
            t[$code] = if x16 {
                $f::<true> as OpHandler
            } else {
                $f::<false> as OpHandler
            };
        };
    }
    // The fourteen memory forms shared by ORA/AND/EOR/ADC/STA/LDA/CMP/SBC;
    // the immediate form is entered separately.
    macro_rules! alu_group {
        ($base:expr, $f:ident) => {
            if emu {
                acc!($base + 0x01, $f, DirectIndirectXEmu);
                acc!($base + 0x11, $f, DirectIndirectYEmu);
            } else {
                acc!($base + 0x01, $f, DirectIndirectX);
                acc!($base + 0x11, $f, DirectIndirectY);
            }
            acc!($base + 0x03, $f, StackRelative);
            acc!($base + 0x05, $f, Direct);
            acc!($base + 0x07, $f, DirectIndirectLong);
            acc!($base + 0x0D, $f, Absolute);
            acc!($base + 0x0F, $f, AbsoluteLong);
            acc!($base + 0x12, $f, DirectIndirect);
            acc!($base + 0x13, $f, StackRelativeIndirectY);
            acc!($base + 0x15, $f, DirectX);
            acc!($base + 0x17, $f, DirectIndirectLongY);
            acc!($base + 0x19, $f, AbsoluteY);
            acc!($base + 0x1D, $f, AbsoluteX);
            acc!($base + 0x1F, $f, AbsoluteLongX);
        };
    }
    // Read-modify-write group: dp, abs, dp,X, abs,X plus the accumulator form.
    macro_rules! rmw_group {
        ($base:expr, $f:ident, $fa:ident) => {
            acc!($base + 0x06, $f, Direct);
            acc!($base + 0x0E, $f, Absolute);
            acc!($base + 0x16, $f, DirectX);
            acc!($base + 0x1E, $f, AbsoluteX);
            acc!($base + 0x0A, $fa);
        };
    }

    // ALU
    alu_group!(0x00, ora);
    alu_group!(0x20, and);
    alu_group!(0x40, eor);
    alu_group!(0x60, adc);
    alu_group!(0x80, sta);
    alu_group!(0xA0, lda);
    alu_group!(0xC0, cmp);
    alu_group!(0xE0, sbc);
    acc!(0x09, ora, Immediate);
    acc!(0x29, and, Immediate);
    acc!(0x49, eor, Immediate);
    acc!(0x69, adc, Immediate);
    acc!(0xA9, lda, Immediate);
    acc!(0xC9, cmp, Immediate);
    acc!(0xE9, sbc, Immediate);

    // BIT
    acc!(0x89, bit_immediate);
    acc!(0x24, bit, Direct);
    acc!(0x2C, bit, Absolute);
    acc!(0x34, bit, DirectX);
    acc!(0x3C, bit, AbsoluteX);

    // Shifts, rotates, INC/DEC
    rmw_group!(0x00, asl, asl_a);
    rmw_group!(0x20, rol, rol_a);
    rmw_group!(0x40, lsr, lsr_a);
    rmw_group!(0x60, ror, ror_a);
    acc!(0xC6, dec, Direct);
    acc!(0xCE, dec, Absolute);
    acc!(0xD6, dec, DirectX);
    acc!(0xDE, dec, AbsoluteX);
    acc!(0x3A, dec_a);
    acc!(0xE6, inc, Direct);
    acc!(0xEE, inc, Absolute);
    acc!(0xF6, inc, DirectX);
    acc!(0xFE, inc, AbsoluteX);
    acc!(0x1A, inc_a);
    acc!(0x04, tsb, Direct);
    acc!(0x0C, tsb, Absolute);
    acc!(0x14, trb, Direct);
    acc!(0x1C, trb, Absolute);
    idx!(0xE8, inx);
    idx!(0xC8, iny);
    idx!(0xCA, dex);
    idx!(0x88, dey);

    // Index loads, stores and compares
    idx!(0xA2, ldx, Immediate);
    idx!(0xA6, ldx, Direct);
    idx!(0xB6, ldx, DirectY);
    idx!(0xAE, ldx, Absolute);
    idx!(0xBE, ldx, AbsoluteY);
    idx!(0xA0, ldy, Immediate);
    idx!(0xA4, ldy, Direct);
    idx!(0xB4, ldy, DirectX);
    idx!(0xAC, ldy, Absolute);
    idx!(0xBC, ldy, AbsoluteX);
    idx!(0x86, stx, Direct);
    idx!(0x96, stx, DirectY);
    idx!(0x8E, stx, Absolute);
    idx!(0x84, sty, Direct);
    idx!(0x94, sty, DirectX);
    idx!(0x8C, sty, Absolute);
    idx!(0xE0, cpx, Immediate);
    idx!(0xE4, cpx, Direct);
    idx!(0xEC, cpx, Absolute);
    idx!(0xC0, cpy, Immediate);
    idx!(0xC4, cpy, Direct);
    idx!(0xCC, cpy, Absolute);
    acc!(0x64, stz, Direct);
    acc!(0x74, stz, DirectX);
    acc!(0x9C, stz, Absolute);
    acc!(0x9E, stz, AbsoluteX);

    // Branches
    op!(0x10, bpl);
    op!(0x30, bmi);
    op!(0x50, bvc);
    op!(0x70, bvs);
    op!(0x80, bra);
    op!(0x82, brl);
    op!(0x90, bcc);
    op!(0xB0, bcs);
    op!(0xD0, bne);
    op!(0xF0, beq);

    // Jumps
    op!(0x4C, jmp);
    op!(0x5C, jmp_long);
    op!(0x6C, jmp_indirect);
    op!(0x7C, jmp_indirect_x);
    op!(0xDC, jml_indirect);

    // Transfers
    idx!(0xAA, tax);
    idx!(0xA8, tay);
    idx!(0xBA, tsx);
    idx!(0x9A, txs);
    idx!(0x9B, txy);
    idx!(0xBB, tyx);
    acc!(0x8A, txa);
    acc!(0x98, tya);
    op!(0x1B, tcs);
    op!(0x3B, tsc);
    op!(0x5B, tcd);
    op!(0x7B, tdc);
    op!(0xEB, xba);

    // Flags and mode
    op!(0x18, clc);
    op!(0x38, sec);
    op!(0x58, cli);
    op!(0x78, sei);
    op!(0xB8, clv);
    op!(0xD8, cld);
    op!(0xF8, sed);
    op!(0xC2, rep);
    op!(0xE2, sep);
    op!(0xFB, xce);

    // Stack (mode-independent forms)
    op!(0x0B, phd);
    op!(0x2B, pld);
    op!(0xF4, pea);
    op!(0xD4, pei);
    op!(0x62, per);

    // Block moves, WAI/STP, reserved
    idx!(0x44, mvp);
    idx!(0x54, mvn);
    op!(0xCB, wai);
    op!(0xDB, stp);
    op!(0xEA, nop);
    op!(0x42, wdm);

    if emu {
        op!(0x00, brk_emu);
        op!(0x02, cop_emu);
        op!(0x20, jsr_emu);
        op!(0x22, jsl_emu);
        op!(0xFC, jsr_indirect_x_emu);
        op!(0x60, rts_emu);
        op!(0x6B, rtl_emu);
        op!(0x40, rti_emu);
        op!(0x08, php_emu);
        op!(0x28, plp_emu);
        op!(0x48, pha_emu);
        op!(0xDA, phx_emu);
        op!(0x5A, phy_emu);
        op!(0x68, pla_emu);
        op!(0xFA, plx_emu);
        op!(0x7A, ply_emu);
        op!(0x8B, phb_emu);
        op!(0x4B, phk_emu);
        op!(0xAB, plb_emu);
    } else {
        op!(0x00, brk);
        op!(0x02, cop);
        op!(0x20, jsr);
        op!(0x22, jsl);
        op!(0xFC, jsr_indirect_x);
        op!(0x60, rts);
        op!(0x6B, rtl);
        op!(0x40, rti);
        op!(0x08, php);
        op!(0x28, plp);
        acc!(0x48, pha);
        idx!(0xDA, phx);
        idx!(0x5A, phy);
        acc!(0x68, pla);
        idx!(0xFA, plx);
        idx!(0x7A, ply);
        op!(0x8B, phb);
        op!(0x4B, phk);
        op!(0xAB, plb);
    }

    t
}
