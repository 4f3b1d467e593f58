/*!
execute.rs - Arithmetic and flag engine.

Pure helpers: each takes the status flags plus operand values, updates the
flags and returns the result. No bus access happens here; handlers charge
the extra decimal-mode cycle themselves (`alu_cycle`).

Width Convention
================
Generic helpers take a `const WIDE: bool`. When `WIDE` is false only the
low byte of each `u16` argument is meaningful and only the low byte of
the result is; the caller writes it back into the low byte of the target
so an 8-bit accumulator keeps its hidden high byte.

Decimal Mode
============
BCD add/subtract work nibble by nibble. The 8-bit forms correct each digit
as it is produced; the 16-bit forms accumulate nibble groups and correct a
group when it passes 9, 0x9F, 0x9FF, 0x9FFF. Inputs that are not valid BCD
produce the same (odd) results the chip does, the corrections are applied
mechanically. Overflow in decimal mode follows the binary sign rules on
the partially corrected result.
*/

use crate::bus::Bus;
use crate::cpu::regs::StatusFlags;

#[inline]
const fn sign_bit<const WIDE: bool>() -> u16 {
    if WIDE { 0x8000 } else { 0x0080 }
}

#[inline]
const fn width_mask<const WIDE: bool>() -> u16 {
    if WIDE { 0xFFFF } else { 0x00FF }
}

/// Charge the decimal-correction cycle when the last ADC/SBC ran in BCD.
#[inline]
pub(crate) fn alu_cycle(p: &StatusFlags, bus: &mut Bus) {
    if p.d {
        bus.idle(1);
    }
}

// ---------------------------------------------------------------------------
// ADC
// ---------------------------------------------------------------------------

pub fn adc_binary8(p: &mut StatusFlags, a: u8, b: u8) -> u8 {
    let sum = a as u16 + b as u16 + p.c as u16;
    p.v = (a ^ b) & 0x80 == 0 && (a as u16 ^ sum) & 0x80 != 0;
    p.c = sum & 0x100 != 0;
    let r = sum as u8;
    p.set_zn8(r);
    r
}

pub fn adc_decimal8(p: &mut StatusFlags, a: u8, b: u8) -> u8 {
    let (a, b) = (a as i32, b as i32);
    let mut lo = (a & 0xF) + (b & 0xF) + p.c as i32;
    let mut hi = 0;
    if lo > 9 {
        lo = (lo - 10) & 0xF;
        hi = 1;
    }
    hi += (a >> 4) + (b >> 4);
    p.v = ((hi << 4) ^ a) & 0x80 != 0 && (a ^ b) & 0x80 == 0;
    p.c = false;
    if hi > 9 {
        p.c = true;
        hi = (hi - 10) & 0xF;
    }
    let r = ((lo & 0xF) | (hi << 4)) as u8;
    p.set_zn8(r);
    r
}

pub fn adc_binary16(p: &mut StatusFlags, a: u16, b: u16) -> u16 {
    let sum = a as u32 + b as u32 + p.c as u32;
    p.v = (a ^ b) & 0x8000 == 0 && (a as u32 ^ sum) & 0x8000 != 0;
    p.c = sum & 0x1_0000 != 0;
    let r = sum as u16;
    p.set_zn16(r);
    r
}

pub fn adc_decimal16(p: &mut StatusFlags, a: u16, b: u16) -> u16 {
    let (a32, b32) = (a as u32, b as u32);
    let mut sum = (a32 & 0xF) + (b32 & 0xF) + p.c as u32;
    if sum > 0x9 {
        sum += 0x6;
    }
    sum += (a32 & 0xF0) + (b32 & 0xF0);
    if sum > 0x9F {
        sum += 0x60;
    }
    sum += (a32 & 0xF00) + (b32 & 0xF00);
    if sum > 0x9FF {
        sum += 0x600;
    }
    sum += (a32 & 0xF000) + (b32 & 0xF000);
    if sum > 0x9FFF {
        sum += 0x6000;
    }
    p.v = (a ^ b) & 0x8000 == 0 && (a32 ^ sum) & 0x8000 != 0;
    p.c = sum > 0xFFFF;
    let r = sum as u16;
    p.set_zn16(r);
    r
}

// ---------------------------------------------------------------------------
// SBC
// ---------------------------------------------------------------------------

pub fn sbc_binary8(p: &mut StatusFlags, a: u8, b: u8) -> u8 {
    let borrow = !p.c as i32;
    let diff = a as i32 - b as i32 - borrow;
    p.v = (a ^ b) & 0x80 != 0 && (a as i32 ^ diff) & 0x80 != 0;
    p.c = diff >= 0;
    let r = diff as u8;
    p.set_zn8(r);
    r
}

pub fn sbc_decimal8(p: &mut StatusFlags, a: u8, b: u8) -> u8 {
    let borrow = !p.c as i32;
    let lo = (a as i32 & 0xF) - (b as i32 & 0xF) - borrow;
    let mut diff = a as i32 - b as i32 - borrow;
    let signed = a as i8 as i32 - b as i8 as i32 - borrow;
    p.v = (diff & 0x80 != 0) ^ (signed & 0x100 != 0);
    p.c = diff >= 0;
    if diff < 0 {
        diff -= 0x60;
    }
    if lo < 0 {
        diff -= 0x06;
    }
    let r = diff as u8;
    p.set_zn8(r);
    r
}

pub fn sbc_binary16(p: &mut StatusFlags, a: u16, b: u16) -> u16 {
    let diff = (a as u32).wrapping_sub(b as u32).wrapping_sub(!p.c as u32);
    p.v = (a as u32 ^ b as u32) & (a as u32 ^ diff) & 0x8000 != 0;
    p.c = diff <= 0xFFFF;
    let r = diff as u16;
    p.set_zn16(r);
    r
}

pub fn sbc_decimal16(p: &mut StatusFlags, a: u16, b: u16) -> u16 {
    // Nibble-group differences are added to a wrapping u32 accumulator, so a
    // borrow shows up as a huge value that trips every later "> 9" test.
    let group = |mask: u32| ((a as u32 & mask) as i32 - (b as u32 & mask) as i32) as u32;
    let mut diff = group(0xF).wrapping_sub(!p.c as u32);
    if diff > 0x9 {
        diff = diff.wrapping_sub(0x6);
    }
    diff = diff.wrapping_add(group(0xF0));
    if diff > 0x9F {
        diff = diff.wrapping_sub(0x60);
    }
    diff = diff.wrapping_add(group(0xF00));
    if diff > 0x9FF {
        diff = diff.wrapping_sub(0x600);
    }
    diff = diff.wrapping_add(group(0xF000));
    if diff > 0x9FFF {
        diff = diff.wrapping_sub(0x6000);
    }
    p.v = (a ^ b) & 0x8000 != 0 && (a as u32 ^ diff) & 0x8000 != 0;
    p.c = diff <= 0xFFFF;
    let r = diff as u16;
    p.set_zn16(r);
    r
}

/// ADC dispatching on width and the decimal flag.
#[inline]
pub(crate) fn adc<const WIDE: bool>(p: &mut StatusFlags, a: u16, b: u16) -> u16 {
    match (WIDE, p.d) {
        (false, false) => adc_binary8(p, a as u8, b as u8) as u16,
        (false, true) => adc_decimal8(p, a as u8, b as u8) as u16,
        (true, false) => adc_binary16(p, a, b),
        (true, true) => adc_decimal16(p, a, b),
    }
}

/// SBC dispatching on width and the decimal flag.
#[inline]
pub(crate) fn sbc<const WIDE: bool>(p: &mut StatusFlags, a: u16, b: u16) -> u16 {
    match (WIDE, p.d) {
        (false, false) => sbc_binary8(p, a as u8, b as u8) as u16,
        (false, true) => sbc_decimal8(p, a as u8, b as u8) as u16,
        (true, false) => sbc_binary16(p, a, b),
        (true, true) => sbc_decimal16(p, a, b),
    }
}

// ---------------------------------------------------------------------------
// Compare / BIT / TSB / TRB
// ---------------------------------------------------------------------------

/// CMP/CPX/CPY: flags from `reg - v`, result discarded.
#[inline]
pub(crate) fn compare<const WIDE: bool>(p: &mut StatusFlags, reg: u16, v: u16) {
    let mask = width_mask::<WIDE>();
    let (reg, v) = (reg & mask, v & mask);
    p.set_zn::<WIDE>(reg.wrapping_sub(v));
    p.c = reg >= v;
}

/// BIT #imm only touches Z.
#[inline]
pub(crate) fn bit_immediate<const WIDE: bool>(p: &mut StatusFlags, a: u16, v: u16) {
    p.z = a & v & width_mask::<WIDE>() == 0;
}

/// BIT on memory: Z from `A & v`, N and V copied from the operand's top bits.
#[inline]
pub(crate) fn bit<const WIDE: bool>(p: &mut StatusFlags, a: u16, v: u16) {
    let sign = sign_bit::<WIDE>();
    p.z = a & v & width_mask::<WIDE>() == 0;
    p.n = v & sign != 0;
    p.v = v & (sign >> 1) != 0;
}

/// TSB: Z from `A & v`, returns `v | A`.
#[inline]
pub(crate) fn test_and_set<const WIDE: bool>(p: &mut StatusFlags, a: u16, v: u16) -> u16 {
    p.z = a & v & width_mask::<WIDE>() == 0;
    v | a
}

/// TRB: Z from `A & v`, returns `v & !A`.
#[inline]
pub(crate) fn test_and_reset<const WIDE: bool>(p: &mut StatusFlags, a: u16, v: u16) -> u16 {
    p.z = a & v & width_mask::<WIDE>() == 0;
    v & !a
}

// ---------------------------------------------------------------------------
// Shifts, rotates, increments
// ---------------------------------------------------------------------------

#[inline]
pub(crate) fn asl<const WIDE: bool>(p: &mut StatusFlags, v: u16) -> u16 {
    p.c = v & sign_bit::<WIDE>() != 0;
    let r = (v << 1) & width_mask::<WIDE>();
    p.set_zn::<WIDE>(r);
    r
}

#[inline]
pub(crate) fn lsr<const WIDE: bool>(p: &mut StatusFlags, v: u16) -> u16 {
    let v = v & width_mask::<WIDE>();
    p.c = v & 1 != 0;
    let r = v >> 1;
    p.set_zn::<WIDE>(r);
    r
}

#[inline]
pub(crate) fn rol<const WIDE: bool>(p: &mut StatusFlags, v: u16) -> u16 {
    let carry_in = p.c as u16;
    p.c = v & sign_bit::<WIDE>() != 0;
    let r = ((v << 1) | carry_in) & width_mask::<WIDE>();
    p.set_zn::<WIDE>(r);
    r
}

#[inline]
pub(crate) fn ror<const WIDE: bool>(p: &mut StatusFlags, v: u16) -> u16 {
    let v = v & width_mask::<WIDE>();
    let carry_in = if p.c { sign_bit::<WIDE>() } else { 0 };
    p.c = v & 1 != 0;
    let r = (v >> 1) | carry_in;
    p.set_zn::<WIDE>(r);
    r
}

#[inline]
pub(crate) fn inc<const WIDE: bool>(p: &mut StatusFlags, v: u16) -> u16 {
    let r = v.wrapping_add(1) & width_mask::<WIDE>();
    p.set_zn::<WIDE>(r);
    r
}

#[inline]
pub(crate) fn dec<const WIDE: bool>(p: &mut StatusFlags, v: u16) -> u16 {
    let r = v.wrapping_sub(1) & width_mask::<WIDE>();
    p.set_zn::<WIDE>(r);
    r
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(c: bool) -> StatusFlags {
        StatusFlags {
            c,
            ..Default::default()
        }
    }

    fn decimal(c: bool) -> StatusFlags {
        StatusFlags {
            c,
            d: true,
            ..Default::default()
        }
    }

    /// Reference ADC built from signed/unsigned integer ranges.
    fn reference_adc8(a: u8, b: u8, c: bool) -> (u8, bool, bool) {
        let unsigned = a as u32 + b as u32 + c as u32;
        let signed = a as i8 as i32 + b as i8 as i32 + c as i32;
        (unsigned as u8, unsigned > 0xFF, !(-128..=127).contains(&signed))
    }

    fn reference_sbc8(a: u8, b: u8, c: bool) -> (u8, bool, bool) {
        let borrow = !c as i32;
        let unsigned = a as i32 - b as i32 - borrow;
        let signed = a as i8 as i32 - b as i8 as i32 - borrow;
        (unsigned as u8, unsigned >= 0, !(-128..=127).contains(&signed))
    }

    #[test]
    fn binary_adc8_matches_reference_exhaustively() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                for c in [false, true] {
                    let mut p = flags(c);
                    let r = adc_binary8(&mut p, a, b);
                    let (er, ec, ev) = reference_adc8(a, b, c);
                    assert_eq!((r, p.c, p.v), (er, ec, ev), "{a:02X}+{b:02X}+{c}");
                    assert_eq!(p.z, er == 0);
                    assert_eq!(p.n, er & 0x80 != 0);
                }
            }
        }
    }

    #[test]
    fn binary_sbc8_matches_reference_exhaustively() {
        for a in 0..=255u8 {
            for b in 0..=255u8 {
                for c in [false, true] {
                    let mut p = flags(c);
                    let r = sbc_binary8(&mut p, a, b);
                    let (er, ec, ev) = reference_sbc8(a, b, c);
                    assert_eq!((r, p.c, p.v), (er, ec, ev), "{a:02X}-{b:02X}-{c}");
                    assert_eq!(p.z, er == 0);
                    assert_eq!(p.n, er & 0x80 != 0);
                }
            }
        }
    }

    #[test]
    fn binary_16bit_matches_reference_sampled() {
        let samples = [
            0x0000u16, 0x0001, 0x007F, 0x0080, 0x00FF, 0x0100, 0x1234, 0x7FFE, 0x7FFF, 0x8000,
            0x8001, 0xABCD, 0xFFFE, 0xFFFF,
        ];
        for &a in &samples {
            for &b in &samples {
                for c in [false, true] {
                    let mut p = flags(c);
                    let r = adc_binary16(&mut p, a, b);
                    let unsigned = a as u32 + b as u32 + c as u32;
                    let signed = a as i16 as i32 + b as i16 as i32 + c as i32;
                    assert_eq!(r, unsigned as u16);
                    assert_eq!(p.c, unsigned > 0xFFFF);
                    assert_eq!(p.v, !(-32768..=32767).contains(&signed));
                    assert_eq!(p.n, r & 0x8000 != 0);

                    let mut p = flags(c);
                    let r = sbc_binary16(&mut p, a, b);
                    let unsigned = a as i32 - b as i32 - !c as i32;
                    let signed = a as i16 as i32 - b as i16 as i32 - !c as i32;
                    assert_eq!(r, unsigned as u16);
                    assert_eq!(p.c, unsigned >= 0);
                    assert_eq!(p.v, !(-32768..=32767).contains(&signed));
                    assert_eq!(p.z, r == 0);
                }
            }
        }
    }

    #[test]
    fn decimal_adc8_golden_vectors() {
        let mut p = decimal(false);
        assert_eq!(adc_decimal8(&mut p, 0x19, 0x01), 0x20);
        assert!(!p.c);

        let mut p = decimal(false);
        assert_eq!(adc_decimal8(&mut p, 0x99, 0x01), 0x00);
        assert!(p.c);
        assert!(p.z);

        let mut p = decimal(true);
        assert_eq!(adc_decimal8(&mut p, 0x58, 0x46), 0x05);
        assert!(p.c);

        let mut p = decimal(false);
        assert_eq!(adc_decimal8(&mut p, 0x12, 0x34), 0x46);
        assert!(!p.c && !p.z && !p.n);
    }

    #[test]
    fn decimal_adc16_golden_vectors() {
        let mut p = decimal(false);
        assert_eq!(adc_decimal16(&mut p, 0x1999, 0x0001), 0x2000);
        assert!(!p.c);

        let mut p = decimal(false);
        assert_eq!(adc_decimal16(&mut p, 0x9999, 0x0001), 0x0000);
        assert!(p.c && p.z);

        let mut p = decimal(true);
        assert_eq!(adc_decimal16(&mut p, 0x1234, 0x5678), 0x6913);
        assert!(!p.c);
    }

    #[test]
    fn decimal_sbc8_golden_vectors() {
        let mut p = decimal(true);
        assert_eq!(sbc_decimal8(&mut p, 0x20, 0x01), 0x19);
        assert!(p.c);

        let mut p = decimal(true);
        assert_eq!(sbc_decimal8(&mut p, 0x00, 0x01), 0x99);
        assert!(!p.c);
        assert!(p.n);

        let mut p = decimal(false);
        assert_eq!(sbc_decimal8(&mut p, 0x46, 0x12), 0x33);
        assert!(p.c);
    }

    #[test]
    fn decimal_sbc16_golden_vectors() {
        let mut p = decimal(true);
        assert_eq!(sbc_decimal16(&mut p, 0x2000, 0x0001), 0x1999);
        assert!(p.c);

        let mut p = decimal(true);
        assert_eq!(sbc_decimal16(&mut p, 0x0000, 0x0001), 0x9999);
        assert!(!p.c);

        let mut p = decimal(true);
        assert_eq!(sbc_decimal16(&mut p, 0x5000, 0x1234), 0x3766);
        assert!(p.c);
    }

    #[test]
    fn adc_dispatches_on_decimal_flag() {
        let mut p = decimal(false);
        assert_eq!(adc::<false>(&mut p, 0x09, 0x01), 0x10);
        let mut p = flags(false);
        assert_eq!(adc::<false>(&mut p, 0x09, 0x01), 0x0A);
    }

    #[test]
    fn compare_sets_carry_for_greater_or_equal() {
        let mut p = StatusFlags::default();
        compare::<false>(&mut p, 0x40, 0x40);
        assert!(p.c && p.z && !p.n);
        compare::<false>(&mut p, 0x10, 0x20);
        assert!(!p.c && !p.z && p.n);
        compare::<true>(&mut p, 0x8000, 0x0001);
        assert!(p.c && !p.z && !p.n);
        // 8-bit compare ignores the high byte.
        compare::<false>(&mut p, 0xFF10, 0x0010);
        assert!(p.z);
    }

    #[test]
    fn bit_memory_copies_operand_top_bits() {
        let mut p = StatusFlags::default();
        bit::<false>(&mut p, 0x01, 0xC0);
        assert!(p.z && p.n && p.v);
        bit::<true>(&mut p, 0x0001, 0x4001);
        assert!(!p.z && !p.n && p.v);

        let mut p = StatusFlags::default();
        bit_immediate::<false>(&mut p, 0x01, 0xC0);
        assert!(p.z && !p.n && !p.v);
    }

    #[test]
    fn rotates_move_carry_through() {
        let mut p = flags(true);
        assert_eq!(rol::<false>(&mut p, 0x80), 0x01);
        assert!(p.c);
        assert_eq!(ror::<false>(&mut p, 0x02), 0x81);
        assert!(!p.c && p.n);

        let mut p = flags(false);
        assert_eq!(rol::<true>(&mut p, 0x8000), 0x0000);
        assert!(p.c && p.z);
        assert_eq!(ror::<true>(&mut p, 0x0000), 0x8000);
        assert!(!p.c && p.n);
    }

    #[test]
    fn shifts_report_carry_out() {
        let mut p = StatusFlags::default();
        assert_eq!(asl::<false>(&mut p, 0x81), 0x02);
        assert!(p.c);
        assert_eq!(lsr::<true>(&mut p, 0x0001), 0x0000);
        assert!(p.c && p.z);
    }

    #[test]
    fn tsb_trb_report_overlap_in_zero() {
        let mut p = StatusFlags::default();
        assert_eq!(test_and_set::<false>(&mut p, 0x0F, 0xF0), 0xFF);
        assert!(p.z);
        assert_eq!(test_and_reset::<false>(&mut p, 0x0F, 0xFF), 0xF0);
        assert!(!p.z);
    }

    #[test]
    fn inc_dec_wrap_at_width() {
        let mut p = StatusFlags::default();
        assert_eq!(inc::<false>(&mut p, 0xFF), 0x00);
        assert!(p.z);
        assert_eq!(dec::<true>(&mut p, 0x0000), 0xFFFF);
        assert!(p.n);
    }
}
