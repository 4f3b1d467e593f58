/*!
regs.rs - 65816 register and processor-status model.

Overview
========
Two small value types carry every architecturally visible bit:

- `Reg16`: a 16-bit register with separately addressable low/high byte
  views. 8-bit operations touch only the low byte; the high byte keeps
  whatever it held (the "hidden B" half of the accumulator, or the forced
  zero of an 8-bit index register).
- `StatusFlags`: the processor status decomposed into booleans, including
  the three mode flags `m`, `x` and `e`.

Status Byte Encodings
=====================
The status byte has two wire layouts, selected by the current `e` flag.

Native (PHP / PLP / RTI / interrupt frames with e=0):

```text
Bit: 7 6 5 4 3 2 1 0
     N V M X D I Z C
```

Emulation (e=1). Bits 4/5 are not flags; the caller supplies them as a
base value (0x30 for PHP/BRK/NMI, 0x20 for IRQ, 0x00 for COP):

```text
Bit: 7 6 5 4 3 2 1 0
     N V - B D I Z C
```

Pulling the emulation layout leaves `m` and `x` clear; the CPU mode is
still Emulation because `e` overrides them.
*/

use std::fmt;

/// Status flag bit masks (native layout).
pub const CARRY: u8 = 0b0000_0001;
pub const ZERO: u8 = 0b0000_0010;
pub const IRQ_DISABLE: u8 = 0b0000_0100;
pub const DECIMAL: u8 = 0b0000_1000;
pub const INDEX_8: u8 = 0b0001_0000;
pub const ACCUM_8: u8 = 0b0010_0000;
pub const OVERFLOW: u8 = 0b0100_0000;
pub const NEGATIVE: u8 = 0b1000_0000;

/// Emulation-layout bits 4/5 pushed by PHP, BRK and NMI entry.
pub const EMU_PUSH_BREAK: u8 = 0x30;
/// Emulation-layout bits pushed by IRQ entry (break clear).
pub const EMU_PUSH_IRQ: u8 = 0x20;
/// Emulation-layout bits pushed by COP.
pub const EMU_PUSH_COP: u8 = 0x00;

/// 16-bit register with byte views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reg16(u16);

impl Reg16 {
    #[inline]
    pub const fn new(w: u16) -> Self {
        Self(w)
    }

    #[inline]
    pub fn w(self) -> u16 {
        self.0
    }

    #[inline]
    pub fn set_w(&mut self, w: u16) {
        self.0 = w;
    }

    #[inline]
    pub fn l(self) -> u8 {
        self.0 as u8
    }

    #[inline]
    pub fn set_l(&mut self, v: u8) {
        self.0 = (self.0 & 0xFF00) | v as u16;
    }

    #[inline]
    pub fn h(self) -> u8 {
        (self.0 >> 8) as u8
    }

    #[inline]
    pub fn set_h(&mut self, v: u8) {
        self.0 = (self.0 & 0x00FF) | ((v as u16) << 8);
    }

    /// Value at the given operating width (low byte only when 8-bit).
    #[inline]
    pub fn get<const WIDE: bool>(self) -> u16 {
        if WIDE { self.0 } else { self.0 & 0x00FF }
    }

    /// Store at the given operating width; 8-bit stores keep the high byte.
    #[inline]
    pub fn set<const WIDE: bool>(&mut self, v: u16) {
        if WIDE {
            self.0 = v;
        } else {
            self.set_l(v as u8);
        }
    }
}

/// Decomposed processor status.
///
/// `x` is the index-width flag (1 = 8-bit index registers) and `m` the
/// accumulator-width flag (1 = 8-bit accumulator).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub c: bool,
    pub z: bool,
    pub i: bool,
    pub d: bool,
    pub x: bool,
    pub m: bool,
    pub v: bool,
    pub n: bool,
    pub e: bool,
}

impl StatusFlags {
    /// Pack into the native status byte.
    pub fn pack_native(&self) -> u8 {
        let mut p = 0u8;
        if self.c {
            p |= CARRY;
        }
        if self.z {
            p |= ZERO;
        }
        if self.i {
            p |= IRQ_DISABLE;
        }
        if self.d {
            p |= DECIMAL;
        }
        if self.x {
            p |= INDEX_8;
        }
        if self.m {
            p |= ACCUM_8;
        }
        if self.v {
            p |= OVERFLOW;
        }
        if self.n {
            p |= NEGATIVE;
        }
        p
    }

    /// Pack into the emulation status byte, OR-ing the flag bits onto `base`.
    pub fn pack_emulation(&self, base: u8) -> u8 {
        let native = self.pack_native();
        base | (native & !(INDEX_8 | ACCUM_8))
    }

    /// Restore all eight native-layout flags from `p`. `e` is untouched.
    pub fn unpack_native(&mut self, p: u8) {
        self.c = p & CARRY != 0;
        self.z = p & ZERO != 0;
        self.i = p & IRQ_DISABLE != 0;
        self.d = p & DECIMAL != 0;
        self.x = p & INDEX_8 != 0;
        self.m = p & ACCUM_8 != 0;
        self.v = p & OVERFLOW != 0;
        self.n = p & NEGATIVE != 0;
    }

    /// Restore the six emulation-layout flags from `p`; `m` and `x` clear.
    pub fn unpack_emulation(&mut self, p: u8) {
        self.unpack_native(p & !(INDEX_8 | ACCUM_8));
    }

    #[inline]
    pub fn set_zn8(&mut self, v: u8) {
        self.z = v == 0;
        self.n = v & 0x80 != 0;
    }

    #[inline]
    pub fn set_zn16(&mut self, v: u16) {
        self.z = v == 0;
        self.n = v & 0x8000 != 0;
    }

    /// Z/N update for an operand of the given width (low byte only when 8-bit).
    #[inline]
    pub fn set_zn<const WIDE: bool>(&mut self, v: u16) {
        if WIDE {
            self.set_zn16(v);
        } else {
            self.set_zn8(v as u8);
        }
    }
}

impl fmt::Display for StatusFlags {
    /// Compact flag dump, upper case when set: `NVMXDIZC E`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bit = |set: bool, c: char| if set { c } else { c.to_ascii_lowercase() };
        write!(
            f,
            "{}{}{}{}{}{}{}{} {}",
            bit(self.n, 'N'),
            bit(self.v, 'V'),
            bit(self.m, 'M'),
            bit(self.x, 'X'),
            bit(self.d, 'D'),
            bit(self.i, 'I'),
            bit(self.z, 'Z'),
            bit(self.c, 'C'),
            bit(self.e, 'E'),
        )
    }
}

/// Named registers exposed to debuggers and host tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    A,
    X,
    Y,
    S,
    P,
    Pc,
    Dp,
    Db,
    Pb,
}

impl Register {
    pub const ALL: [Register; 9] = [
        Register::A,
        Register::X,
        Register::Y,
        Register::S,
        Register::P,
        Register::Pc,
        Register::Dp,
        Register::Db,
        Register::Pb,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Register::A => "A",
            Register::X => "X",
            Register::Y => "Y",
            Register::S => "S",
            Register::P => "P",
            Register::Pc => "PC",
            Register::Dp => "DP",
            Register::Db => "DB",
            Register::Pb => "PB",
        }
    }
}
