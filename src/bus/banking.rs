/*!
banking.rs - Memory banking control latches.

The latches live behind the eight-register window at `$FEF0-$FEF7`.
Every write there feeds one bit (value bit 0) into one latch chosen by
value bits 1-2:

```text
val & 7   latch       effect
-------   ---------   ----------------------------------------
0, 1      def         def = bit (1 = default 64K map)
2, 3      divider     4-bit shift register, new bit enters at 3
4, 5      banking     4-bit shift register, new bit enters at 3
6, 7      banknum     6-bit shift register, new bit enters at 5
```

`banking` bits:

```text
bit 0   page RAM into the low window  ($4000-$7FFF)
bit 1   page RAM into the high window ($8000-$BFFF)
bit 2   extended 19-bit addressing (only when def = 0)
bit 3   keep the ROM overlay at $8000-$FFFF when def = 0
```

`banknum` bits 0-2 pick the low-window page, bits 3-5 the high-window
page. The address mask is re-derived after every write, so the very next
access sees the new map.
*/

/// Base of the banking-control register window.
pub const BANKING_WINDOW: u32 = 0xFEF0;

pub const MASK_16: u32 = 0xFFFF;
pub const MASK_19: u32 = 0x7_FFFF;

pub const BANK_LOW_WINDOW: u8 = 0x01;
pub const BANK_HIGH_WINDOW: u8 = 0x02;
pub const BANK_EXTENDED: u8 = 0x04;
pub const BANK_ROM_OVERLAY: u8 = 0x08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankingLatches {
    def: bool,
    divider: u8,
    banking: u8,
    banknum: u8,
    mask: u32,
}

impl Default for BankingLatches {
    fn default() -> Self {
        Self::new()
    }
}

impl BankingLatches {
    /// Power-on latches: default map, no paging, 16-bit mask.
    pub fn new() -> Self {
        Self {
            def: true,
            divider: 0,
            banking: 0,
            banknum: 0,
            mask: MASK_16,
        }
    }

    /// Reset only forces the default map; the shift latches keep their bits.
    pub fn reset(&mut self) {
        self.def = true;
        self.recompute_mask();
    }

    /// Shift one control bit in (a write to the banking window).
    pub fn write(&mut self, val: u8) {
        let bit = val & 1;
        match val & 7 {
            0 | 1 => self.def = bit != 0,
            2 | 3 => self.divider = (self.divider >> 1) | (bit << 3),
            4 | 5 => self.banking = (self.banking >> 1) | (bit << 3),
            _ => self.banknum = (self.banknum >> 1) | (bit << 5),
        }
        self.recompute_mask();
        log::debug!(
            "banking latch write {:02X}: def={} divider={:X} banking={:X} banknum={:02X} mask={:05X}",
            val,
            self.def as u8,
            self.divider,
            self.banking,
            self.banknum,
            self.mask
        );
    }

    fn recompute_mask(&mut self) {
        self.mask = if self.def || self.banking & BANK_EXTENDED == 0 {
            MASK_16
        } else {
            MASK_19
        };
    }

    #[inline]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    #[inline]
    pub fn apply_mask(&self, addr: u32) -> u32 {
        addr & self.mask
    }

    #[inline]
    pub fn default_map(&self) -> bool {
        self.def
    }

    #[inline]
    pub fn divider(&self) -> u8 {
        self.divider
    }

    #[inline]
    pub fn banking(&self) -> u8 {
        self.banking
    }

    #[inline]
    pub fn banknum(&self) -> u8 {
        self.banknum
    }

    /// Page shown in the low window, if paging is active there.
    #[inline]
    pub fn low_page(&self) -> Option<u8> {
        (!self.def && self.banking & BANK_LOW_WINDOW != 0).then_some(self.banknum & 7)
    }

    /// Page shown in the high window, if paging is active there.
    #[inline]
    pub fn high_page(&self) -> Option<u8> {
        (!self.def && self.banking & BANK_HIGH_WINDOW != 0).then_some((self.banknum >> 3) & 7)
    }

    /// True when the ROM image overlays the top 32K of bank 0.
    #[inline]
    pub fn rom_visible(&self) -> bool {
        self.def || self.banking & BANK_ROM_OVERLAY != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shift the four bits of `value` into the 4-bit latch selected by `sel`
    /// (2 = divider, 4 = banking), LSB first.
    fn load_nibble(l: &mut BankingLatches, sel: u8, value: u8) {
        for bit in 0..4 {
            l.write(sel | ((value >> bit) & 1));
        }
    }

    #[test]
    fn power_on_is_default_map() {
        let l = BankingLatches::new();
        assert!(l.default_map());
        assert_eq!(l.mask(), MASK_16);
        assert!(l.rom_visible());
        assert_eq!(l.low_page(), None);
        assert_eq!(l.high_page(), None);
    }

    #[test]
    fn nibble_latches_shift_in_lsb_first() {
        let mut l = BankingLatches::new();
        load_nibble(&mut l, 4, 0b1010);
        assert_eq!(l.banking(), 0b1010);
        load_nibble(&mut l, 2, 0b0110);
        assert_eq!(l.divider(), 0b0110);
    }

    #[test]
    fn banknum_is_six_bits_wide() {
        let mut l = BankingLatches::new();
        for bit in 0..6 {
            l.write(6 | ((0b10_1101 >> bit) & 1));
        }
        assert_eq!(l.banknum(), 0b10_1101);
    }

    #[test]
    fn extended_mask_needs_def_clear() {
        let mut l = BankingLatches::new();
        load_nibble(&mut l, 4, BANK_EXTENDED);
        assert_eq!(l.mask(), MASK_16, "def still set");
        l.write(0);
        assert_eq!(l.mask(), MASK_19);
        l.write(1);
        assert_eq!(l.mask(), MASK_16);
    }

    #[test]
    fn reset_restores_default_map_but_keeps_latches() {
        let mut l = BankingLatches::new();
        load_nibble(&mut l, 4, BANK_EXTENDED | BANK_LOW_WINDOW);
        l.write(0);
        assert_eq!(l.mask(), MASK_19);
        l.reset();
        assert!(l.default_map());
        assert_eq!(l.mask(), MASK_16);
        assert_eq!(l.banking(), BANK_EXTENDED | BANK_LOW_WINDOW);
    }
}
