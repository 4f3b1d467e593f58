/*!
CPU interface dispatcher

Purpose
- Centralize the co-processor's address decoding in one place.
- Delegate the handshake window to the tube and the control window to the
  banking latches.

Address map (after masking with the current 16/19-bit mask, first match wins):
- $FEF8-$FEFF: tube handshake registers (read and write)
- $FEF0-$FEF7: banking control latches (write only; reads fall through)
- $4000-$7FFF: paged RAM, when def=0 and banking bit 0 is set
- $8000-$BFFF: paged RAM, when def=0 and banking bit 1 is set
- $8000-$FFFF: ROM image, when def=1 or banking bit 3 is set (writes dropped)
- everything else: linear RAM
*/

use crate::bus::Bus;
use crate::bus::banking::{BANKING_WINDOW, BankingLatches};
use crate::bus::ram::Ram;
use crate::tube::TUBE_WINDOW;

/// Where a masked, non-register address lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Physical RAM index.
    Ram(u32),
    /// Offset within the ROM image.
    Rom(u32),
}

/// Resolve a masked address that is not a handshake register.
pub fn memory_target(latches: &BankingLatches, addr: u32) -> Target {
    match addr & 0x7_C000 {
        0x4000 => {
            if let Some(page) = latches.low_page() {
                return Target::Ram(Ram::paged_index(page, addr));
            }
        }
        0x8000 => {
            if let Some(page) = latches.high_page() {
                return Target::Ram(Ram::paged_index(page, addr));
            }
        }
        _ => {}
    }
    if addr & 0x7_8000 == 0x8000 && latches.rom_visible() {
        return Target::Rom(addr & 0x7FFF);
    }
    Target::Ram(addr)
}

/// CPU-visible read from the co-processor address space.
pub fn cpu_read(bus: &mut Bus, addr: u32) -> u8 {
    let addr = bus.banking.apply_mask(addr);
    if addr & !7 == TUBE_WINDOW {
        return bus.tube.parasite_read(addr);
    }
    match memory_target(&bus.banking, addr) {
        Target::Ram(idx) => bus.ram.read(idx),
        Target::Rom(off) => bus.rom.read(off),
    }
}

/// CPU-visible write to the co-processor address space.
pub fn cpu_write(bus: &mut Bus, addr: u32, val: u8) {
    let addr = bus.banking.apply_mask(addr);
    match addr & !7 {
        BANKING_WINDOW => bus.banking.write(val),
        TUBE_WINDOW => {
            bus.tube.parasite_write(addr, val);
            bus.end_of_slice = true;
        }
        _ => match memory_target(&bus.banking, addr) {
            Target::Ram(idx) => bus.ram.write(idx, val),
            Target::Rom(_) => {}
        },
    }
}
