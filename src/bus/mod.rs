#![doc = r#"
Bus module: the co-processor's memory system and cycle counter.

Overview
- `Bus` owns RAM, the ROM image, the banking latches and the tube. Every
  CPU-visible access goes through it.
- Each access debits the cycle counter: 1 for byte reads and writes, 2 for
  the word helpers, `n` for internal (idle) cycles. The execution loop
  measures elapsed time only through this counter.
- A tube register write latches "end of slice", which the execution loop
  consumes to hand control back to its caller early.

Modules and responsibilities
- banking: the `$FEF0` control latches and the derived address mask.
- cpu_interface: CPU-visible address decoder (tube, banking window, paged
  windows, ROM overlay, linear RAM).
- ram: the 512 KiB RAM array and page-index helper.
"#]

pub mod banking;
pub mod cpu_interface;
pub mod ram;


pub use banking::BankingLatches;
pub use cpu_interface::{cpu_read, cpu_write};
pub use ram::Ram;

use crate::rom::RomImage;
use crate::tube::Tube;

pub struct Bus {
    pub(crate) ram: Ram,
    pub(crate) rom: RomImage,
    pub(crate) banking: BankingLatches,
    pub(crate) tube: Box<dyn Tube>,
    /// Remaining cycles in the current slice; may go negative.
    cycles: i32,
    /// Set by a tube register write, consumed by the execution loop.
    pub(crate) end_of_slice: bool,
}

impl Bus {
    pub fn new(rom: RomImage, tube: Box<dyn Tube>) -> Self {
        Self {
            ram: Ram::new(),
            rom,
            banking: BankingLatches::new(),
            tube,
            cycles: 0,
            end_of_slice: false,
        }
    }

    // ---------------------------------------------------------------------
    // Timed accesses (used by instruction handlers)
    // ---------------------------------------------------------------------

    #[inline]
    pub fn read(&mut self, addr: u32) -> u8 {
        self.cycles -= 1;
        cpu_read(self, addr)
    }

    /// Little-endian word at `addr`, `addr + 1` (each byte decoded separately).
    #[inline]
    pub fn read_word(&mut self, addr: u32) -> u16 {
        self.cycles -= 2;
        let lo = cpu_read(self, addr) as u16;
        let hi = cpu_read(self, addr.wrapping_add(1)) as u16;
        lo | (hi << 8)
    }

    #[inline]
    pub fn write(&mut self, addr: u32, val: u8) {
        self.cycles -= 1;
        cpu_write(self, addr, val);
    }

    #[inline]
    pub fn write_word(&mut self, addr: u32, val: u16) {
        self.cycles -= 2;
        cpu_write(self, addr, val as u8);
        cpu_write(self, addr.wrapping_add(1), (val >> 8) as u8);
    }

    /// Burn `n` internal cycles.
    #[inline]
    pub fn idle(&mut self, n: i32) {
        self.cycles -= n;
    }

    // ---------------------------------------------------------------------
    // Untimed accesses (debugger / host tooling)
    // ---------------------------------------------------------------------

    pub fn peek(&mut self, addr: u32) -> u8 {
        cpu_read(self, addr)
    }

    pub fn poke(&mut self, addr: u32, val: u8) {
        cpu_write(self, addr, val);
    }

    // ---------------------------------------------------------------------
    // Slice bookkeeping
    // ---------------------------------------------------------------------

    #[inline]
    pub fn cycles(&self) -> i32 {
        self.cycles
    }

    #[inline]
    pub fn set_cycles(&mut self, cycles: i32) {
        self.cycles = cycles;
    }

    /// Return and clear the end-of-slice request.
    #[inline]
    pub fn take_end_of_slice(&mut self) -> bool {
        std::mem::take(&mut self.end_of_slice)
    }

    // ---------------------------------------------------------------------
    // Tube passthrough
    // ---------------------------------------------------------------------

    #[inline]
    pub fn irq_state(&self) -> u8 {
        self.tube.irq_state()
    }

    #[inline]
    pub fn ack_nmi(&mut self) {
        self.tube.ack_nmi();
    }

    pub fn tube_mut(&mut self) -> &mut dyn Tube {
        self.tube.as_mut()
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    pub fn banking(&self) -> &BankingLatches {
        &self.banking
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn rom(&self) -> &RomImage {
        &self.rom
    }

    /// Force the default memory map (part of CPU reset).
    pub(crate) fn reset_banking(&mut self) {
        self.banking.reset();
    }
}

impl std::fmt::Debug for Bus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bus")
            .field("banking", &self.banking)
            .field("cycles", &self.cycles)
            .field("end_of_slice", &self.end_of_slice)
            .finish_non_exhaustive()
    }
}
