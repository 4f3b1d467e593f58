/*!
copro.rs - Co-processor supervisor.

Drives a `Cpu` the way the host firmware does: power on, reset, then run
short slices forever. Between slices it watches the tube's reset line;
while the host holds reset it asks the caller whether to keep going (the
host may have switched to a different co-processor), then resets the
core and waits for the line to drop.
*/

use crate::config::CoproConfig;
use crate::cpu::Cpu;
use crate::rom::RomImage;
use crate::tube::{RESET_BIT, Tube};

#[derive(Debug)]
pub struct Copro65816 {
    cpu: Cpu,
    config: CoproConfig,
    resets: u64,
}

impl Copro65816 {
    /// Power on: install the ROM, reset, and wait for the host to release
    /// reset.
    pub fn new(rom: RomImage, tube: Box<dyn Tube>, config: CoproConfig) -> Self {
        let cpu = Cpu::new(rom, config.native_vector_bank, tube);
        log::info!(
            "65816 co-processor powered on (vector bank {:02X}, {} cycles per slice)",
            config.native_vector_bank,
            config.slice_cycles
        );
        let mut copro = Self {
            cpu,
            config,
            resets: 0,
        };
        copro.cpu.bus_mut().tube_mut().wait_for_reset_release();
        copro
    }

    fn reset(&mut self) {
        log::info!(
            "65816 reset after {} instructions",
            self.cpu.instructions()
        );
        self.resets += 1;
        self.cpu.reset();
        self.cpu.bus_mut().tube_mut().wait_for_reset_release();
    }

    #[inline]
    fn reset_requested(&self) -> bool {
        self.cpu.bus().irq_state() & RESET_BIT != 0
    }

    /// Run until the host asserts reset and `keep_running` says stop.
    pub fn run(&mut self, mut keep_running: impl FnMut() -> bool) {
        loop {
            self.cpu.exec(self.config.slice_cycles);
            if self.reset_requested() {
                if !keep_running() {
                    log::info!("co-processor switched, leaving 65816 loop");
                    return;
                }
                self.reset();
            }
        }
    }

    /// Run exactly `slices` slices, honouring reset requests. Returns the
    /// cycles consumed.
    pub fn run_slices(&mut self, slices: u64) -> i64 {
        let mut consumed = 0i64;
        for _ in 0..slices {
            consumed += self.cpu.exec(self.config.slice_cycles) as i64;
            if self.reset_requested() {
                self.reset();
            }
        }
        consumed
    }

    pub fn cpu(&self) -> &Cpu {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Cpu {
        &mut self.cpu
    }

    pub fn config(&self) -> &CoproConfig {
        &self.config
    }

    /// Resets taken since power-on (not counting power-on itself).
    pub fn resets(&self) -> u64 {
        self.resets
    }
}
