/*!
config.rs - Run-time knobs for the co-processor supervisor.
*/

/// Cycles per `exec` call in the supervisor loop. Eight cycles is only a
/// handful of instructions, which keeps the tube handshake responsive.
pub const DEFAULT_SLICE_CYCLES: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoproConfig {
    /// Bank holding the native-mode interrupt vectors.
    pub native_vector_bank: u8,
    /// Cycle budget handed to `Cpu::exec` per slice.
    pub slice_cycles: i32,
}

impl Default for CoproConfig {
    fn default() -> Self {
        Self {
            native_vector_bank: 0,
            slice_cycles: DEFAULT_SLICE_CYCLES,
        }
    }
}

impl CoproConfig {
    pub fn with_native_vector_bank(mut self, bank: u8) -> Self {
        self.native_vector_bank = bank;
        self
    }

    /// Set the slice length; non-positive values are raised to one cycle.
    pub fn with_slice_cycles(mut self, cycles: i32) -> Self {
        self.slice_cycles = cycles.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_loop() {
        let cfg = CoproConfig::default();
        assert_eq!(cfg.native_vector_bank, 0);
        assert_eq!(cfg.slice_cycles, 8);
    }

    #[test]
    fn slice_length_is_at_least_one_cycle() {
        let cfg = CoproConfig::default().with_slice_cycles(0);
        assert_eq!(cfg.slice_cycles, 1);
        let cfg = CoproConfig::default()
            .with_slice_cycles(32)
            .with_native_vector_bank(0x7F);
        assert_eq!(cfg.slice_cycles, 32);
        assert_eq!(cfg.native_vector_bank, 0x7F);
    }
}
