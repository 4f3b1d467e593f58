/*!
tube.rs - Interface to the host-side tube handshake layer.

The co-processor sees the tube as eight handshake registers at
`$FEF8-$FEFF` plus a handful of host-driven control lines. The ULA
protocol itself lives outside this crate; the core only calls through
the `Tube` trait.

Control Lines
=============
`irq_state()` returns a small bit set sampled between instructions:

```text
RESET_BIT  host is holding the co-processor in reset
NMI_BIT    edge-triggered; acknowledged with `ack_nmi()` once taken
IRQ_BIT    level-triggered; re-sampled every instruction boundary
```

The lines may be driven from another thread. `TubeLines` is a cloneable
handle over one shared atomic byte for that purpose.
*/

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

pub const RESET_BIT: u8 = 4;
pub const NMI_BIT: u8 = 2;
pub const IRQ_BIT: u8 = 1;

/// Base of the eight parasite-side handshake registers.
pub const TUBE_WINDOW: u32 = 0xFEF8;

pub trait Tube {
    /// Read one of the eight handshake registers.
    fn parasite_read(&mut self, addr: u32) -> u8;

    /// Write one of the eight handshake registers.
    fn parasite_write(&mut self, addr: u32, val: u8);

    /// Current host-asserted control lines (`RESET_BIT | NMI_BIT | IRQ_BIT`).
    fn irq_state(&self) -> u8;

    /// Acknowledge a serviced NMI.
    fn ack_nmi(&mut self);

    /// Block until the host releases reset. Called by the supervisor only.
    fn wait_for_reset_release(&mut self) {}
}

/// Shared handle over the host-asserted control lines.
#[derive(Debug, Clone, Default)]
pub struct TubeLines(Arc<AtomicU8>);

impl TubeLines {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn bits(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn assert(&self, bits: u8) {
        self.0.fetch_or(bits, Ordering::Relaxed);
    }

    pub fn release(&self, bits: u8) {
        self.0.fetch_and(!bits, Ordering::Relaxed);
    }
}

/// Tube with nothing attached: registers read as `0xFF` and writes vanish.
///
/// The control lines are still live so a host (or a test) can raise IRQ,
/// NMI or reset through the shared `TubeLines`.
#[derive(Debug, Clone, Default)]
pub struct NullTube {
    lines: TubeLines,
}

impl NullTube {
    pub fn new(lines: TubeLines) -> Self {
        Self { lines }
    }
}

impl Tube for NullTube {
    fn parasite_read(&mut self, _addr: u32) -> u8 {
        0xFF
    }

    fn parasite_write(&mut self, addr: u32, val: u8) {
        log::trace!("tube write ignored: {:06X} <- {:02X}", addr, val);
    }

    fn irq_state(&self) -> u8 {
        self.lines.bits()
    }

    fn ack_nmi(&mut self) {
        self.lines.release(NMI_BIT);
    }

    fn wait_for_reset_release(&mut self) {
        // No host to hold the line: release it straight away.
        self.lines.release(RESET_BIT);
    }
}
