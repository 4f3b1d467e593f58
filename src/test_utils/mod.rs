//! Shared test fixtures: ROM builders, ready-reset cores and a recording tube.
//!
//! Every test ROM is a full 32 KiB image filled with NOPs (`$EA`). The
//! program lands at `$8000` (ROM offset 0) and the vectors point at fixed
//! handler addresses, so tests can assert where an interrupt went:
//!
//! - `$FFFC` reset            -> `$8000`
//! - `$FFFE` emulation IRQ/BRK -> `EMU_IRQ_HANDLER`
//! - `$FFFA` emulation NMI     -> `EMU_NMI_HANDLER`
//! - `$FFF4` emulation COP     -> `EMU_COP_HANDLER`
//! - `$FFEE` native IRQ        -> `NATIVE_IRQ_HANDLER`
//! - `$FFEA` native NMI        -> `NATIVE_NMI_HANDLER`
//! - `$FFE6` native BRK        -> `NATIVE_BRK_HANDLER`
//! - `$FFE4` native COP        -> `NATIVE_COP_HANDLER`
//!
//! The native vectors sit in bank 0 (native vector bank 0).

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use crate::bus::Bus;
use crate::cpu::Cpu;
use crate::rom::{ROM_SIZE, RomImage};
use crate::tube::{NMI_BIT, NullTube, RESET_BIT, Tube, TubeLines};

pub const RESET_ENTRY: u16 = 0x8000;
pub const EMU_IRQ_HANDLER: u16 = 0x9000;
pub const EMU_NMI_HANDLER: u16 = 0x9100;
pub const EMU_COP_HANDLER: u16 = 0x9200;
pub const NATIVE_IRQ_HANDLER: u16 = 0x9300;
pub const NATIVE_NMI_HANDLER: u16 = 0x9400;
pub const NATIVE_BRK_HANDLER: u16 = 0x9500;
pub const NATIVE_COP_HANDLER: u16 = 0x9600;

const VECTORS: [(u16, u16); 8] = [
    (0xFFFC, RESET_ENTRY),
    (0xFFFE, EMU_IRQ_HANDLER),
    (0xFFFA, EMU_NMI_HANDLER),
    (0xFFF4, EMU_COP_HANDLER),
    (0xFFEE, NATIVE_IRQ_HANDLER),
    (0xFFEA, NATIVE_NMI_HANDLER),
    (0xFFE6, NATIVE_BRK_HANDLER),
    (0xFFE4, NATIVE_COP_HANDLER),
];

/// Lay out code fragments by CPU address (all within `$8000-$FFDF`) into
/// one program image starting at `$8000`. Gaps are NOPs.
pub fn program(segments: &[(u16, &[u8])]) -> Vec<u8> {
    let mut image = Vec::new();
    for (addr, bytes) in segments {
        let start = (*addr - RESET_ENTRY) as usize;
        let end = start + bytes.len();
        if image.len() < end {
            image.resize(end, 0xEA);
        }
        image[start..end].copy_from_slice(bytes);
    }
    image
}

/// A full ROM with `code` at `$8000` and the fixture vectors installed.
pub fn rom_with_program(code: &[u8]) -> RomImage {
    let mut image = vec![0xEA; ROM_SIZE];
    image[..code.len()].copy_from_slice(code);
    for (vector, target) in VECTORS {
        let off = (vector as usize) - 0x8000;
        image[off] = target as u8;
        image[off + 1] = (target >> 8) as u8;
    }
    RomImage::from_bytes(&image).expect("fixture ROM is exactly 32 KiB")
}

/// A bare bus (no CPU) over the fixture ROM.
pub fn test_bus(code: &[u8]) -> Bus {
    Bus::new(rom_with_program(code), Box::new(NullTube::default()))
}

/// Emulation-mode core, freshly reset, with `code` at `$8000`.
pub fn setup(code: &[u8]) -> Cpu {
    Cpu::new(rom_with_program(code), 0, Box::new(NullTube::default()))
}

/// As `setup`, then switched to native mode with 8-bit widths (X1M1).
pub fn native_setup(code: &[u8]) -> Cpu {
    let mut cpu = setup(code);
    enter_native(&mut cpu);
    cpu
}

fn enter_native(cpu: &mut Cpu) {
    let state = cpu.state_mut();
    state.p.e = false;
    state.update_mode();
}

/// Emulation-mode core wired to a `RecordingTube`. Any handshake write
/// raises `lines_on_write` on the returned probe's lines.
pub fn setup_recording(code: &[u8], lines_on_write: u8) -> (Cpu, TubeProbe) {
    let tube = RecordingTube::new(lines_on_write);
    let probe = tube.probe();
    let cpu = Cpu::new(rom_with_program(code), 0, Box::new(tube));
    (cpu, probe)
}

pub fn native_setup_recording(code: &[u8], lines_on_write: u8) -> (Cpu, TubeProbe) {
    let (mut cpu, probe) = setup_recording(code, lines_on_write);
    enter_native(&mut cpu);
    (cpu, probe)
}

pub trait CpuTestExt {
    fn run_steps(&mut self, n: usize);
}

impl CpuTestExt for Cpu {
    fn run_steps(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }
}

/// Test-side view of a `RecordingTube` after it was boxed into a core.
#[derive(Clone)]
pub struct TubeProbe {
    pub lines: TubeLines,
    writes: Rc<RefCell<Vec<(u32, u8)>>>,
}

impl TubeProbe {
    pub fn writes(&self) -> Vec<(u32, u8)> {
        self.writes.borrow().clone()
    }
}

/// Tube that logs handshake writes and reads back the register index.
pub struct RecordingTube {
    lines: TubeLines,
    writes: Rc<RefCell<Vec<(u32, u8)>>>,
    lines_on_write: u8,
}

impl RecordingTube {
    pub fn new(lines_on_write: u8) -> Self {
        Self {
            lines: TubeLines::new(),
            writes: Rc::new(RefCell::new(Vec::new())),
            lines_on_write,
        }
    }

    pub fn probe(&self) -> TubeProbe {
        TubeProbe {
            lines: self.lines.clone(),
            writes: Rc::clone(&self.writes),
        }
    }
}

impl Tube for RecordingTube {
    fn parasite_read(&mut self, addr: u32) -> u8 {
        (addr & 7) as u8
    }

    fn parasite_write(&mut self, addr: u32, val: u8) {
        self.writes.borrow_mut().push((addr, val));
        if self.lines_on_write != 0 {
            self.lines.assert(self.lines_on_write);
        }
    }

    fn irq_state(&self) -> u8 {
        self.lines.bits()
    }

    fn ack_nmi(&mut self) {
        self.lines.release(NMI_BIT);
    }

    fn wait_for_reset_release(&mut self) {
        self.lines.release(RESET_BIT);
    }
}
