#![doc = r#"
copro816 library crate.

A 65816 second-processor core for a tube-attached host. The host side of
the tube is abstracted behind a trait; everything else (CPU, memory map,
banking, supervisor loop) lives here.

Modules:
- bus: RAM, ROM window, banking latches and the cycle counter
- config: supervisor configuration
- copro: supervisor loop (slices, reset handling)
- cpu: 65816 core (state, addressing, ALU, opcode tables, `Cpu` façade)
- error: crate error type
- rom: ROM image loading and placement
- tube: `Tube` trait, control-line bits and a null implementation

In tests, shared fixtures are available under `crate::test_utils`.
"#]

pub mod bus;
pub mod config;
pub mod copro;
pub mod cpu;
pub mod error;
pub mod rom;
pub mod tube;

pub use bus::Bus;
pub use config::CoproConfig;
pub use copro::Copro65816;
pub use cpu::core::Cpu;
pub use error::{Error, Result};
pub use rom::RomImage;
pub use tube::{NullTube, Tube, TubeLines};

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
