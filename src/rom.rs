use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Size of the ROM window at `$8000-$FFFF`.
pub const ROM_SIZE: usize = 0x8000;

/// Fill byte for the unused part of a short ROM image.
const ROM_FILL: u8 = 0xFF;

/// The co-processor's boot ROM, always exactly one 32 KiB window.
///
/// Images shorter than the window are right-aligned so their last byte
/// sits at `$FFFF` (the vectors live at the top); the gap below is
/// filled with `0xFF`.
#[derive(Clone)]
pub struct RomImage {
    data: Box<[u8]>,
}

impl RomImage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::EmptyRom);
        }
        if bytes.len() > ROM_SIZE {
            return Err(Error::RomTooLarge {
                len: bytes.len(),
                max: ROM_SIZE,
            });
        }
        let mut data = vec![ROM_FILL; ROM_SIZE].into_boxed_slice();
        data[ROM_SIZE - bytes.len()..].copy_from_slice(bytes);
        Ok(Self { data })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded ROM {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(&bytes)
    }

    /// Read the byte at `offset` within the window (wrapped to 32 KiB).
    #[inline]
    pub fn read(&self, offset: u32) -> u8 {
        self.data[offset as usize & (ROM_SIZE - 1)]
    }
}

impl std::fmt::Debug for RomImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RomImage")
            .field("reset_vector", &u16::from_le_bytes([self.read(0x7FFC), self.read(0x7FFD)]))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_image_is_taken_verbatim() {
        let mut bytes = vec![0u8; ROM_SIZE];
        bytes[0] = 0x11;
        bytes[ROM_SIZE - 1] = 0x22;
        let rom = RomImage::from_bytes(&bytes).expect("rom");
        assert_eq!(rom.read(0), 0x11);
        assert_eq!(rom.read(0x7FFF), 0x22);
    }

    #[test]
    fn short_image_is_right_aligned() {
        // A 2 KiB image ends up at $F800-$FFFF.
        let mut bytes = vec![0xEA; 0x800];
        bytes[0] = 0xA9;
        let rom = RomImage::from_bytes(&bytes).expect("rom");
        assert_eq!(rom.read(0x7800), 0xA9);
        assert_eq!(rom.read(0x77FF), 0xFF);
        assert_eq!(rom.read(0x0000), 0xFF);
    }

    #[test]
    fn empty_and_oversized_images_are_rejected() {
        assert!(matches!(RomImage::from_bytes(&[]), Err(Error::EmptyRom)));
        let big = vec![0u8; ROM_SIZE + 1];
        match RomImage::from_bytes(&big) {
            Err(Error::RomTooLarge { len, max }) => {
                assert_eq!(len, ROM_SIZE + 1);
                assert_eq!(max, ROM_SIZE);
            }
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RomImage::from_file("/nonexistent/copro816.rom").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/copro816.rom"));
    }
}
