/*!
RAM module: the co-processor's 512 KiB of linear RAM.

The 19-bit address space ($00000-$7FFFF) maps one-to-one onto this
array. The two 16 KiB paging windows in bank 0 also land here, at
`page * 16K + offset`, which is what `paged_index` computes.
*/

/// Size of co-processor RAM (in bytes).
pub const RAM_SIZE: usize = 0x8_0000;

/// Size of one paging window / RAM page.
pub const PAGE_SIZE: u32 = 0x4000;

pub struct Ram {
    data: Box<[u8]>,
}

impl Default for Ram {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Ram {
    /// Create a new RAM instance initialized to 0.
    pub fn new() -> Self {
        Self {
            data: vec![0; RAM_SIZE].into_boxed_slice(),
        }
    }

    /// Read a byte at a physical RAM index (wrapped to the RAM size).
    #[inline]
    pub fn read(&self, idx: u32) -> u8 {
        self.data[idx as usize & (RAM_SIZE - 1)]
    }

    /// Write a byte at a physical RAM index (wrapped to the RAM size).
    #[inline]
    pub fn write(&mut self, idx: u32, value: u8) {
        self.data[idx as usize & (RAM_SIZE - 1)] = value;
    }

    /// Physical index of `addr` seen through a 16 KiB window showing `page`.
    #[inline]
    pub fn paged_index(page: u8, addr: u32) -> u32 {
        (addr & (PAGE_SIZE - 1)) | (((page & 7) as u32) << 14)
    }
}

impl std::fmt::Debug for Ram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ram").field("len", &self.data.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_write_wraps_to_size() {
        let mut ram = Ram::new();
        ram.write(0x8_0010, 0x5A);
        assert_eq!(ram.read(0x10), 0x5A);
    }

    #[test]
    fn paged_index_selects_16k_page() {
        assert_eq!(Ram::paged_index(0, 0x4123), 0x0123);
        assert_eq!(Ram::paged_index(5, 0x4123), 0x1_4123);
        assert_eq!(Ram::paged_index(7, 0xBFFF), 0x1_FFFF);
        // Only the low three bits of the page select are used.
        assert_eq!(Ram::paged_index(0x0F, 0x8000), Ram::paged_index(7, 0x8000));
    }
}
