use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("ROM image is empty")]
    EmptyRom,

    #[error("ROM image is {len} bytes, the ROM window holds at most {max}")]
    RomTooLarge { len: usize, max: usize },

    #[error("failed to read ROM image {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
