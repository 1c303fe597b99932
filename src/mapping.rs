use std::fs::File;

use memmap2::Mmap;

use crate::error::CoreError;

/// A read-only whole-file memory mapping.
///
/// Owns the backing region for the lifetime of the struct. Every index
/// derived from the mapping (line references, device rows, chunk sources)
/// stores plain offset/length pairs rather than pointers, so those indices
/// outlive a `&Mapping` borrow without any unsafe lifetime juggling; the
/// `Mmap` itself is the sole pointer-bearing owner.
pub struct Mapping {
    mmap: Mmap,
}

impl Mapping {
    /// Open `path` read-only and map it whole.
    ///
    /// Fails with [`CoreError::Io`] on open/stat failure, [`CoreError::EmptyFile`]
    /// when the file is zero-length, and [`CoreError::MapError`] if the OS
    /// mapping call itself fails.
    pub fn open(path: &std::path::Path) -> Result<Self, CoreError> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Err(CoreError::EmptyFile);
        }

        // SAFETY: the file is opened read-only and not concurrently truncated
        // by this process; external truncation is a pre-existing hazard of
        // any mmap-based tool and is outside this crate's control.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| CoreError::MapError(e.to_string()))?;

        Ok(Self { mmap })
    }

    /// Borrow the whole mapped region.
    pub fn bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }
}

// Dropping `Mapping` tears down the mapping (memmap2's `Mmap::drop` calls
// `munmap`); no explicit `release` call is needed.

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_rejected() {
        let f = tempfile::NamedTempFile::new().unwrap();
        let err = Mapping::open(f.path()).unwrap_err();
        assert!(matches!(err, CoreError::EmptyFile));
    }

    #[test]
    fn maps_whole_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"header\ndata\n").unwrap();
        let mapping = Mapping::open(f.path()).unwrap();
        assert_eq!(mapping.bytes(), b"header\ndata\n");
    }
}
