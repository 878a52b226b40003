//! Small key-value file store seen by faces

/// Errors from file operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FsError {
    /// No file with that name
    NotFound,
    /// Name does not fit the file table
    NameTooLong,
    /// Data larger than a file slot
    TooLarge,
    /// No free file slots
    Full,
}

/// Non-volatile file store
///
/// Writes replace the whole file; atomicity is the implementation's
/// responsibility.
pub trait Filesystem {
    /// Check if a file exists
    fn exists(&self, name: &str) -> bool;

    /// Read a file into `buffer`, returning the number of bytes copied
    fn read(&self, name: &str, buffer: &mut [u8]) -> Result<usize, FsError>;

    /// Create or replace a file
    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), FsError>;

    /// Delete a file
    fn remove(&mut self, name: &str) -> Result<(), FsError>;

    /// Size of a file in bytes
    fn size(&self, name: &str) -> Option<usize>;

    /// Remaining capacity in bytes
    fn free_space(&self) -> usize;
}
