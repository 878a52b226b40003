//! Typed records over the file store
//!
//! Faces persist small fixed-size records. A [`Record`] knows its byte
//! layout and legal ranges; [`load`] and [`store`] move it through any
//! [`Filesystem`]. [`CachedFs`] is the RAM-backed store faces see on the
//! watch: writes land in RAM and are flushed to flash by the firmware.

use heapless::{String, Vec};

use crate::traits::{Filesystem, FsError};

/// Largest record any face stores
pub const MAX_RECORD_SIZE: usize = 64;

/// Files the cached store can hold
pub const MAX_FILES: usize = 16;

/// Longest file name (`scface12.001`)
pub const MAX_NAME_LEN: usize = 12;

/// Persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// The file store refused the write
    Fs(FsError),
    /// The record does not fit the encode buffer
    Encode,
}

impl From<FsError> for PersistError {
    fn from(e: FsError) -> Self {
        PersistError::Fs(e)
    }
}

/// A fixed-size, explicitly packed record
pub trait Record: Sized {
    /// Encoded size in bytes
    const SIZE: usize;

    /// Write the record into `out[..SIZE]`
    fn to_bytes(&self, out: &mut [u8]);

    /// Read a record from `bytes[..SIZE]`
    fn from_bytes(bytes: &[u8]) -> Self;

    /// Pull out-of-range fields back into range
    fn clamp(&mut self);
}

/// Load a record, treating missing or short files as all zeros
pub fn load<R: Record>(fs: &dyn Filesystem, name: &str) -> R {
    let mut buffer = [0u8; MAX_RECORD_SIZE];
    let size = R::SIZE.min(MAX_RECORD_SIZE);
    match fs.read(name, &mut buffer[..size]) {
        Ok(n) if n == size => {}
        _ => buffer = [0u8; MAX_RECORD_SIZE],
    }
    let mut record = R::from_bytes(&buffer[..size]);
    record.clamp();
    record
}

/// Store a record, writing exactly `R::SIZE` bytes
pub fn store<R: Record>(fs: &mut dyn Filesystem, name: &str, record: &R) -> Result<(), PersistError> {
    if R::SIZE > MAX_RECORD_SIZE {
        return Err(PersistError::Encode);
    }
    let mut buffer = [0u8; MAX_RECORD_SIZE];
    record.to_bytes(&mut buffer[..R::SIZE]);
    fs.write(name, &buffer[..R::SIZE])?;
    Ok(())
}

#[derive(Debug, Clone)]
struct CachedFile {
    name: String<MAX_NAME_LEN>,
    data: Vec<u8, MAX_RECORD_SIZE>,
    dirty: bool,
}

/// Pending change for the flash writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlushOp {
    Write {
        name: String<MAX_NAME_LEN>,
        data: Vec<u8, MAX_RECORD_SIZE>,
    },
    Remove {
        name: String<MAX_NAME_LEN>,
    },
}

/// RAM file store with dirty tracking
#[derive(Debug, Clone, Default)]
pub struct CachedFs {
    files: Vec<CachedFile, MAX_FILES>,
    removed: Vec<String<MAX_NAME_LEN>, MAX_FILES>,
}

impl CachedFs {
    pub const fn new() -> Self {
        Self {
            files: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Insert a file read back from flash without marking it dirty
    pub fn preload(&mut self, name: &str, data: &[u8]) -> Result<(), FsError> {
        self.put(name, data, false)
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.files.iter().position(|f| f.name.as_str() == name)
    }

    fn put(&mut self, name: &str, data: &[u8], dirty: bool) -> Result<(), FsError> {
        if name.len() > MAX_NAME_LEN {
            return Err(FsError::NameTooLong);
        }
        let data = Vec::from_slice(data).map_err(|_| FsError::TooLarge)?;
        if let Some(i) = self.find(name) {
            self.files[i].data = data;
            self.files[i].dirty |= dirty;
            return Ok(());
        }
        let mut file_name = String::new();
        file_name.push_str(name).map_err(|_| FsError::NameTooLong)?;
        self.files
            .push(CachedFile {
                name: file_name,
                data,
                dirty,
            })
            .map_err(|_| FsError::Full)?;
        self.removed.retain(|n| n.as_str() != name);
        Ok(())
    }

    /// Check if any change has not been flushed
    pub fn is_dirty(&self) -> bool {
        !self.removed.is_empty() || self.files.iter().any(|f| f.dirty)
    }

    /// Take the next pending change, clearing its dirty mark
    pub fn next_flush(&mut self) -> Option<FlushOp> {
        if let Some(name) = self.removed.pop() {
            return Some(FlushOp::Remove { name });
        }
        let file = self.files.iter_mut().find(|f| f.dirty)?;
        file.dirty = false;
        Some(FlushOp::Write {
            name: file.name.clone(),
            data: file.data.clone(),
        })
    }

    /// Put a change back after the flash write failed
    pub fn requeue(&mut self, op: FlushOp) {
        match op {
            FlushOp::Write { name, .. } => {
                if let Some(i) = self.find(&name) {
                    self.files[i].dirty = true;
                }
            }
            FlushOp::Remove { name } => {
                let _ = self.removed.push(name);
            }
        }
    }

    /// Number of files held
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Filesystem for CachedFs {
    fn exists(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    fn read(&self, name: &str, buffer: &mut [u8]) -> Result<usize, FsError> {
        let i = self.find(name).ok_or(FsError::NotFound)?;
        let data = &self.files[i].data;
        let n = data.len().min(buffer.len());
        buffer[..n].copy_from_slice(&data[..n]);
        Ok(n)
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), FsError> {
        self.put(name, data, true)
    }

    fn remove(&mut self, name: &str) -> Result<(), FsError> {
        let i = self.find(name).ok_or(FsError::NotFound)?;
        // Queue the flash removal before dropping the RAM copy
        if !self.removed.iter().any(|n| n.as_str() == name) {
            self.removed
                .push(self.files[i].name.clone())
                .map_err(|_| FsError::Full)?;
        }
        self.files.swap_remove(i);
        Ok(())
    }

    fn size(&self, name: &str) -> Option<usize> {
        self.find(name).map(|i| self.files[i].data.len())
    }

    fn free_space(&self) -> usize {
        let used: usize = self.files.iter().map(|f| f.data.len()).sum();
        MAX_FILES * MAX_RECORD_SIZE - used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Default)]
    struct Pair {
        hour: u8,
        minute: u8,
    }

    impl Record for Pair {
        const SIZE: usize = 2;

        fn to_bytes(&self, out: &mut [u8]) {
            out[0] = self.hour;
            out[1] = self.minute;
        }

        fn from_bytes(bytes: &[u8]) -> Self {
            Self {
                hour: bytes[0],
                minute: bytes[1],
            }
        }

        fn clamp(&mut self) {
            self.hour = self.hour.min(23);
            self.minute = self.minute.min(59);
        }
    }

    #[test]
    fn test_missing_file_loads_zero_record() {
        let fs = CachedFs::new();
        assert_eq!(load::<Pair>(&fs, "pair.bin"), Pair::default());
    }

    #[test]
    fn test_short_file_loads_zero_record() {
        let mut fs = CachedFs::new();
        fs.write("pair.bin", &[5]).unwrap();
        assert_eq!(load::<Pair>(&fs, "pair.bin"), Pair::default());
    }

    #[test]
    fn test_load_clamps() {
        let mut fs = CachedFs::new();
        fs.write("pair.bin", &[30, 99]).unwrap();
        assert_eq!(load::<Pair>(&fs, "pair.bin"), Pair { hour: 23, minute: 59 });
    }

    #[test]
    fn test_store_writes_exact_size() {
        let mut fs = CachedFs::new();
        store(&mut fs, "pair.bin", &Pair { hour: 7, minute: 45 }).unwrap();
        assert_eq!(fs.size("pair.bin"), Some(2));
        assert_eq!(load::<Pair>(&fs, "pair.bin"), Pair { hour: 7, minute: 45 });
    }

    #[test]
    fn test_cached_fs_limits() {
        let mut fs = CachedFs::new();
        assert_eq!(fs.write("a-very-long-name.bin", &[1]), Err(FsError::NameTooLong));
        assert_eq!(fs.write("big.bin", &[0; 65]), Err(FsError::TooLarge));
        for i in 0..MAX_FILES {
            let mut name: String<MAX_NAME_LEN> = String::new();
            core::fmt::write(&mut name, format_args!("f{}.bin", i)).unwrap();
            fs.write(&name, &[i as u8]).unwrap();
        }
        assert_eq!(fs.write("extra.bin", &[0]), Err(FsError::Full));
        assert_eq!(fs.free_space(), MAX_FILES * MAX_RECORD_SIZE - MAX_FILES);
    }

    #[test]
    fn test_dirty_tracking() {
        let mut fs = CachedFs::new();
        fs.preload("old.bin", &[1, 2]).unwrap();
        assert!(!fs.is_dirty());
        fs.write("new.bin", &[3]).unwrap();
        fs.remove("old.bin").unwrap();
        assert!(fs.is_dirty());

        let first = fs.next_flush().unwrap();
        assert!(matches!(first, FlushOp::Remove { ref name } if name.as_str() == "old.bin"));
        let second = fs.next_flush().unwrap();
        fs.requeue(second);
        assert!(fs.is_dirty());
        assert!(matches!(fs.next_flush(), Some(FlushOp::Write { .. })));
        assert_eq!(fs.next_flush(), None);
        assert!(!fs.is_dirty());
    }

    #[test]
    fn test_remove_with_full_queue_keeps_file() {
        let mut fs = CachedFs::new();
        for i in 0..MAX_FILES {
            let mut name: String<MAX_NAME_LEN> = String::new();
            core::fmt::write(&mut name, format_args!("f{}.bin", i)).unwrap();
            fs.write(&name, &[i as u8]).unwrap();
            fs.remove(&name).unwrap();
        }
        fs.write("keep.bin", &[7]).unwrap();
        assert_eq!(fs.remove("keep.bin"), Err(FsError::Full));
        assert_eq!(fs.size("keep.bin"), Some(1));

        assert!(matches!(fs.next_flush(), Some(FlushOp::Remove { .. })));
        fs.remove("keep.bin").unwrap();
        assert_eq!(fs.size("keep.bin"), None);
    }
}
