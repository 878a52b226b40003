//! Flash storage abstractions
//!
//! Provides traits for persistent key-value storage that can be implemented
//! by chip-specific HALs using their flash memory.

use heapless::String;

/// Maximum length of a face-owned file name (`since001.u32`, `scface01.001`)
pub const MAX_FILE_NAME_LEN: usize = 12;

/// Face-owned file name
pub type FileName = String<MAX_FILE_NAME_LEN>;

/// Tag bytes used when serializing a [`StorageKey`]
const TAG_SETTINGS: u8 = 0;
const TAG_CONFIG_TOML: u8 = 1;
const TAG_FILE: u8 = 2;
const TAG_DIRECTORY: u8 = 3;

/// Storage keys for persisted data
///
/// These keys identify different types of data stored in flash.
/// The actual storage implementation handles wear leveling and
/// data integrity.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageKey {
    /// Watch settings record (binary postcard format)
    Settings,
    /// Watch configuration as TOML text
    ConfigToml,
    /// A small face-owned file
    File(FileName),
    /// Names of the stored files
    Directory,
}

impl StorageKey {
    /// Build a file key, rejecting names that do not fit
    pub fn file(name: &str) -> Option<Self> {
        let mut file = FileName::new();
        file.push_str(name).ok()?;
        Some(StorageKey::File(file))
    }

    /// Get the key tag as a byte value
    pub fn tag(&self) -> u8 {
        match self {
            StorageKey::Settings => TAG_SETTINGS,
            StorageKey::ConfigToml => TAG_CONFIG_TOML,
            StorageKey::File(_) => TAG_FILE,
            StorageKey::Directory => TAG_DIRECTORY,
        }
    }

    /// Number of bytes this key occupies when serialized
    pub fn serialized_len(&self) -> usize {
        match self {
            StorageKey::File(name) => 2 + name.len(),
            _ => 1,
        }
    }

    /// Write the key into `buffer`, returning the number of bytes used
    pub fn encode(&self, buffer: &mut [u8]) -> Option<usize> {
        let len = self.serialized_len();
        if buffer.len() < len {
            return None;
        }
        buffer[0] = self.tag();
        if let StorageKey::File(name) = self {
            buffer[1] = name.len() as u8;
            buffer[2..len].copy_from_slice(name.as_bytes());
        }
        Some(len)
    }

    /// Read a key from the start of `buffer`
    pub fn decode(buffer: &[u8]) -> Option<(Self, usize)> {
        match *buffer.first()? {
            TAG_SETTINGS => Some((StorageKey::Settings, 1)),
            TAG_CONFIG_TOML => Some((StorageKey::ConfigToml, 1)),
            TAG_DIRECTORY => Some((StorageKey::Directory, 1)),
            TAG_FILE => {
                let len = *buffer.get(1)? as usize;
                let bytes = buffer.get(2..2 + len)?;
                let name = core::str::from_utf8(bytes).ok()?;
                let key = StorageKey::file(name)?;
                Some((key, 2 + len))
            }
            _ => None,
        }
    }
}

/// Errors from flash storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Flash operation failed
    Flash,
    /// Storage operation failed
    Storage,
    /// Key not found
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
    /// Data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

/// Flash storage trait
///
/// Provides wear-leveled key-value storage for settings and face files.
/// Implementations should handle:
/// - Wear leveling across flash sectors
/// - Data integrity (CRC or similar)
/// - Atomic writes where possible
pub trait FlashStorage {
    /// Read a value by key into the provided buffer
    ///
    /// # Returns
    /// The number of bytes read, or an error.
    fn read(
        &mut self,
        key: &StorageKey,
        buffer: &mut [u8],
    ) -> impl core::future::Future<Output = Result<usize, FlashError>>;

    /// Write a value by key
    fn write(
        &mut self,
        key: &StorageKey,
        data: &[u8],
    ) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Remove a value by key
    fn remove(&mut self, key: &StorageKey) -> impl core::future::Future<Output = Result<(), FlashError>>;

    /// Check if a key exists in storage
    fn exists(&mut self, key: &StorageKey) -> impl core::future::Future<Output = bool>;

    /// Erase all stored data
    ///
    /// This erases the entire storage partition. Use with caution!
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), FlashError>>;
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        self.encode(buffer)
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        StorageKey::decode(buffer).ok_or(sequential_storage::map::SerializationError::InvalidFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_keys_encode_to_one_byte() {
        let mut buf = [0u8; 4];
        assert_eq!(StorageKey::Settings.encode(&mut buf), Some(1));
        assert_eq!(buf[0], 0);
        assert_eq!(StorageKey::ConfigToml.encode(&mut buf), Some(1));
        assert_eq!(buf[0], 1);
        assert_eq!(StorageKey::Directory.encode(&mut buf), Some(1));
        assert_eq!(StorageKey::decode(&buf), Some((StorageKey::Directory, 1)));
    }

    #[test]
    fn test_file_key_layout() {
        let key = StorageKey::file("location.u32").unwrap();
        let mut buf = [0u8; 16];
        assert_eq!(key.encode(&mut buf), Some(14));
        assert_eq!(buf[0], 2);
        assert_eq!(buf[1], 12);
        assert_eq!(&buf[2..14], b"location.u32");
        assert_eq!(StorageKey::decode(&buf), Some((key, 14)));
    }

    #[test]
    fn test_file_name_too_long() {
        assert!(StorageKey::file("a-very-long-name.bin").is_none());
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let key = StorageKey::file("since000.u32").unwrap();
        let mut buf = [0u8; 4];
        assert_eq!(key.encode(&mut buf), None);
    }

    #[test]
    fn test_decode_rejects_unknown_tag() {
        assert_eq!(StorageKey::decode(&[9]), None);
        assert_eq!(StorageKey::decode(&[2, 5, b'a']), None);
    }
}
