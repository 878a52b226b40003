//! Flash storage driver for RP2040
//!
//! Uses sequential-storage for wear-leveled key-value storage
//! in the last 64KB of flash.
//!
//! Implements the `FlashStorage` trait from `movement-hal`. Face files are
//! listed in a directory record so they can be loaded back at boot; a
//! removed file is stored as an empty value.

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use embedded_storage_async::nor_flash::NorFlash;
use heapless::Vec;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

// Re-export shared types from movement-hal
pub use movement_hal::flash::{FileName, FlashError, StorageKey, MAX_FILE_NAME_LEN};

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash
pub const STORAGE_PARTITION_SIZE: usize = 64 * 1024;
pub const STORAGE_PARTITION_START: usize = FLASH_SIZE - STORAGE_PARTITION_SIZE;

/// Flash erase size for RP2040
pub const FLASH_ERASE_SIZE: usize = ERASE_SIZE;

/// Flash range for the storage partition
pub const STORAGE_RANGE: core::ops::Range<u32> = (STORAGE_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Largest value (the configuration TOML)
pub const MAX_VALUE_SIZE: usize = 1024;

/// Files tracked in the directory record
pub const MAX_FILES: usize = 16;

const DATA_BUFFER_SIZE: usize = MAX_VALUE_SIZE + 64;
const DIRECTORY_SIZE: usize = MAX_FILES * (MAX_FILE_NAME_LEN + 1);

/// Names of the stored face files
pub type Directory = Vec<FileName, MAX_FILES>;

/// RP2040 Flash storage implementation
pub struct Rp2040FlashStorage<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
}

impl<'d> Rp2040FlashStorage<'d> {
    /// Create a new flash storage instance
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
        }
    }

    /// Get the raw flash peripheral for low-level access
    pub fn flash(&mut self) -> &mut Flash<'d, FLASH, Async, FLASH_SIZE> {
        &mut self.flash
    }

    async fn fetch(&mut self, key: &StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        let result = map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            key,
        )
        .await;

        match result {
            // Empty values are removal markers
            Ok(Some(data)) if data.is_empty() => Err(FlashError::NotFound),
            Ok(Some(data)) => {
                let len = data.len();
                if buffer.len() < len {
                    return Err(FlashError::BufferTooSmall);
                }
                buffer[..len].copy_from_slice(data);
                Ok(len)
            }
            Ok(None) => Err(FlashError::NotFound),
            Err(_) => Err(FlashError::Storage),
        }
    }

    async fn store(&mut self, key: &StorageKey, data: &[u8]) -> Result<(), FlashError> {
        let mut data_buffer = [0u8; DATA_BUFFER_SIZE];

        map::store_item(
            &mut self.flash,
            STORAGE_RANGE,
            &mut NoCache::new(),
            &mut data_buffer,
            key,
            &data,
        )
        .await
        .map_err(|_| FlashError::Storage)
    }

    /// Names of every face file written so far
    pub async fn directory(&mut self) -> Directory {
        let mut raw = [0u8; DIRECTORY_SIZE];
        let len = self.fetch(&StorageKey::Directory, &mut raw).await.unwrap_or(0);
        decode_directory(&raw[..len])
    }

    async fn add_to_directory(&mut self, name: &FileName) -> Result<(), FlashError> {
        let mut directory = self.directory().await;
        if directory.contains(name) {
            return Ok(());
        }
        directory.push(name.clone()).map_err(|_| FlashError::Full)?;
        let mut raw = [0u8; DIRECTORY_SIZE];
        let len = encode_directory(&directory, &mut raw);
        self.store(&StorageKey::Directory, &raw[..len]).await
    }
}

/// Length-prefixed names, back to back
fn encode_directory(directory: &Directory, out: &mut [u8]) -> usize {
    let mut pos = 0;
    for name in directory {
        out[pos] = name.len() as u8;
        out[pos + 1..pos + 1 + name.len()].copy_from_slice(name.as_bytes());
        pos += 1 + name.len();
    }
    pos
}

fn decode_directory(mut raw: &[u8]) -> Directory {
    let mut directory = Directory::new();
    while let Some((&len, rest)) = raw.split_first() {
        let len = usize::from(len);
        let Some(bytes) = rest.get(..len) else {
            break;
        };
        if let Some(StorageKey::File(name)) = core::str::from_utf8(bytes).ok().and_then(StorageKey::file) {
            let _ = directory.push(name);
        }
        raw = &rest[len..];
    }
    directory
}

// Implement the shared FlashStorage trait
impl<'d> movement_hal::FlashStorage for Rp2040FlashStorage<'d> {
    async fn read(&mut self, key: &StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        self.fetch(key, buffer).await
    }

    async fn write(&mut self, key: &StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if data.is_empty() {
            return Err(FlashError::Corrupted);
        }
        if let StorageKey::File(name) = key {
            self.add_to_directory(name).await?;
        }
        self.store(key, data).await
    }

    async fn remove(&mut self, key: &StorageKey) -> Result<(), FlashError> {
        self.store(key, &[]).await
    }

    async fn exists(&mut self, key: &StorageKey) -> bool {
        let mut probe = [0u8; MAX_VALUE_SIZE];
        self.fetch(key, &mut probe).await.is_ok()
    }

    async fn erase_all(&mut self) -> Result<(), FlashError> {
        let start = STORAGE_PARTITION_START as u32;
        let end = FLASH_SIZE as u32;

        self.flash
            .erase(start, end)
            .await
            .map_err(|_| FlashError::Flash)
    }
}

/// Type alias matching the trait name
pub type FlashStorage<'d> = Rp2040FlashStorage<'d>;
