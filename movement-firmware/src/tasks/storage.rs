//! Storage task
//!
//! Owns the flash. Writes face file changes once a burst of writes has
//! settled, and saves the settings record when it changes.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Timer};

use movement_core::persistence::FlushOp;
use movement_core::services::settings::{SettingsRecord, SETTINGS_RECORD_MAX_SIZE};
use movement_hal_rp2040::flash::{FlashError, FlashStorage, StorageKey};
use movement_hal_rp2040::FlashStorageTrait;

use crate::channels::{FLUSH_FILES, SAVE_SETTINGS};
use crate::files;

/// Quiet time before dirty files are written
const FLUSH_DELAY: Duration = Duration::from_secs(2);

#[embassy_executor::task]
pub async fn storage_task(mut storage: FlashStorage<'static>) {
    info!("Storage task started");

    loop {
        match select(FLUSH_FILES.wait(), SAVE_SETTINGS.wait()).await {
            Either::First(()) => {
                Timer::after(FLUSH_DELAY).await;
                flush_files(&mut storage).await;
            }
            Either::Second(record) => {
                if let Err(e) = save_settings(&mut storage, &record).await {
                    warn!("Failed to save settings: {:?}", e);
                }
            }
        }
    }
}

fn op_name(op: &FlushOp) -> &str {
    match op {
        FlushOp::Write { name, .. } | FlushOp::Remove { name } => name.as_str(),
    }
}

async fn apply(storage: &mut FlashStorage<'static>, op: &FlushOp) -> Result<(), FlashError> {
    let key = StorageKey::file(op_name(op)).ok_or(FlashError::Corrupted)?;
    match op {
        FlushOp::Write { data, .. } => storage.write(&key, data).await,
        FlushOp::Remove { .. } => storage.remove(&key).await,
    }
}

/// Drain the dirty files; a failure puts the change back for next time
async fn flush_files(storage: &mut FlashStorage<'static>) {
    let mut flushed = 0u32;
    while let Some(op) = files::next_flush() {
        match apply(storage, &op).await {
            Ok(()) => flushed += 1,
            Err(e) => {
                warn!("Flush of {} failed: {:?}", op_name(&op), e);
                files::requeue(op);
                break;
            }
        }
    }
    if flushed > 0 {
        info!("Flushed {} file changes", flushed);
    }
}

async fn save_settings(storage: &mut FlashStorage<'static>, record: &SettingsRecord) -> Result<(), FlashError> {
    let mut buffer = [0u8; SETTINGS_RECORD_MAX_SIZE];
    let bytes = record.encode(&mut buffer).map_err(|_| FlashError::BufferTooSmall)?;
    storage.write(&StorageKey::Settings, bytes).await?;
    debug!("Settings saved");
    Ok(())
}
