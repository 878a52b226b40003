//! Face file store shared between the runtime and the storage task
//!
//! Faces write into a RAM [`CachedFs`]; the storage task drains its dirty
//! files into flash. [`SharedFs`] is the handle the runtime holds.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use movement_core::persistence::{CachedFs, FlushOp};
use movement_core::traits::{Filesystem, FsError};

static FILES: Mutex<CriticalSectionRawMutex, RefCell<CachedFs>> = Mutex::new(RefCell::new(CachedFs::new()));

/// Load a file read back from flash at boot
pub fn preload(name: &str, data: &[u8]) -> Result<(), FsError> {
    FILES.lock(|fs| fs.borrow_mut().preload(name, data))
}

/// Check if anything is waiting for the storage task
pub fn is_dirty() -> bool {
    FILES.lock(|fs| fs.borrow().is_dirty())
}

/// Take the next change to write out
pub fn next_flush() -> Option<FlushOp> {
    FILES.lock(|fs| fs.borrow_mut().next_flush())
}

/// Put back a change that failed to reach flash
pub fn requeue(op: FlushOp) {
    FILES.lock(|fs| fs.borrow_mut().requeue(op));
}

/// Filesystem handle given to the runtime
pub struct SharedFs;

impl Filesystem for SharedFs {
    fn exists(&self, name: &str) -> bool {
        FILES.lock(|fs| fs.borrow().exists(name))
    }

    fn read(&self, name: &str, buffer: &mut [u8]) -> Result<usize, FsError> {
        FILES.lock(|fs| fs.borrow().read(name, buffer))
    }

    fn write(&mut self, name: &str, data: &[u8]) -> Result<(), FsError> {
        FILES.lock(|fs| fs.borrow_mut().write(name, data))
    }

    fn remove(&mut self, name: &str) -> Result<(), FsError> {
        FILES.lock(|fs| fs.borrow_mut().remove(name))
    }

    fn size(&self, name: &str) -> Option<usize> {
        FILES.lock(|fs| fs.borrow().size(name))
    }

    fn free_space(&self) -> usize {
        FILES.lock(|fs| fs.borrow().free_space())
    }
}
