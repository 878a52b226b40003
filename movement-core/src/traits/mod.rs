//! Collaborator traits
//!
//! These traits define the interface between the runtime and the pieces
//! it treats as external: the on-board file store, the entropy source,
//! the time-zone rules and the LCD variant probe.

pub mod fs;
pub mod lcd;
pub mod random;
pub mod zone;

pub use fs::{Filesystem, FsError};
pub use lcd::{LcdProbe, ProbeSample};
pub use random::{RandomSource, Xorshift32};
pub use zone::{FixedZones, ZoneTable};
