use std::path::PathBuf;

use crate::types::Error;

/// Destination for a finished export artifact, the "save as" half of the
/// pipeline. Unlike a fire-and-forget browser download this reports
/// completion or failure, so a failed save surfaces like any other export
/// error instead of being silently assumed successful.
pub trait SaveTarget {
    /// persist `bytes` under `filename`, returning where the artifact landed
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf, Error>;
}
