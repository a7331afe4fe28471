use std::fs;
use std::path::PathBuf;

use log::info;

use crate::traits::SaveTarget;
use crate::types::Error;

/// Saves artifacts into a directory on disk, the OS-level "save as". The
/// returned path doubles as the completion signal: a failed write comes
/// back as an error instead of disappearing silently.
pub struct DiskTarget {
    dir: PathBuf,
}

impl DiskTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        DiskTarget { dir: dir.into() }
    }
}

impl SaveTarget for DiskTarget {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf, Error> {
        debug_assert!(!filename.contains(char::is_whitespace));

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        info!("saved {} ({} bytes)", path.display(), bytes.len());

        Ok(path)
    }
}

/// In-memory target for tests and embedders that hand the bytes elsewhere
#[derive(Debug, Default)]
pub struct MemoryTarget {
    pub artifacts: Vec<(String, Vec<u8>)>,
}

impl MemoryTarget {
    pub fn new() -> Self {
        MemoryTarget::default()
    }
}

impl SaveTarget for MemoryTarget {
    fn save(&mut self, filename: &str, bytes: &[u8]) -> Result<PathBuf, Error> {
        self.artifacts.push((filename.to_string(), bytes.to_vec()));
        Ok(PathBuf::from(filename))
    }
}
