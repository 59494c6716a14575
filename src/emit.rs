use anyhow::{Context as _, Result};
use std::fs;
use std::path::Path;

/// Outcome of an idempotent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    Skipped,
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Generated text always uses `\n` internally; on Windows the final write
/// translates to the platform EOL.
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    ensure_parent_dir(path)?;

    let contents = if cfg!(windows) {
        contents.replace('\n', "\r\n")
    } else {
        contents.to_string()
    };

    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Files already on disk are authoritative and never overwritten. The check
/// and the write are not atomic.
pub fn write_if_missing(path: &Path, contents: &str) -> Result<WriteOutcome> {
    if path.exists() {
        return Ok(WriteOutcome::Skipped);
    }
    write_file(path, contents)?;
    Ok(WriteOutcome::Written)
}
