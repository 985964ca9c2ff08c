// Atomic JSON file operations
use crate::error::MaipError;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

lazy_static::lazy_static! {
    static ref FILE_LOCK: Mutex<()> = Mutex::new(());
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, MaipError> {
    let _lock = FILE_LOCK.lock();

    let contents = fs::read_to_string(path)
        .map_err(|e| MaipError::Storage(format!("failed to read {:?}: {}", path, e)))?;
    serde_json::from_str(&contents)
        .map_err(|e| MaipError::Storage(format!("failed to parse {:?}: {}", path, e)))
}

/// Writes JSON atomically: write to a temp file, fsync, rename over
/// the target. A crash mid-write never leaves a truncated registry.
pub fn write_json_file<T: Serialize>(path: &Path, data: &T) -> Result<(), MaipError> {
    let _lock = FILE_LOCK.lock();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            MaipError::Storage(format!("failed to create directory {:?}: {}", parent, e))
        })?;
    }

    let json = serde_json::to_string_pretty(data)
        .map_err(|e| MaipError::Storage(format!("failed to serialize data: {}", e)))?;

    let temp_path = path.with_extension("tmp");
    let mut temp_file = File::create(&temp_path)
        .map_err(|e| MaipError::Storage(format!("failed to create {:?}: {}", temp_path, e)))?;
    temp_file
        .write_all(json.as_bytes())
        .map_err(|e| MaipError::Storage(format!("failed to write {:?}: {}", temp_path, e)))?;
    temp_file
        .sync_all()
        .map_err(|e| MaipError::Storage(format!("failed to sync {:?}: {}", temp_path, e)))?;

    fs::rename(&temp_path, path)
        .map_err(|e| MaipError::Storage(format!("failed to replace {:?}: {}", path, e)))
}

pub fn initialize_json_file<T: Serialize>(path: &Path, default: &T) -> Result<(), MaipError> {
    if !path.exists() {
        log::info!("Initializing JSON file: {:?}", path);
        write_json_file(path, default)?;
    }
    Ok(())
}
