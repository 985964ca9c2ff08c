use crate::error::MaipError;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

static APP_DATA_DIR: OnceLock<PathBuf> = OnceLock::new();

pub fn get_app_data_dir() -> PathBuf {
    APP_DATA_DIR
        .get_or_init(|| {
            let base_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
            base_dir.join("MAIP")
        })
        .clone()
}

pub fn get_data_dir() -> PathBuf {
    get_app_data_dir().join("data")
}

pub fn get_logs_dir() -> PathBuf {
    get_app_data_dir().join("logs")
}

pub fn get_job_registry_json_path() -> PathBuf {
    get_data_dir().join("job_registry.json")
}

pub fn initialize_data_directories() -> Result<(), MaipError> {
    for dir in [get_data_dir(), get_logs_dir()] {
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                MaipError::Storage(format!("failed to create directory {:?}: {}", dir, e))
            })?;
            log::info!("Created directory: {:?}", dir);
        }
    }
    Ok(())
}
