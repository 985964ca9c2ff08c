// Tauri command handlers - one file per domain
pub mod jobs;
pub mod results;
