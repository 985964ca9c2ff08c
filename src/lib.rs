mod chart;
mod commands;
mod error;
mod file_manager;
mod logging;
mod maip;
mod models;
mod poller;
mod tracker;
mod utils;

use commands::{
    jobs::{cancel_watch, get_job_status, list_jobs, submit_job, watch_job},
    results::fetch_results,
};
use error::MaipError;
use file_manager::initialize_json_file;
use std::collections::HashMap;
use utils::{get_job_registry_json_path, initialize_data_directories};

fn initialize_app_data() -> Result<(), MaipError> {
    initialize_data_directories()?;
    initialize_json_file(
        &get_job_registry_json_path(),
        &HashMap::<String, String>::new(),
    )?;
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    if let Err(e) = initialize_app_data() {
        eprintln!("Failed to initialize app data: {}", e);
    }

    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::new()
                .level(log::LevelFilter::Info)
                .build(),
        )
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .setup(|_app| {
            logging::cleanup_old_logs();
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Job commands
            submit_job,
            list_jobs,
            get_job_status,
            watch_job,
            cancel_watch,
            // Results commands
            fetch_results,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
