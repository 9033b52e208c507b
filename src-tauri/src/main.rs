// Prevents additional console window on Windows in release, DO NOT REMOVE!!
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod cache;
mod chart_api;
mod commands;
mod config;
mod error;
mod session;
mod state;

use std::sync::Arc;

use anyhow::Context;
use tauri::Manager;
use tracing_subscriber::{fmt, EnvFilter};

use chart_api::PatternCatalog;
use config::AppConfig;
use state::AppState;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

fn load_settings() -> anyhow::Result<(AppConfig, PatternCatalog)> {
    let config = AppConfig::from_env().context("Failed to load API credentials")?;
    let catalog = PatternCatalog::builtin().context("Failed to load pattern catalog")?;

    tracing::info!(
        patterns = catalog.len(),
        image_generation = config.openai.is_some(),
        vision_model = %config.vision_model,
        "Configuration loaded"
    );
    if config.openai.is_none() {
        tracing::warn!("OPENAI_API_KEY is not set; forecast image generation is disabled");
    }

    Ok((config, catalog))
}

fn main() {
    init_tracing();

    let (config, mut catalog) = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    };

    tauri::Builder::default()
        .setup(move |app| {
            // Reference images are bundled as resources.
            match app.path().resource_dir() {
                Ok(dir) => catalog.resolve_images(&dir),
                Err(e) => tracing::warn!("Resource directory unavailable: {}", e),
            }
            app.manage(Arc::new(AppState::new(config, catalog)));
            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            commands::patterns::list_patterns,
            commands::patterns::shown_patterns,
            commands::patterns::show_pattern,
            commands::images::pick_chart_image,
            commands::images::pick_volume_image,
            commands::images::load_chart_image,
            commands::images::load_volume_image,
            commands::analysis::analyze_loaded_images,
            commands::analysis::generate_future_chart,
            commands::analysis::generate_forecast_image,
            commands::chat::send_chat_message,
            commands::chat::chat_history,
            commands::chat::assistant_name
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
