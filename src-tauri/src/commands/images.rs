use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tauri::State;

use crate::chart_api::image_utils::{has_image_extension, IMAGE_EXTENSIONS};
use crate::chart_api::{ChatEntry, ImagePreview, ViewSize};
use crate::error::AppError;
use crate::session::ImageSlot;
use crate::state::AppState;

#[derive(Debug, Serialize, Clone)]
pub struct ImageLoadResult {
    pub slot: ImageSlot,
    pub path: Option<String>,
    pub preview: Option<ImagePreview>,
    pub messages: Vec<ChatEntry>,
    pub analysis_ready: bool,
}

fn dialog_title(slot: ImageSlot) -> &'static str {
    match slot {
        ImageSlot::Chart => "Выберите изображение графика",
        ImageSlot::Volume => "Выберите изображение объёмов",
    }
}

fn loaded_message(slot: ImageSlot) -> &'static str {
    match slot {
        ImageSlot::Chart => "📊 График успешно загружен.",
        ImageSlot::Volume => "📈 Объёмы успешно загружены.",
    }
}

fn failed_message(slot: ImageSlot) -> &'static str {
    match slot {
        ImageSlot::Chart => "⚠️ Не удалось загрузить изображение графика",
        ImageSlot::Volume => "⚠️ Не удалось загрузить изображение объёмов",
    }
}

pub const ANALYSIS_STARTED: &str = "🧠 Анализ графика и объёмов...";

/// Decodes the file, stores its path in the slot, and reports whether analysis can start.
pub async fn load_image_internal(
    state: &AppState,
    slot: ImageSlot,
    path: PathBuf,
    size: ViewSize,
) -> ImageLoadResult {
    let mut messages = Vec::new();

    let loaded = if has_image_extension(&path) {
        state.previews.get_or_load(&path, size).await
    } else {
        Err(AppError::Invalid(format!("Unsupported file type: {}", path.display())))
    };

    let preview = match loaded {
        Ok(preview) => preview,
        Err(e) => {
            tracing::warn!(?slot, path = %path.display(), "Failed to load image: {}", e);
            messages.push(ChatEntry::status(failed_message(slot)));
            state.session.lock().await.record(&messages);
            return ImageLoadResult {
                slot,
                path: None,
                preview: None,
                messages,
                analysis_ready: false,
            };
        }
    };

    let mut session = state.session.lock().await;
    session.set_image(slot, path.clone());
    messages.push(ChatEntry::status(loaded_message(slot)));

    let analysis_ready = slot == ImageSlot::Volume && session.both_images().is_some();
    if analysis_ready {
        messages.push(ChatEntry::status(ANALYSIS_STARTED));
    }
    session.record(&messages);

    tracing::info!(?slot, path = %path.display(), "Image loaded");

    ImageLoadResult {
        slot,
        path: Some(path.display().to_string()),
        preview: Some(preview),
        messages,
        analysis_ready,
    }
}

async fn pick_image_internal(
    state: &AppState,
    slot: ImageSlot,
    size: ViewSize,
) -> Option<ImageLoadResult> {
    let title = dialog_title(slot);
    let picked = tokio::task::spawn_blocking(move || {
        rfd::FileDialog::new()
            .set_title(title)
            .add_filter("Изображения", IMAGE_EXTENSIONS.as_slice())
            .pick_file()
    })
    .await;

    let path = match picked {
        Ok(path) => path?,
        Err(e) => {
            tracing::error!("File dialog task failed: {}", e);
            return None;
        }
    };

    Some(load_image_internal(state, slot, path, size).await)
}

#[tauri::command]
pub async fn pick_chart_image(
    width: u32,
    height: u32,
    state: State<'_, Arc<AppState>>,
) -> Result<Option<ImageLoadResult>, String> {
    Ok(pick_image_internal(&state, ImageSlot::Chart, ViewSize { width, height }).await)
}

#[tauri::command]
pub async fn pick_volume_image(
    width: u32,
    height: u32,
    state: State<'_, Arc<AppState>>,
) -> Result<Option<ImageLoadResult>, String> {
    Ok(pick_image_internal(&state, ImageSlot::Volume, ViewSize { width, height }).await)
}

#[tauri::command]
pub async fn load_chart_image(
    path: String,
    width: u32,
    height: u32,
    state: State<'_, Arc<AppState>>,
) -> Result<ImageLoadResult, String> {
    Ok(load_image_internal(&state, ImageSlot::Chart, PathBuf::from(path), ViewSize { width, height }).await)
}

#[tauri::command]
pub async fn load_volume_image(
    path: String,
    width: u32,
    height: u32,
    state: State<'_, Arc<AppState>>,
) -> Result<ImageLoadResult, String> {
    Ok(load_image_internal(&state, ImageSlot::Volume, PathBuf::from(path), ViewSize { width, height }).await)
}
