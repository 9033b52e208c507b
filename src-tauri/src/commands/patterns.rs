use std::path::Path;
use std::sync::Arc;

use tauri::State;

use crate::chart_api::{Pattern, PatternDetails, ViewSize};
use crate::state::AppState;

pub const NO_IMAGE: &str = "Нет изображения";

#[tauri::command]
pub async fn list_patterns(state: State<'_, Arc<AppState>>) -> Result<Vec<Pattern>, String> {
    let mut session = state.session.lock().await;
    session.show_all(&state.catalog);
    Ok(session.shown_patterns().to_vec())
}

#[tauri::command]
pub async fn shown_patterns(state: State<'_, Arc<AppState>>) -> Result<Vec<Pattern>, String> {
    Ok(state.session.lock().await.shown_patterns().to_vec())
}

pub async fn show_pattern_internal(
    state: &AppState,
    name: &str,
    size: ViewSize,
) -> Option<PatternDetails> {
    let pattern = {
        let session = state.session.lock().await;
        session
            .find_shown(name)
            .cloned()
            .or_else(|| state.catalog.find(name).cloned())
    }?;

    let path = Path::new(&pattern.image_path);
    let preview = if path.exists() {
        match state.previews.get_or_load(path, size).await {
            Ok(preview) => Some(preview),
            Err(e) => {
                tracing::warn!(pattern = %pattern.name, "Reference image unusable: {}", e);
                None
            }
        }
    } else {
        None
    };

    Some(PatternDetails {
        placeholder: preview.is_none().then(|| NO_IMAGE.to_string()),
        name: pattern.name,
        description: pattern.description,
        preview,
    })
}

#[tauri::command]
pub async fn show_pattern(
    name: String,
    width: u32,
    height: u32,
    state: State<'_, Arc<AppState>>,
) -> Result<Option<PatternDetails>, String> {
    Ok(show_pattern_internal(&state, &name, ViewSize { width, height }).await)
}
