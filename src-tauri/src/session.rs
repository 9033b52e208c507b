use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::chart_api::{ChatEntry, Pattern, PatternCatalog, PatternListView};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Chart,
    Volume,
}

/// Per-window state. Lives as long as the window; nothing is persisted.
#[derive(Debug, Default)]
pub struct Session {
    chart_path: Option<PathBuf>,
    volume_path: Option<PathBuf>,
    forecast_text: String,
    shown_patterns: Vec<Pattern>,
    chat_log: Vec<ChatEntry>,
}

impl Session {
    pub fn new(catalog: &PatternCatalog) -> Self {
        Self {
            shown_patterns: catalog.all().to_vec(),
            ..Default::default()
        }
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&Path> {
        match slot {
            ImageSlot::Chart => self.chart_path.as_deref(),
            ImageSlot::Volume => self.volume_path.as_deref(),
        }
    }

    /// Only call after the image decoded successfully.
    pub fn set_image(&mut self, slot: ImageSlot, path: PathBuf) {
        match slot {
            ImageSlot::Chart => self.chart_path = Some(path),
            ImageSlot::Volume => self.volume_path = Some(path),
        }
    }

    pub fn both_images(&self) -> Option<(PathBuf, PathBuf)> {
        match (&self.chart_path, &self.volume_path) {
            (Some(chart), Some(volume)) => Some((chart.clone(), volume.clone())),
            _ => None,
        }
    }

    pub fn forecast_text(&self) -> Option<&str> {
        Some(self.forecast_text.as_str()).filter(|t| !t.trim().is_empty())
    }

    pub fn set_forecast_text(&mut self, text: String) {
        self.forecast_text = text;
    }

    pub fn shown_patterns(&self) -> &[Pattern] {
        &self.shown_patterns
    }

    pub fn show_all(&mut self, catalog: &PatternCatalog) {
        self.shown_patterns = catalog.all().to_vec();
    }

    /// Narrows the shown list to the recognized patterns; an empty result keeps the old list.
    pub fn show_recognized(&mut self, view: &PatternListView) {
        if !view.recognized.is_empty() {
            self.shown_patterns = view.recognized.clone();
        }
    }

    pub fn find_shown(&self, name: &str) -> Option<&Pattern> {
        let needle = name.trim().to_lowercase();
        self.shown_patterns
            .iter()
            .find(|p| p.name.to_lowercase() == needle)
    }

    pub fn record(&mut self, entries: &[ChatEntry]) {
        self.chat_log.extend_from_slice(entries);
    }

    pub fn chat_log(&self) -> &[ChatEntry] {
        &self.chat_log
    }
}
