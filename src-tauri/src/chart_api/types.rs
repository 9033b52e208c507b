use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Pattern {
    pub name: String,
    pub description: String,
    pub image_path: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    Status,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: String,
}

impl ChatEntry {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }

    pub fn status(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Status, text)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ImagePreview {
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum Forecast {
    Found(String),
    NotFound,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct PatternMatches {
    pub detected: Vec<String>,
    pub new_patterns: Vec<String>,
}

impl PatternMatches {
    pub fn is_empty(&self) -> bool {
        self.detected.is_empty() && self.new_patterns.is_empty()
    }
}

/// What the pattern list shows after an analysis.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PatternListView {
    pub recognized: Vec<Pattern>,
    pub new_patterns: Vec<String>,
    pub empty_title: Option<String>,
    pub empty_description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AnalysisReport {
    pub raw_text: String,
    pub forecast: Forecast,
    pub forecast_label: String,
    pub matches: PatternMatches,
    pub view: PatternListView,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PatternDetails {
    pub name: String,
    pub description: String,
    pub preview: Option<ImagePreview>,
    pub placeholder: Option<String>,
}
