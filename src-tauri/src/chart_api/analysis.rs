use std::path::{Path, PathBuf};

use super::image_utils::encode_image_file;
use super::llm_client::{ChatMessage, ModelClient};
use super::patterns::PatternCatalog;
use super::prompts::*;
use super::result_parser::{build_pattern_view, extract_forecast, extract_pattern_names};
use super::types::AnalysisReport;
use crate::error::{AppError, AppResult};

pub const NO_MODEL_ANSWER: &str = "❌ Нет ответа от модели";
pub const FORECAST_IMAGE_PATH: &str = "forecast_chart.png";

pub fn analysis_messages(
    catalog: &PatternCatalog,
    chart_data_url: String,
    volume_data_url: String,
) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(analysis_system_prompt(&catalog.summary())),
        ChatMessage::user_with_images(ANALYSIS_USER_PROMPT, vec![chart_data_url, volume_data_url]),
    ]
}

pub fn continuation_messages(chart_data_url: String) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(CONTINUATION_SYSTEM_PROMPT),
        ChatMessage::user_with_images(CONTINUATION_USER_PROMPT, vec![chart_data_url]),
    ]
}

pub fn assistant_messages(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(ASSISTANT_SYSTEM_PROMPT),
        ChatMessage::user(text),
    ]
}

/// Sends chart and volume images together and returns the model's raw text.
pub async fn analyze_chart_with_volume(
    client: &ModelClient,
    model: &str,
    catalog: &PatternCatalog,
    chart: &Path,
    volume: &Path,
) -> AppResult<String> {
    let chart_url = encode_image_file(chart).await?;
    let volume_url = encode_image_file(volume).await?;

    let messages = analysis_messages(catalog, chart_url, volume_url);
    let content = client.chat_completion(model, &messages).await?;

    Ok(content
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| NO_MODEL_ANSWER.to_string()))
}

pub fn build_analysis_report(raw_text: String, catalog: &PatternCatalog) -> AnalysisReport {
    let forecast = extract_forecast(&raw_text);
    let matches = extract_pattern_names(&raw_text, catalog);
    let view = build_pattern_view(&matches, catalog);

    tracing::info!(
        detected = matches.detected.len(),
        new_patterns = matches.new_patterns.len(),
        forecast = forecast.label(),
        "Parsed analysis answer"
    );

    AnalysisReport {
        forecast_label: forecast.label().to_string(),
        forecast,
        matches,
        view,
        raw_text,
    }
}

/// Asks the vision model to continue the chart and returns its description.
pub async fn forecast_continuation(
    client: &ModelClient,
    model: &str,
    chart: &Path,
) -> AppResult<String> {
    let chart_url = encode_image_file(chart).await?;
    let messages = continuation_messages(chart_url);
    client
        .chat_completion(model, &messages)
        .await?
        .filter(|c| !c.trim().is_empty())
        .ok_or(AppError::MissingContent)
}

pub async fn ask_assistant(client: &ModelClient, model: &str, text: &str) -> AppResult<String> {
    client
        .chat_completion(model, &assistant_messages(text))
        .await?
        .ok_or(AppError::MissingContent)
}

/// Renders the forecast text into an image and writes it to `out_path`.
pub async fn generate_forecast_image(
    client: &ModelClient,
    model: &str,
    size: &str,
    forecast_text: &str,
    out_path: &Path,
) -> AppResult<PathBuf> {
    let prompt = forecast_image_prompt(forecast_text);
    let bytes = client.generate_image(model, &prompt, size).await?;
    tokio::fs::write(out_path, &bytes).await?;
    tracing::info!(path = %out_path.display(), bytes = bytes.len(), "Forecast image written");
    Ok(out_path.to_path_buf())
}
