use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tauri::State;

use crate::chart_api::{
    analyze_chart_with_volume, build_analysis_report, forecast_continuation,
    generate_forecast_image as render_forecast_image, AnalysisReport, ChatEntry, ChatRole,
    ImagePreview, ViewSize, FORECAST_IMAGE_PATH,
};
use crate::session::ImageSlot;
use crate::state::AppState;

pub const NEED_BOTH_IMAGES: &str = "⚠️ Сначала загрузите график и объёмы.";
pub const NEED_CHART: &str = "⚠️ Сначала загрузите график для анализа.";
pub const NEED_FORECAST: &str = "⚠️ Нет текста прогноза для визуализации.";
pub const NEED_OPENAI_KEY: &str = "⚠️ OPENAI_API_KEY не задан, генерация изображений недоступна.";
pub const CONTINUATION_STARTED: &str = "🧩 Генерация прогноза графика...";
pub const IMAGE_STARTED: &str = "🧠 Генерация изображения прогноза...";
pub const IMAGE_DONE: &str = "✅ Прогноз визуализирован и добавлен в окно графика.";

#[derive(Debug, Serialize, Clone)]
pub struct AnalysisOutcome {
    pub messages: Vec<ChatEntry>,
    pub report: Option<AnalysisReport>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ForecastOutcome {
    pub messages: Vec<ChatEntry>,
    pub forecast_text: Option<String>,
}

#[derive(Debug, Serialize, Clone)]
pub struct ForecastImageOutcome {
    pub messages: Vec<ChatEntry>,
    pub path: Option<String>,
    pub preview: Option<ImagePreview>,
}

pub async fn analyze_loaded_internal(state: &AppState) -> AnalysisOutcome {
    let mut messages = Vec::new();

    // Paths are copied out so the lock is not held during the request.
    let images = state.session.lock().await.both_images();
    let Some((chart, volume)) = images else {
        messages.push(ChatEntry::status(NEED_BOTH_IMAGES));
        state.session.lock().await.record(&messages);
        return AnalysisOutcome { messages, report: None };
    };

    let result = analyze_chart_with_volume(
        &state.groq,
        &state.config.vision_model,
        &state.catalog,
        &chart,
        &volume,
    )
    .await;

    let report = match result {
        Ok(raw) => {
            messages.push(ChatEntry::new(
                ChatRole::Assistant,
                format!("Результат анализа: {}", raw),
            ));
            Some(build_analysis_report(raw, &state.catalog))
        }
        Err(e) => {
            tracing::error!("Chart analysis failed: {}", e);
            messages.push(ChatEntry::status(format!("⚠️ Ошибка анализа: {}", e)));
            None
        }
    };

    let mut session = state.session.lock().await;
    if let Some(report) = &report {
        session.show_recognized(&report.view);
    }
    session.record(&messages);

    AnalysisOutcome { messages, report }
}

pub async fn generate_future_chart_internal(state: &AppState) -> ForecastOutcome {
    let mut messages = Vec::new();

    let chart = state
        .session
        .lock()
        .await
        .image(ImageSlot::Chart)
        .map(Path::to_path_buf);
    let Some(chart) = chart else {
        messages.push(ChatEntry::status(NEED_CHART));
        state.session.lock().await.record(&messages);
        return ForecastOutcome { messages, forecast_text: None };
    };

    messages.push(ChatEntry::status(CONTINUATION_STARTED));

    let forecast_text = match forecast_continuation(&state.groq, &state.config.vision_model, &chart).await {
        Ok(text) => {
            messages.push(ChatEntry::new(
                ChatRole::Assistant,
                format!("📊 Прогноз получен:\n{}", text),
            ));
            Some(text)
        }
        Err(e) => {
            tracing::error!("Forecast continuation failed: {}", e);
            messages.push(ChatEntry::status(format!("⚠️ Ошибка при создании прогноза: {}", e)));
            None
        }
    };

    let mut session = state.session.lock().await;
    if let Some(text) = &forecast_text {
        session.set_forecast_text(text.clone());
    }
    session.record(&messages);

    ForecastOutcome { messages, forecast_text }
}

impl ForecastImageOutcome {
    fn messages_only(messages: Vec<ChatEntry>) -> Self {
        Self {
            messages,
            path: None,
            preview: None,
        }
    }
}

pub async fn generate_forecast_image_internal(
    state: &AppState,
    out_path: &Path,
    size: ViewSize,
) -> ForecastImageOutcome {
    let mut messages = Vec::new();

    let forecast_text = state.session.lock().await.forecast_text().map(str::to_string);
    let Some(forecast_text) = forecast_text else {
        messages.push(ChatEntry::status(NEED_FORECAST));
        state.session.lock().await.record(&messages);
        return ForecastImageOutcome::messages_only(messages);
    };

    let Some(client) = state.openai.as_ref() else {
        messages.push(ChatEntry::status(NEED_OPENAI_KEY));
        state.session.lock().await.record(&messages);
        return ForecastImageOutcome::messages_only(messages);
    };

    messages.push(ChatEntry::status(IMAGE_STARTED));

    let rendered = render_forecast_image(
        client,
        &state.config.image_model,
        &state.config.image_size,
        &forecast_text,
        out_path,
    )
    .await;

    let result = match rendered {
        Ok(path) => {
            state.previews.invalidate(&path).await;
            state
                .previews
                .get_or_load(&path, size)
                .await
                .map(|preview| (path, preview))
        }
        Err(e) => Err(e),
    };

    let (path, preview) = match result {
        Ok((path, preview)) => {
            messages.push(ChatEntry::status(IMAGE_DONE));
            (Some(path.display().to_string()), Some(preview))
        }
        Err(e) => {
            tracing::error!("Forecast image generation failed: {}", e);
            messages.push(ChatEntry::status(format!("⚠️ Ошибка при генерации изображения: {}", e)));
            (None, None)
        }
    };

    state.session.lock().await.record(&messages);

    ForecastImageOutcome {
        messages,
        path,
        preview,
    }
}

#[tauri::command]
pub async fn analyze_loaded_images(
    state: State<'_, Arc<AppState>>,
) -> Result<AnalysisOutcome, String> {
    Ok(analyze_loaded_internal(&state).await)
}

#[tauri::command]
pub async fn generate_future_chart(
    state: State<'_, Arc<AppState>>,
) -> Result<ForecastOutcome, String> {
    Ok(generate_future_chart_internal(&state).await)
}

#[tauri::command]
pub async fn generate_forecast_image(
    width: u32,
    height: u32,
    state: State<'_, Arc<AppState>>,
) -> Result<ForecastImageOutcome, String> {
    Ok(generate_forecast_image_internal(
        &state,
        Path::new(FORECAST_IMAGE_PATH),
        ViewSize { width, height },
    )
    .await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_state;

    // Nothing listens on the discard port, so requests fail fast.
    const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/v1";

    const VIEW: ViewSize = ViewSize { width: 100, height: 100 };

    #[tokio::test]
    async fn analysis_requires_both_images() {
        let state = test_state(&[("GROQ_API_KEY", "k")]);
        let outcome = analyze_loaded_internal(&state).await;
        assert!(outcome.report.is_none());
        assert_eq!(outcome.messages[0].text, NEED_BOTH_IMAGES);
    }

    #[tokio::test]
    async fn analysis_failure_becomes_status_message() {
        let state = test_state(&[("GROQ_API_KEY", "k"), ("GROQ_BASE_URL", DEAD_ENDPOINT)]);
        let dir = tempfile::tempdir().unwrap();
        let chart = dir.path().join("chart.png");
        std::fs::write(&chart, b"\x89PNG\r\n\x1a\n").unwrap();
        {
            let mut session = state.session.lock().await;
            session.set_image(ImageSlot::Chart, chart.clone());
            session.set_image(ImageSlot::Volume, chart);
        }

        let outcome = analyze_loaded_internal(&state).await;
        assert!(outcome.report.is_none());
        assert!(outcome.messages[0].text.starts_with("⚠️ Ошибка анализа:"));
        assert_eq!(state.session.lock().await.shown_patterns().len(), state.catalog.len());
    }

    #[tokio::test]
    async fn continuation_requires_chart() {
        let state = test_state(&[("GROQ_API_KEY", "k")]);
        let outcome = generate_future_chart_internal(&state).await;
        assert!(outcome.forecast_text.is_none());
        assert_eq!(outcome.messages[0].text, NEED_CHART);
    }

    #[tokio::test]
    async fn continuation_failure_keeps_forecast_empty() {
        let state = test_state(&[("GROQ_API_KEY", "k"), ("GROQ_BASE_URL", DEAD_ENDPOINT)]);
        let dir = tempfile::tempdir().unwrap();
        let chart = dir.path().join("chart.png");
        std::fs::write(&chart, b"\x89PNG\r\n\x1a\n").unwrap();
        state.session.lock().await.set_image(ImageSlot::Chart, chart);

        let outcome = generate_future_chart_internal(&state).await;
        assert_eq!(outcome.messages[0].text, CONTINUATION_STARTED);
        assert!(outcome.messages[1].text.starts_with("⚠️ Ошибка при создании прогноза:"));
        assert!(state.session.lock().await.forecast_text().is_none());
    }

    #[tokio::test]
    async fn forecast_image_requires_text() {
        let state = test_state(&[("GROQ_API_KEY", "k"), ("OPENAI_API_KEY", "o")]);
        let dir = tempfile::tempdir().unwrap();
        let outcome =
            generate_forecast_image_internal(&state, &dir.path().join("f.png"), VIEW).await;
        assert_eq!(outcome.messages[0].text, NEED_FORECAST);
        assert!(outcome.preview.is_none());
    }

    #[tokio::test]
    async fn forecast_image_requires_openai_key() {
        let state = test_state(&[("GROQ_API_KEY", "k")]);
        state
            .session
            .lock()
            .await
            .set_forecast_text("Рост".to_string());
        let dir = tempfile::tempdir().unwrap();
        let outcome =
            generate_forecast_image_internal(&state, &dir.path().join("f.png"), VIEW).await;
        assert_eq!(outcome.messages[0].text, NEED_OPENAI_KEY);
    }

    #[tokio::test]
    async fn forecast_image_failure_is_reported() {
        let state = test_state(&[
            ("GROQ_API_KEY", "k"),
            ("OPENAI_API_KEY", "o"),
            ("OPENAI_BASE_URL", DEAD_ENDPOINT),
        ]);
        state
            .session
            .lock()
            .await
            .set_forecast_text("Рост".to_string());
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("f.png");

        let outcome = generate_forecast_image_internal(&state, &out, VIEW).await;
        assert_eq!(outcome.messages[0].text, IMAGE_STARTED);
        assert!(outcome.messages[1].text.starts_with("⚠️ Ошибка при генерации изображения:"));
        assert!(outcome.path.is_none());
        assert!(!out.exists());
        assert_eq!(state.session.lock().await.chat_log().len(), 2);
    }
}
