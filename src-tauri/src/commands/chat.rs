use std::sync::Arc;

use serde::Serialize;
use tauri::State;

use crate::chart_api::prompts::ASSISTANT_NAME;
use crate::chart_api::{ask_assistant, ChatEntry, ChatRole};
use crate::state::AppState;

#[derive(Debug, Serialize, Clone)]
pub struct ChatReply {
    pub messages: Vec<ChatEntry>,
}

pub async fn send_chat_message_internal(state: &AppState, text: &str) -> ChatReply {
    let text = text.trim();
    if text.is_empty() {
        return ChatReply { messages: Vec::new() };
    }

    let mut messages = vec![ChatEntry::new(ChatRole::User, text)];

    let reply = match ask_assistant(&state.groq, &state.config.chat_model, text).await {
        Ok(reply) => ChatEntry::new(ChatRole::Assistant, reply),
        Err(e) => {
            tracing::error!("Assistant request failed: {}", e);
            ChatEntry::status(format!("⚠️ Ошибка Groq API: {}", e))
        }
    };
    messages.push(reply);

    state.session.lock().await.record(&messages);
    ChatReply { messages }
}

#[tauri::command]
pub async fn send_chat_message(
    text: String,
    state: State<'_, Arc<AppState>>,
) -> Result<ChatReply, String> {
    Ok(send_chat_message_internal(&state, &text).await)
}

#[tauri::command]
pub async fn chat_history(state: State<'_, Arc<AppState>>) -> Result<Vec<ChatEntry>, String> {
    Ok(state.session.lock().await.chat_log().to_vec())
}

#[tauri::command]
pub fn assistant_name() -> String {
    ASSISTANT_NAME.to_string()
}
