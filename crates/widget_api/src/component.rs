use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use shared::domain::{ChatMessage, InputMessage, Visibility};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info};
use uuid::Uuid;
use widget_store::WidgetStore;

const COMPONENT_EVENT_CAPACITY: usize = 256;

/// The chat window operations reachable from the external API.
#[async_trait]
pub trait ChatComponent: Send + Sync {
    async fn maximize(&self) -> Result<()>;
    async fn minimize(&self) -> Result<()>;
    async fn send_base_message(&self, message: InputMessage, silent: bool) -> Result<()>;
    async fn close_session(&self) -> Result<()>;
    async fn clear_history(&self) -> Result<()>;
    async fn on_message_received(&self, message: ChatMessage, silent: bool) -> Result<()>;
    async fn chat_history(&self) -> Result<Vec<ChatMessage>>;
}

/// Input ready to be posted to the engine by whoever owns the connection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineRequest {
    pub engine_url: String,
    pub session_id: Uuid,
    pub text: String,
    pub parameters: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ComponentEvent {
    InputSubmitted(EngineRequest),
    MessageAdded(ChatMessage),
    HistoryCleared,
    SessionEnded { session_id: Uuid },
}

struct ChatWindowState {
    history: Vec<ChatMessage>,
    session_id: Option<Uuid>,
}

/// Headless chat window: keeps the transcript and session, writes visibility
/// to the store and announces everything else as [`ComponentEvent`]s.
pub struct ChatWindow {
    store: Arc<WidgetStore>,
    inner: Mutex<ChatWindowState>,
    events: broadcast::Sender<ComponentEvent>,
}

impl ChatWindow {
    pub fn new(store: Arc<WidgetStore>) -> Arc<Self> {
        let (events, _) = broadcast::channel(COMPONENT_EVENT_CAPACITY);
        Arc::new(Self {
            store,
            inner: Mutex::new(ChatWindowState {
                history: Vec::new(),
                session_id: None,
            }),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ComponentEvent> {
        self.events.subscribe()
    }

    pub async fn session_id(&self) -> Option<Uuid> {
        self.inner.lock().await.session_id
    }

    fn emit(&self, event: ComponentEvent) {
        let _ = self.events.send(event);
    }
}

#[async_trait]
impl ChatComponent for ChatWindow {
    async fn maximize(&self) -> Result<()> {
        self.store.set_visibility(Visibility::Maximized).await;
        Ok(())
    }

    async fn minimize(&self) -> Result<()> {
        self.store.set_visibility(Visibility::Minimized).await;
        Ok(())
    }

    async fn send_base_message(&self, message: InputMessage, silent: bool) -> Result<()> {
        let engine_url = self.store.engine_url().await;
        let mut parameters: Map<String, Value> =
            self.store.engine_params().await.into_iter().collect();
        // Per-message parameters override the configured ones.
        parameters.extend(message.parameters);

        let session_id = {
            let mut guard = self.inner.lock().await;
            let session_id = *guard.session_id.get_or_insert_with(Uuid::new_v4);
            if !silent {
                guard.history.push(ChatMessage::from_user(message.text.clone()));
            }
            session_id
        };

        debug!(%session_id, silent, "submitting input");
        self.emit(ComponentEvent::InputSubmitted(EngineRequest {
            engine_url,
            session_id,
            text: message.text,
            parameters,
        }));
        Ok(())
    }

    async fn close_session(&self) -> Result<()> {
        let closed = self.inner.lock().await.session_id.take();
        match closed {
            Some(session_id) => {
                info!(%session_id, "chat session ended");
                self.emit(ComponentEvent::SessionEnded { session_id });
            }
            None => debug!("close_session without an open session"),
        }
        Ok(())
    }

    async fn clear_history(&self) -> Result<()> {
        self.inner.lock().await.history.clear();
        self.emit(ComponentEvent::HistoryCleared);
        Ok(())
    }

    async fn on_message_received(&self, message: ChatMessage, silent: bool) -> Result<()> {
        self.inner.lock().await.history.push(message.clone());
        if !silent {
            self.emit(ComponentEvent::MessageAdded(message));
        }
        Ok(())
    }

    async fn chat_history(&self) -> Result<Vec<ChatMessage>> {
        Ok(self.inner.lock().await.history.clone())
    }
}

#[cfg(test)]
#[path = "tests/component_tests.rs"]
mod tests;
