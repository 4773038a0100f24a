//! Stands in for the UI layer: redraws are just log lines here.

use tokio::{
    sync::broadcast::{self, error::RecvError},
    task::JoinHandle,
};
use tracing::{debug, info, warn};
use widget_api::{ChatWindow, ComponentEvent};
use widget_store::{StoreEvent, WidgetStore};

pub fn spawn_render_loops(store: &WidgetStore, window: &ChatWindow) -> Vec<JoinHandle<u64>> {
    vec![
        tokio::spawn(redraw_store(store.subscribe_events())),
        tokio::spawn(render_window(window.subscribe_events())),
    ]
}

/// Runs until the store is dropped. Returns how many redraws happened.
pub async fn redraw_store(mut events: broadcast::Receiver<StoreEvent>) -> u64 {
    let mut redraws = 0;
    loop {
        match events.recv().await {
            Ok(event) => {
                debug!(field = event.field(), ?event, "redraw");
                redraws += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "store redraw fell behind");
            }
            Err(RecvError::Closed) => break,
        }
    }
    redraws
}

pub async fn render_window(mut events: broadcast::Receiver<ComponentEvent>) -> u64 {
    let mut rendered = 0;
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "window render fell behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        };
        rendered += 1;
        match event {
            ComponentEvent::InputSubmitted(request) => info!(
                engine_url = %request.engine_url,
                session_id = %request.session_id,
                text = %request.text,
                "input ready for engine"
            ),
            ComponentEvent::MessageAdded(message) => {
                info!(author = %message.author, text = %message.data.text, "message added")
            }
            ComponentEvent::HistoryCleared => info!("history cleared"),
            ComponentEvent::SessionEnded { session_id } => info!(%session_id, "session ended"),
        }
    }
    rendered
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
