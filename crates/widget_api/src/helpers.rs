use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{ChatMessage, StateSnapshot};
use widget_store::WidgetStore;

use crate::component::ChatComponent;

/// Internal functions behind the title and read actions. The facade keeps them
/// swappable so an integration can intercept or replace any of them.
#[async_trait]
pub trait ApiHelpers: Send + Sync {
    async fn set_title(&self, title: &str) -> Result<()>;
    async fn api_get_state(&self) -> Result<StateSnapshot>;
    async fn api_get_chat_history(&self) -> Result<Vec<ChatMessage>>;
}

pub struct StoreHelpers {
    store: Arc<WidgetStore>,
    component: Arc<dyn ChatComponent>,
}

impl StoreHelpers {
    pub fn new(store: Arc<WidgetStore>, component: Arc<dyn ChatComponent>) -> Self {
        Self { store, component }
    }
}

#[async_trait]
impl ApiHelpers for StoreHelpers {
    async fn set_title(&self, title: &str) -> Result<()> {
        self.store.set_title(title).await;
        Ok(())
    }

    async fn api_get_state(&self) -> Result<StateSnapshot> {
        Ok(self.store.state().await)
    }

    async fn api_get_chat_history(&self) -> Result<Vec<ChatMessage>> {
        self.component.chat_history().await
    }
}
