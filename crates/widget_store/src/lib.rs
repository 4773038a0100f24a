//! Owned state store for the chat widget.
//!
//! Every field of [`WidgetState`] has exactly one writer: its setter on
//! [`WidgetStore`]. Each setter publishes a [`StoreEvent`] so the UI layer can
//! redraw from the new value.

use std::{collections::BTreeMap, sync::Arc};

use serde::Serialize;
use serde_json::Value;
use shared::domain::{StateSnapshot, Visibility, DEFAULT_TITLE};
use tokio::sync::{broadcast, RwLock};
use tracing::debug;

const STORE_EVENT_CAPACITY: usize = 256;

pub type EngineParams = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetState {
    visibility: Visibility,
    title: String,
    title_icon_url: String,
    #[serde(rename = "teneoEngineUrl")]
    engine_url: String,
    #[serde(rename = "teneoEngineParams")]
    engine_params: EngineParams,
    show_close_button: bool,
    agent_avatar_url: String,
    bot_avatar_url: String,
    user_avatar_url: String,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            visibility: Visibility::Minimized,
            title: DEFAULT_TITLE.to_string(),
            title_icon_url: String::new(),
            engine_url: String::new(),
            engine_params: EngineParams::new(),
            show_close_button: false,
            agent_avatar_url: String::new(),
            bot_avatar_url: String::new(),
            user_avatar_url: String::new(),
        }
    }
}

impl WidgetState {
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn title_icon_url(&self) -> &str {
        &self.title_icon_url
    }

    pub fn engine_url(&self) -> &str {
        &self.engine_url
    }

    pub fn engine_params(&self) -> &EngineParams {
        &self.engine_params
    }

    pub fn show_close_button(&self) -> bool {
        self.show_close_button
    }

    pub fn agent_avatar_url(&self) -> &str {
        &self.agent_avatar_url
    }

    pub fn bot_avatar_url(&self) -> &str {
        &self.bot_avatar_url
    }

    pub fn user_avatar_url(&self) -> &str {
        &self.user_avatar_url
    }

    pub fn state(&self) -> StateSnapshot {
        StateSnapshot {
            visibility: self.visibility,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    VisibilityChanged(Visibility),
    TitleChanged(String),
    TitleIconUrlChanged(String),
    EngineUrlChanged(String),
    EngineParamsReplaced(EngineParams),
    EngineParamSet { key: String, value: Value },
    ShowCloseButtonChanged(bool),
    AgentAvatarUrlChanged(String),
    BotAvatarUrlChanged(String),
    UserAvatarUrlChanged(String),
}

impl StoreEvent {
    pub fn field(&self) -> &'static str {
        match self {
            StoreEvent::VisibilityChanged(_) => "visibility",
            StoreEvent::TitleChanged(_) => "title",
            StoreEvent::TitleIconUrlChanged(_) => "title_icon_url",
            StoreEvent::EngineUrlChanged(_) => "engine_url",
            StoreEvent::EngineParamsReplaced(_) | StoreEvent::EngineParamSet { .. } => {
                "engine_params"
            }
            StoreEvent::ShowCloseButtonChanged(_) => "show_close_button",
            StoreEvent::AgentAvatarUrlChanged(_) => "agent_avatar_url",
            StoreEvent::BotAvatarUrlChanged(_) => "bot_avatar_url",
            StoreEvent::UserAvatarUrlChanged(_) => "user_avatar_url",
        }
    }
}

macro_rules! url_field {
    ($setter:ident, $getter:ident, $field:ident, $event:ident) => {
        pub async fn $setter(&self, url: impl Into<String>) {
            let url = url.into();
            let mut state = self.inner.write().await;
            state.$field = url.clone();
            self.emit(StoreEvent::$event(url));
        }

        pub async fn $getter(&self) -> String {
            self.inner.read().await.$field.clone()
        }
    };
}

pub struct WidgetStore {
    inner: RwLock<WidgetState>,
    events: broadcast::Sender<StoreEvent>,
}

impl WidgetStore {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(STORE_EVENT_CAPACITY);
        Arc::new(Self {
            inner: RwLock::new(WidgetState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> WidgetState {
        self.inner.read().await.clone()
    }

    /// Only the visibility, which is all the host page is told about.
    pub async fn state(&self) -> StateSnapshot {
        self.inner.read().await.state()
    }

    pub async fn set_visibility(&self, visibility: Visibility) {
        let mut state = self.inner.write().await;
        state.visibility = visibility;
        self.emit(StoreEvent::VisibilityChanged(visibility));
    }

    pub async fn visibility(&self) -> Visibility {
        self.inner.read().await.visibility
    }

    pub async fn set_title(&self, title: impl Into<String>) {
        let title = title.into();
        let mut state = self.inner.write().await;
        state.title = title.clone();
        self.emit(StoreEvent::TitleChanged(title));
    }

    pub async fn title(&self) -> String {
        self.inner.read().await.title.clone()
    }

    url_field!(set_title_icon_url, title_icon_url, title_icon_url, TitleIconUrlChanged);
    url_field!(set_engine_url, engine_url, engine_url, EngineUrlChanged);
    url_field!(set_agent_avatar_url, agent_avatar_url, agent_avatar_url, AgentAvatarUrlChanged);
    url_field!(set_bot_avatar_url, bot_avatar_url, bot_avatar_url, BotAvatarUrlChanged);
    url_field!(set_user_avatar_url, user_avatar_url, user_avatar_url, UserAvatarUrlChanged);

    pub async fn set_engine_params(&self, params: EngineParams) {
        let mut state = self.inner.write().await;
        state.engine_params = params.clone();
        self.emit(StoreEvent::EngineParamsReplaced(params));
    }

    /// Inserts or overwrites a single engine parameter, leaving the others alone.
    pub async fn set_engine_param(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        let mut state = self.inner.write().await;
        state.engine_params.insert(key.clone(), value.clone());
        self.emit(StoreEvent::EngineParamSet { key, value });
    }

    pub async fn engine_params(&self) -> EngineParams {
        self.inner.read().await.engine_params.clone()
    }

    pub async fn set_show_close_button(&self, show: bool) {
        let mut state = self.inner.write().await;
        state.show_close_button = show;
        self.emit(StoreEvent::ShowCloseButtonChanged(show));
    }

    pub async fn show_close_button(&self) -> bool {
        self.inner.read().await.show_close_button
    }

    /// Callers hold the write guard so events go out in write order.
    fn emit(&self, event: StoreEvent) {
        debug!(field = event.field(), "widget state updated");
        // Send only fails when nobody is subscribed.
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
