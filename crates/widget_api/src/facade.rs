use std::sync::Arc;

use serde_json::Value;
use shared::{
    error::ApiError,
    protocol::{ApiCall, ApiQuery, ApiResponse},
};
use tokio::sync::RwLock;
use tracing::{info, warn};
use widget_store::WidgetStore;

use crate::{
    component::ChatComponent,
    helpers::{ApiHelpers, StoreHelpers},
};

/// The object a host page talks to: `call` for actions, `get` for reads.
pub struct WebChatApi {
    component: Arc<dyn ChatComponent>,
    helpers: RwLock<Arc<dyn ApiHelpers>>,
}

impl WebChatApi {
    pub fn new(store: Arc<WidgetStore>, component: Arc<dyn ChatComponent>) -> Self {
        let helpers = Arc::new(StoreHelpers::new(store, Arc::clone(&component)));
        Self::with_helpers(component, helpers)
    }

    pub fn with_helpers(component: Arc<dyn ChatComponent>, helpers: Arc<dyn ApiHelpers>) -> Self {
        Self {
            component,
            helpers: RwLock::new(helpers),
        }
    }

    pub async fn helpers(&self) -> Arc<dyn ApiHelpers> {
        Arc::clone(&*self.helpers.read().await)
    }

    /// Replaces the helpers used by `set_chat_window_title`, `get_state` and
    /// `get_chat_history`.
    pub async fn set_helpers(&self, helpers: Arc<dyn ApiHelpers>) {
        *self.helpers.write().await = helpers;
    }

    pub async fn call(&self, name: &str, args: &[Value]) -> Result<(), ApiError> {
        let call = ApiCall::parse(name, args).inspect_err(|err| {
            warn!(action = name, error = %err, "rejected api call");
        })?;
        self.dispatch(call).await
    }

    pub async fn get(&self, name: &str) -> Result<Value, ApiError> {
        let query = ApiQuery::parse(name).inspect_err(|err| {
            warn!(action = name, error = %err, "rejected api get");
        })?;
        let response = self.query(query).await?;
        serde_json::to_value(response).map_err(ApiError::internal)
    }

    pub async fn dispatch(&self, call: ApiCall) -> Result<(), ApiError> {
        let action = call.name();
        info!(action, "api call");

        let result = match call {
            ApiCall::Maximize => self.component.maximize().await,
            ApiCall::Minimize => self.component.minimize().await,
            ApiCall::SendInput { message, silent } => {
                self.component.send_base_message(message, silent).await
            }
            ApiCall::EndSession => self.component.close_session().await,
            ApiCall::ClearChatHistory => self.component.clear_history().await,
            ApiCall::Reset => self.reset().await,
            ApiCall::AddMessage { message, silent } => {
                self.component.on_message_received(message, silent).await
            }
            ApiCall::SetWindowTitle { title } => self.helpers().await.set_title(&title).await,
        };

        result.map_err(|err| {
            warn!(action, error = %err, "api call failed");
            ApiError::from(err)
        })
    }

    pub async fn query(&self, query: ApiQuery) -> Result<ApiResponse, ApiError> {
        let action = query.name();
        info!(action, "api get");

        let helpers = self.helpers().await;
        let result = match query {
            ApiQuery::GetState => helpers.api_get_state().await.map(ApiResponse::State),
            ApiQuery::GetChatHistory => helpers
                .api_get_chat_history()
                .await
                .map(ApiResponse::ChatHistory),
        };

        result.map_err(|err| {
            warn!(action, error = %err, "api get failed");
            ApiError::from(err)
        })
    }

    async fn reset(&self) -> anyhow::Result<()> {
        self.component.minimize().await?;
        self.component.clear_history().await?;
        self.component.close_session().await
    }
}

#[cfg(test)]
#[path = "tests/facade_tests.rs"]
mod tests;
