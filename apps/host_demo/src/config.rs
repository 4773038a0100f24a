use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::domain::{Visibility, DEFAULT_TITLE};
use tracing::warn;
use widget_store::{EngineParams, WidgetStore};

pub const DEFAULT_SETTINGS_FILE: &str = "widget.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    pub title: String,
    pub title_icon_url: String,
    pub engine_url: String,
    pub agent_avatar_url: String,
    pub bot_avatar_url: String,
    pub user_avatar_url: String,
    pub show_close_button: bool,
    pub visibility: Visibility,
    pub engine_params: EngineParams,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.into(),
            title_icon_url: String::new(),
            engine_url: String::new(),
            agent_avatar_url: String::new(),
            bot_avatar_url: String::new(),
            user_avatar_url: String::new(),
            show_close_button: false,
            visibility: Visibility::Minimized,
            engine_params: EngineParams::new(),
        }
    }
}

impl WidgetSettings {
    /// Writes every setting into the store through its setter.
    pub async fn apply_to(&self, store: &WidgetStore) {
        store.set_title(self.title.clone()).await;
        store.set_title_icon_url(self.title_icon_url.clone()).await;
        store.set_engine_url(self.engine_url.clone()).await;
        store.set_engine_params(self.engine_params.clone()).await;
        store.set_agent_avatar_url(self.agent_avatar_url.clone()).await;
        store.set_bot_avatar_url(self.bot_avatar_url.clone()).await;
        store.set_user_avatar_url(self.user_avatar_url.clone()).await;
        store.set_show_close_button(self.show_close_button).await;
        store.set_visibility(self.visibility).await;
    }
}

/// An explicit `path` must be readable. The implicit `widget.toml` is
/// optional and its absence means defaults.
pub fn load_settings(path: Option<&Path>) -> Result<WidgetSettings> {
    let mut settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path).with_context(|| {
                format!("failed to read widget settings '{}'", path.display())
            })?;
            settings_or_default(path, &raw)
        }
        None => {
            let path = Path::new(DEFAULT_SETTINGS_FILE);
            match fs::read_to_string(path) {
                Ok(raw) => settings_or_default(path, &raw),
                Err(_) => WidgetSettings::default(),
            }
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn settings_or_default(path: &Path, raw: &str) -> WidgetSettings {
    parse_settings(raw).unwrap_or_else(|err| {
        warn!(path = %path.display(), error = %err, "ignoring unparseable widget settings");
        WidgetSettings::default()
    })
}

fn parse_settings(raw: &str) -> Result<WidgetSettings, toml::de::Error> {
    toml::from_str(raw)
}

/// `TWC_*` first, then the `APP__*` alias, which wins when both are set.
fn apply_env_overrides(settings: &mut WidgetSettings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |name: &str| {
        lookup(&format!("APP__{name}")).or_else(|| lookup(&format!("TWC_{name}")))
    };

    if let Some(v) = var("TITLE") {
        settings.title = v;
    }
    if let Some(v) = var("TITLE_ICON_URL") {
        settings.title_icon_url = v;
    }
    if let Some(v) = var("ENGINE_URL") {
        settings.engine_url = v;
    }
    if let Some(v) = var("AGENT_AVATAR_URL") {
        settings.agent_avatar_url = v;
    }
    if let Some(v) = var("BOT_AVATAR_URL") {
        settings.bot_avatar_url = v;
    }
    if let Some(v) = var("USER_AVATAR_URL") {
        settings.user_avatar_url = v;
    }
    if let Some(v) = var("SHOW_CLOSE_BUTTON") {
        if let Ok(parsed) = v.trim().parse::<bool>() {
            settings.show_close_button = parsed;
        }
    }
    if let Some(v) = var("VISIBILITY") {
        if let Some(parsed) = Visibility::parse(&v) {
            settings.visibility = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
