use super::*;

use std::{collections::HashMap, io::Write};

use serde_json::json;

#[test]
fn parses_partial_toml_over_defaults() {
    let settings = parse_settings(
        r#"
title = "Support"
engine_url = "https://teneo-api.com/some-bot"
show_close_button = true
visibility = "maximized"

[engine_params]
channel = "web"
retries = 3
"#,
    )
    .expect("parse");

    assert_eq!(settings.title, "Support");
    assert_eq!(settings.engine_url, "https://teneo-api.com/some-bot");
    assert!(settings.show_close_button);
    assert_eq!(settings.visibility, Visibility::Maximized);
    assert_eq!(settings.engine_params.get("channel"), Some(&json!("web")));
    assert_eq!(settings.engine_params.get("retries"), Some(&json!(3)));
    assert_eq!(settings.bot_avatar_url, "");
}

#[test]
fn rejects_unknown_visibility_in_file() {
    assert!(parse_settings("visibility = \"docked\"").is_err());
}

#[test]
fn env_overrides_prefer_app_alias_and_skip_bad_values() {
    let env: HashMap<&str, &str> = HashMap::from([
        ("TWC_TITLE", "from twc"),
        ("APP__TITLE", "from app"),
        ("TWC_BOT_AVATAR_URL", "bot.png"),
        ("TWC_SHOW_CLOSE_BUTTON", "maybe"),
        ("APP__VISIBILITY", "Maximized"),
    ]);
    let mut settings = WidgetSettings::default();

    apply_env_overrides(&mut settings, |key| env.get(key).map(|v| v.to_string()));

    assert_eq!(settings.title, "from app");
    assert_eq!(settings.bot_avatar_url, "bot.png");
    assert!(!settings.show_close_button);
    assert_eq!(settings.visibility, Visibility::Maximized);
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");

    let err = load_settings(Some(&missing)).expect_err("missing explicit file");
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn implicit_settings_file_is_optional() {
    assert!(load_settings(None).is_ok());
}

#[test]
fn broken_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let broken = dir.path().join("broken.toml");
    let mut file = fs::File::create(&broken).expect("create");
    writeln!(file, "title = [").expect("write");

    let settings = load_settings(Some(&broken)).expect("broken file still loads");
    assert_eq!(settings.user_avatar_url, "");
}

#[tokio::test]
async fn apply_to_writes_every_field() {
    let settings = WidgetSettings {
        title: "Support".into(),
        title_icon_url: "icon.svg".into(),
        engine_url: "https://teneo-api.com/some-bot".into(),
        agent_avatar_url: "agent.png".into(),
        bot_avatar_url: "bot.png".into(),
        user_avatar_url: "user.png".into(),
        show_close_button: true,
        visibility: Visibility::Maximized,
        engine_params: EngineParams::from([("channel".to_string(), json!("web"))]),
    };
    let store = WidgetStore::new();

    settings.apply_to(&store).await;

    let state = store.snapshot().await;
    assert_eq!(state.title(), "Support");
    assert_eq!(state.title_icon_url(), "icon.svg");
    assert_eq!(state.engine_url(), "https://teneo-api.com/some-bot");
    assert_eq!(state.agent_avatar_url(), "agent.png");
    assert_eq!(state.bot_avatar_url(), "bot.png");
    assert_eq!(state.user_avatar_url(), "user.png");
    assert!(state.show_close_button());
    assert_eq!(state.visibility(), Visibility::Maximized);
    assert_eq!(state.engine_params().get("channel"), Some(&json!("web")));
}
