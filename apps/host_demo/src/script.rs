//! Replays host-page actions, one JSON object per line:
//! `{"call": "<name>", "args": [...]}` or `{"get": "<name>"}`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::ApiError;
use tracing::warn;
use widget_api::WebChatApi;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ScriptLine {
    Call {
        call: String,
        #[serde(default)]
        args: Vec<Value>,
    },
    Get {
        get: String,
    },
}

#[derive(Debug, Serialize)]
struct ScriptOutcome<'a> {
    line: usize,
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ApiError>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScriptSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub async fn run_script(
    api: &WebChatApi,
    input: impl BufRead,
    mut output: impl Write,
) -> Result<ScriptSummary> {
    let mut summary = ScriptSummary::default();

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("failed to read script line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let parsed = match serde_json::from_str::<ScriptLine>(trimmed) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!(line = line_no, error = %err, "skipping malformed script line");
                summary.skipped += 1;
                continue;
            }
        };

        let (action, result) = match &parsed {
            ScriptLine::Call { call, args } => {
                (call.as_str(), api.call(call, args).await.map(|()| None))
            }
            ScriptLine::Get { get } => (get.as_str(), api.get(get).await.map(Some)),
        };

        let outcome = match result {
            Ok(value) => {
                summary.succeeded += 1;
                ScriptOutcome {
                    line: line_no,
                    action,
                    value,
                    error: None,
                }
            }
            Err(err) => {
                summary.failed += 1;
                ScriptOutcome {
                    line: line_no,
                    action,
                    value: None,
                    error: Some(err),
                }
            }
        };

        serde_json::to_writer(&mut output, &outcome)?;
        writeln!(output)?;
    }

    Ok(summary)
}
