use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::{ChatMessage, InputMessage, StateSnapshot},
    error::ApiError,
};

pub const API_CALL_MAXIMIZE: &str = "maximize";
pub const API_CALL_MINIMIZE: &str = "minimize";
pub const API_CALL_SEND_INPUT: &str = "send_input";
pub const API_CALL_END_SESSION: &str = "end_session";
pub const API_CALL_CLEAR_CHAT_HISTORY: &str = "clear_chat_history";
pub const API_CALL_RESET: &str = "reset";
pub const API_CALL_ADD_MESSAGE: &str = "add_message";
pub const API_CALL_SET_WINDOW_TITLE: &str = "set_chat_window_title";

pub const API_GET_STATE: &str = "get_state";
pub const API_GET_CHAT_HISTORY: &str = "get_chat_history";

/// Actions accepted by `call`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiCall {
    Maximize,
    Minimize,
    SendInput {
        message: InputMessage,
        silent: bool,
    },
    EndSession,
    ClearChatHistory,
    Reset,
    AddMessage {
        message: ChatMessage,
        silent: bool,
    },
    SetWindowTitle {
        title: String,
    },
}

impl ApiCall {
    pub fn name(&self) -> &'static str {
        match self {
            ApiCall::Maximize => API_CALL_MAXIMIZE,
            ApiCall::Minimize => API_CALL_MINIMIZE,
            ApiCall::SendInput { .. } => API_CALL_SEND_INPUT,
            ApiCall::EndSession => API_CALL_END_SESSION,
            ApiCall::ClearChatHistory => API_CALL_CLEAR_CHAT_HISTORY,
            ApiCall::Reset => API_CALL_RESET,
            ApiCall::AddMessage { .. } => API_CALL_ADD_MESSAGE,
            ApiCall::SetWindowTitle { .. } => API_CALL_SET_WINDOW_TITLE,
        }
    }

    /// Resolves a host-supplied action name and its positional arguments.
    pub fn parse(name: &str, args: &[Value]) -> Result<Self, ApiError> {
        match name {
            API_CALL_MAXIMIZE => no_args(name, args).map(|()| ApiCall::Maximize),
            API_CALL_MINIMIZE => no_args(name, args).map(|()| ApiCall::Minimize),
            API_CALL_END_SESSION => no_args(name, args).map(|()| ApiCall::EndSession),
            API_CALL_CLEAR_CHAT_HISTORY => {
                no_args(name, args).map(|()| ApiCall::ClearChatHistory)
            }
            API_CALL_RESET => no_args(name, args).map(|()| ApiCall::Reset),
            API_CALL_SEND_INPUT => {
                let (payload, silent) = message_and_flag(name, args)?;
                let message = input_message(name, payload)?;
                Ok(ApiCall::SendInput { message, silent })
            }
            API_CALL_ADD_MESSAGE => {
                let (payload, silent) = message_and_flag(name, args)?;
                let message = chat_message(name, payload)?;
                Ok(ApiCall::AddMessage { message, silent })
            }
            API_CALL_SET_WINDOW_TITLE => match args {
                [Value::String(title)] => Ok(ApiCall::SetWindowTitle {
                    title: title.clone(),
                }),
                [_] => Err(ApiError::invalid_argument(name, "title must be a string")),
                _ => Err(ApiError::invalid_argument(
                    name,
                    format!("expected exactly 1 argument, got {}", args.len()),
                )),
            },
            other => Err(ApiError::unknown_action(other)),
        }
    }
}

/// Reads accepted by `get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiQuery {
    GetState,
    GetChatHistory,
}

impl ApiQuery {
    pub fn name(self) -> &'static str {
        match self {
            ApiQuery::GetState => API_GET_STATE,
            ApiQuery::GetChatHistory => API_GET_CHAT_HISTORY,
        }
    }

    pub fn parse(name: &str) -> Result<Self, ApiError> {
        match name {
            API_GET_STATE => Ok(ApiQuery::GetState),
            API_GET_CHAT_HISTORY => Ok(ApiQuery::GetChatHistory),
            other => Err(ApiError::unknown_action(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse {
    State(StateSnapshot),
    ChatHistory(Vec<ChatMessage>),
}

fn no_args(name: &str, args: &[Value]) -> Result<(), ApiError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ApiError::invalid_argument(
            name,
            format!("takes no arguments, got {}", args.len()),
        ))
    }
}

fn message_and_flag<'a>(
    name: &str,
    args: &'a [Value],
) -> Result<(&'a Map<String, Value>, bool), ApiError> {
    let (payload, flag) = match args {
        [payload] => (payload, None),
        [payload, flag] => (payload, Some(flag)),
        _ => {
            return Err(ApiError::invalid_argument(
                name,
                format!("expected 1 or 2 arguments, got {}", args.len()),
            ))
        }
    };

    let Value::Object(payload) = payload else {
        return Err(ApiError::invalid_argument(name, "message must be an object"));
    };

    let silent = match flag {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(_) => return Err(ApiError::invalid_argument(name, "flag must be a boolean")),
    };

    Ok((payload, silent))
}

fn input_message(name: &str, payload: &Map<String, Value>) -> Result<InputMessage, ApiError> {
    let Some(Value::String(text)) = payload.get("text") else {
        return Err(ApiError::invalid_argument(
            name,
            "message.text must be a string",
        ));
    };

    let parameters = match payload.get("parameters") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(parameters)) => parameters.clone(),
        Some(_) => {
            return Err(ApiError::invalid_argument(
                name,
                "message.parameters must be an object",
            ))
        }
    };

    Ok(InputMessage {
        text: text.clone(),
        parameters,
    })
}

/// Accepts either a full `{author, type, data}` record or a bare `{text, ...}`
/// object, which becomes a bot text message with the remaining keys in `data`.
fn chat_message(name: &str, payload: &Map<String, Value>) -> Result<ChatMessage, ApiError> {
    if payload.contains_key("data") {
        return serde_json::from_value(Value::Object(payload.clone())).map_err(|err| {
            ApiError::invalid_argument(name, format!("malformed chat message record: {err}"))
        });
    }

    let Some(Value::String(text)) = payload.get("text") else {
        return Err(ApiError::invalid_argument(
            name,
            "message must carry either data or a string text",
        ));
    };
    let mut message = ChatMessage::from_bot(text.clone());
    message.data.extra = payload.clone();
    message.data.extra.remove("text");
    Ok(message)
}
