//! External `call`/`get` surface of the chat widget and the component seam it drives.

pub mod component;
pub mod facade;
pub mod helpers;

pub use component::{ChatComponent, ChatWindow, ComponentEvent, EngineRequest};
pub use facade::WebChatApi;
pub use helpers::{ApiHelpers, StoreHelpers};
