pub mod config;
pub mod content;
pub mod cursor;
pub mod interactions;
pub mod logging;
pub mod pointer;
pub mod reveal;
pub mod scene;
pub mod scroll;
pub mod subscriptions;
pub mod tween;

#[cfg(target_arch = "wasm32")]
pub mod frontend;
