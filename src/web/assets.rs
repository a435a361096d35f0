//! Browser client: a canvas that replays frames and forwards key presses.

pub const PAGE: &str = include_str!("assets/index.html");
pub const STYLESHEET: &str = include_str!("assets/styles.css");
pub const CLIENT_JS: &str = include_str!("assets/app.js");
