pub mod config;
pub mod logging;

pub mod background;
pub mod compat;
pub mod content;
pub mod error;
pub mod host;
pub mod platform;
pub mod popup;
pub mod settings;
pub mod transform;
