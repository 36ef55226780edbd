//! Cross-browser compatibility shim.
//!
//! Firefox and Chromium expose the same extension capabilities through two
//! incompatible calling conventions. [`WebExt`] wraps whichever [`NativeApi`]
//! the host provides and gives the rest of the crate one async surface with a
//! fixed recovery policy:
//! - promise-style storage rejections surface as [`CompatError`](crate::error::CompatError);
//! - every other failure resolves to a default, marked [`ApiOutcome::Recovered`];
//! - a capability the host lacks still answers, with `{}`, `[]`, `0` or `null`.

mod capability;
mod env;
mod native;
mod outcome;
mod types;
mod webext;

pub use capability::{Capability, StorageArea};
pub use env::{BrowserFamily, BrowserFlavor};
pub use native::{CallbackApi, Completion, NativeApi, PromiseApi};
pub use outcome::{ApiOutcome, Recovery};
pub use types::{ConflictAction, DownloadOptions, TabInfo};
pub use webext::{Storage, WebExt};

#[cfg(test)]
mod tests;
