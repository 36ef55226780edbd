//! Settings popup: form state, status line and the controller tying them to
//! the background message interface.

mod form;
mod panel;
mod status;

pub use form::{SettingsForm, FORCED_PLATFORMS, VISIBLE_PLATFORMS};
pub use panel::{
    SettingsPanel, CONFIGURE_DOMAIN_MESSAGE, DOMAIN_CLEARED_MESSAGE, INVALID_DOMAIN_MESSAGE,
    LOAD_TIMEOUT_MESSAGE, SAVED_MESSAGE, UNCONFIRMED_MESSAGE, USING_DEFAULTS_MESSAGE,
};
pub use status::{Status, StatusKind};
