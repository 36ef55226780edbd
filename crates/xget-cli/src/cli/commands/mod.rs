//! CLI command handlers, one file per command.

mod classify;
mod completions;
mod download;
mod lookup;
mod man;
mod platforms;
mod settings;
mod transform;

pub use classify::run_classify;
pub use completions::run_completions;
pub use download::run_download;
pub use lookup::run_lookup;
pub use man::run_man;
pub use platforms::run_platforms;
pub use settings::run_settings;
pub use transform::run_transform;
