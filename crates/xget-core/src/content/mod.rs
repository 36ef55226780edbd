//! Content side: link classification, click interception, page notifications.

mod interceptor;
mod notification;
mod rules;

pub use interceptor::{ClickDisposition, ContentScript, PageHost};
pub use notification::{Notification, REDIRECTED_MESSAGE, SETTINGS_UPDATED_MESSAGE};
pub use rules::{classify_link, DownloadSignal, LinkInfo, DOWNLOAD_PHRASES, FILE_EXTENSIONS};
