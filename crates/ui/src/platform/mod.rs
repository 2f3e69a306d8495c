use std::sync::Arc;

use services::ShareError;

mod desktop;

pub trait UiLinkOpener: Send + Sync {
    /// Hand `url` to the system browser or messaging app.
    ///
    /// # Errors
    ///
    /// Returns `ShareError::Open` if no handler could be launched.
    fn open_url(&self, url: &str) -> Result<(), ShareError>;
}

pub type LinkOpenerRef = Arc<dyn UiLinkOpener>;

pub use desktop::DesktopLinkOpener;
