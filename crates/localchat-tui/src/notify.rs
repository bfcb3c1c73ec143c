//! Notifications for the terminal client.

use localchat_app::{ChatView, Notifier, NotifyError};

/// Shows notifications in the status bar and the log.
#[derive(Clone)]
pub struct StatusNotifier {
    view: ChatView,
}

impl StatusNotifier {
    /// Notifier writing to `view`'s notice slot.
    pub fn new(view: ChatView) -> Self {
        Self { view }
    }
}

impl Notifier for StatusNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!(title, "notification: {message}");
        self.view.set_notice(format!("{title}: {message}"));
        Ok(())
    }
}
