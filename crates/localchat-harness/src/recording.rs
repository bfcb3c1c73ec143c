//! Recording collaborators for the read loop.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use localchat_app::{ChatView, Notifier, NotifyError, Surface};
use localchat_client::ChatLine;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One call made on a [`Surface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    /// `append_line`
    Append(ChatLine),
    /// `clear`
    Clear,
    /// `scroll_to_end`
    ScrollToEnd,
    /// `set_status_label`
    StatusLabel(String),
}

/// Surface that records every call and forwards it to a [`ChatView`].
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
    view: ChatView,
}

impl RecordingSurface {
    /// Empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// View the calls were forwarded to.
    pub fn view(&self) -> ChatView {
        self.view.clone()
    }

    /// Calls so far, in order.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        lock(&self.calls).clone()
    }

    /// Drain recorded calls.
    pub fn take_calls(&self) -> Vec<SurfaceCall> {
        std::mem::take(&mut *lock(&self.calls))
    }

    /// Rendered text of every line currently shown.
    pub fn rendered(&self) -> Vec<String> {
        self.view.snapshot().lines.iter().map(ToString::to_string).collect()
    }

    fn record(&self, call: SurfaceCall) {
        lock(&self.calls).push(call);
    }
}

impl Surface for RecordingSurface {
    fn append_line(&self, line: ChatLine) {
        self.record(SurfaceCall::Append(line.clone()));
        self.view.append_line(line);
    }

    fn clear(&self) {
        self.record(SurfaceCall::Clear);
        self.view.clear();
    }

    fn scroll_to_end(&self) {
        self.record(SurfaceCall::ScrollToEnd);
        self.view.scroll_to_end();
    }

    fn set_status_label(&self, label: String) {
        self.record(SurfaceCall::StatusLabel(label.clone()));
        self.view.set_status_label(label);
    }
}

/// Notifier that records notifications, optionally failing every one.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    failure: Option<String>,
}

impl RecordingNotifier {
    /// Notifier that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifier whose deliveries all fail with `reason`. Attempts are still
    /// recorded.
    pub fn failing(reason: &str) -> Self {
        Self { failure: Some(reason.to_string()), ..Self::default() }
    }

    /// `(title, message)` pairs so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        lock(&self.sent).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        lock(&self.sent).push((title.to_string(), message.to_string()));
        match &self.failure {
            Some(reason) => Err(NotifyError(reason.clone())),
            None => Ok(()),
        }
    }
}
