//! Chat surface the read loop renders into.
//!
//! The read loop never draws. It pushes [`RenderCommand`]s into a
//! [`Surface`] and the UI loop redraws when [`ChatView::revision`] moves.

use std::sync::{
    Arc, Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use localchat_client::{ChatLine, RenderCommand, Session};

use crate::ViewState;

/// Rendering collaborator for the dispatcher.
pub trait Surface: Send + Sync {
    /// Add a message at the bottom.
    fn append_line(&self, line: ChatLine);

    /// Remove every message.
    fn clear(&self);

    /// Follow the newest message.
    fn scroll_to_end(&self);

    /// Replace the typing label.
    fn set_status_label(&self, label: String);
}

/// Route one render command to its surface method.
pub fn apply_render<S: Surface + ?Sized>(surface: &S, command: RenderCommand) {
    match command {
        RenderCommand::Append(line) => surface.append_line(line),
        RenderCommand::Clear => surface.clear(),
        RenderCommand::ScrollToEnd => surface.scroll_to_end(),
        RenderCommand::SetStatusLabel(label) => surface.set_status_label(label),
    }
}

/// Write `session`'s typing label to `surface`.
///
/// The label is read and written under the session lock, so the read loop
/// and the tick path cannot interleave a stale label over a fresh one.
pub fn publish_typing_label<I, S>(session: &Session<I>, surface: &S)
where
    I: Copy + Ord + std::ops::Sub<Output = std::time::Duration>,
    S: Surface + ?Sized,
{
    session.publish_typing_label(|label| surface.set_status_label(label));
}

/// Shared [`ViewState`] with a change counter.
#[derive(Debug, Clone, Default)]
pub struct ChatView {
    state: Arc<Mutex<ViewState>>,
    revision: Arc<AtomicU64>,
}

impl ChatView {
    /// Empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the current view for drawing.
    pub fn snapshot(&self) -> ViewState {
        self.lock().clone()
    }

    /// Bumped on every change.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }

    /// Scroll toward older messages, stopping at the first one.
    pub fn scroll_up(&self, lines: usize) {
        self.update(|view| {
            let max = view.lines.len().saturating_sub(1);
            view.scroll_offset = (view.scroll_offset + lines).min(max);
        });
    }

    /// Scroll toward newer messages.
    pub fn scroll_down(&self, lines: usize) {
        self.update(|view| view.scroll_offset = view.scroll_offset.saturating_sub(lines));
    }

    /// Show a transient notice in the status bar.
    pub fn set_notice(&self, notice: impl Into<String>) {
        let notice = notice.into();
        self.update(|view| view.notice = Some(notice));
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        f(&mut self.lock());
        self.revision.fetch_add(1, Ordering::AcqRel);
    }

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Surface for ChatView {
    fn append_line(&self, line: ChatLine) {
        self.update(|view| {
            view.lines.push(line);
            // Keep the same messages on screen while scrolled back.
            if view.scroll_offset > 0 {
                view.scroll_offset += 1;
            }
        });
    }

    fn clear(&self) {
        self.update(|view| {
            view.lines.clear();
            view.scroll_offset = 0;
        });
    }

    fn scroll_to_end(&self) {
        self.update(|view| view.scroll_offset = 0);
    }

    fn set_status_label(&self, label: String) {
        self.update(|view| view.status_label = label);
    }
}
