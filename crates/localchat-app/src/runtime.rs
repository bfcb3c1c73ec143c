//! Generic runtime for application orchestration.
//!
//! The Runtime drives the UI event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`Bridge`]: input path to the socket writer
//! - [`Driver`]: Platform-specific I/O
//!
//! The read loop runs alongside as a separate future. The runtime watches
//! its lifecycle state and the [`ChatView`] revision and redraws when either
//! moves. Quitting triggers [`Shutdown`] and keeps the UI alive until the
//! read loop has finished closing.

use std::future::Future;

use localchat_client::{ConnectionState, Environment};
use tokio::sync::watch;

use crate::{App, AppAction, AppEvent, Bridge, ChatView, Driver, Shutdown};

/// Generic runtime that orchestrates App, Bridge, and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
/// - `E`: Environment for time and id generation
pub struct Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    driver: D,
    app: App,
    bridge: Bridge<E>,
    view: ChatView,
    connection: watch::Receiver<ConnectionState>,
    shutdown: Shutdown,
    rendered_revision: Option<u64>,
}

impl<D, E> Runtime<D, E>
where
    D: Driver,
    E: Environment,
{
    /// Create a new runtime.
    ///
    /// `connection` and `shutdown` are the read loop's state receiver and
    /// shutdown handle.
    pub fn new(
        driver: D,
        server_url: String,
        bridge: Bridge<E>,
        view: ChatView,
        connection: watch::Receiver<ConnectionState>,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            driver,
            app: App::new(server_url),
            bridge,
            view,
            connection,
            shutdown,
            rendered_revision: None,
        }
    }

    /// Run the UI loop until `read_loop` completes.
    ///
    /// Each cycle:
    /// 1. Polls the driver for input (or a tick)
    /// 2. Processes actions between App and Bridge
    /// 3. Expires stale typing entries
    /// 4. Picks up connection state changes from the read loop
    /// 5. Redraws if the chat view changed
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run<F>(mut self, read_loop: F) -> Result<ConnectionState, D::Error>
    where
        F: Future<Output = ConnectionState>,
    {
        let result = self.event_loop(read_loop).await;
        self.driver.stop();
        result
    }

    async fn event_loop<F>(&mut self, read_loop: F) -> Result<ConnectionState, D::Error>
    where
        F: Future<Output = ConnectionState>,
    {
        self.render()?;
        tokio::pin!(read_loop);

        loop {
            tokio::select! {
                biased;

                state = &mut read_loop => {
                    let actions = self.app.handle(AppEvent::ConnectionChanged(state));
                    self.process_actions(actions)?;
                    return Ok(state);
                },
                event = self.driver.poll_event() => {
                    self.process_event(event?.unwrap_or(AppEvent::Tick))?;
                },
            }

            // Every pass, so a burst of keys cannot hold expiry back.
            self.bridge.handle_tick(&self.view);
            self.sync_connection()?;
            if self.rendered_revision != Some(self.view.revision()) {
                self.render()?;
            }
        }
    }

    fn process_event(&mut self, event: AppEvent) -> Result<(), D::Error> {
        let actions = self.app.handle(event);
        self.process_actions(actions)
    }

    /// Process actions returned by the App.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<(), D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.render()?,
                    AppAction::Quit => {
                        tracing::info!("quit requested");
                        self.shutdown.trigger();
                    },
                    AppAction::Submit(command) => {
                        for event in self.bridge.submit(&command) {
                            pending_actions.extend(self.app.handle(event));
                        }
                    },
                    AppAction::ScrollUp(lines) => self.view.scroll_up(lines),
                    AppAction::ScrollDown(lines) => self.view.scroll_down(lines),
                }
            }
        }
        Ok(())
    }

    fn sync_connection(&mut self) -> Result<(), D::Error> {
        if !self.connection.has_changed().unwrap_or(false) {
            return Ok(());
        }
        let state = *self.connection.borrow_and_update();
        let actions = self.app.handle(AppEvent::ConnectionChanged(state));
        self.process_actions(actions)
    }

    fn render(&mut self) -> Result<(), D::Error> {
        let revision = self.view.revision();
        self.driver.render(&self.app, &self.view.snapshot())?;
        self.rendered_revision = Some(revision);
        Ok(())
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }
}
