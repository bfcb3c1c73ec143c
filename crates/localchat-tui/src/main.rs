//! localchat terminal client entry point.

use std::sync::Arc;

use clap::Parser;
use localchat_app::{Bridge, ChatView, ReadLoop, Runtime, Shutdown};
use localchat_client::{
    ConnectionState, Dispatcher, OutboundBuilder, Session, SystemEnv, TransportError,
    transport::{self, ConnectedClient},
};
use localchat_tui::{
    Config, IdentityError, StatusNotifier, TerminalDriver, TerminalError, identity,
    logging::{self, LoggingError},
};
use thiserror::Error;

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Terminal(#[from] TerminalError),
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::parse();
    logging::init(config.log_level, config.log_file.as_deref())?;

    let own_id = identity::load_or_create(config.dev)?;
    let url = config.server_url();
    tracing::info!(%own_id, username = %config.username, "connecting to {url}");

    let ConnectedClient { outbox, inbound, tasks } =
        transport::connect(&url).await.inspect_err(|e| tracing::error!("{e}"))?;

    let env = SystemEnv::new();
    let session = Arc::new(Session::new(own_id.clone()));
    let builder = OutboundBuilder::new(env, own_id, config.username.clone());

    let view = ChatView::new();
    let dispatcher = Dispatcher::new(env, Arc::clone(&session), builder.clone());
    let (read_loop, connection) =
        ReadLoop::new(dispatcher, view.clone(), StatusNotifier::new(view.clone()), outbox.clone());

    let shutdown = Shutdown::new();
    let reader = tokio::spawn(read_loop.run(inbound, shutdown.clone()));

    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            signal.trigger();
        }
    });

    let bridge = Bridge::new(env, builder, session, outbox);
    let driver = TerminalDriver::new()?;
    let runtime = Runtime::new(driver, url, bridge, view, connection, shutdown);

    let result = runtime
        .run(async move {
            reader.await.unwrap_or_else(|e| {
                tracing::error!("read loop failed: {e}");
                ConnectionState::Closed
            })
        })
        .await;
    tasks.stop();

    let state = result?;
    tracing::info!("exited in state {state:?}");
    Ok(())
}
