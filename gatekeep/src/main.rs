//! A terminal client for logging in, signing up, and reviewing account
//! activity

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

/// Declaring the fields of a form
mod form_fields;

/// Keeping the session on disk between runs
mod storage;

use app::{App, EffectContext};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::{io, path::Path, process::ExitCode, sync::Arc};
use tokio::{
    sync::mpsc::{unbounded_channel, UnboundedSender},
    task::JoinHandle,
    time,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    // The terminal belongs to the UI, so logs go to a file next to the
    // session instead.
    let (writer, _guard) = tracing_appender::non_blocking(log_appender(&config.data_dir())?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();

    tracing::info!(server = %config.server, "starting");

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let res = run(terminal, Arc::new(config)).await;
    ratatui::restore();
    res
}

/// A daily log file in `dir`, creating the directory if needed.
fn log_appender(dir: &Path) -> io::Result<RollingFileAppender> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("gatekeep.log")
        .build(dir)
        .map_err(io::Error::other)
}

/// Manage the lifecycle of the app
async fn run(mut terminal: DefaultTerminal, config: Arc<config::Config>) -> io::Result<ExitCode> {
    let mut app = App::new(config.server.clone());
    let ctx = Arc::new(EffectContext::new());

    // Network and disk access happen in async tasks. Once those tasks are
    // done, we read their results off of a channel. We keep track of
    // outstanding effects so we can exit cleanly.
    let (effect_tx, mut effect_rx) = unbounded_channel();
    let mut outstanding_effects = Vec::with_capacity(1);

    // Defer the first draw until after init is spawned so anything it changes
    // shows up right away.
    outstanding_effects.push(spawn_effect_task(
        effect_tx.clone(),
        Arc::clone(&ctx),
        Arc::clone(&config),
        app.init(),
    ));
    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    // Ticks let us notice an access token running out while the app sits idle.
    let mut ticks = time::interval(time::Duration::from_secs(30));

    loop {
        // Wait for either external input or the result of an effect. Not every
        // piece of input is interesting, so this is optional.
        let next_action_opt = tokio::select! {
            event_opt = event_stream.next() => {
                match event_opt {
                    Some(Ok(Event::Key(key_event))) => {
                        Some(app::Action::Key(key_event))
                    }
                    Some(Err(err)) => {
                        Some(app::Action::Problem(err.to_string()))
                    }
                    _ => None,
                }
            },

            _ = ticks.tick() => {
                Some(app::Action::TimePassed)
            },

            effect_opt = effect_rx.recv() => {
                effect_opt.flatten()
            }
        };

        if let Some(action) = next_action_opt {
            for effect in app.handle(action) {
                outstanding_effects.push(spawn_effect_task(
                    effect_tx.clone(),
                    Arc::clone(&ctx),
                    Arc::clone(&config),
                    effect,
                ));
            }
        }

        terminal.draw(|frame| app.render(frame))?;

        // This list stays short since we prune it on every pass, so a full
        // scan is fine.
        outstanding_effects.retain(|handle| !handle.is_finished());

        // Wait for outstanding effects (e.g. saving or clearing the session)
        // before exiting.
        if let Some(code) = app.should_exit() {
            for effect in outstanding_effects.drain(..) {
                if let Err(err) = effect.await {
                    tracing::error!(?err, "effect task failed during shutdown");
                }
            }

            tracing::info!("exiting");
            return Ok(code);
        }
    }
}

/// Spawn a task to run an effect and send the next action to the app.
fn spawn_effect_task(
    effect_tx: UnboundedSender<Option<app::Action>>,
    ctx: Arc<EffectContext>,
    config: Arc<config::Config>,
    effect: app::Effect,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let next_action = effect.run(&ctx, &config).await;

        // A closed channel means the loop has already returned and we're
        // shutting down, so the action has nowhere to go.
        if effect_tx.send(next_action).is_err() {
            tracing::debug!("dropping action after shutdown");
        }
    })
}
