// SPDX-License-Identifier: GPL-3.0-only

//! Tapboard keyboard service
//!
//! Runs the keyboard state machine on a single-threaded runtime and exposes
//! it on the session bus. Committed text, deletes, enter and settings
//! requests leave the process as D-Bus signals. With the `virtual-keyboard`
//! feature each action is also translated into XKB key events, which are
//! logged at debug level and otherwise discarded.
//!
//! ```bash
//! cargo run --bin tapboard
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use futures::channel::mpsc;
use futures::StreamExt;

use tapboard::broadcast::Broadcaster;
use tapboard::config::Config;
use tapboard::dbus::DbusServer;
use tapboard::input::{ChannelBridge, HostAction};
use tapboard::keyboard::Keyboard;
use tapboard::service::KeyboardService;

/// Capacity of the D-Bus command queue.
const COMMAND_QUEUE_SIZE: usize = 32;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_logging();

    tracing::info!("Starting Tapboard keyboard service");

    let config = Config::load();
    let registry = Arc::new(config.build_registry());
    tracing::info!("Theme registry holds {} themes", registry.len());

    let broadcaster = Broadcaster::new();
    let (command_tx, command_rx) = mpsc::channel(COMMAND_QUEUE_SIZE);
    let (action_tx, action_rx) = mpsc::unbounded();

    let server = match DbusServer::start(command_tx, broadcaster.clone(), registry.names()).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to start D-Bus service: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let keyboard = Keyboard::from_config(&config, registry, ChannelBridge::new(action_tx));
    let service = KeyboardService::new(keyboard, broadcaster);

    let run_service = async move {
        let keyboard = service.run(command_rx).await;
        tracing::info!("Final layout mode: {}", keyboard.mode());
        // Dropping the keyboard closes the action channel.
    };

    futures::join!(run_service, forward_host_actions(action_rx, &server));

    tracing::info!("Tapboard keyboard service exited");
    ExitCode::SUCCESS
}

fn init_logging() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "tapboard=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Publishes host actions until the keyboard goes away.
async fn forward_host_actions(mut actions: mpsc::UnboundedReceiver<HostAction>, server: &DbusServer) {
    #[cfg(feature = "virtual-keyboard")]
    let mut virtual_keyboard = {
        let mut keyboard = tapboard::input::VirtualKeyboard::new();
        if let Err(e) = keyboard.initialize() {
            tracing::warn!("Virtual keyboard unavailable: {}", e);
        }
        keyboard
    };

    while let Some(action) = actions.next().await {
        if let Err(e) = server.emit_host_action(&action).await {
            tracing::warn!("Failed to emit {:?}: {}", action, e);
        }

        #[cfg(feature = "virtual-keyboard")]
        {
            use tapboard::input::HostBridge;

            // Nothing injects these; they are drained so the queue stays empty.
            virtual_keyboard.forward(&action);
            let events = virtual_keyboard.take_pending_events();
            tracing::debug!("Virtual keyboard: {} key events for {:?}", events.len(), action);
        }
    }
}
