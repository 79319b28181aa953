// SPDX-License-Identifier: GPL-3.0-only

//! Keyboard service loop.
//!
//! [`KeyboardService`] owns the [`Keyboard`] and is driven by exactly one
//! task. Two event sources feed it:
//!
//! - [`ServiceCommand`]s from D-Bus (activate, deactivate, taps, grid
//!   queries, quit)
//! - theme-change [`Intent`]s from the broadcaster, received only while the
//!   keyboard surface is shown
//!
//! Both are serialized onto the same loop, so keyboard state has a single
//! mutator and needs no locking.
//!
//! # Surface Lifecycle
//!
//! `Activate` creates a [`Surface`], which registers for
//! `ACTION_CHANGE_THEME`. `Deactivate`, `Quit` and dropping the service all
//! drop the surface, which unregisters it. Keyboard state (mode, theme)
//! survives surface teardown.

use futures::channel::mpsc;
use futures::StreamExt;

use crate::app_settings::ACTION_CHANGE_THEME;
use crate::broadcast::{Broadcaster, Intent, Subscription};
use crate::dbus::ServiceCommand;
use crate::input::HostBridge;
use crate::keyboard::{Keyboard, TapOutcome};

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep processing events
    Continue,
    /// Stop the loop
    Quit,
}

/// A shown keyboard surface.
///
/// Holds the theme-change subscription for as long as the surface lives.
#[derive(Debug)]
pub struct Surface {
    subscription: Subscription,
}

impl Surface {
    fn show(broadcaster: &Broadcaster) -> Self {
        Self {
            subscription: broadcaster.register(ACTION_CHANGE_THEME),
        }
    }
}

/// The keyboard plus its surface and event sources.
#[derive(Debug)]
pub struct KeyboardService<B: HostBridge> {
    keyboard: Keyboard<B>,
    broadcaster: Broadcaster,
    surface: Option<Surface>,
}

impl<B: HostBridge> KeyboardService<B> {
    /// Creates a service with no surface shown.
    pub fn new(keyboard: Keyboard<B>, broadcaster: Broadcaster) -> Self {
        Self {
            keyboard,
            broadcaster,
            surface: None,
        }
    }

    /// The keyboard.
    pub fn keyboard(&self) -> &Keyboard<B> {
        &self.keyboard
    }

    /// Returns whether the surface is shown.
    pub fn is_surface_shown(&self) -> bool {
        self.surface.is_some()
    }

    /// Shows the surface, acquiring the theme subscription.
    ///
    /// Showing an already shown surface only rebuilds the grid.
    pub fn show_surface(&mut self) {
        if self.surface.is_none() {
            self.surface = Some(Surface::show(&self.broadcaster));
            tracing::info!("Keyboard surface shown");
        }
        self.keyboard.on_external_activate();
    }

    /// Tears the surface down, releasing the theme subscription.
    pub fn hide_surface(&mut self) {
        if self.surface.take().is_some() {
            tracing::info!("Keyboard surface torn down");
        }
    }

    /// Applies one command.
    pub fn handle_command(&mut self, command: ServiceCommand) -> Flow {
        match command {
            ServiceCommand::Activate => self.show_surface(),
            ServiceCommand::Deactivate => self.hide_surface(),
            ServiceCommand::Tap { row, column } => {
                self.tap(row, column);
            }
            ServiceCommand::Grid(reply) => {
                if reply.send(self.grid_json()).is_err() {
                    tracing::debug!("Grid requester went away");
                }
            }
            ServiceCommand::Quit => {
                self.hide_surface();
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Applies a broadcast intent.
    pub fn handle_intent(&mut self, intent: &Intent) -> bool {
        self.keyboard.on_theme_change_requested(intent)
    }

    /// Taps the displayed key at a position.
    ///
    /// Ignored when no surface is shown or nothing is displayed there.
    pub fn tap(&mut self, row: usize, column: usize) -> Option<TapOutcome> {
        if self.surface.is_none() {
            tracing::debug!("Tap ({}, {}) ignored: keyboard surface is not shown", row, column);
            return None;
        }

        let outcome = self.keyboard.tap_at(row, column);
        if outcome.is_none() {
            tracing::warn!("Tap ({}, {}) is outside the key grid", row, column);
        }
        outcome
    }

    /// The rendered grid as JSON.
    pub fn grid_json(&self) -> String {
        serde_json::to_string(self.keyboard.grid()).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize key grid: {}", e);
            String::from("{}")
        })
    }

    /// Runs until `Quit` or until every command sender is gone.
    ///
    /// Pending theme intents are handled before the next command.
    ///
    /// # Returns
    ///
    /// The keyboard, with its final state.
    pub async fn run(mut self, mut commands: mpsc::Receiver<ServiceCommand>) -> Keyboard<B> {
        tracing::info!("Keyboard service running");

        loop {
            tokio::select! {
                biased;

                intent = next_intent(&mut self.surface) => {
                    if let Some(intent) = intent {
                        self.handle_intent(&intent);
                    }
                }
                command = commands.next() => {
                    let Some(command) = command else {
                        tracing::info!("Command channel closed");
                        break;
                    };
                    if self.handle_command(command) == Flow::Quit {
                        break;
                    }
                }
            }
        }

        self.hide_surface();
        tracing::info!("Keyboard service stopped");
        self.keyboard
    }
}

async fn next_intent(surface: &mut Option<Surface>) -> Option<Intent> {
    match surface {
        Some(surface) => surface.subscription.next().await,
        None => std::future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================
