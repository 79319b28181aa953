// SPDX-License-Identifier: GPL-3.0-only

//! Process-local broadcast channel.
//!
//! Publishers send an [`Intent`] tagged with an action name; every live
//! [`Subscription`] registered for that action receives a copy. Delivery is
//! asynchronous: intents queue on the subscription and are consumed as a
//! [`Stream`] by the single task that owns the keyboard, so the keyboard
//! state is only ever mutated from one place.
//!
//! A subscription unregisters itself when dropped. Tying it to the lifetime
//! of the keyboard surface guarantees that no listener outlives the surface,
//! whatever path tears the surface down.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures::StreamExt;
//! use tapboard::app_settings::ACTION_CHANGE_THEME;
//! use tapboard::broadcast::{Broadcaster, Intent};
//!
//! let broadcaster = Broadcaster::new();
//! let mut subscription = broadcaster.register(ACTION_CHANGE_THEME);
//!
//! broadcaster.send(Intent::change_theme("Forest"));
//! let intent = subscription.next().await;
//! ```

use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::task::{Context, Poll};

use crate::app_settings::{ACTION_CHANGE_THEME, EXTRA_THEME_NAME};

// ============================================================================
// Intent
// ============================================================================

/// A broadcast message: an action name plus string extras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intent {
    /// Action the intent is routed by
    pub action: String,
    /// Named string payload
    pub extras: HashMap<String, String>,
}

impl Intent {
    /// Creates an intent with no extras.
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            extras: HashMap::new(),
        }
    }

    /// Adds a string extra.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key.into(), value.into());
        self
    }

    /// Reads a string extra.
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    /// Creates a theme-change request.
    pub fn change_theme(theme_name: impl Into<String>) -> Self {
        Self::new(ACTION_CHANGE_THEME).with_extra(EXTRA_THEME_NAME, theme_name)
    }

    /// Returns the requested theme name if this is a theme-change request.
    pub fn theme_name(&self) -> Option<&str> {
        if self.action == ACTION_CHANGE_THEME {
            self.extra(EXTRA_THEME_NAME)
        } else {
            None
        }
    }
}

// ============================================================================
// Broadcaster
// ============================================================================

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    receivers: HashMap<String, Vec<(u64, UnboundedSender<Intent>)>>,
}

/// Cheaply cloneable handle to the broadcast registry.
#[derive(Debug, Clone, Default)]
pub struct Broadcaster {
    registry: Arc<Mutex<Registry>>,
}

impl Broadcaster {
    /// Creates an empty broadcaster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a receiver for `action`.
    ///
    /// The returned [`Subscription`] stays registered until dropped.
    pub fn register(&self, action: impl Into<String>) -> Subscription {
        let action = action.into();
        let (tx, rx) = mpsc::unbounded();

        let id = {
            let mut registry = lock(&self.registry);
            let id = registry.next_id;
            registry.next_id += 1;
            registry
                .receivers
                .entry(action.clone())
                .or_default()
                .push((id, tx));
            id
        };

        tracing::debug!("Registered receiver {} for {}", id, action);

        Subscription {
            id,
            action,
            registry: Arc::downgrade(&self.registry),
            rx,
        }
    }

    /// Delivers `intent` to every receiver of its action.
    ///
    /// # Returns
    ///
    /// The number of receivers the intent was queued for. Zero means nobody
    /// was listening and the intent was dropped.
    pub fn send(&self, intent: Intent) -> usize {
        let registry = lock(&self.registry);
        let Some(receivers) = registry.receivers.get(&intent.action) else {
            tracing::debug!("No receivers for {}", intent.action);
            return 0;
        };

        receivers
            .iter()
            .filter(|(_, tx)| tx.unbounded_send(intent.clone()).is_ok())
            .count()
    }

    /// Number of live receivers for `action`.
    pub fn receiver_count(&self, action: &str) -> usize {
        lock(&self.registry)
            .receivers
            .get(action)
            .map_or(0, Vec::len)
    }
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    // A panic while holding the lock leaves the map consistent.
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// Subscription
// ============================================================================

/// A live registration; yields intents as a [`Stream`].
///
/// Dropping the subscription unregisters it.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    action: String,
    registry: Weak<Mutex<Registry>>,
    rx: UnboundedReceiver<Intent>,
}

impl Subscription {
    /// Action this subscription listens to.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Returns a queued intent without waiting.
    pub fn try_next(&mut self) -> Option<Intent> {
        self.rx.try_recv().ok()
    }
}

impl Stream for Subscription {
    type Item = Intent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Intent>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };

        let mut registry = lock(&registry);
        if let Some(receivers) = registry.receivers.get_mut(&self.action) {
            receivers.retain(|(id, _)| *id != self.id);
            if receivers.is_empty() {
                registry.receivers.remove(&self.action);
            }
        }

        tracing::debug!("Unregistered receiver {} for {}", self.id, self.action);
    }
}

// ============================================================================
// Tests
// ============================================================================
