// SPDX-License-Identifier: GPL-3.0-only

//! D-Bus interface for the Tapboard keyboard service.
//!
//! The keyboard service registers on the session bus so that the host (the
//! compositor integration, the picker, scripts) can activate the keyboard,
//! request theme changes, feed taps, and receive committed text.
//!
//! # Architecture
//!
//! - **Server**: the service binary exposes [`TapboardInterface`]. Method
//!   calls that touch the keyboard are turned into [`ServiceCommand`]s and
//!   sent over a channel to the single task owning the keyboard. Theme
//!   changes are published on the process-local broadcaster instead.
//! - **Signals**: host-bridge actions leave the service as D-Bus signals,
//!   emitted through [`DbusServer::emit_host_action`].
//! - **Client**: [`DbusClient`] and [`DbusClientBlocking`] wrap the generated
//!   proxy for the picker binary.
//!
//! # Interface
//!
//! - Object path: `/io/github/tapboard/Tapboard`
//! - Interface name: `io.github.tapboard.Tapboard`
//! - Methods: `Activate()`, `Deactivate()`, `ChangeTheme(s)`,
//!   `ListThemes() -> as`, `Tap(u, u)`, `Grid() -> s`, `Quit()`
//! - Signals: `CommitText(s)`, `DeleteBackward(i)`, `SendEnterKey()`,
//!   `OpenSettingsSurface()`

use crate::app_settings::{DBUS_INTERFACE, DBUS_PATH};
use crate::broadcast::{Broadcaster, Intent};
use crate::input::HostAction;
use futures::channel::{mpsc, oneshot};
use futures::SinkExt;
use thiserror::Error;
use zbus::interface;
use zbus::object_server::SignalEmitter;

/// Commands sent from D-Bus to the keyboard service loop.
#[derive(Debug)]
pub enum ServiceCommand {
    /// Show the keyboard surface.
    Activate,
    /// Tear down the keyboard surface.
    Deactivate,
    /// Tap the key displayed at a grid position.
    Tap {
        /// Row index, top to bottom
        row: usize,
        /// Column index, left to right
        column: usize,
    },
    /// Reply with the rendered grid as JSON.
    Grid(oneshot::Sender<String>),
    /// Stop the service.
    Quit,
}

/// The D-Bus interface implementation for the keyboard service.
pub struct TapboardInterface {
    /// Channel to the keyboard service loop.
    command_tx: mpsc::Sender<ServiceCommand>,
    /// Broadcaster theme-change intents are published on.
    broadcaster: Broadcaster,
    /// Theme names in registry order.
    theme_names: Vec<String>,
}

impl TapboardInterface {
    /// Create a new interface instance.
    pub fn new(
        command_tx: mpsc::Sender<ServiceCommand>,
        broadcaster: Broadcaster,
        theme_names: Vec<String>,
    ) -> Self {
        Self {
            command_tx,
            broadcaster,
            theme_names,
        }
    }

    async fn send_command(&mut self, command: ServiceCommand) {
        let name = format!("{:?}", command);
        if let Err(e) = self.command_tx.send(command).await {
            tracing::error!("Failed to send {} command: {}", name, e);
        }
    }
}

#[interface(name = "io.github.tapboard.Tapboard")]
impl TapboardInterface {
    /// Show the keyboard surface.
    async fn activate(&mut self) {
        tracing::debug!("D-Bus: Activate() called");
        self.send_command(ServiceCommand::Activate).await;
    }

    /// Tear down the keyboard surface.
    async fn deactivate(&mut self) {
        tracing::debug!("D-Bus: Deactivate() called");
        self.send_command(ServiceCommand::Deactivate).await;
    }

    /// Publish a theme-change request.
    async fn change_theme(&self, name: String) {
        tracing::debug!("D-Bus: ChangeTheme({}) called", name);
        let delivered = self.broadcaster.send(Intent::change_theme(name));
        if delivered == 0 {
            tracing::debug!("Theme change not delivered: keyboard surface is not shown");
        }
    }

    /// List selectable themes in registry order.
    async fn list_themes(&self) -> Vec<String> {
        self.theme_names.clone()
    }

    /// Tap the key at a grid position.
    async fn tap(&mut self, row: u32, column: u32) {
        tracing::debug!("D-Bus: Tap({}, {}) called", row, column);
        self.send_command(ServiceCommand::Tap {
            row: row as usize,
            column: column as usize,
        })
        .await;
    }

    /// The rendered grid as JSON.
    async fn grid(&mut self) -> zbus::fdo::Result<String> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send_command(ServiceCommand::Grid(reply_tx)).await;
        reply_rx
            .await
            .map_err(|_| zbus::fdo::Error::Failed("Keyboard service stopped".to_string()))
    }

    /// Stop the service.
    async fn quit(&mut self) {
        tracing::debug!("D-Bus: Quit() called");
        self.send_command(ServiceCommand::Quit).await;
    }

    /// Text to insert at the cursor.
    #[zbus(signal)]
    async fn commit_text(emitter: &SignalEmitter<'_>, text: &str) -> zbus::Result<()>;

    /// Characters to delete before the cursor.
    #[zbus(signal)]
    async fn delete_backward(emitter: &SignalEmitter<'_>, count: i32) -> zbus::Result<()>;

    /// Enter key pressed.
    #[zbus(signal)]
    async fn send_enter_key(emitter: &SignalEmitter<'_>) -> zbus::Result<()>;

    /// Settings key pressed.
    #[zbus(signal)]
    async fn open_settings_surface(emitter: &SignalEmitter<'_>) -> zbus::Result<()>;
}

/// Result type for D-Bus operations.
pub type DbusResult<T> = Result<T, DbusError>;

/// Errors that can occur during D-Bus operations.
#[derive(Debug, Clone, Error)]
pub enum DbusError {
    /// Failed to connect to the session bus.
    #[error("D-Bus connection failed: {0}")]
    ConnectionFailed(String),
    /// Failed to register the service.
    #[error("D-Bus service registration failed: {0}")]
    RegistrationFailed(String),
    /// Failed to call a method or emit a signal.
    #[error("D-Bus method call failed: {0}")]
    MethodCallFailed(String),
    /// Service not available.
    #[error("D-Bus service is not available")]
    ServiceUnavailable,
}

/// D-Bus server handle for the keyboard service.
pub struct DbusServer {
    /// The D-Bus connection.
    connection: zbus::Connection,
}

impl std::fmt::Debug for DbusServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbusServer").finish_non_exhaustive()
    }
}

impl DbusServer {
    /// Start the D-Bus server and register the Tapboard interface.
    ///
    /// # Arguments
    /// * `command_tx` - Channel sender to forward commands to the service loop.
    /// * `broadcaster` - Broadcaster that `ChangeTheme` publishes on.
    /// * `theme_names` - Theme names returned by `ListThemes`.
    ///
    /// # Returns
    /// A `DbusServer` instance if successful, or an error if registration fails.
    pub async fn start(
        command_tx: mpsc::Sender<ServiceCommand>,
        broadcaster: Broadcaster,
        theme_names: Vec<String>,
    ) -> DbusResult<Self> {
        let interface = TapboardInterface::new(command_tx, broadcaster, theme_names);

        let connection = zbus::connection::Builder::session()
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?
            .name(DBUS_INTERFACE)
            .map_err(|e| DbusError::RegistrationFailed(e.to_string()))?
            .serve_at(DBUS_PATH, interface)
            .map_err(|e| DbusError::RegistrationFailed(e.to_string()))?
            .build()
            .await
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;

        tracing::info!(
            "D-Bus service registered: {} at {}",
            DBUS_INTERFACE,
            DBUS_PATH
        );

        Ok(Self { connection })
    }

    /// Get the D-Bus connection.
    pub fn connection(&self) -> &zbus::Connection {
        &self.connection
    }

    /// Emit the signal matching a host-bridge action.
    pub async fn emit_host_action(&self, action: &HostAction) -> DbusResult<()> {
        let iface_ref = self
            .connection
            .object_server()
            .interface::<_, TapboardInterface>(DBUS_PATH)
            .await
            .map_err(|e| DbusError::MethodCallFailed(e.to_string()))?;
        let emitter = iface_ref.signal_emitter();

        let result = match action {
            HostAction::CommitText(text) => TapboardInterface::commit_text(emitter, text).await,
            HostAction::DeleteBackward(count) => {
                TapboardInterface::delete_backward(emitter, *count).await
            }
            HostAction::SendEnterKey => TapboardInterface::send_enter_key(emitter).await,
            HostAction::OpenSettingsSurface => {
                TapboardInterface::open_settings_surface(emitter).await
            }
        };
        result.map_err(|e| DbusError::MethodCallFailed(e.to_string()))?;

        tracing::debug!("D-Bus: emitted {:?}", action);
        Ok(())
    }
}

// ============================================================================
// D-Bus Client
// ============================================================================

/// D-Bus proxy for connecting to the Tapboard service.
#[zbus::proxy(
    interface = "io.github.tapboard.Tapboard",
    default_service = "io.github.tapboard.Tapboard",
    default_path = "/io/github/tapboard/Tapboard"
)]
trait Tapboard {
    /// Show the keyboard surface.
    async fn activate(&self) -> zbus::Result<()>;

    /// Tear down the keyboard surface.
    async fn deactivate(&self) -> zbus::Result<()>;

    /// Publish a theme-change request.
    async fn change_theme(&self, name: &str) -> zbus::Result<()>;

    /// List selectable themes.
    async fn list_themes(&self) -> zbus::Result<Vec<String>>;

    /// Tap the key at a grid position.
    async fn tap(&self, row: u32, column: u32) -> zbus::Result<()>;

    /// The rendered grid as JSON.
    async fn grid(&self) -> zbus::Result<String>;

    /// Stop the service.
    async fn quit(&self) -> zbus::Result<()>;

    /// Text committed by the keyboard.
    #[zbus(signal)]
    async fn commit_text(&self, text: &str) -> zbus::Result<()>;

    /// Characters deleted by the keyboard.
    #[zbus(signal)]
    async fn delete_backward(&self, count: i32) -> zbus::Result<()>;

    /// Enter key pressed.
    #[zbus(signal)]
    async fn send_enter_key(&self) -> zbus::Result<()>;

    /// Settings key pressed.
    #[zbus(signal)]
    async fn open_settings_surface(&self) -> zbus::Result<()>;
}

/// D-Bus client for the picker and other host tools.
pub struct DbusClient {
    /// The proxy to the Tapboard service.
    proxy: TapboardProxy<'static>,
}

impl DbusClient {
    /// Connect to the Tapboard D-Bus service.
    pub async fn connect() -> DbusResult<Self> {
        let connection = zbus::Connection::session()
            .await
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;

        let proxy = TapboardProxy::new(&connection)
            .await
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;

        Ok(Self { proxy })
    }

    /// Connect with retries and exponential backoff.
    ///
    /// # Arguments
    /// * `max_retries` - Maximum number of connection attempts.
    /// * `initial_delay_ms` - Initial delay between retries in milliseconds.
    pub async fn connect_with_retries(
        max_retries: u32,
        initial_delay_ms: u64,
    ) -> DbusResult<Self> {
        let mut attempts = 0;
        let mut delay = initial_delay_ms;

        loop {
            match Self::connect().await {
                Ok(client) => return Ok(client),
                Err(e) => {
                    attempts += 1;
                    if attempts >= max_retries {
                        return Err(e);
                    }
                    tracing::warn!(
                        "D-Bus connection attempt {} failed, retrying in {}ms: {}",
                        attempts,
                        delay,
                        e
                    );
                    tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
                    delay *= 2;
                }
            }
        }
    }

    /// Show the keyboard surface.
    pub async fn activate(&self) -> DbusResult<()> {
        self.proxy.activate().await.map_err(method_failed)
    }

    /// Tear down the keyboard surface.
    pub async fn deactivate(&self) -> DbusResult<()> {
        self.proxy.deactivate().await.map_err(method_failed)
    }

    /// Request a theme change.
    pub async fn change_theme(&self, name: &str) -> DbusResult<()> {
        self.proxy.change_theme(name).await.map_err(method_failed)
    }

    /// List the service's themes.
    pub async fn list_themes(&self) -> DbusResult<Vec<String>> {
        self.proxy.list_themes().await.map_err(method_failed)
    }

    /// Tap a grid position.
    pub async fn tap(&self, row: u32, column: u32) -> DbusResult<()> {
        self.proxy.tap(row, column).await.map_err(method_failed)
    }

    /// Fetch the rendered grid as JSON.
    pub async fn grid(&self) -> DbusResult<String> {
        self.proxy.grid().await.map_err(method_failed)
    }

    /// Stop the service.
    pub async fn quit(&self) -> DbusResult<()> {
        self.proxy.quit().await.map_err(method_failed)
    }

    /// Get the underlying proxy for signal subscriptions.
    pub fn proxy(&self) -> &TapboardProxy<'static> {
        &self.proxy
    }
}

fn method_failed(e: zbus::Error) -> DbusError {
    match e {
        zbus::Error::FDO(ref fdo)
            if matches!(
                **fdo,
                zbus::fdo::Error::ServiceUnknown(_) | zbus::fdo::Error::NameHasNoOwner(_)
            ) =>
        {
            DbusError::ServiceUnavailable
        }
        zbus::Error::MethodError(ref name, _, _)
            if matches!(
                name.as_str(),
                "org.freedesktop.DBus.Error.ServiceUnknown"
                    | "org.freedesktop.DBus.Error.NameHasNoOwner"
            ) =>
        {
            DbusError::ServiceUnavailable
        }
        other => DbusError::MethodCallFailed(other.to_string()),
    }
}

// ============================================================================
// Blocking Client API
// ============================================================================

/// Blocking D-Bus client for command-line use.
pub struct DbusClientBlocking {
    /// Runtime for executing async operations.
    runtime: tokio::runtime::Runtime,
}

impl DbusClientBlocking {
    /// Create a new blocking client.
    pub fn new() -> DbusResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DbusError::ConnectionFailed(e.to_string()))?;
        Ok(Self { runtime })
    }

    /// Show the keyboard surface (blocking).
    pub fn activate(&self) -> DbusResult<()> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.activate().await
        })
    }

    /// Tear down the keyboard surface (blocking).
    pub fn deactivate(&self) -> DbusResult<()> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.deactivate().await
        })
    }

    /// Request a theme change (blocking).
    pub fn change_theme(&self, name: &str) -> DbusResult<()> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.change_theme(name).await
        })
    }

    /// List the service's themes (blocking).
    pub fn list_themes(&self) -> DbusResult<Vec<String>> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.list_themes().await
        })
    }

    /// Stop the service (blocking).
    pub fn quit(&self) -> DbusResult<()> {
        self.runtime.block_on(async {
            let client = DbusClient::connect().await?;
            client.quit().await
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
