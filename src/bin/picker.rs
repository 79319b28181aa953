// SPDX-License-Identifier: GPL-3.0-only

//! Tapboard theme picker and settings
//!
//! Talks to a running keyboard service over D-Bus.
//!
//! ```bash
//! tapboard-picker themes
//! tapboard-picker set "Ocean Blue"
//! tapboard-picker enable
//! ```

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use tapboard::config::Config;
use tapboard::dbus::{DbusClientBlocking, DbusResult};
use tapboard::picker::{SettingsRequest, SettingsSurface, ThemePicker};

#[derive(Debug, Parser)]
#[command(name = "tapboard-picker", version, about = "Pick the Tapboard theme and toggle the keyboard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the available themes
    Themes,
    /// Switch the keyboard to a theme
    Set {
        /// Theme name, as listed by `themes`
        name: String,
    },
    /// Enable and show the keyboard
    Enable,
    /// Hide the keyboard
    Disable,
    /// Stop the keyboard service
    Quit,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("tapboard-picker: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> DbusResult<ExitCode> {
    match command {
        Command::Themes => {
            let picker = match connect().and_then(|client| client.list_themes()) {
                Ok(names) => ThemePicker::from_names(names),
                Err(e) => {
                    tracing::warn!("Keyboard service unreachable ({}), listing local themes", e);
                    ThemePicker::from_registry(&Config::load().build_registry())
                }
            };
            for line in picker.render() {
                println!("{}", line);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Set { name } => {
            let mut client = connect()?;
            let mut surface = SettingsSurface::new(ThemePicker::from_names(client.list_themes()?));
            let Some(request) = surface.pick_theme(&name) else {
                eprintln!("tapboard-picker: unknown theme '{}'", name);
                return Ok(ExitCode::from(2));
            };
            surface.submit(&request, &mut client)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Enable => submit(SettingsRequest::Activate),
        Command::Disable => submit(SettingsRequest::Deactivate),
        Command::Quit => {
            connect()?.quit()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn connect() -> DbusResult<DbusClientBlocking> {
    DbusClientBlocking::new()
}

fn submit(request: SettingsRequest) -> DbusResult<ExitCode> {
    let mut client = connect()?;
    SettingsSurface::default().submit(&request, &mut client)?;
    Ok(ExitCode::SUCCESS)
}
