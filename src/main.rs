//! acctdesk - A terminal admin console for an account inventory service
//!
//! This is the main entry point for the acctdesk application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod cli;
mod component;
mod components;
mod config;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::cli::CliArgs;
use crate::component::Component;
use crate::config::Config;
use crate::services::{
    load_inventory, ApiClient, Dispatcher, Exporter, FileStore, SessionStore, SystemClipboard,
};
use crate::tui::Tui;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::Event;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

const STATE_FILE: &str = "state.json";

fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = args.merge_into(Config::load().unwrap_or_default());

    // Logging is best effort; the console works without a log file
    if let Err(e) = logging::init() {
        eprintln!("Logging disabled: {:#}", e);
    }

    if args.save_config {
        config.save().context("failed to save config")?;
    }

    let mut app = build_app(&args, &config)?;
    app.init()?;

    // Setup terminal
    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(50));
    tui.enter()?;

    // Main event loop
    let result = run_app(&mut tui, &mut app);

    // Cleanup terminal
    tui.exit()?;

    // Handle any errors
    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Wire the services the App needs from the merged config
fn build_app(args: &CliArgs, config: &Config) -> Result<App> {
    let client = if args.offline {
        None
    } else {
        Some(ApiClient::new(config).context("invalid server configuration")?)
    };
    let source = match (&client, &config.inventory_path) {
        (Some(client), _) => client.base_url().to_string(),
        (None, Some(path)) => path.clone(),
        (None, None) => "no data source".to_string(),
    };

    let inventory_path = config.inventory_path.as_ref().map(PathBuf::from);
    let records = match &inventory_path {
        Some(path) => load_inventory(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => Vec::new(),
    };

    let store = match Config::config_dir() {
        Some(dir) => SessionStore::new(Box::new(FileStore::open(dir.join(STATE_FILE)))),
        None => {
            warn!("HOME is not set, settings will not persist");
            SessionStore::in_memory()
        }
    };

    info!(
        %source,
        online = client.is_some(),
        records = records.len(),
        "starting"
    );

    Ok(App::new(
        Dispatcher::new(client),
        store,
        Exporter::new(config.export_dir()),
        Box::new(SystemClipboard),
    )
    .with_records(records)
    .with_source(source)
    .with_inventory_path(inventory_path))
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        // Draw the UI
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                warn!(error = %e, "draw failed");
            }
        })?;

        if std::mem::take(&mut app.pending_bell) {
            tui.bell()?;
        }

        // Poll for events
        if let Some(event) = tui.next_event()? {
            // Convert event to action
            let action = match event {
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Process the action
            if let Some(action) = action {
                // Action might produce a follow-up action
                let mut current_action = Some(action);
                while let Some(a) = current_action {
                    current_action = app.update(a)?;
                }
            }
        } else {
            // No event - send a tick for time-based updates
            app.update(Action::Tick)?;
        }
    }

    Ok(())
}
