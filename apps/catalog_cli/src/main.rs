use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    sync::Arc,
    thread,
    time::Duration,
};

mod backend_bridge;
mod config;
mod controller;
mod ui;

use anyhow::{Context, Result};
use catalog_client::HttpCatalogService;
use clap::Parser;
use crossbeam_channel::{bounded, Sender};
use shared::query::{FilterFlag, QueryState, SortKey};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use backend_bridge::commands::BackendCommand;
use config::load_settings;
use controller::{
    events::{parse_command, UiEvent},
    reducer::{Effect, ViewController},
};

#[derive(Parser, Debug)]
#[command(name = "catalog", about = "Search, filter and sort the product catalog")]
struct Args {
    /// Base url of the catalog service, e.g. https://api.escuelajs.co/api/v1
    #[arg(long)]
    service_url: Option<String>,
    #[arg(long, default_value = "catalog.toml")]
    config: PathBuf,
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout_seconds: Option<u64>,
    /// Case-insensitive title filter.
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, default_value_t = SortKey::None)]
    sort: SortKey,
    /// Keep products created after 2021-01-01.
    #[arg(long)]
    new: bool,
    /// Keep products created before 2021-01-01.
    #[arg(long)]
    old: bool,
    /// Read commands from stdin and re-render after each one.
    #[arg(long)]
    interactive: bool,
}

impl Args {
    fn initial_state(&self) -> QueryState {
        QueryState::default()
            .with_search_term(self.search.clone())
            .with_sort_key(self.sort)
            .with_filter_flag(FilterFlag::New, self.new)
            .with_filter_flag(FilterFlag::Old, self.old)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut settings = load_settings(&args.config)?;
    if let Some(url) = &args.service_url {
        settings.service_url = url.clone();
    }
    if let Some(timeout) = args.timeout_seconds {
        settings.request_timeout_seconds = timeout;
    }
    info!(service_url = %settings.service_url, "starting catalog view");

    let service = HttpCatalogService::new(
        &settings.service_url,
        Duration::from_secs(settings.request_timeout_seconds),
    )
    .context("failed to configure catalog service")?;

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(Arc::new(service), cmd_rx, ui_tx.clone())?;

    let mut controller = ViewController::new(args.initial_state());
    controller.request_load(&cmd_tx);
    if !controller.status().is_empty() {
        warn!(status = controller.status(), "catalog load was not queued");
    }

    if args.interactive {
        spawn_stdin_reader(ui_tx);
    } else {
        drop(ui_tx);
    }

    let stdout = io::stdout();
    for event in ui_rx.iter() {
        let loaded = matches!(event, UiEvent::CatalogLoaded { .. });
        match controller.handle(event, &cmd_tx) {
            Effect::Render => {
                let mut out = stdout.lock();
                ui::render_listing(&mut out, &controller.cards())?;
                if let Some(err) = controller.last_error() {
                    writeln!(out, "! [{:?}] {}", err.category(), err.message())?;
                }
                out.flush()?;
                if loaded && !args.interactive {
                    break;
                }
            }
            Effect::Notice(message) => {
                let mut out = stdout.lock();
                writeln!(out, "{message}")?;
                out.flush()?;
            }
            Effect::Idle => {}
            Effect::Quit => break,
        }
    }

    info!(
        shown = controller.session().view().len(),
        "catalog view closed"
    );
    Ok(())
}

fn spawn_stdin_reader(ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let event = match parse_command(&line) {
                Ok(Some(event)) => event,
                Ok(None) => continue,
                Err(err) => UiEvent::Error(err),
            };
            if ui_tx.send(event).is_err() {
                return;
            }
        }
        let _ = ui_tx.send(UiEvent::Quit);
    });
}
