//! Worker thread that performs catalog loads off the controller thread.

use std::{
    sync::Arc,
    thread::{self, JoinHandle},
};

use anyhow::Context;
use catalog_client::{fetch_catalog, CatalogService};
use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, info};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Runs until the command queue closes. A finished load whose controller has
/// gone away is dropped without being delivered anywhere.
pub fn launch(
    service: Arc<dyn CatalogService>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> anyhow::Result<JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build backend runtime")?;

    thread::Builder::new()
        .name("catalog-backend".into())
        .spawn(move || {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadCatalog { ticket } => {
                        let outcome = runtime.block_on(fetch_catalog(service.as_ref()));
                        if ui_tx
                            .send(UiEvent::CatalogLoaded { ticket, outcome })
                            .is_err()
                        {
                            debug!("view controller gone; discarding catalog load");
                            break;
                        }
                    }
                }
            }
            info!("catalog backend stopped");
        })
        .context("backend worker startup failure")
}

#[cfg(test)]
#[path = "../tests/runtime_tests.rs"]
mod tests;
