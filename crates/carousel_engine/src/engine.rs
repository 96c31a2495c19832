use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_info, engine_warn};

use crate::fetch::NewsSource;
use crate::normalize::NewsNormalizer;
use crate::EngineEvent;

enum EngineCommand {
    Refresh,
}

/// Runs fetch and normalization on a worker thread and reports results as
/// [`EngineEvent`]s. Dropping the handle stops the worker once the current
/// refresh completes.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(source: Arc<dyn NewsSource>, normalizer: NewsNormalizer) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("carousel-engine".to_string())
            .spawn(move || {
                // Refreshes run one at a time so results arrive in request order.
                while let Ok(command) = cmd_rx.recv() {
                    let event = runtime.block_on(handle_command(
                        source.as_ref(),
                        &normalizer,
                        command,
                    ));
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn refresh(&self) {
        let _ = self.cmd_tx.send(EngineCommand::Refresh);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    source: &dyn NewsSource,
    normalizer: &NewsNormalizer,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::Refresh => match source.fetch_records().await {
            Ok(records) => {
                let items = normalizer.normalize(records);
                engine_info!("Refresh produced {} news items", items.len());
                EngineEvent::ItemsReady(items)
            }
            Err(err) => {
                engine_warn!("Refresh failed: {}", err);
                EngineEvent::SourceUnavailable(err)
            }
        },
    }
}
