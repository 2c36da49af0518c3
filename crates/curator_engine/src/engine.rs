use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use curator_logging::curator_warn;

use crate::search::{ExaSearcher, SearchSettings, Searcher};
use crate::{EngineEvent, RequestId, SearchQuery};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

enum EngineCommand {
    Search { request_id: RequestId, query: SearchQuery },
}

/// Runs searches on a background tokio runtime.
///
/// Commands go in and events come out over std channels, so the caller's
/// loop never awaits anything.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SearchSettings) -> Result<Self, EngineError> {
        Self::with_searcher(Arc::new(ExaSearcher::new(settings)))
    }

    pub fn with_searcher(searcher: Arc<dyn Searcher>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("curator-engine")
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let searcher = searcher.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(searcher.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn search(&self, request_id: RequestId, query: SearchQuery) {
        if self
            .cmd_tx
            .send(EngineCommand::Search { request_id, query })
            .is_err()
        {
            curator_warn!("engine thread gone; search {} dropped", request_id);
        }
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    searcher: &dyn Searcher,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::Search { request_id, query } => {
            let result = searcher.search(&query).await;
            if let Err(err) = &result {
                curator_warn!("search {} failed: {}", request_id, err);
            }
            let _ = event_tx.send(EngineEvent::SearchCompleted { request_id, result });
        }
    }
}
