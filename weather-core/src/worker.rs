//! Background fetch loop.
//!
//! The render loop submits queries through a [`FetchClient`]; the worker polls
//! for the latest one on a fixed interval and publishes a [`FetchOutcome`] per
//! tick. There is no dedup: a standing query is re-fetched every tick.

use chrono::Utc;
use std::time::Duration;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    model::{FETCH_FAILED, FetchOutcome},
    provider::WeatherSource,
};

#[derive(Debug)]
pub struct FetchWorker {
    source: Box<dyn WeatherSource>,
    poll_interval: Duration,
}

/// Render-loop side of the worker channels. Both methods are non-blocking so
/// they can be called from a frame.
#[derive(Debug)]
pub struct FetchClient {
    queries: UnboundedSender<String>,
    outcomes: UnboundedReceiver<FetchOutcome>,
}

impl FetchClient {
    /// Replace the pending query. Returns false once the worker has stopped.
    pub fn submit(&self, query: &str) -> bool {
        self.queries.send(query.to_string()).is_ok()
    }

    pub fn try_next(&mut self) -> Option<FetchOutcome> {
        self.outcomes.try_recv().ok()
    }

    pub async fn next(&mut self) -> Option<FetchOutcome> {
        self.outcomes.recv().await
    }
}

impl FetchWorker {
    pub fn new(source: Box<dyn WeatherSource>, poll_interval: Duration) -> Self {
        Self { source, poll_interval }
    }

    /// Spawn the loop onto the current tokio runtime.
    pub fn spawn(self, cancel: CancellationToken) -> (FetchClient, JoinHandle<()>) {
        let (query_tx, query_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let handle = tokio::spawn(self.run(query_rx, outcome_tx, cancel));

        (FetchClient { queries: query_tx, outcomes: outcome_rx }, handle)
    }

    pub async fn run(
        self,
        mut queries: UnboundedReceiver<String>,
        outcomes: UnboundedSender<FetchOutcome>,
        cancel: CancellationToken,
    ) {
        let mut pending = String::new();
        info!(interval = ?self.poll_interval, "fetch worker started");

        loop {
            if cancel.is_cancelled() {
                break;
            }

            // Latest submission wins.
            loop {
                match queries.try_recv() {
                    Ok(query) => pending = query.trim().to_string(),
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        debug!("query channel closed");
                        return;
                    }
                }
            }

            if !pending.is_empty() {
                let payload = self.fetch(&pending).await;
                let outcome =
                    FetchOutcome { query: pending.clone(), payload, fetched_at: Utc::now() };

                if outcomes.send(outcome).is_err() {
                    debug!("outcome receiver dropped");
                    break;
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.poll_interval) => {}
            }
        }

        info!("fetch worker stopped");
    }

    async fn fetch(&self, query: &str) -> String {
        debug!(query, "fetching current conditions");

        match self.source.current_payload(query).await {
            Ok(body) => body,
            Err(err) => {
                warn!(query, error = %err, "fetch failed");
                FETCH_FAILED.to_string()
            }
        }
    }
}
