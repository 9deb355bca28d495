use crate::auth::TokenProvider;
use crate::event::AppEvent;
use crate::github::api::GitHubApi;
use crate::github::types::Slug;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Runs summary fetches in the background. Only the latest load may report
/// back; older ones are cancelled and their results dropped.
pub struct Loader {
    tx: mpsc::UnboundedSender<AppEvent>,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl Loader {
    pub fn new(tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            tx,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn start(&mut self, api: GitHubApi, slug: Slug, auth: Arc<dyn TokenProvider>) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let tx = self.tx.clone();
        tokio::spawn(async move {
            debug!(generation, %slug, "load started");
            let result = tokio::select! {
                _ = token.cancelled() => None,
                result = api.fetch_summary(&slug, auth.as_ref()) => Some(result),
            };
            let Some(result) = result else {
                debug!(generation, "load cancelled");
                return;
            };
            if token.is_cancelled() {
                return;
            }
            let result = result.map(Box::new).map_err(|e| {
                error!(generation, %slug, "error fetching GitHub data: {e}");
                e.to_string()
            });
            let _ = tx.send(AppEvent::SummaryLoaded { generation, result });
        });

        generation
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }

    /// Accepts a finished load if it is the current one.
    pub fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.in_flight.is_none() {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}

impl Drop for Loader {
    fn drop(&mut self) {
        self.cancel();
    }
}
