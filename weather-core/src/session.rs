//! Event-driven controller that runs fetches for a [`WeatherQuery`].
//!
//! The query is only ever mutated from the task that owns the session.
//! Fetches run on spawned tasks and report back over a channel; a newer
//! submission cancels the older task and any completion that still slips
//! through is dropped by id.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::{
    lookup::{FetchTicket, LookupState, RequestId, ValidationError, WeatherQuery},
    model::WeatherSnapshot,
    provider::{FetchError, WeatherProvider},
    view::View,
};

#[derive(Debug)]
struct Completion {
    id: RequestId,
    outcome: Result<WeatherSnapshot, FetchError>,
}

#[derive(Debug)]
struct InFlight {
    id: RequestId,
    cancel: CancellationToken,
}

#[derive(Debug)]
pub struct LookupSession {
    provider: Arc<dyn WeatherProvider>,
    query: WeatherQuery,
    in_flight: Option<InFlight>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl LookupSession {
    pub fn new(provider: Arc<dyn WeatherProvider>, default_city: impl Into<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            provider,
            query: WeatherQuery::new(default_city),
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn query(&self) -> &WeatherQuery {
        &self.query
    }

    pub fn state(&self) -> &LookupState {
        self.query.state()
    }

    pub fn view(&self) -> View {
        View::of(&self.query)
    }

    pub fn edit(&mut self, city: impl Into<String>) {
        self.query.set_city_name(city);
    }

    /// Submit the current draft, superseding any request still in flight.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(&mut self) -> Result<RequestId, ValidationError> {
        self.cancel_in_flight();

        match self.query.submit() {
            Ok(ticket) => {
                let id = ticket.id;
                self.spawn_fetch(ticket);
                Ok(id)
            }
            Err(err) => {
                debug!(city = self.query.city_name(), "rejected blank city name");
                Err(err)
            }
        }
    }

    /// Wait until the pending request, if any, has resolved.
    ///
    /// Completions for superseded requests are discarded along the way.
    /// There is no timeout: an unresolved request keeps the session pending.
    pub async fn settle(&mut self) -> &LookupState {
        while self.query.is_pending() {
            // The session holds a sender, so the channel never closes here.
            let Some(Completion { id, outcome }) = self.rx.recv().await else {
                break;
            };

            if let Err(err) = &outcome {
                info!(request = %id, error = %err, "weather fetch failed");
            }

            if self.query.complete(id, outcome) {
                info!(request = %id, "weather lookup resolved");
                if self.in_flight.as_ref().is_some_and(|f| f.id == id) {
                    self.in_flight = None;
                }
            } else {
                debug!(request = %id, "discarded stale completion");
            }
        }

        self.query.state()
    }

    /// Submit and wait for the outcome.
    pub async fn lookup(&mut self) -> &LookupState {
        if self.submit().is_ok() {
            return self.settle().await;
        }
        self.query.state()
    }

    fn cancel_in_flight(&mut self) {
        if let Some(prev) = self.in_flight.take() {
            debug!(request = %prev.id, "cancelling superseded request");
            prev.cancel.cancel();
        }
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        let FetchTicket { id, city } = ticket;
        info!(request = %id, %city, "fetching current weather");

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            if token.is_cancelled() {
                debug!(request = %id, "request superseded before it started");
                return;
            }

            // The provider runs on its own task so a panic surfaces as a JoinError
            // and still resolves the request.
            let fetch = tokio::spawn(async move { provider.current_weather(&city).await });
            let abort = fetch.abort_handle();

            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    abort.abort();
                    debug!(request = %id, "request cancelled before completion");
                }
                joined = fetch => {
                    let outcome = joined.unwrap_or_else(|e| Err(FetchError::Task(e.to_string())));
                    // Receiver gone means the session was dropped.
                    let _ = tx.send(Completion { id, outcome });
                }
            }
        });

        self.in_flight = Some(InFlight { id, cancel });
    }
}

impl Drop for LookupSession {
    fn drop(&mut self) {
        self.cancel_in_flight();
    }
}
