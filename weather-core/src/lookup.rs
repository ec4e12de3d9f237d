//! The lookup state machine behind the single weather screen.
//!
//! [`WeatherQuery`] holds the city draft and exactly one [`LookupState`].
//! It performs no I/O: [`WeatherQuery::submit`] hands back a [`FetchTicket`]
//! for the caller to execute, and [`WeatherQuery::complete`] applies the
//! outcome once the caller has it.

use std::fmt;

use thiserror::Error;

use crate::{config::DEFAULT_CITY, model::WeatherSnapshot, provider::FetchError};

/// Identity of one issued request. Strictly increasing per query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestId(u64);

impl RequestId {
    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which kind of failure put the query into [`LookupState::Failed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Blank city name, rejected before any request.
    Validation,
    /// Non-success status, transport failure or malformed payload.
    Fetch,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupState {
    Idle,
    Pending(RequestId),
    Failed(FailureKind),
    Loaded(WeatherSnapshot),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("city name is empty")]
pub struct ValidationError;

/// A request the caller must execute for the given city.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: RequestId,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct WeatherQuery {
    city_name: String,
    state: LookupState,
    latest: RequestId,
}

impl Default for WeatherQuery {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}

impl WeatherQuery {
    pub fn new(default_city: impl Into<String>) -> Self {
        Self {
            city_name: default_city.into(),
            state: LookupState::Idle,
            latest: RequestId::default(),
        }
    }

    pub fn city_name(&self) -> &str {
        &self.city_name
    }

    /// Replace the draft. Never validates and never touches the lookup state.
    pub fn set_city_name(&mut self, city: impl Into<String>) {
        self.city_name = city.into();
    }

    pub fn state(&self) -> &LookupState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, LookupState::Pending(_))
    }

    /// Id of the request currently awaited, if any.
    pub fn pending_request(&self) -> Option<RequestId> {
        match self.state {
            LookupState::Pending(id) => Some(id),
            _ => None,
        }
    }

    /// Submit the current draft.
    ///
    /// A blank draft fails fast. Either way any request still pending is
    /// superseded: its id no longer matches and its completion is ignored.
    pub fn submit(&mut self) -> Result<FetchTicket, ValidationError> {
        self.latest = self.latest.next();

        let city = self.city_name.trim();
        if city.is_empty() {
            self.state = LookupState::Failed(FailureKind::Validation);
            return Err(ValidationError);
        }

        let ticket = FetchTicket { id: self.latest, city: city.to_string() };
        self.state = LookupState::Pending(ticket.id);
        Ok(ticket)
    }

    /// Apply the outcome of request `id`.
    ///
    /// Returns `false` and leaves the state untouched when `id` is not the
    /// request currently pending.
    pub fn complete(&mut self, id: RequestId, outcome: Result<WeatherSnapshot, FetchError>) -> bool {
        if self.pending_request() != Some(id) {
            return false;
        }

        self.state = match outcome {
            Ok(snapshot) => LookupState::Loaded(snapshot),
            Err(_) => LookupState::Failed(FailureKind::Fetch),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::london;

    fn not_found() -> FetchError {
        FetchError::Status { status: 404, body: String::new() }
    }

    #[test]
    fn starts_idle_with_default_city() {
        let query = WeatherQuery::default();
        assert_eq!(query.city_name(), "Kathmandu");
        assert_eq!(query.state(), &LookupState::Idle);
        assert!(!query.is_pending());
    }

    #[test]
    fn blank_input_fails_validation() {
        for input in ["", " ", "\t\n  "] {
            let mut query = WeatherQuery::new(input);
            assert_eq!(query.submit(), Err(ValidationError));
            assert_eq!(query.state(), &LookupState::Failed(FailureKind::Validation));
        }
    }

    #[test]
    fn blank_input_clears_previous_result() {
        let mut query = WeatherQuery::new("London");
        let ticket = query.submit().unwrap();
        query.complete(ticket.id, Ok(london()));

        query.set_city_name("   ");
        assert!(query.submit().is_err());
        assert_eq!(query.state(), &LookupState::Failed(FailureKind::Validation));
    }

    #[test]
    fn submit_trims_city_and_goes_pending() {
        let mut query = WeatherQuery::new("  London ");
        let ticket = query.submit().expect("valid city");

        assert_eq!(ticket.city, "London");
        assert_eq!(query.state(), &LookupState::Pending(ticket.id));
        assert_eq!(query.pending_request(), Some(ticket.id));
    }

    #[test]
    fn editing_does_not_change_state() {
        let mut query = WeatherQuery::new("London");
        let ticket = query.submit().unwrap();

        query.set_city_name("Paris");
        assert_eq!(query.state(), &LookupState::Pending(ticket.id));
        assert_eq!(query.city_name(), "Paris");
    }

    #[test]
    fn success_loads_snapshot() {
        let mut query = WeatherQuery::new("London");
        let ticket = query.submit().unwrap();

        assert!(query.complete(ticket.id, Ok(london())));
        assert_eq!(query.state(), &LookupState::Loaded(london()));
    }

    #[test]
    fn failure_replaces_previous_result() {
        let mut query = WeatherQuery::new("London");
        let first = query.submit().unwrap();
        query.complete(first.id, Ok(london()));

        query.set_city_name("Zzzznotacity");
        let second = query.submit().unwrap();
        assert!(query.complete(second.id, Err(not_found())));
        assert_eq!(query.state(), &LookupState::Failed(FailureKind::Fetch));
    }

    #[test]
    fn new_submit_leaves_prior_error_behind() {
        let mut query = WeatherQuery::new("");
        assert!(query.submit().is_err());

        query.set_city_name("London");
        let ticket = query.submit().unwrap();
        assert_eq!(query.state(), &LookupState::Pending(ticket.id));
    }

    #[test]
    fn superseded_completion_is_ignored() {
        let mut query = WeatherQuery::new("Paris");
        let stale = query.submit().unwrap();

        query.set_city_name("London");
        let fresh = query.submit().unwrap();
        assert!(fresh.id > stale.id);

        assert!(!query.complete(stale.id, Ok(london())));
        assert_eq!(query.state(), &LookupState::Pending(fresh.id));

        assert!(query.complete(fresh.id, Err(not_found())));
        assert!(!query.complete(stale.id, Ok(london())));
        assert_eq!(query.state(), &LookupState::Failed(FailureKind::Fetch));
    }

    #[test]
    fn completion_after_blank_submit_is_ignored() {
        let mut query = WeatherQuery::new("London");
        let ticket = query.submit().unwrap();

        query.set_city_name("");
        assert!(query.submit().is_err());

        assert!(!query.complete(ticket.id, Ok(london())));
        assert_eq!(query.state(), &LookupState::Failed(FailureKind::Validation));
    }

    #[test]
    fn sequential_submissions_reflect_second_response() {
        let mut query = WeatherQuery::new("London");

        let first = query.submit().unwrap();
        query.complete(first.id, Ok(london()));

        let second = query.submit().unwrap();
        assert_ne!(first.id, second.id);

        let mut rainy = london();
        rainy.condition_main = "Rain".into();
        query.complete(second.id, Ok(rainy.clone()));
        assert_eq!(query.state(), &LookupState::Loaded(rainy));
    }
}
