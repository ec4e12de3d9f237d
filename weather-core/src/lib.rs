//! Core library for the `weather` lookup client.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider behind the [`WeatherProvider`] seam
//! - The lookup state machine and the view it projects to
//! - A session controller that runs fetches and discards superseded ones
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod lookup;
pub mod model;
pub mod provider;
pub mod session;
pub mod view;

pub use config::{Config, ProviderConfig};
pub use lookup::{FailureKind, LookupState, RequestId, ValidationError, WeatherQuery};
pub use model::WeatherSnapshot;
pub use provider::{FetchError, WeatherProvider, provider_from_config};
pub use session::LookupSession;
pub use view::{Panel, ResultPanel, SubmitButton, View};
