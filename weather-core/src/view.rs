//! Pure projection of a [`WeatherQuery`] into what the screen shows.

use crate::{
    lookup::{LookupState, WeatherQuery},
    model::WeatherSnapshot,
};

pub const TITLE: &str = "Weather Forecast";
pub const INPUT_LABEL: &str = "Place Name:";
pub const INPUT_PLACEHOLDER: &str = "Enter city name";
pub const IDLE_PROMPT: &str = "Enter a city to get started.";
pub const ERROR_MESSAGE: &str = "No Data Found. Please check the city name.";

const SUBMIT_LABEL: &str = "Get Weather";
const LOADING_LABEL: &str = "Loading...";
const ICON_ALT_FALLBACK: &str = "Weather Icon";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultPanel {
    pub icon_url: String,
    pub icon_alt: String,
    pub condition: String,
    pub temperature: String,
    pub wind_speed: String,
    pub humidity: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    Prompt,
    Loading,
    Error,
    Result(ResultPanel),
}

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub button: SubmitButton,
    pub panel: Panel,
}

impl View {
    pub fn of(query: &WeatherQuery) -> Self {
        Self::from_state(query.state())
    }

    pub fn from_state(state: &LookupState) -> Self {
        let panel = match state {
            LookupState::Idle => Panel::Prompt,
            LookupState::Pending(_) => Panel::Loading,
            LookupState::Failed(_) => Panel::Error,
            LookupState::Loaded(snapshot) => Panel::Result(ResultPanel::from(snapshot)),
        };

        let button = if matches!(panel, Panel::Loading) {
            SubmitButton { label: LOADING_LABEL, enabled: false }
        } else {
            SubmitButton { label: SUBMIT_LABEL, enabled: true }
        };

        Self { button, panel }
    }
}

impl From<&WeatherSnapshot> for ResultPanel {
    fn from(s: &WeatherSnapshot) -> Self {
        let icon_alt = if s.condition_description.is_empty() {
            ICON_ALT_FALLBACK.to_string()
        } else {
            s.condition_description.clone()
        };

        Self {
            icon_url: s.icon_url(),
            icon_alt,
            condition: format!("{} Sky", capitalize_words(&s.condition_main)),
            temperature: format!("{} °C", s.temperature_c),
            wind_speed: format!("{} km/h", s.wind_speed),
            humidity: format!("{} %", s.humidity_pct),
            location: s.location_name.clone(),
        }
    }
}

/// Upper-case the first letter of every whitespace-separated word.
fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
