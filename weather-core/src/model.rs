/// Base URL for condition icons served by OpenWeather.
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Subset of a current-weather response that the client renders.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub condition_main: String,
    pub condition_description: String,
    pub condition_icon_id: String,
    pub temperature_c: f64,
    pub wind_speed: f64,
    pub humidity_pct: f64,
}

impl WeatherSnapshot {
    /// URL of the `@2x` icon for this snapshot's condition code.
    pub fn icon_url(&self) -> String {
        format!("{ICON_BASE_URL}/{}@2x.png", self.condition_icon_id)
    }
}

#[cfg(test)]
pub(crate) fn london() -> WeatherSnapshot {
    WeatherSnapshot {
        location_name: "London".into(),
        condition_main: "Clear".into(),
        condition_description: "clear sky".into(),
        condition_icon_id: "01d".into(),
        temperature_c: 15.2,
        wind_speed: 3.1,
        humidity_pct: 60.0,
    }
}
