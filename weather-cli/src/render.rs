use weather_core::{
    Panel, ResultPanel, View,
    view::{ERROR_MESSAGE, IDLE_PROMPT, TITLE},
};

pub fn title() -> String {
    let rule = "=".repeat(TITLE.chars().count());
    format!("{rule}\n{TITLE}\n{rule}")
}

/// Text rendering of one frame: the submit control followed by the panel.
pub fn screen(view: &View) -> String {
    let marker = if view.button.enabled { "" } else { " (disabled)" };
    let mut out = format!("[ {} ]{marker}\n", view.button.label);

    match &view.panel {
        Panel::Prompt => out.push_str(IDLE_PROMPT),
        Panel::Loading => out.push_str("Fetching current weather..."),
        Panel::Error => out.push_str(ERROR_MESSAGE),
        Panel::Result(panel) => out.push_str(&result(panel)),
    }
    out.push('\n');

    out
}

fn result(panel: &ResultPanel) -> String {
    format!(
        "Icon: {} ({})\n{}\n  {:<13}{}\n  {:<13}{}\n  {:<13}{}\n{}",
        panel.icon_url,
        panel.icon_alt,
        panel.condition,
        "Temperature:",
        panel.temperature,
        "Wind Speed:",
        panel.wind_speed,
        "Humidity:",
        panel.humidity,
        panel.location,
    )
}
