use std::{process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{Config, LookupSession, LookupState, provider_from_config};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Look up current weather for a city")]
pub struct Cli {
    /// Defaults to `interactive` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the default city.
    Configure,

    /// Type city names and fetch their weather until Esc.
    Interactive,

    /// Show current weather for a city once and exit.
    Show {
        /// City or place name.
        city: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Interactive => {
                let mut session = session_from_config()?;
                interactive::run(&mut session).await?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city } => {
                let mut session = session_from_config()?;
                session.edit(city);
                let state = session.lookup().await;
                let code = match state {
                    LookupState::Failed(_) => ExitCode::FAILURE,
                    _ => ExitCode::SUCCESS,
                };
                print!("{}", render::screen(&session.view()));
                Ok(code)
            }
        }
    }
}

fn session_from_config() -> anyhow::Result<LookupSession> {
    let config = Config::load()?.with_env_overrides();
    let provider = provider_from_config(&config)?;
    Ok(LookupSession::new(Arc::from(provider), config.default_city()))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Get one at https://openweathermap.org/api")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let city = Text::new("Default city:")
        .with_initial_value(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
