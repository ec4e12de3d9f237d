use std::io::Write;

use anyhow::Result;
use inquire::{InquireError, Text};
use tokio::sync::mpsc;
use tracing::warn;
use weather_core::{
    LookupSession,
    view::{INPUT_LABEL, INPUT_PLACEHOLDER},
};

use crate::render;

/// What the input field hands to the screen loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Submit(String),
    Quit,
}

/// Prompt for cities and redraw as lookups resolve, until the user cancels.
///
/// The prompt runs on a blocking thread so the field stays editable while a
/// request is pending; a new Enter supersedes the request in flight.
pub async fn run(session: &mut LookupSession) -> Result<()> {
    println!("{}", render::title());

    let (tx, rx) = mpsc::unbounded_channel();
    let draft = session.query().city_name().to_owned();
    let prompt = tokio::task::spawn_blocking(move || prompt_loop(draft, tx));

    drive(session, rx, &mut std::io::stdout()).await?;
    prompt.await??;
    Ok(())
}

/// Apply input events and completions to the session, writing a frame after each.
///
/// Returns when the input sends [`InputEvent::Quit`] or closes.
pub async fn drive(
    session: &mut LookupSession,
    mut inputs: mpsc::UnboundedReceiver<InputEvent>,
    out: &mut impl Write,
) -> Result<()> {
    write!(out, "{}", render::screen(&session.view()))?;

    loop {
        tokio::select! {
            _ = session.settle(), if session.query().is_pending() => {
                write!(out, "{}", render::screen(&session.view()))?;
            }
            input = inputs.recv() => {
                let Some(InputEvent::Submit(city)) = input else {
                    break;
                };
                session.edit(city);
                // A blank city is reflected in the state; nothing else to do.
                let _ = session.submit();
                write!(out, "{}", render::screen(&session.view()))?;
            }
        }
        out.flush()?;
    }

    Ok(())
}

/// Keep prompting; each prompt is pre-filled with the previous entry.
fn prompt_loop(mut draft: String, tx: mpsc::UnboundedSender<InputEvent>) -> Result<()> {
    loop {
        let event = match prompt_city(&draft) {
            Ok(Some(city)) => {
                draft.clone_from(&city);
                InputEvent::Submit(city)
            }
            Ok(None) => InputEvent::Quit,
            Err(e) => {
                warn!(error = %e, "city prompt failed");
                let _ = tx.send(InputEvent::Quit);
                return Err(e);
            }
        };

        let quit = event == InputEvent::Quit;
        if tx.send(event).is_err() || quit {
            return Ok(());
        }
    }
}

fn prompt_city(draft: &str) -> Result<Option<String>> {
    let answer = Text::new(INPUT_LABEL)
        .with_initial_value(draft)
        .with_placeholder(INPUT_PLACEHOLDER)
        .with_help_message("Enter to get weather, Esc to quit")
        .prompt();

    match answer {
        Ok(city) => Ok(Some(city)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::{
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    };
    use weather_core::{FetchError, LookupState, WeatherProvider, WeatherSnapshot};

    /// "London" succeeds, "Slow" never resolves.
    #[derive(Debug, Default)]
    struct StubProvider {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match city {
                "London" => Ok(WeatherSnapshot {
                    location_name: "London".into(),
                    condition_main: "Clear".into(),
                    condition_description: "clear sky".into(),
                    condition_icon_id: "01d".into(),
                    temperature_c: 15.2,
                    wind_speed: 3.1,
                    humidity_pct: 60.0,
                }),
                _ => std::future::pending().await,
            }
        }
    }

    fn stub_session() -> (Arc<StubProvider>, LookupSession) {
        let provider = Arc::new(StubProvider::default());
        let session = LookupSession::new(provider.clone(), "Kathmandu");
        (provider, session)
    }

    #[tokio::test]
    async fn input_is_accepted_while_request_is_pending() {
        let (provider, mut session) = stub_session();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut out = Vec::new();

        tx.send(InputEvent::Submit("Slow".into())).unwrap();
        tx.send(InputEvent::Submit("London".into())).unwrap();

        // The input stays open, so the loop only stops when the timeout fires.
        let _ = tokio::time::timeout(Duration::from_millis(200), drive(&mut session, rx, &mut out))
            .await;

        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.contains("[ Loading... ] (disabled)"));
        assert!(text.contains("Clear Sky"));
        assert!(matches!(session.state(), LookupState::Loaded(_)));
        assert!(provider.calls.load(Ordering::SeqCst) <= 2);
        drop(tx);
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let (provider, mut session) = stub_session();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut out = Vec::new();

        tx.send(InputEvent::Submit("   ".into())).unwrap();
        tx.send(InputEvent::Quit).unwrap();

        drive(&mut session, rx, &mut out).await.expect("loop should end cleanly");

        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.starts_with("[ Get Weather ]\nEnter a city to get started.\n"));
        assert!(text.contains("No Data Found. Please check the city name."));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn closed_input_stops_the_loop() {
        let (_, mut session) = stub_session();
        let (tx, rx) = mpsc::unbounded_channel::<InputEvent>();
        drop(tx);

        let mut out = Vec::new();
        drive(&mut session, rx, &mut out).await.expect("loop should end cleanly");
        assert_eq!(session.state(), &LookupState::Idle);
    }
}
