//! Graphista terminal client - composition root.
//!
//! Ties together all Graphista crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the backend HTTP client
//! 3. Wire the session store, input buffer, orchestrator, and
//!    visualization adapter
//! 4. Run SDK-presence detection for voice capture in the background
//! 5. Drive an interactive line-based loop over stdin
//!
//! Each session object is constructed here and handed to its consumers
//! explicitly; nothing reaches for ambient global state.

mod cli;
mod renderer;

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use graphista_backend::BackendClient;
use graphista_core::GraphistaConfig;
use graphista_session::{ConversationOrchestrator, InputBuffer, SessionStore, SubmitOutcome};
use graphista_speech::{AbsentProbe, SpeechSessionController, UnavailableRecognizerFactory};
use graphista_viz::{RenderOutcome, RenderPhase, Surface, VisualizationAdapter};

use cli::CliArgs;
use renderer::QueryCountRenderer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = GraphistaConfig::load_or_default(&config_file);
    args.apply(&mut config);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Graphista v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Backend client, shared by the chat, token, and query seams.
    let client = BackendClient::new(
        &config.backend.base_url,
        Duration::from_secs(config.backend.request_timeout_secs),
    )?;
    let client = Arc::new(client);
    tracing::info!(base_url = %config.backend.base_url, "Backend client ready");

    // Visualization: the terminal presents result summaries instead of a
    // drawn graph. The surface is "attached" for the process lifetime.
    let surface = Arc::new(Surface::new("terminal"));
    surface.attach(80, 24);
    let viz = Arc::new(VisualizationAdapter::new(
        Arc::new(QueryCountRenderer::new((*client).clone())),
        Arc::clone(&surface),
        config.viz.show_debug,
    ));

    // Session state.
    let store = Arc::new(SessionStore::new());
    let input = Arc::new(InputBuffer::new());
    let orchestrator = Arc::new(ConversationOrchestrator::new(
        Arc::clone(&client) as _,
        Arc::clone(&store),
        Arc::clone(&input),
        Arc::clone(&viz),
    ));

    // Voice capture: the terminal build ships no speech SDK, so detection
    // runs against the absent probe and the mic reports Disabled honestly.
    let speech = Arc::new(SpeechSessionController::new(
        Arc::clone(&client) as _,
        Arc::new(UnavailableRecognizerFactory),
        Arc::clone(&input),
        config.speech.language.clone(),
    ));
    let detect_interval = Duration::from_millis(config.speech.detect_interval_ms);
    let detect_timeout = Duration::from_millis(config.speech.detect_timeout_ms);
    let speech_init = Arc::clone(&speech);
    tokio::spawn(async move {
        speech_init
            .initialize(&AbsentProbe, detect_interval, detect_timeout)
            .await;
    });

    // Suggestions from the backend; the session works without them.
    match client.examples().await {
        Ok(examples) if !examples.is_empty() => {
            println!("Try asking:");
            for example in examples.iter().take(5) {
                println!("  - {}", example.question);
            }
        }
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Could not fetch example questions"),
    }

    println!();
    println!("Type a question, or /examples /schema /rerender /clear /mic /reset /quit");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break, // stdin closed
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "/quit" | "/exit" => break,
            "/examples" => {
                match client.examples().await {
                    Ok(examples) => {
                        for example in &examples {
                            println!("  - {}", example.question);
                        }
                    }
                    Err(e) => println!("Could not fetch examples: {}", e),
                }
            }
            "/schema" => match client.schema(None).await {
                Ok(schema) => println!("{}", serde_json::to_string_pretty(&schema)?),
                Err(e) => println!("Could not fetch schema: {}", e),
            },
            "/rerender" => {
                viz.rerender().await;
                print_viz(&viz);
            }
            "/clear" => {
                viz.clear().await;
                println!("Visualization cleared.");
            }
            "/mic" => {
                speech.toggle().await;
                println!("Mic: {}", speech.state());
                if let Some(status) = speech.status() {
                    println!("{}", status);
                }
            }
            "/reset" => {
                store.reset();
                viz.clear().await;
                println!("New conversation started.");
            }
            text => {
                match orchestrator.submit(text).await {
                    SubmitOutcome::Completed | SubmitOutcome::Failed => {
                        if let Some(reply) = last_reply(&store) {
                            println!("{}", reply);
                        }
                        print_viz(&viz);
                    }
                    SubmitOutcome::IgnoredBusy => {
                        println!("Still thinking about the previous question.");
                    }
                    SubmitOutcome::IgnoredEmpty => {}
                }
            }
        }
    }

    println!("Bye.");
    Ok(())
}

/// The most recent completed assistant turn, if any.
fn last_reply(store: &SessionStore) -> Option<String> {
    store
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == graphista_core::Role::Assistant && !m.pending)
        .map(|m| m.content.clone())
}

/// Print the visualization outcome for the latest render, if there is one.
fn print_viz(viz: &VisualizationAdapter) {
    let state = viz.state();
    match state.phase {
        RenderPhase::Rendered => match state.outcome {
            Some(RenderOutcome::Graph { summary }) => println!("[graph] {}", summary),
            Some(RenderOutcome::Text { body }) => println!("{}", body),
            None => {}
        },
        RenderPhase::Failed => {
            if let Some(error) = state.error {
                println!("[graph] render failed: {}", error);
            }
            if let Some(snapshot) = viz.debug_snapshot() {
                match serde_json::to_string_pretty(&snapshot) {
                    Ok(json) => println!("{}", json),
                    Err(e) => tracing::warn!(error = %e, "Debug snapshot not serializable"),
                }
            }
        }
        RenderPhase::Empty | RenderPhase::Loading => {}
    }
}
