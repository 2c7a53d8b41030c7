// ============================================================================
// main.rs — KeyIntent
// Entry point. Initializes logging, then runs the viewer or a headless replay.
// ============================================================================

mod app;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use winit::event_loop::EventLoop;

use app::App;
use keyintent::config::ViewerConfig;
use keyintent::headless::{run_headless, HeadlessConfig};

#[derive(Parser, Debug)]
#[command(name = "keyintent")]
#[command(about = "Track held movement intents from keyboard input")]
struct Cli {
    /// JSON binding table: [{"key": "KeyW", "intent": "moveForward"}, ...]
    #[arg(long)]
    bindings: Option<PathBuf>,

    /// Write forwarded key events to this JSON-lines file on exit
    #[arg(long, conflicts_with = "replay")]
    record: Option<PathBuf>,

    /// Replay a recorded transcript without opening a window
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Frames between status log lines
    #[arg(long, default_value_t = 120)]
    status_interval: u32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = ViewerConfig {
        status_interval: cli.status_interval,
        bindings_path: cli.bindings,
        record_path: cli.record,
        ..Default::default()
    };
    let binding = config.binding()?;

    if let Some(transcript_path) = cli.replay {
        let report = run_headless(&HeadlessConfig {
            transcript_path,
            binding,
        })?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App::new(config, &binding)?;
    event_loop.run_app(&mut app).context("event loop failed")?;
    app.finish()
}
