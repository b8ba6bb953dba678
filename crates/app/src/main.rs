//! Sketchpad - drives a sketch board from JSON lines on stdin
//!
//! Each input line is one [`command::Command`]. The SVG document is written
//! to stdout on `{"type":"svg"}` and once more at end of input. Logs go to
//! stderr; set `RUST_LOG` to change the filter.

use std::io::{BufRead, Write};

use sketch::{SharedSketchBoard, SketchBoard, SketchError};
use sketchpad_config::ConfigError;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod command;
mod config;

use command::Command;
use config::AppConfig;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("sketch: {0}")]
    Sketch(#[from] SketchError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sketchpad=info,sketch=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn apply(board: &SharedSketchBoard, command: Command) -> Result<(), AppError> {
    match command {
        Command::Input(event) => board.handle_input(event)?,
        Command::Undo { steps } => {
            board.undo(steps).await?;
        }
        Command::Redo { steps } => {
            board.redo(steps).await?;
        }
        Command::Clear => {
            board.clear()?;
        }
        Command::ClearHistories => board.with(|b| b.clear_histories())?,
        Command::Mode { mode } => board.with(|b| b.set_mode(mode))?,
        Command::Color { color } => board.with(|b| b.set_pen_color(color))?,
        Command::Svg => print_svg(board)?,
    }
    Ok(())
}

fn print_svg(board: &SharedSketchBoard) -> Result<(), AppError> {
    let doc = board.build_svg()?;
    let mut out = std::io::stdout().lock();
    writeln!(out, "{doc}")?;
    out.flush()?;
    Ok(())
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::from_env()?;
    info!(
        "Starting sketchpad on a {}x{} canvas",
        config.viewport.width, config.viewport.height
    );

    let board = SharedSketchBoard::new(SketchBoard::vector_only(config.sketch, config.viewport)?);

    let stdin = std::io::stdin();
    for (index, line) in stdin.lock().lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(err) => {
                warn!("line {}: ignoring malformed command: {}", index + 1, err);
                continue;
            }
        };
        // Protocol errors leave the board unchanged; keep reading
        match apply(&board, command).await {
            Ok(()) => {}
            Err(AppError::Sketch(SketchError::Protocol(err))) => {
                warn!("line {}: {}", index + 1, err);
            }
            Err(err) => return Err(err),
        }
    }

    print_svg(&board)
}

#[tokio::main]
async fn main() {
    init_logging();

    if let Err(err) = run().await {
        error!("sketchpad failed: {}", err);
        std::process::exit(1);
    }
}
