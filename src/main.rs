use anyhow::{Context, Result};
use chessview::core::settings_persistence::load_settings;
use chessview::core::BoardSettings;
use chessview::game::highlight::SquareStyles;
use chessview::game::{parse_fen, BoardView, Gesture, Orientation, Square};
use chessview::networking::{MemoryBridge, ScriptedEngine};
use chessview::rendering::render_board;
use chessview::ui::DialogInput;
use clap::{Parser, Subcommand};
use shared::protocol::{RawBoard, WireGameMeta, WireMoveKind};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chessview", about = "Headless chessboard view and engine sync")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print a FEN placement as a board diagram
    Render {
        #[arg(long)]
        fen: String,
        /// Draw from Black's side
        #[arg(long)]
        black: bool,
        #[arg(long)]
        no_notation: bool,
    },
    /// Run a scripted session against an in-process engine
    Session,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            fen,
            black,
            no_notation,
        } => render(&fen, black, no_notation),
        Command::Session => session().await,
    }
}

fn render(fen: &str, black: bool, no_notation: bool) -> Result<()> {
    let position = parse_fen(fen).with_context(|| format!("Invalid FEN {:?}", fen))?;
    let orientation = if black {
        Orientation::Black
    } else {
        Orientation::White
    };
    print!(
        "{}",
        render_board(&position, orientation, !no_notation, &SquareStyles::new())
    );
    Ok(())
}

async fn session() -> Result<()> {
    let settings: BoardSettings = load_settings();
    let engine = ScriptedEngine::new(RawBoard::empty(), WireGameMeta::default())
        .with_moves("e2", vec![((4, 2), WireMoveKind::Move), ((4, 3), WireMoveKind::Double)]);
    let bridge = Arc::new(MemoryBridge::serving(engine));

    let mut view = BoardView::mount(Arc::clone(&bridge), &settings);
    view.settle().await;

    info!("[MAIN] Confirming new game");
    view.dialog_input(DialogInput::Tab);
    view.dialog_input(DialogInput::Activate);
    view.settle().await;

    let e2: Square = "e2".parse().context("bad square")?;
    view.dispatch(Gesture::Hover(e2));
    view.dispatch(Gesture::Hover(e2));
    view.settle().await;
    view.dispatch(Gesture::Click(e2));
    view.settle().await;

    print!("{}", view.view());
    println!("phase: {:?}", view.controller().phase());
    for notification in view.controller().notifier().active() {
        println!("[{:?}] {}", notification.level, notification.message);
    }
    println!("engine calls: {}", bridge.calls().len());
    view.unmount();
    Ok(())
}
