use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::path::PathBuf;
use twig::actions::{dispatch, VIEW_STATUS};
use twig::config::Config;
use twig::git::{BranchManager, BranchProvider};
use twig::input::{translate, InputEvent};
use twig::state::{AppState, Dimensions};
use twig::ui;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "twig")]
#[command(version = VERSION)]
#[command(about = "Interactive terminal UI for browsing and managing git branches")]
struct Cli {
    /// Run as if started in this directory instead of the current one
    #[arg(short = 'C', long = "directory")]
    directory: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let start = match cli.directory {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to resolve working directory")?,
    };

    let config = Config::load()?;
    let provider = BranchManager::discover(&start, config.git_command)?;
    let branches = provider
        .list_branches()
        .context("failed to enumerate branches")?;
    let current = provider
        .current_branch()
        .context("failed to read current branch")?;

    run_interactive(provider, branches, current)
}

/// Terminal lifecycle around the event loop: raw mode and the alternate
/// screen are restored on every exit path, including loop errors.
fn run_interactive(provider: BranchManager, branches: Vec<String>, current: String) -> Result<()> {
    enable_raw_mode().context("failed to initialize terminal")?;

    let result = run_event_loop(provider, branches, current);

    disable_raw_mode()?;
    execute!(std::io::stdout(), LeaveAlternateScreen)?;
    result
}

fn run_event_loop(provider: BranchManager, branches: Vec<String>, current: String) -> Result<()> {
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;

    let mut state = AppState::new(
        branches,
        current,
        VIEW_STATUS.to_string(),
        Dimensions {
            width: size.width,
            height: size.height,
        },
    );

    state.subscribe(Box::new(move |snapshot| {
        if let Err(err) = terminal.draw(|frame| ui::draw(frame, snapshot)) {
            log::error!("render failed: {}", err);
        }
    }));
    state.notify();

    loop {
        // Block until the next terminal event; dispatch runs to completion
        // (including provider calls and the inline render) before the next
        // read.
        let Some(event) = translate(&event::read()?) else {
            continue;
        };

        if event == InputEvent::ForceQuit {
            return Ok(());
        }

        let mut requested_exit = false;
        dispatch(event, &mut state, &provider, &mut || requested_exit = true);
        if requested_exit {
            return Ok(());
        }
    }
}
