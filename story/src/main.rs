//! Perspective story generator TUI.
//!
//! A vim-style terminal form for generating short stories told from an
//! unusual point of view, with optional text-to-speech.
//!
//! # Headless Mode
//!
//! Run with `--headless` to generate one story from flags and print it:
//!
//! ```bash
//! cargo run -p story -- --headless --perspective wind --weather rainy --topic harvest
//! ```

mod app;
mod events;
mod headless;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, stdout};
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use story_core::{AppConfig, StorySession};
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use events::{handle_event, EventResult};
use headless::StoryArgs;
use ui::render::render;

/// Log file used while the TUI owns the terminal.
const LOG_FILE: &str = "story.log";

#[derive(Parser, Debug)]
#[command(name = "story")]
#[command(about = "Generate short stories told from unusual perspectives", long_about = None)]
#[command(version)]
struct Cli {
    /// Run without the TUI: generate one story and print it
    #[arg(long)]
    headless: bool,

    /// Print the supported models and exit
    #[arg(long)]
    list_models: bool,

    #[command(flatten)]
    story: StoryArgs,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.list_models {
        headless::list_models(&mut stdout())?;
        return Ok(());
    }

    init_logging(cli.headless)?;

    // A missing key is reported by the session, not here
    let session = StorySession::new(&AppConfig::from_env());

    if cli.headless {
        if let Err(e) = headless::run_headless(&cli.story, session, &mut stdout()).await {
            eprintln!("[ERROR] {e}");
            std::process::exit(1);
        }
        return Ok(());
    }

    install_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(session)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }

    Ok(())
}

/// Restore the terminal before the default panic message is printed.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        default_hook(info);
    }));
}

/// Send tracing output to stderr in headless mode, or to a log file in the
/// temp directory while the TUI is running.
fn init_logging(headless: bool) -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if headless {
        builder.with_writer(io::stderr).init();
    } else {
        let path = std::env::temp_dir().join(LOG_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        info!(path = %path.display(), "logging to file");
    }
    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, &app))?;

        if !event::poll(Duration::from_millis(250))? {
            continue;
        }

        match handle_event(&mut app, event::read()?) {
            EventResult::Quit => return Ok(()),
            EventResult::Generate => {
                app.set_busy(Some("Generating story..."));
                terminal.draw(|f| render(f, &app))?;
                app.generate().await;
                app.set_busy(None);
                discard_pending_events()?;
            }
            EventResult::ConvertAudio => {
                app.set_busy(Some("Generating audio..."));
                terminal.draw(|f| render(f, &app))?;
                app.convert_to_audio().await;
                app.set_busy(None);
                discard_pending_events()?;
            }
            EventResult::NeedsRedraw | EventResult::Continue => {}
        }
    }
}

/// Drop keys pressed while an action was running.
fn discard_pending_events() -> io::Result<()> {
    while event::poll(Duration::ZERO)? {
        event::read()?;
    }
    Ok(())
}
