//! minterm - a minimal terminal-style command front end
//!
//! minterm shows a prompt, collects keystrokes into a command line and runs a
//! handful of builtin commands. Output accumulates in a bounded scrollback
//! drawn above the prompt, with a blinking block cursor.
//!
//! # Quick Start
//!
//! ```text
//! minterm                    # Start with settings from ~/.minterm/config.toml
//! minterm --scheme nord      # Pick a color scheme
//! minterm --boxes            # Draw placeholder boxes instead of text
//! ```
//!
//! # Builtins
//!
//! | Command | Action |
//! |---------|--------|
//! | help | List commands |
//! | clear | Clear the screen |
//! | pwd | Print the working directory |
//! | date | Show the date |
//! | echo <text> | Print text |
//! | exit | Quit |
//!
//! # Keys
//!
//! | Key | Action |
//! |-----|--------|
//! | Enter | Run the line |
//! | Backspace | Delete the last character |
//! | Ctrl+C | Discard the line |
//! | Ctrl+Q / Ctrl+D | Quit |

mod config;
mod core;
mod ui;

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{ColorScheme, Config, GlyphStyle};
use crate::core::{SessionLoop, SessionState, SystemHost, FRAME_DELAY};
use crate::ui::{KeyMapper, Renderer};

/// Command line options; these override the config file
#[derive(Debug, Default)]
struct Options {
    /// Color scheme name
    scheme: Option<String>,
    /// Glyph style
    glyphs: Option<GlyphStyle>,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("minterm {}", VERSION);
}

fn print_help() {
    eprintln!("minterm {} - A minimal terminal-style command front end", VERSION);
    eprintln!();
    eprintln!("Usage: minterm [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scheme <NAME>       Color scheme");
    eprintln!("  --boxes               Draw placeholder boxes instead of text");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  Enter                 Run the current line");
    eprintln!("  Backspace             Delete the last character");
    eprintln!("  Ctrl+C                Discard the current line");
    eprintln!("  Ctrl+Q, Ctrl+D        Quit");
    eprintln!();
    eprintln!("Commands: help, clear, pwd, date, echo <text>, exit");
    eprintln!();
    eprintln!("Configuration: ~/.minterm/config.toml");
    eprintln!("Color schemes: {}", ColorScheme::list().join(", "));
}

fn parse_args<I>(args: I) -> Result<Options, String>
where
    I: IntoIterator<Item = String>,
{
    let mut options = Options::default();
    let mut args = args.into_iter().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "--scheme" => {
                let name = args.next().ok_or("Missing scheme argument")?;
                options.scheme = Some(name);
            }
            "--boxes" => {
                options.glyphs = Some(GlyphStyle::Boxes);
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
    }

    Ok(options)
}

/// Open `minterm.log` in `dir` for appending, creating the directory if needed
fn open_log_file(dir: &Path) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("minterm.log"))
}

/// Log to `~/.minterm/minterm.log`; the screen belongs to the renderer
fn init_logging(level: &str) {
    let dir = config::app_dir().unwrap_or_else(|| PathBuf::from("."));

    if let Ok(file) = open_log_file(&dir) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args(env::args()) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let (mut config, config_error) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };

    init_logging(&config.log_level);
    info!("minterm {} starting...", VERSION);
    if let Some(e) = config_error {
        warn!("{}; using defaults", e);
    }

    // Command line overrides the config file
    if let Some(scheme) = options.scheme {
        config.color_scheme = scheme;
    }
    if let Some(glyphs) = options.glyphs {
        config.glyphs = glyphs;
    }

    run_terminal(&config)
}

/// Set up the screen and run until the session ends
fn run_terminal(config: &Config) -> anyhow::Result<()> {
    let colors = config.get_color_scheme();
    info!("Color scheme: {}", colors.name);
    info!("Glyphs: {:?}", config.glyphs);

    let mut renderer = Renderer::new(colors, config.glyphs);
    if let Err(e) = renderer.init() {
        error!("Failed to initialize terminal: {}", e);
        let _ = renderer.cleanup();
        return Err(anyhow::anyhow!("failed to initialize terminal: {}", e));
    }

    let mut session_loop = SessionLoop::new(SystemHost::new(), Instant::now());
    let result = run_main_loop(&mut session_loop, &mut renderer);

    let _ = renderer.cleanup();
    if let Err(e) = &result {
        error!("Main loop failed: {}", e);
    }
    info!("minterm exiting");
    result
}

/// Main event loop: gather this frame's events, then tick once
fn run_main_loop(
    session_loop: &mut SessionLoop<SystemHost>,
    renderer: &mut Renderer,
) -> anyhow::Result<()> {
    loop {
        let mut events = Vec::new();

        // Wait up to one frame for input, then drain whatever else is queued
        let mut poll_timeout = FRAME_DELAY;
        while event::poll(poll_timeout)? {
            let evt = event::read()?;
            if let Event::Resize(cols, rows) = evt {
                renderer.resize(cols, rows);
            }
            if let Some(input) = KeyMapper::map(&evt) {
                events.push(input);
            }
            poll_timeout = Duration::ZERO;
        }

        if session_loop.tick(events, Instant::now(), renderer)? == SessionState::Terminated {
            info!(
                "Session ended with {} scrollback lines",
                session_loop.session().scrollback.len()
            );
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("minterm")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args_defaults() {
        let options = parse_args(args(&[])).unwrap();
        assert!(options.scheme.is_none());
        assert!(options.glyphs.is_none());
    }

    #[test]
    fn test_parse_args_overrides() {
        let options = parse_args(args(&["--scheme", "nord", "--boxes"])).unwrap();
        assert_eq!(options.scheme.as_deref(), Some("nord"));
        assert_eq!(options.glyphs, Some(GlyphStyle::Boxes));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(args(&["--scheme"])).is_err());
        assert!(parse_args(args(&["--bogus"])).is_err());
    }

    #[test]
    fn test_log_file_creates_dir() {
        let dir = std::env::temp_dir().join(format!("minterm-test-logdir-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let file = open_log_file(&dir).unwrap();
        drop(file);
        assert!(dir.join("minterm.log").is_file());
        let _ = fs::remove_dir_all(&dir);
    }
}
