//! Builtin command dispatch
//!
//! A submitted input line is parsed into a `Command` and executed against a
//! `Host`. Every non-empty submission produces an echo of the prompt, the
//! command's own output and a trailing blank spacer line.

use tracing::{info, warn};

use super::host::Host;
use super::line::Line;

/// Prompt shown before the input line and in echoed commands
pub const PROMPT: &str = "$ ";

/// Builtin names with their help text, in listing order
const BUILTINS: &[(&str, &str)] = &[
    ("help", "Show this list"),
    ("clear", "Clear the screen"),
    ("pwd", "Print the working directory"),
    ("date", "Show the current date and time"),
    ("echo", "Print the given text"),
    ("exit", "Exit the terminal"),
];

/// A parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Clear,
    Pwd,
    Date,
    /// `echo <text>`; the text is everything after the first space
    Echo(&'a str),
    Exit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parse a raw line. Names are matched exactly and case-sensitively.
    pub fn parse(raw: &'a str) -> Self {
        match raw {
            "help" => Command::Help,
            "clear" => Command::Clear,
            "pwd" => Command::Pwd,
            "date" => Command::Date,
            "exit" => Command::Exit,
            "echo" => Command::Echo(""),
            _ => match raw.strip_prefix("echo ") {
                Some(text) => Command::Echo(text),
                None => Command::Unknown(raw),
            },
        }
    }
}

/// Result of executing one submitted line
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Lines to append to the scrollback, in order
    pub lines: Vec<Line>,
    /// Empty the scrollback after appending `lines`
    pub clear_scrollback: bool,
    /// The session should end
    pub terminate: bool,
}

impl CommandOutput {
    fn push(&mut self, text: impl AsRef<str>) {
        self.lines.push(Line::new(text));
    }
}

/// Executes submitted lines against a host
pub struct CommandDispatcher<H: Host> {
    host: H,
}

impl<H: Host> CommandDispatcher<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Run one submitted line
    pub fn execute(&self, raw: &str) -> CommandOutput {
        let mut out = CommandOutput::default();
        if raw.trim().is_empty() {
            return out;
        }

        out.push(format!("{}{}", PROMPT, raw));

        let command = Command::parse(raw);
        info!("Running {:?}", command);

        match command {
            Command::Help => self.help(&mut out),
            Command::Clear => {
                // Clearing also removes the echo above; no spacer needed
                out.clear_scrollback = true;
                return out;
            }
            Command::Pwd => self.pwd(&mut out),
            Command::Date => self.date(&mut out),
            Command::Echo(text) => out.push(text),
            Command::Exit => {
                info!("exit requested");
                out.push("Exiting...");
                out.terminate = true;
            }
            Command::Unknown(raw) => out.push(format!("Unknown: {}", raw)),
        }

        out.lines.push(Line::blank());
        out
    }

    fn help(&self, out: &mut CommandOutput) {
        out.push("Available commands:");
        for (name, about) in BUILTINS {
            out.push(format!("  {:<6} {}", name, about));
        }
        out.push("Keys: Ctrl+C cancels the line, Ctrl+Q quits");
    }

    fn pwd(&self, out: &mut CommandOutput) {
        match self.host.working_dir() {
            Ok(path) => out.push(path.display().to_string()),
            Err(e) => {
                warn!("pwd: {}", e);
                out.push("Error: getcwd");
            }
        }
    }

    fn date(&self, out: &mut CommandOutput) {
        match self.host.date() {
            Ok(line) => out.push(line),
            Err(e) => warn!("date: {}", e),
        }
    }
}
