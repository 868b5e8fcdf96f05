//! Session management
//!
//! A `Session` owns everything the terminal shows: scrollback, the input
//! line and the cursor blink. `SessionLoop` drives it one tick per frame.

use std::io;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use super::blink::CursorBlink;
use super::commands::{CommandDispatcher, PROMPT};
use super::host::Host;
use super::input_line::InputLine;
use super::line::Line;
use super::scrollback::Scrollback;

/// Delay between ticks
pub const FRAME_DELAY: Duration = Duration::from_millis(10);

/// Lines shown when a session starts
pub const BANNER: [&str; 2] = ["Mini Terminal", "Type 'help' for a list of commands."];

/// Line appended when the input is interrupted
const INTERRUPT_MARK: &str = "^C";

/// Input events, already decoded from the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The platform asked us to close
    Quit,
    /// Cancel the current line (Ctrl+C)
    Interrupt,
    /// Quit immediately (Ctrl+Q)
    ForceQuit,
    /// Execute the current line (Enter)
    Submit,
    /// Delete the last character (Backspace)
    Backspace,
    /// Decoded text typed by the user
    Text(String),
    /// The window changed size; logged only
    Resize { cols: u16, rows: u16 },
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated,
}

/// A shell session
pub struct Session {
    /// Display history
    pub scrollback: Scrollback,
    /// Line being typed
    pub input: InputLine,
    /// Cursor blink timer
    pub blink: CursorBlink,
    state: SessionState,
}

impl Session {
    /// Create a new session with the banner already shown
    pub fn new(now: Instant) -> Self {
        let mut scrollback = Scrollback::new();
        for text in BANNER {
            scrollback.append(text);
        }
        Self {
            scrollback,
            input: InputLine::new(),
            blink: CursorBlink::new(now),
            state: SessionState::Running,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if session is running
    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    /// Apply one input event. Events are ignored once terminated.
    pub fn handle<H: Host>(&mut self, event: InputEvent, dispatcher: &CommandDispatcher<H>) {
        if !self.is_running() {
            return;
        }

        match event {
            InputEvent::Quit => {
                info!("Quit requested by platform");
                self.terminate();
            }
            InputEvent::Interrupt => {
                self.input.reset();
                self.scrollback.append(INTERRUPT_MARK);
            }
            InputEvent::ForceQuit => {
                info!("Force quit");
                self.terminate();
            }
            InputEvent::Submit => self.submit(dispatcher),
            InputEvent::Backspace => self.input.delete_last(),
            InputEvent::Text(text) => {
                if !self.input.append(&text) {
                    debug!("Dropped input fragment {:?}", text);
                }
            }
            InputEvent::Resize { cols, rows } => {
                info!("Window resized to {}x{}", cols, rows);
            }
        }
    }

    fn submit<H: Host>(&mut self, dispatcher: &CommandDispatcher<H>) {
        let output = dispatcher.execute(self.input.snapshot());
        self.scrollback.extend(output.lines);
        if output.clear_scrollback {
            self.scrollback.clear();
        }

        if output.terminate {
            self.terminate();
        } else {
            self.input.reset();
        }
    }

    fn terminate(&mut self) {
        self.state = SessionState::Terminated;
    }

    /// Read-only view for the renderer
    pub fn frame(&self) -> Frame<'_> {
        Frame {
            scrollback: &self.scrollback,
            input: &self.input,
            cursor_visible: self.blink.is_visible(),
        }
    }
}

/// Snapshot of a session handed to the renderer each tick
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    scrollback: &'a Scrollback,
    input: &'a InputLine,
    cursor_visible: bool,
}

impl<'a> Frame<'a> {
    /// Scrollback lines, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &'a Line> + Clone {
        self.scrollback.lines()
    }

    pub fn line_count(&self) -> usize {
        self.scrollback.len()
    }

    /// Prompt plus the current input
    pub fn prompt(&self) -> String {
        format!("{}{}", PROMPT, self.input.snapshot())
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Column of the cursor glyph when every character takes one cell
    pub fn cursor_column(&self) -> usize {
        PROMPT.len() + self.input.len()
    }
}

/// Something that can draw a frame
pub trait FrameSink {
    fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()>;
}

/// Drives a session: events in, blink update, one draw per tick
pub struct SessionLoop<H: Host> {
    session: Session,
    dispatcher: CommandDispatcher<H>,
}

impl<H: Host> SessionLoop<H> {
    pub fn new(host: H, now: Instant) -> Self {
        Self {
            session: Session::new(now),
            dispatcher: CommandDispatcher::new(host),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one tick. Returns the session state after the tick.
    pub fn tick<I, S>(&mut self, events: I, now: Instant, sink: &mut S) -> io::Result<SessionState>
    where
        I: IntoIterator<Item = InputEvent>,
        S: FrameSink + ?Sized,
    {
        for event in events {
            self.session.handle(event, &self.dispatcher);
            if !self.session.is_running() {
                return Ok(SessionState::Terminated);
            }
        }

        self.session.blink.update(now);
        sink.draw(&self.session.frame())?;
        Ok(self.session.state())
    }
}
