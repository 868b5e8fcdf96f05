//! Core terminal session components.
//!
//! This module contains everything that does not touch the screen:
//!
//! - **line**: width-clipped display lines
//! - **scrollback**: bounded line history with oldest-first eviction
//! - **input_line**: the prompt's editable input buffer
//! - **blink**: cursor blink timer
//! - **commands**: builtin command parsing and dispatch
//! - **host**: OS facilities used by builtins (`pwd`, `date`)
//! - **session**: `Session` aggregate and the per-frame `SessionLoop`
//!
//! # Architecture
//!
//! ```text
//! SessionLoop
//! ├── CommandDispatcher ── Host (cwd, date process)
//! └── Session
//!     ├── Scrollback (Line history)
//!     ├── InputLine (current prompt text)
//!     └── CursorBlink (visibility + timer)
//! ```

pub mod line;
pub mod scrollback;
pub mod input_line;
pub mod blink;
pub mod commands;
pub mod host;
pub mod session;

pub use host::SystemHost;
pub use session::{Frame, FrameSink, InputEvent, SessionLoop, SessionState, FRAME_DELAY};
