//! User interface rendering and input handling.
//!
//! - **renderer**: draws session frames with crossterm
//! - **keymapper**: crossterm events to session input events

pub mod keymapper;
pub mod renderer;

pub use keymapper::KeyMapper;
pub use renderer::Renderer;
