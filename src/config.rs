//! Configuration and color scheme management for minterm.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.minterm/config.toml`
//! - Built-in color schemes (default, solarized-dark, nord, gruvbox-dark, tokyo-night)
//! - Glyph style selection (real text or placeholder boxes)
//!
//! # Configuration File
//!
//! The configuration file is located at `~/.minterm/config.toml`:
//!
//! ```toml
//! # Color scheme: default, solarized-dark, nord, gruvbox-dark, tokyo-night
//! color_scheme = "nord"
//!
//! # "text" draws characters, "boxes" draws a placeholder box per character
//! glyphs = "text"
//!
//! # Log level used when RUST_LOG is not set
//! log_level = "info"
//! ```
//!
//! The file only affects presentation and logging. Scrollback size, input
//! length and timings are fixed at compile time.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory under the home directory holding config and logs
const APP_DIR: &str = ".minterm";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// How characters are drawn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlyphStyle {
    /// Draw the characters themselves
    #[default]
    Text,
    /// Draw a placeholder box for every visible character
    Boxes,
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Color scheme name
    pub color_scheme: String,
    /// Glyph drawing style
    pub glyphs: GlyphStyle,
    /// Fallback log filter when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color_scheme: "default".to_string(),
            glyphs: GlyphStyle::Text,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `~/.minterm/config.toml`.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::get_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        app_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get the color scheme
    pub fn get_color_scheme(&self) -> ColorScheme {
        ColorScheme::by_name(&self.color_scheme)
    }
}

/// Color definition (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert to crossterm Color
    pub fn to_crossterm(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// Color scheme definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub name: String,
    /// Window background
    pub background: Color,
    /// Scrollback text
    pub foreground: Color,
    /// Prompt and input text
    pub prompt: Color,
    /// Cursor glyph
    pub cursor: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_scheme()
    }
}

impl ColorScheme {
    /// Default color scheme
    pub fn default_scheme() -> Self {
        Self {
            name: "default".to_string(),
            background: Color::new(20, 20, 20),
            foreground: Color::new(200, 200, 200),
            prompt: Color::new(100, 220, 100),
            cursor: Color::new(255, 255, 255),
        }
    }

    /// Solarized Dark scheme
    pub fn solarized_dark() -> Self {
        Self {
            name: "solarized-dark".to_string(),
            background: Color::new(0, 43, 54),
            foreground: Color::new(147, 161, 161),
            prompt: Color::new(133, 153, 0),
            cursor: Color::new(38, 139, 210),
        }
    }

    /// Nord scheme
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            background: Color::new(46, 52, 64),
            foreground: Color::new(216, 222, 233),
            prompt: Color::new(163, 190, 140),
            cursor: Color::new(136, 192, 208),
        }
    }

    /// Gruvbox Dark scheme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark".to_string(),
            background: Color::new(40, 40, 40),
            foreground: Color::new(235, 219, 178),
            prompt: Color::new(152, 151, 26),
            cursor: Color::new(215, 153, 33),
        }
    }

    /// Tokyo Night scheme
    pub fn tokyo_night() -> Self {
        Self {
            name: "tokyo-night".to_string(),
            background: Color::new(26, 27, 38),
            foreground: Color::new(169, 177, 214),
            prompt: Color::new(158, 206, 106),
            cursor: Color::new(122, 162, 247),
        }
    }

    /// Get scheme by name, falling back to the default
    pub fn by_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "solarized-dark" | "solarized_dark" => Self::solarized_dark(),
            "nord" => Self::nord(),
            "gruvbox-dark" | "gruvbox_dark" | "gruvbox" => Self::gruvbox_dark(),
            "tokyo-night" | "tokyo_night" | "tokyonight" => Self::tokyo_night(),
            _ => Self::default_scheme(),
        }
    }

    /// List available schemes
    pub fn list() -> Vec<&'static str> {
        vec!["default", "solarized-dark", "nord", "gruvbox-dark", "tokyo-night"]
    }
}

/// `~/.minterm`. Not created here; only the log file writer creates it.
pub fn app_dir() -> Option<PathBuf> {
    home_dir().map(|home| home.join(APP_DIR))
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
}
