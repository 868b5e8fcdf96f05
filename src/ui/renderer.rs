//! Terminal renderer using crossterm
//!
//! Draws the session frame: scrollback lines, then the prompt row with the
//! blinking cursor glyph. Only rows that changed since the previous frame
//! are rewritten.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::config::{ColorScheme, GlyphStyle};
use crate::core::line::truncate_to_width;
use crate::core::{Frame, FrameSink};

/// Character drawn for the cursor
const CURSOR_GLYPH: char = '█';

/// Placeholder drawn for each character in box mode
const BOX_GLYPH: char = '▯';

/// One screen row as last drawn
#[derive(Clone, Debug, Default, PartialEq)]
struct RenderRow {
    text: String,
    /// Prompt row only; the column the cursor glyph sits at
    cursor: Option<u16>,
    prompt: bool,
}

/// Terminal renderer
pub struct Renderer {
    /// Whether the terminal has been initialized
    initialized: bool,
    /// Rows drawn by the previous frame
    prev_rows: Vec<RenderRow>,
    /// Current terminal size
    size: (u16, u16),
    colors: ColorScheme,
    glyphs: GlyphStyle,
}

impl Renderer {
    pub fn new(colors: ColorScheme, glyphs: GlyphStyle) -> Self {
        Self {
            initialized: false,
            prev_rows: Vec::new(),
            size: (0, 0),
            colors,
            glyphs,
        }
    }

    /// Get the terminal size
    pub fn size() -> io::Result<(u16, u16)> {
        terminal::size()
    }

    /// Initialize the terminal for rendering
    pub fn init(&mut self) -> io::Result<()> {
        self.size = Self::size()?;
        debug!("Renderer init at {}x{}", self.size.0, self.size.1);

        terminal::enable_raw_mode()?;
        // From here on cleanup() must undo raw mode even if setup fails
        self.initialized = true;

        let mut stdout = io::stdout();
        queue!(
            stdout,
            EnterAlternateScreen,
            DisableLineWrap,
            Hide,
            SetBackgroundColor(self.colors.background.to_crossterm()),
            Clear(ClearType::All),
            MoveTo(0, 0)
        )?;
        // Bracketed paste so pasted text arrives as one event
        queue!(stdout, crossterm::event::EnableBracketedPaste)?;
        stdout.flush()?;

        self.prev_rows.clear();
        Ok(())
    }

    /// Cleanup the terminal
    pub fn cleanup(&mut self) -> io::Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.initialized = false;

        let mut stdout = io::stdout();
        let _ = queue!(
            stdout,
            crossterm::event::DisableBracketedPaste,
            ResetColor,
            Show,
            EnableLineWrap,
            LeaveAlternateScreen
        );
        let _ = stdout.flush();

        // Disable raw mode - this is the most important part
        terminal::disable_raw_mode()
    }

    /// Note a new terminal size; the next frame is redrawn in full
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.size = (cols, rows);
        self.prev_rows.clear();
    }

    /// Lay out a frame into screen rows
    fn layout(&self, frame: &Frame<'_>) -> Vec<RenderRow> {
        let (cols, rows) = self.size;
        let cols = cols as usize;
        let rows = rows as usize;
        if rows == 0 || cols == 0 {
            return Vec::new();
        }

        // Newest lines that fit above the prompt row
        let skip = frame.line_count().saturating_sub(rows - 1);
        let mut out: Vec<RenderRow> = frame
            .lines()
            .skip(skip)
            .map(|line| RenderRow {
                text: match self.glyphs {
                    GlyphStyle::Text if line.width() <= cols => line.to_string(),
                    _ => self.clip(line.as_str(), cols),
                },
                cursor: None,
                prompt: false,
            })
            .collect();

        let prompt = self.clip(&frame.prompt(), cols);
        let column = match self.glyphs {
            GlyphStyle::Text => frame.prompt().width(),
            // Boxes are single-width, so character count is the column
            GlyphStyle::Boxes => frame.cursor_column(),
        };
        let cursor = (frame.cursor_visible() && column < cols).then_some(column as u16);
        out.push(RenderRow {
            text: prompt,
            cursor,
            prompt: true,
        });
        out
    }

    fn clip(&self, text: &str, cols: usize) -> String {
        match self.glyphs {
            GlyphStyle::Text => truncate_to_width(text, cols),
            GlyphStyle::Boxes => {
                let boxed: String = text
                    .chars()
                    .map(|ch| if ch.is_whitespace() { ch } else { BOX_GLYPH })
                    .collect();
                truncate_to_width(&boxed, cols)
            }
        }
    }

    fn write_row<W: Write>(&self, out: &mut W, y: u16, row: &RenderRow) -> io::Result<()> {
        let fg = if row.prompt {
            self.colors.prompt
        } else {
            self.colors.foreground
        };
        queue!(
            out,
            MoveTo(0, y),
            SetBackgroundColor(self.colors.background.to_crossterm()),
            SetForegroundColor(fg.to_crossterm()),
            Print(&row.text),
            Clear(ClearType::UntilNewLine)
        )?;
        if let Some(x) = row.cursor {
            queue!(
                out,
                MoveTo(x, y),
                SetForegroundColor(self.colors.cursor.to_crossterm()),
                Print(CURSOR_GLYPH)
            )?;
        }
        Ok(())
    }
}

impl FrameSink for Renderer {
    fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
        let rows = self.layout(frame);
        if rows == self.prev_rows {
            return Ok(());
        }

        let stdout = io::stdout();
        let mut stdout = io::BufWriter::with_capacity(65536, stdout.lock());

        // Begin synchronized update (reduces flicker)
        write!(stdout, "\x1b[?2026h")?;

        for (y, row) in rows.iter().enumerate() {
            if self.prev_rows.get(y) != Some(row) {
                self.write_row(&mut stdout, y as u16, row)?;
            }
        }

        // Rows left over from a longer previous frame
        if self.prev_rows.len() > rows.len() {
            queue!(
                stdout,
                MoveTo(0, rows.len() as u16),
                SetBackgroundColor(self.colors.background.to_crossterm()),
                Clear(ClearType::FromCursorDown)
            )?;
        }

        // End synchronized update
        write!(stdout, "\x1b[?2026l")?;
        stdout.flush()?;

        self.prev_rows = rows;
        Ok(())
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::tests::FakeHost;
    use crate::core::{InputEvent, SessionLoop};
    use crate::ui::KeyMapper;
    use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
    use std::time::Instant;

    /// Renders layouts without touching the real terminal
    struct LayoutProbe {
        renderer: Renderer,
        rows: Vec<RenderRow>,
    }

    impl FrameSink for LayoutProbe {
        fn draw(&mut self, frame: &Frame<'_>) -> io::Result<()> {
            self.rows = self.renderer.layout(frame);
            Ok(())
        }
    }

    fn probe(cols: u16, rows: u16, glyphs: GlyphStyle) -> LayoutProbe {
        let mut renderer = Renderer::new(ColorScheme::default(), glyphs);
        renderer.resize(cols, rows);
        LayoutProbe {
            renderer,
            rows: Vec::new(),
        }
    }

    fn run(probe: &mut LayoutProbe, events: Vec<InputEvent>) {
        let now = Instant::now();
        let mut session_loop = SessionLoop::new(FakeHost::working(), now);
        session_loop.tick(events, now, probe).unwrap();
    }

    #[test]
    fn test_prompt_below_lines() {
        let mut p = probe(80, 24, GlyphStyle::Text);
        run(&mut p, vec![InputEvent::Text("ls".into())]);

        assert_eq!(p.rows.len(), 3);
        assert_eq!(p.rows[0].text, "Mini Terminal");
        let prompt = &p.rows[2];
        assert!(prompt.prompt);
        assert_eq!(prompt.text, "$ ls");
        assert_eq!(prompt.cursor, Some(4));
    }

    #[test]
    fn test_only_tail_fits() {
        let mut p = probe(80, 4, GlyphStyle::Text);
        let mut events = Vec::new();
        for k in 0..5 {
            events.push(InputEvent::Text(format!("echo {}", k)));
            events.push(InputEvent::Submit);
        }
        run(&mut p, events);

        assert_eq!(p.rows.len(), 4);
        let texts: Vec<_> = p.rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["$ echo 4", "4", "", "$ "]);
    }

    #[test]
    fn test_clipped_to_width() {
        let mut p = probe(10, 5, GlyphStyle::Text);
        run(&mut p, vec![InputEvent::Text("abcdefghijkl".into())]);

        let prompt = p.rows.last().unwrap();
        assert_eq!(prompt.text, "$ abcdefgh");
        // No room left for the cursor
        assert_eq!(prompt.cursor, None);
        assert!(p.rows.iter().all(|r| r.text.width() <= 10));
    }

    #[test]
    fn test_box_glyphs() {
        let mut p = probe(80, 24, GlyphStyle::Boxes);
        run(&mut p, vec![InputEvent::Text("a b".into())]);

        let prompt = p.rows.last().unwrap();
        assert_eq!(prompt.text, "▯ ▯ ▯");
        assert_eq!(prompt.cursor, Some(5));
        assert_eq!(p.rows[0].text.chars().filter(|c| *c == ' ').count(), 1);
    }

    #[test]
    fn test_pasted_controls_never_drawn() {
        let mut p = probe(80, 24, GlyphStyle::Text);
        let paste = Event::Paste("echo \x1b[2J\nboom".to_string());
        let tab = Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        let events = vec![
            KeyMapper::map(&paste),
            Some(InputEvent::Submit),
            KeyMapper::map(&tab),
            // Raw control text is refused by the input line itself
            Some(InputEvent::Text("\x07\x00".into())),
        ];
        run(&mut p, events.into_iter().flatten().collect());

        let texts: Vec<_> = p.rows.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(&texts[2..], &["$ echo [2J boom", "[2J boom", "", "$     "]);
        assert!(p.rows.iter().all(|r| !r.text.chars().any(char::is_control)));
        // Cursor sits right after the input, one cell per character
        assert_eq!(p.rows.last().unwrap().cursor, Some(6));
    }

    #[test]
    fn test_zero_size() {
        let mut p = probe(0, 0, GlyphStyle::Text);
        run(&mut p, Vec::new());
        assert!(p.rows.is_empty());
    }
}
