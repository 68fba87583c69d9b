//! Retained panes and the terminal they are presented on.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event as CEvent, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::Widget,
};

use super::render;

pub(crate) const HEADER_ROWS: u16 = 2;
pub(crate) const FOOTER_ROWS: u16 = 2;
pub(crate) const STATUS_ROWS: u16 = 1;

/// Off-screen rectangle that keeps its contents until erased.
#[derive(Clone, Debug)]
pub(crate) struct Pane {
    buf: Buffer,
}

impl Pane {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        Self {
            buf: Buffer::empty(Rect::new(0, 0, width, height)),
        }
    }

    pub(crate) fn width(&self) -> u16 {
        self.buf.area.width
    }

    pub(crate) fn height(&self) -> u16 {
        self.buf.area.height
    }

    pub(crate) fn erase(&mut self) {
        self.buf.reset();
    }

    /// Write `text` at `row`/`col`, cut at the right edge.
    pub(crate) fn put_str(&mut self, row: u16, col: u16, text: &str, style: Style) {
        if row >= self.height() || col >= self.width() {
            return;
        }
        let room = usize::from(self.width() - col);
        self.buf.set_stringn(col, row, text, room, style);
    }

    /// Write `text` flush with the right edge of `row`.
    pub(crate) fn put_str_right(&mut self, row: u16, text: &str, style: Style) {
        let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        let col = self.width().saturating_sub(len);
        self.put_str(row, col, text, style);
    }

    /// Apply `style` to every cell of `row`.
    pub(crate) fn style_row(&mut self, row: u16, style: Style) {
        if row >= self.height() {
            return;
        }
        self.buf.set_style(Rect::new(0, row, self.width(), 1), style);
    }

    pub(crate) fn hline(&mut self, row: u16) {
        let rule = "─".repeat(usize::from(self.width()));
        self.put_str(row, 0, &rule, Style::default());
    }

    #[cfg(test)]
    pub(crate) fn row_text(&self, row: u16) -> String {
        (0..self.width())
            .filter_map(|x| self.buf.cell((x, row)))
            .map(|cell| cell.symbol())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[cfg(test)]
    pub(crate) fn cell_style(&self, col: u16, row: u16) -> Style {
        self.buf
            .cell((col, row))
            .map(|cell| cell.style())
            .unwrap_or_default()
    }
}

impl Widget for &Pane {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self.width().min(area.width);
        let height = self.height().min(area.height);
        for y in 0..height {
            for x in 0..width {
                if let (Some(src), Some(dst)) =
                    (self.buf.cell((x, y)), buf.cell_mut((area.x + x, area.y + y)))
                {
                    *dst = src.clone();
                }
            }
        }
    }
}

/// Help window contents: a title and `(key, description)` rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HelpOverlay {
    pub(crate) title: String,
    pub(crate) lines: Vec<(String, String)>,
}

/// The three view panes plus the status line and an optional help window.
#[derive(Clone, Debug)]
pub(crate) struct Screen {
    pub(crate) header: Pane,
    pub(crate) main: Pane,
    pub(crate) footer: Pane,
    pub(crate) status: String,
    pub(crate) help: Option<HelpOverlay>,
}

impl Screen {
    pub(crate) fn new(width: u16, height: u16) -> Self {
        let main_rows = height.saturating_sub(HEADER_ROWS + FOOTER_ROWS + STATUS_ROWS);
        Self {
            header: Pane::new(width, HEADER_ROWS),
            main: Pane::new(width, main_rows),
            footer: Pane::new(width, FOOTER_ROWS),
            status: String::new(),
            help: None,
        }
    }

    /// Rebuild every pane for a new terminal size; contents are dropped.
    pub(crate) fn resize(&mut self, width: u16, height: u16) {
        let status = std::mem::take(&mut self.status);
        let help = self.help.take();
        *self = Self::new(width, height);
        self.status = status;
        self.help = help;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Input {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Where the engine reads input from and presents frames to.
pub(crate) trait Surface {
    fn size(&self) -> Result<(u16, u16)>;
    /// One pending input, without blocking.
    fn poll_input(&mut self) -> Result<Option<Input>>;
    fn present(&mut self, screen: &Screen) -> Result<()>;
}

/// Real terminal in raw mode on the alternate screen.
///
/// The terminal is handed back to the shell on drop and from the panic hook.
pub(crate) struct CrosstermSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    restored: bool,
}

impl CrosstermSurface {
    pub(crate) fn acquire() -> Result<Self> {
        install_panic_hook();
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide).context("enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend).context("create terminal")?;
        Ok(Self {
            terminal,
            restored: false,
        })
    }

    pub(crate) fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        disable_raw_mode().context("disable raw mode")?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen, Show)
            .context("leave alternate screen")?;
        self.terminal.show_cursor().context("show cursor")?;
        Ok(())
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            eprintln!("failed to restore terminal: {e:#}");
        }
    }
}

impl Surface for CrosstermSurface {
    fn size(&self) -> Result<(u16, u16)> {
        let size = self.terminal.size().context("query terminal size")?;
        Ok((size.width, size.height))
    }

    fn poll_input(&mut self) -> Result<Option<Input>> {
        if !event::poll(Duration::ZERO).context("poll terminal events")? {
            return Ok(None);
        }
        let input = match event::read().context("read terminal event")? {
            CEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Input::Key(key)),
            CEvent::Resize(width, height) => Some(Input::Resize(width, height)),
            _ => None,
        };
        Ok(input)
    }

    fn present(&mut self, screen: &Screen) -> Result<()> {
        self.terminal
            .draw(|f| render::draw(f, screen))
            .context("draw frame")?;
        Ok(())
    }
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        previous(info);
    }));
}
