//! CodeView Widget
//!
//! The framed code reel. Text is wrapped by display width and the view
//! follows the tail unless scrolled back. Only the lines that can reach the
//! screen are wrapped.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, StatefulWidget, Widget};
use unicode_width::UnicodeWidthChar;

use crate::theme::{faded, CODE_CURSOR, CODE_FRAME, CODE_TEXT};

const CURSOR: &str = "▌";

/// Scroll state for the code view
#[derive(Debug, Default)]
pub struct CodeViewState {
    /// Rows scrolled back from the tail (0 = follow)
    pub scroll_back: usize,
    /// Rows wrapped at the last render (at least the ones on screen)
    pub total_rows: usize,
}

impl CodeViewState {
    /// Scroll by delta rows (positive = back towards the top)
    pub fn scroll(&mut self, delta: i32) {
        let back = self.scroll_back as i64 + i64::from(delta);
        let max = self.total_rows.saturating_sub(1) as i64;
        self.scroll_back = back.clamp(0, max.max(0)) as usize;
    }

    pub fn follow(&mut self) {
        self.scroll_back = 0;
    }

    pub fn is_following(&self) -> bool {
        self.scroll_back == 0
    }
}

/// Split `text` into rows no wider than `width` columns
///
/// A trailing newline yields a final empty row, where the cursor sits.
pub fn wrap_rows(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    for line in text.split('\n') {
        wrap_line(line, width, &mut rows);
    }
    rows
}

/// The last rows of `text`, wrapping lines from the end until at least
/// `needed` rows are collected (or the text runs out)
pub fn tail_rows(text: &str, width: usize, needed: usize) -> Vec<String> {
    let mut rows = Vec::new();
    let mut line_rows = Vec::new();

    for line in text.rsplit('\n') {
        line_rows.clear();
        wrap_line(line, width, &mut line_rows);
        rows.extend(line_rows.drain(..).rev());
        if rows.len() >= needed {
            break;
        }
    }

    rows.reverse();
    rows
}

fn wrap_line(line: &str, width: usize, rows: &mut Vec<String>) {
    let width = width.max(1);
    let mut row = String::new();
    let mut used = 0;
    for ch in line.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        row.push(ch);
        used += w;
    }
    rows.push(row);
}

/// The code reel panel
pub struct CodeView<'a> {
    text: &'a str,
    title: &'a str,
    cursor: bool,
    level: f32,
}

impl<'a> CodeView<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            title: "",
            cursor: false,
            level: 1.0,
        }
    }

    /// Frame title (the file being typed)
    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Draw the typing cursor after the last glyph
    pub fn cursor(mut self, cursor: bool) -> Self {
        self.cursor = cursor;
        self
    }

    /// Fade opacity in `0.0..=1.0`
    pub fn level(mut self, level: f32) -> Self {
        self.level = level;
        self
    }
}

impl StatefulWidget for CodeView<'_> {
    type State = CodeViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(faded(CODE_FRAME, self.level)))
            .title(self.title);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let height = inner.height as usize;
        let needed = height + state.scroll_back + 1;
        let rows = tail_rows(self.text, inner.width as usize, needed);
        state.total_rows = rows.len();
        state.scroll(0);

        let end = rows.len().saturating_sub(state.scroll_back);
        let start = end.saturating_sub(height);
        let text_style = Style::default().fg(faded(CODE_TEXT, self.level));

        for (i, row) in rows[start..end].iter().enumerate() {
            buf.set_stringn(inner.x, inner.y + i as u16, row, inner.width as usize, text_style);
        }

        if self.cursor && state.is_following() && end > start {
            let last = &rows[end - 1];
            let col: usize = last.chars().filter_map(|c| c.width()).sum();
            if col < inner.width as usize {
                let y = inner.y + (end - 1 - start) as u16;
                buf.set_string(
                    inner.x + col as u16,
                    y,
                    CURSOR,
                    Style::default().fg(faded(CODE_CURSOR, self.level)),
                );
            }
        }
    }
}
