//! Display Surfaces
//!
//! A surface is whatever the typewriter types into. The animator only ever
//! appends [`Glyph`]s; it never reads the surface back and never clears it.
//!
//! Two implementations ship with the core:
//! - [`TextSurface`]: an in-memory glyph buffer, handy for tests
//! - [`SharedSurface`]: a cloneable handle around a [`TextSurface`] so the
//!   reel can type while a UI takes snapshots for rendering

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

/// Character used to render a collapsed pair of spaces (`&emsp;` on the web)
pub const WIDE_SPACE: char = '\u{2003}';

/// One logical unit appended to a surface
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    /// A character copied verbatim from the source text
    Char(char),
    /// Two consecutive spaces, collapsed into one wide space
    WideSpace,
    /// A newline in the source text
    LineBreak,
}

impl Glyph {
    /// Number of source characters this glyph consumed
    #[must_use]
    pub fn source_len(self) -> usize {
        match self {
            Glyph::WideSpace => 2,
            Glyph::Char(_) | Glyph::LineBreak => 1,
        }
    }

    /// The character this glyph renders as
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Glyph::Char(c) => c,
            Glyph::WideSpace => WIDE_SPACE,
            Glyph::LineBreak => '\n',
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Something the typewriter can append glyphs to
pub trait Surface {
    /// Append one glyph to the end of the surface
    fn append(&mut self, glyph: Glyph);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn append(&mut self, glyph: Glyph) {
        (**self).append(glyph);
    }
}

/// In-memory glyph buffer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextSurface {
    glyphs: Vec<Glyph>,
    /// Bumped on every mutation so renderers can skip unchanged frames
    revision: u64,
}

impl TextSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Remove everything typed so far
    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.revision += 1;
    }

    /// Drop whole lines from the front until at most `max_lines` remain
    ///
    /// Returns the number of glyphs removed. `max_lines == 0` keeps
    /// everything.
    pub fn trim_to_lines(&mut self, max_lines: usize) -> usize {
        let excess = self.line_count().saturating_sub(max_lines);
        if max_lines == 0 || excess == 0 {
            return 0;
        }

        // Cut just past the `excess`-th line break
        let cut = self
            .glyphs
            .iter()
            .enumerate()
            .filter(|(_, g)| matches!(g, Glyph::LineBreak))
            .nth(excess - 1)
            .map_or(0, |(i, _)| i + 1);

        self.glyphs.drain(..cut);
        self.revision += 1;
        cut
    }

    /// Render the surface as plain text
    #[must_use]
    pub fn render(&self) -> String {
        self.glyphs.iter().map(|g| g.as_char()).collect()
    }

    /// Number of rendered lines (a trailing line break opens a new line)
    #[must_use]
    pub fn line_count(&self) -> usize {
        1 + self
            .glyphs
            .iter()
            .filter(|g| matches!(g, Glyph::LineBreak))
            .count()
    }
}

impl Surface for TextSurface {
    fn append(&mut self, glyph: Glyph) {
        self.glyphs.push(glyph);
        self.revision += 1;
    }
}

/// Cloneable handle to a [`TextSurface`]
///
/// All clones point at the same buffer. The lock is held only for the
/// duration of a single append or snapshot.
#[derive(Clone, Debug, Default)]
pub struct SharedSurface {
    inner: Arc<Mutex<TextSurface>>,
}

impl SharedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered text plus the revision it was taken at
    pub fn snapshot(&self) -> (String, u64) {
        let surface = self.inner.lock();
        (surface.render(), surface.revision())
    }

    pub fn revision(&self) -> u64 {
        self.inner.lock().revision()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// See [`TextSurface::trim_to_lines`]
    pub fn trim_to_lines(&self, max_lines: usize) -> usize {
        self.inner.lock().trim_to_lines(max_lines)
    }

    /// Run a closure against the underlying buffer
    pub fn with<R>(&self, f: impl FnOnce(&TextSurface) -> R) -> R {
        f(&self.inner.lock())
    }
}

impl Surface for SharedSurface {
    fn append(&mut self, glyph: Glyph) {
        self.inner.lock().append(glyph);
    }
}
