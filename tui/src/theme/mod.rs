//! Theme and Colors
//!
//! The folio palette: a dark editor background with a green-on-black code
//! reel, and warm accents for the link bar and title label.

use ratatui::style::Color;

// ============================================================================
// Code Reel
// ============================================================================

/// Typed code
pub const CODE_TEXT: Color = Color::Rgb(152, 222, 152);

/// Block cursor trailing the typed text
pub const CODE_CURSOR: Color = Color::Rgb(220, 255, 220);

/// Code panel frame
pub const CODE_FRAME: Color = Color::Rgb(70, 90, 70);

// ============================================================================
// Links and Labels
// ============================================================================

/// Link label at rest
pub const LINK_IDLE: Color = Color::Rgb(150, 150, 160);

/// Link label under the mouse
pub const LINK_HOVER: Color = Color::Rgb(255, 200, 120);

/// Hover title, fully faded in
pub const TITLE: Color = Color::Rgb(255, 223, 128);

// ============================================================================
// About Panel
// ============================================================================

/// About panel body text
pub const ABOUT_TEXT: Color = Color::Rgb(220, 220, 230);

/// About panel heading
pub const ABOUT_HEADING: Color = Color::Rgb(150, 180, 255);

// ============================================================================
// Status
// ============================================================================

/// Status line text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Fetch failure notice
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Scale an RGB color towards black; `level` is clamped to `0.0..=1.0`
///
/// Terminals have no alpha, so fades are drawn by dimming the foreground.
#[must_use]
pub fn faded(color: Color, level: f32) -> Color {
    let level = level.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(
            (r as f32 * level) as u8,
            (g as f32 * level) as u8,
            (b as f32 * level) as u8,
        ),
        other if level >= 0.5 => other,
        _ => Color::Reset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faded_scales_rgb() {
        assert_eq!(faded(Color::Rgb(200, 100, 50), 0.5), Color::Rgb(100, 50, 25));
        assert_eq!(faded(Color::Rgb(200, 100, 50), 1.0), Color::Rgb(200, 100, 50));
        assert_eq!(faded(Color::Rgb(200, 100, 50), -3.0), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_faded_named_colors_snap() {
        assert_eq!(faded(Color::Magenta, 0.8), Color::Magenta);
        assert_eq!(faded(Color::Magenta, 0.2), Color::Reset);
    }
}
