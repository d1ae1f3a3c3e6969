//! Link Bar and Title Label
//!
//! A row of short link tags. Hovering a tag shows its full title in the
//! title label above the reel; leaving every tag fades the title out.

use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use unicode_width::UnicodeWidthStr;

use crate::fade::{Fade, FADE_DURATION};
use crate::theme::{faded, LINK_HOVER, LINK_IDLE, TITLE};

/// What clicking a link does
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    /// Points off the page; only the hover title is shown
    External,
    /// Swaps the code reel for the about panel
    About,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Link {
    /// Short tag drawn in the bar
    pub tag: &'static str,
    /// Full title shown on hover
    pub title: &'static str,
    pub kind: LinkKind,
}

pub const LINKS: &[Link] = &[
    Link { tag: "fb", title: "Facebook", kind: LinkKind::External },
    Link { tag: "git", title: "GitHub", kind: LinkKind::External },
    Link { tag: "li", title: "LinkedIn", kind: LinkKind::External },
    Link { tag: "cv", title: "Résumé", kind: LinkKind::External },
    Link { tag: "em", title: "Email", kind: LinkKind::External },
    Link { tag: "about", title: "About Me", kind: LinkKind::About },
];

/// Columns between tags
const GAP: u16 = 3;

/// Result of moving the mouse over the bar
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hover {
    /// The pointer moved onto a link
    Entered(usize),
    /// The pointer left the last hovered link
    Left,
    /// Nothing changed
    Unchanged,
}

/// The row of links
#[derive(Debug, Default)]
pub struct LinkBar {
    hovered: Option<usize>,
}

impl LinkBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Total width of the tags and gaps
    pub fn width() -> u16 {
        let tags: u16 = LINKS.iter().map(|l| l.tag.width() as u16).sum();
        tags + GAP * (LINKS.len() as u16).saturating_sub(1)
    }

    /// Column ranges of every tag, centered in `width`
    pub fn spans(width: u16) -> Vec<(u16, u16)> {
        let mut x = width.saturating_sub(Self::width()) / 2;
        LINKS
            .iter()
            .map(|link| {
                let w = link.tag.width() as u16;
                let span = (x, w);
                x = x.saturating_add(w + GAP);
                span
            })
            .collect()
    }

    /// Link under column `x` of a bar `width` columns wide
    pub fn link_at(width: u16, x: u16) -> Option<usize> {
        Self::spans(width)
            .iter()
            .position(|&(start, w)| x >= start && x < start.saturating_add(w))
    }

    /// Track the pointer; `x` is `None` when it is off the bar
    pub fn hover(&mut self, width: u16, x: Option<u16>) -> Hover {
        let under = x.and_then(|x| Self::link_at(width, x));
        if under == self.hovered {
            return Hover::Unchanged;
        }
        self.hovered = under;
        match under {
            Some(index) => Hover::Entered(index),
            None => Hover::Left,
        }
    }

    pub fn render(&self, buf: &mut Buffer, area: Rect) {
        for (index, (x, _)) in Self::spans(area.width).into_iter().enumerate() {
            if x >= area.width {
                break;
            }
            let style = if self.hovered == Some(index) {
                Style::default().fg(LINK_HOVER).add_modifier(Modifier::UNDERLINED)
            } else {
                Style::default().fg(LINK_IDLE)
            };
            buf.set_stringn(area.x + x, area.y, LINKS[index].tag, (area.width - x) as usize, style);
        }
    }
}

/// Fading title text above the reel
#[derive(Debug)]
pub struct TitleLabel {
    text: String,
    fade: Fade,
}

impl TitleLabel {
    pub fn new(now: Instant) -> Self {
        Self {
            text: String::new(),
            fade: Fade::settled(0.0, now),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn level(&self, now: Instant) -> f32 {
        self.fade.level(now)
    }

    /// Show `title`, fading in if the label is hidden
    ///
    /// A running fade is finished first, so a label that was fading out
    /// starts again from fully hidden.
    pub fn display_title(&mut self, title: &str, now: Instant) {
        let settled = self.fade.target();
        self.text = title.to_string();
        self.fade = if settled > 0.0 {
            Fade::settled(1.0, now)
        } else {
            Fade::fade_in(now, FADE_DURATION)
        };
    }

    /// Fade the label out from wherever its running fade would end
    pub fn hide_title(&mut self, now: Instant) {
        self.fade = if self.fade.target() > 0.0 {
            Fade::fade_out(now, FADE_DURATION)
        } else {
            Fade::settled(0.0, now)
        };
    }

    pub fn render(&self, buf: &mut Buffer, area: Rect, now: Instant) {
        let level = self.level(now);
        if level <= 0.0 || self.text.is_empty() {
            return;
        }
        let width = self.text.width() as u16;
        let x = area.width.saturating_sub(width) / 2;
        let style = Style::default()
            .fg(faded(TITLE, level))
            .add_modifier(Modifier::BOLD);
        buf.set_stringn(area.x + x, area.y, &self.text, area.width as usize, style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_link_titles() {
        let titles: Vec<_> = LINKS.iter().map(|l| l.title).collect();
        assert_eq!(
            titles,
            ["Facebook", "GitHub", "LinkedIn", "Résumé", "Email", "About Me"]
        );
        assert_eq!(
            LINKS.iter().filter(|l| l.kind == LinkKind::About).count(),
            1
        );
    }

    #[test]
    fn test_spans_are_centered_and_hit_tested() {
        // "fb   git   li   cv   em   about" is 31 columns
        assert_eq!(LinkBar::width(), 31);
        let spans = LinkBar::spans(41);
        assert_eq!(spans[0], (5, 2));
        assert_eq!(spans[1], (10, 3));

        assert_eq!(LinkBar::link_at(41, 5), Some(0));
        assert_eq!(LinkBar::link_at(41, 7), None);
        assert_eq!(LinkBar::link_at(41, 12), Some(1));
        assert_eq!(LinkBar::link_at(41, 31), Some(5));
        assert_eq!(LinkBar::link_at(41, 40), None);
    }

    #[test]
    fn test_hover_enter_and_leave() {
        let mut bar = LinkBar::new();
        assert_eq!(bar.hover(31, Some(0)), Hover::Entered(0));
        assert_eq!(bar.hover(31, Some(1)), Hover::Unchanged);
        assert_eq!(bar.hover(31, Some(5)), Hover::Entered(1));
        assert_eq!(bar.hover(31, Some(3)), Hover::Left);
        assert_eq!(bar.hover(31, None), Hover::Unchanged);
        assert_eq!(bar.hovered(), None);
    }

    #[test]
    fn test_title_fades_in_and_out() {
        let t0 = Instant::now();
        let mut label = TitleLabel::new(t0);
        assert_eq!(label.level(t0), 0.0);

        label.display_title("GitHub", t0);
        assert_eq!(label.text(), "GitHub");
        assert!(label.level(t0 + Duration::from_millis(200)) > 0.0);
        assert_eq!(label.level(t0 + FADE_DURATION), 1.0);

        let t1 = t0 + Duration::from_secs(1);
        label.hide_title(t1);
        assert_eq!(label.level(t1), 1.0);
        assert_eq!(label.level(t1 + FADE_DURATION), 0.0);
    }

    #[test]
    fn test_switching_links_keeps_title_visible() {
        let t0 = Instant::now();
        let mut label = TitleLabel::new(t0);
        label.display_title("Facebook", t0);

        // Mid fade-in, the pointer moves to another link
        let t1 = t0 + Duration::from_millis(100);
        label.display_title("LinkedIn", t1);
        assert_eq!(label.text(), "LinkedIn");
        assert_eq!(label.level(t1), 1.0);
    }

    #[test]
    fn test_redisplay_during_fade_out_restarts_from_hidden() {
        let t0 = Instant::now();
        let mut label = TitleLabel::new(t0);
        label.display_title("Email", t0);
        label.hide_title(t0 + Duration::from_secs(1));

        let t2 = t0 + Duration::from_millis(1_100);
        label.display_title("About Me", t2);
        assert_eq!(label.level(t2), 0.0);
        assert_eq!(label.level(t2 + FADE_DURATION), 1.0);
    }

    #[test]
    fn test_render_centers_title() {
        let t0 = Instant::now();
        let mut label = TitleLabel::new(t0);
        label.display_title("Email", t0);

        let area = Rect::new(0, 0, 11, 1);
        let mut buf = Buffer::empty(area);
        label.render(&mut buf, area, t0 + FADE_DURATION);

        let row: String = (0..11).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert_eq!(row, "   Email   ");
    }
}
