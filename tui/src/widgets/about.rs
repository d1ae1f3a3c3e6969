//! About panel

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};

use crate::theme::{faded, ABOUT_HEADING, ABOUT_TEXT, CODE_FRAME};

const HEADING: &str = "About Me";

const BODY: &[&str] = &[
    "I write software for a living and for fun.",
    "",
    "The panel behind this one types out pieces of the code that runs this \
     page, picked at random from the repository.",
    "",
    "Press `a` or click `about` to go back to the code.",
];

/// Static about text, drawn at a fade level
pub struct AboutPanel {
    level: f32,
}

impl AboutPanel {
    pub fn new(level: f32) -> Self {
        Self { level }
    }
}

impl Widget for AboutPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let heading = Style::default()
            .fg(faded(ABOUT_HEADING, self.level))
            .add_modifier(Modifier::BOLD);
        let body = Style::default().fg(faded(ABOUT_TEXT, self.level));

        let mut lines = vec![Line::from(Span::styled(HEADING, heading)), Line::default()];
        lines.extend(BODY.iter().map(|text| Line::from(Span::styled(*text, body))));

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(faded(CODE_FRAME, self.level))),
            )
            .render(area, buf);
    }
}
