use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::snapshot::SessionSnapshot;
use crate::ui::theme::Theme;

/// Per-question answered/unanswered map for the running session.
pub struct SessionSidebar<'a> {
    snapshot: &'a SessionSnapshot,
    theme: &'a Theme,
}

impl<'a> SessionSidebar<'a> {
    pub fn new(snapshot: &'a SessionSnapshot, theme: &'a Theme) -> Self {
        Self { snapshot, theme }
    }
}

impl Widget for SessionSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Progress ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let total = self.snapshot.question_count();
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Answered: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}/{}", self.snapshot.answered_count, total),
                    Style::default()
                        .fg(colors.accent())
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
        ];

        for (i, answer) in self.snapshot.answers.iter().enumerate() {
            let current = i == self.snapshot.current_index;
            let (mark, color) = match answer {
                Some(_) => ("■", colors.success()),
                None => ("□", colors.text_dim()),
            };
            let pointer = if current { ">" } else { " " };
            let style = if current {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(color)
            };
            lines.push(Line::from(Span::styled(
                format!("  {pointer} {mark} Q{}", i + 1),
                style,
            )));
        }

        if self.snapshot.is_last_question {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Last question: Next submits.",
                Style::default().fg(colors.warning()),
            )));
        }

        Paragraph::new(lines).render(inner, buf);
    }
}
