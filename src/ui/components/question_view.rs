use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::bank::model::{Question, QuestionKind};
use crate::ui::theme::Theme;

/// Letter shown next to option `index`: a, b, c, ...
pub fn option_label(index: usize) -> char {
    (b'a' + (index % 26) as u8) as char
}

pub struct QuestionView<'a> {
    question: &'a Question,
    index: usize,
    total: usize,
    selected: Option<usize>,
    highlighted: usize,
    theme: &'a Theme,
}

impl<'a> QuestionView<'a> {
    pub fn new(
        question: &'a Question,
        index: usize,
        total: usize,
        selected: Option<usize>,
        highlighted: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            question,
            index,
            total,
            selected,
            highlighted,
            theme,
        }
    }
}

impl Widget for QuestionView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(
                " Question {}/{} · {} ",
                self.index + 1,
                self.total,
                self.question.kind.label()
            ))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {}", self.question.prompt),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        let code = match &self.question.kind {
            QuestionKind::MultipleChoice => None,
            QuestionKind::FillBlank { template } => Some(template),
            QuestionKind::SyntaxFix { broken_code } => Some(broken_code),
        };
        if let Some(code) = code {
            let code_style = Style::default().fg(colors.code_fg()).bg(colors.code_bg());
            for line in code.lines() {
                lines.push(Line::from(Span::styled(format!("    {line}"), code_style)));
            }
            lines.push(Line::from(""));
        }

        for (i, option) in self.question.options.iter().enumerate() {
            let is_selected = self.selected == Some(i);
            let is_highlighted = i == self.highlighted;
            let marker = if is_selected { "●" } else { "○" };

            let mut style = Style::default().fg(if is_selected {
                colors.option_selected()
            } else {
                colors.fg()
            });
            if is_highlighted {
                style = style.bg(colors.option_highlight_bg());
            }
            if is_selected {
                style = style.add_modifier(Modifier::BOLD);
            }

            lines.push(Line::from(Span::styled(
                format!("  {marker} {}) {option}", option_label(i)),
                style,
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_labels_are_letters() {
        assert_eq!(option_label(0), 'a');
        assert_eq!(option_label(3), 'd');
    }
}
