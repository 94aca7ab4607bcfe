use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::bank::model::Quiz;
use crate::session::result::QuizResult;
use crate::ui::components::question_view::option_label;
use crate::ui::layout::format_clock;
use crate::ui::theme::Theme;

/// Result screen: score summary followed by a per-question review.
pub struct Dashboard<'a> {
    pub quiz: &'a Quiz,
    pub result: &'a QuizResult,
    pub answers: &'a [Option<usize>],
    pub remaining_secs: u32,
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        quiz: &'a Quiz,
        result: &'a QuizResult,
        answers: &'a [Option<usize>],
        remaining_secs: u32,
        theme: &'a Theme,
    ) -> Self {
        Self {
            quiz,
            result,
            answers,
            remaining_secs,
            theme,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.result.timed_out {
            " Time's Up "
        } else {
            " Quiz Complete "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if self.result.timed_out {
                colors.warning()
            } else {
                colors.accent()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            self.quiz.title.as_str(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let score_color = colors.score(self.result.score_percent);
        Paragraph::new(Line::from(vec![
            Span::styled("  Score:    ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}%", self.result.score_percent),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(
                    "  ({}/{} correct, {} wrong)",
                    self.result.correct_count,
                    self.result.total_questions,
                    self.result.incorrect_count()
                ),
                Style::default().fg(colors.text_dim()),
            ),
        ]))
        .render(layout[1], buf);

        let used = self.quiz.time_limit_secs().saturating_sub(self.remaining_secs);
        Paragraph::new(Line::from(vec![
            Span::styled("  Time:     ", Style::default().fg(colors.fg())),
            Span::styled(
                format!(
                    "{} of {}",
                    format_clock(used),
                    format_clock(self.quiz.time_limit_secs())
                ),
                Style::default().fg(colors.fg()),
            ),
        ]))
        .render(layout[2], buf);

        let unanswered = self.answers.iter().filter(|a| a.is_none()).count();
        Paragraph::new(Line::from(vec![
            Span::styled("  Skipped:  ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{unanswered}"),
                Style::default().fg(if unanswered == 0 {
                    colors.success()
                } else {
                    colors.warning()
                }),
            ),
        ]))
        .render(layout[3], buf);

        let mut review: Vec<Line> = Vec::new();
        for (i, question) in self.quiz.questions.iter().enumerate() {
            let answer = self.answers.get(i).copied().flatten();
            let correct = answer.is_some_and(|a| question.is_correct(a));
            let (mark, color) = if correct {
                ("✓", colors.success())
            } else {
                ("✗", colors.error())
            };
            let given = match answer {
                Some(a) => format!("{})", option_label(a)),
                None => "-".to_string(),
            };
            review.push(Line::from(vec![
                Span::styled(format!("  {mark} Q{} ", i + 1), Style::default().fg(color)),
                Span::styled(question.prompt.as_str(), Style::default().fg(colors.fg())),
            ]));
            review.push(Line::from(Span::styled(
                format!(
                    "      yours {given}  answer {}) {}",
                    option_label(question.correct_index),
                    question.options[question.correct_index]
                ),
                Style::default().fg(colors.text_dim()),
            )));
            if !question.explanation.is_empty() {
                review.push(Line::from(Span::styled(
                    format!("      {}", question.explanation),
                    Style::default().fg(colors.text_dim()),
                )));
            }
        }
        Paragraph::new(review)
            .wrap(Wrap { trim: false })
            .render(layout[4], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  [r/Enter] Quiz list  ", Style::default().fg(colors.accent())),
            Span::styled("[h] History  ", Style::default().fg(colors.accent())),
            Span::styled("[q] Quit", Style::default().fg(colors.accent())),
        ]))
        .render(layout[5], buf);
    }
}
