use std::collections::HashMap;

use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::bank::QuestionBank;
use crate::bank::model::DifficultyTier;
use crate::engine::stats::QuizSummary;
use crate::ui::layout::format_clock;
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub quiz_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tier: DifficultyTier,
    pub question_count: usize,
}

/// Quiz picker, grouped by category in bank order.
pub struct QuizMenu {
    pub items: Vec<MenuItem>,
    pub selected: usize,
}

impl QuizMenu {
    pub fn new(bank: &QuestionBank) -> Self {
        let mut items = Vec::new();
        for category in bank.categories() {
            for quiz in bank.by_category(category) {
                items.push(MenuItem {
                    quiz_id: quiz.id.clone(),
                    title: quiz.title.clone(),
                    description: quiz.description.clone(),
                    category: quiz.category.clone(),
                    tier: quiz.tier,
                    question_count: quiz.len(),
                });
            }
        }
        Self { items, selected: 0 }
    }

    pub fn next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len().saturating_sub(1);
        }
    }

    pub fn selected_quiz_id(&self) -> Option<&str> {
        self.items.get(self.selected).map(|i| i.quiz_id.as_str())
    }

    pub fn select_quiz(&mut self, quiz_id: &str) -> bool {
        match self.items.iter().position(|i| i.quiz_id == quiz_id) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }
}

pub struct QuizMenuView<'a> {
    pub menu: &'a QuizMenu,
    pub summaries: &'a HashMap<String, QuizSummary>,
    pub theme: &'a Theme,
}

impl<'a> QuizMenuView<'a> {
    pub fn new(
        menu: &'a QuizMenu,
        summaries: &'a HashMap<String, QuizSummary>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            menu,
            summaries,
            theme,
        }
    }
}

impl Widget for QuizMenuView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "quizclock",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Pick a quiz. The clock starts when you do.",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        if self.menu.items.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "  No quizzes found.",
                Style::default().fg(colors.text_dim()),
            )))
            .render(layout[1], buf);
            return;
        }

        let mut lines: Vec<Line> = Vec::new();
        let mut selected_line = 0;
        let mut current_category: Option<&str> = None;

        for (i, item) in self.menu.items.iter().enumerate() {
            if current_category != Some(item.category.as_str()) {
                current_category = Some(item.category.as_str());
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    format!(" {}", item.category.to_uppercase()),
                    Style::default()
                        .fg(colors.text_dim())
                        .add_modifier(Modifier::BOLD),
                )));
            }

            let is_selected = i == self.menu.selected;
            if is_selected {
                selected_line = lines.len();
            }
            let indicator = if is_selected { ">" } else { " " };
            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let mut label = vec![
                Span::styled(format!(" {indicator} {}", item.title), label_style),
                Span::styled(
                    format!(
                        "  {} · {} questions · {}",
                        item.tier.label(),
                        item.question_count,
                        format_clock(item.tier.time_limit_secs())
                    ),
                    Style::default().fg(colors.text_dim()),
                ),
            ];
            if let Some(summary) = self.summaries.get(&item.quiz_id) {
                label.push(Span::styled(
                    format!("  best {}%", summary.best_percent),
                    Style::default().fg(colors.score(summary.best_percent)),
                ));
            }
            lines.push(Line::from(label));
            lines.push(Line::from(Span::styled(
                format!("     {}", item.description),
                Style::default().fg(colors.text_dim()),
            )));
        }

        // Keep the selected entry and its description on screen.
        let height = layout[1].height as usize;
        let scroll = (selected_line + 2).saturating_sub(height);
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(layout[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_wraps_in_both_directions() {
        let bank = QuestionBank::embedded().unwrap();
        let mut menu = QuizMenu::new(&bank);
        assert_eq!(menu.items.len(), bank.len());
        menu.prev();
        assert_eq!(menu.selected, menu.items.len() - 1);
        menu.next();
        assert_eq!(menu.selected, 0);
    }

    #[test]
    fn select_quiz_by_id() {
        let bank = QuestionBank::embedded().unwrap();
        let mut menu = QuizMenu::new(&bank);
        let last_id = menu.items.last().unwrap().quiz_id.clone();
        assert!(menu.select_quiz(&last_id));
        assert_eq!(menu.selected_quiz_id(), Some(last_id.as_str()));
        assert!(!menu.select_quiz("no-such-quiz"));
    }
}
