use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::stats;
use crate::store::schema::ResultRecord;
use crate::ui::theme::Theme;

const MAX_ROWS: usize = 200;

pub struct HistoryTable<'a> {
    history: &'a [ResultRecord],
    selected: usize,
    theme: &'a Theme,
}

impl<'a> HistoryTable<'a> {
    pub fn new(history: &'a [ResultRecord], selected: usize, theme: &'a Theme) -> Self {
        Self {
            history,
            selected,
            theme,
        }
    }
}

impl Widget for HistoryTable<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let average = stats::average_percent(self.history)
            .map(|a| format!(" avg {a:.0}% "))
            .unwrap_or_default();
        let block = Block::bordered()
            .title(Line::from(Span::styled(
                " Recent Results ",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )))
            .title_bottom(Line::from(average))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                "   #   Score  Correct  Date         Tier          Quiz",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "  ─────────────────────────────────────────────────────────────",
                Style::default().fg(colors.border()),
            )),
        ];

        if self.history.is_empty() {
            lines.push(Line::from(Span::styled(
                "  No results yet. Finish a quiz to see it here.",
                Style::default().fg(colors.text_dim()),
            )));
        }

        let total = self.history.len();
        for (i, record) in self.history.iter().rev().take(MAX_ROWS).enumerate() {
            let pct = record.result.score_percent;
            let timeout = if record.result.timed_out { "⏱" } else { " " };
            let row = format!(
                " {timeout}{idx:>3}  {pct:>4}%  {correct:>3}/{total_q:<3}  {date}  {tier:<12}  {quiz}",
                idx = total - i,
                correct = record.result.correct_count,
                total_q = record.result.total_questions,
                date = record.recorded_at.format("%m/%d %H:%M"),
                tier = record.tier.label(),
                quiz = record.quiz_id,
            );
            let style = if i == self.selected {
                Style::default()
                    .fg(colors.score(pct))
                    .bg(colors.accent_dim())
            } else {
                Style::default().fg(colors.score(pct))
            };
            lines.push(Line::from(Span::styled(row, style)));
        }

        // Two header lines sit above the rows.
        let visible_rows = (inner.height as usize).saturating_sub(2);
        let scroll = (self.selected + 1).saturating_sub(visible_rows);
        Paragraph::new(lines)
            .scroll((scroll as u16, 0))
            .render(inner, buf);
    }
}
