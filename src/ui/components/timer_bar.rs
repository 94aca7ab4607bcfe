use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::layout::format_clock;
use crate::ui::theme::Theme;

/// Draining bar for the session countdown. Turns to the warning color in the
/// last fifth and to the error color in the last twentieth of the limit.
pub struct TimerBar<'a> {
    pub remaining_secs: u32,
    pub ratio: f64,
    pub theme: &'a Theme,
}

impl<'a> TimerBar<'a> {
    pub fn new(remaining_secs: u32, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            remaining_secs,
            ratio: ratio.clamp(0.0, 1.0),
            theme,
        }
    }
}

impl Widget for TimerBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Time left ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let fill = if self.ratio <= 0.05 {
            colors.error()
        } else if self.ratio <= 0.2 {
            colors.warning()
        } else {
            colors.bar_filled()
        };
        let filled_width = (self.ratio * inner.width as f64).round() as u16;
        let label = format_clock(self.remaining_secs);

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
