//! Playback timeline widget: elapsed clock, progress bar, total clock.

use crate::theme::Theme;
use ratatui::{buffer::Buffer, layout::Rect, text::Span, widgets::Widget};

/// Horizontal playback bar
pub struct Timeline<'a> {
    /// Formatted elapsed time, e.g. "1:05"
    elapsed: &'a str,
    /// Formatted total time, e.g. "60:00"
    total: &'a str,
    /// Played fraction in `[0, 1]`
    fraction: f64,
    /// Whether the user is scrubbing (bar is drawn highlighted)
    scrubbing: bool,
    /// Whether the clock is advancing
    playing: bool,
    theme: &'a Theme,
}

impl<'a> Timeline<'a> {
    pub fn new(elapsed: &'a str, total: &'a str, fraction: f64, theme: &'a Theme) -> Self {
        Self {
            elapsed,
            total,
            fraction: fraction.clamp(0.0, 1.0),
            scrubbing: false,
            playing: false,
            theme,
        }
    }

    /// Draw the bar in its scrubbing style
    pub fn scrubbing(mut self, scrubbing: bool) -> Self {
        self.scrubbing = scrubbing;
        self
    }

    /// Show the play/pause marker
    pub fn playing(mut self, playing: bool) -> Self {
        self.playing = playing;
        self
    }
}

impl Widget for Timeline<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let marker = if self.playing { "▶" } else { "⏸" };
        let left = format!("{} {} ", marker, self.elapsed);
        let right = format!(" {}", self.total);

        let left_width = left.chars().count() as u16;
        let right_width = right.chars().count() as u16;
        if area.width <= left_width + right_width + 2 {
            // Too narrow for a bar; show the clocks only.
            let span = Span::styled(format!("{}/{}", self.elapsed, self.total), self.theme.dim_style());
            buf.set_span(area.x, area.y, &span, area.width);
            return;
        }

        let bar_width = (area.width - left_width - right_width) as usize;
        let filled = ((bar_width as f64) * self.fraction).round() as usize;
        let filled = filled.min(bar_width);

        let mut bar = String::with_capacity(bar_width * 3);
        for _ in 0..filled {
            bar.push('━');
        }
        for _ in filled..bar_width {
            bar.push('─');
        }

        let bar_style = if self.scrubbing {
            self.theme.warning_style()
        } else {
            self.theme.accent_style()
        };

        let mut x = area.x;
        let left_span = Span::styled(left, self.theme.dim_style());
        buf.set_span(x, area.y, &left_span, left_width);
        x += left_width;

        let bar_span = Span::styled(bar, bar_style);
        buf.set_span(x, area.y, &bar_span, bar_width as u16);
        x += bar_width as u16;

        let right_span = Span::styled(right, self.theme.dim_style());
        buf.set_span(x, area.y, &right_span, right_width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_is_clamped() {
        let theme = Theme::dark();
        let timeline = Timeline::new("0:00", "1:00", 3.0, &theme);
        assert_eq!(timeline.fraction, 1.0);
        let timeline = Timeline::new("0:00", "1:00", -1.0, &theme);
        assert_eq!(timeline.fraction, 0.0);
    }

    #[test]
    fn test_renders_into_buffer() {
        let theme = Theme::dark();
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        Timeline::new("1:05", "2:10", 0.5, &theme)
            .playing(true)
            .render(area, &mut buf);
        let row: String = (0..40).map(|x| buf[(x, 0)].symbol().to_string()).collect();
        assert!(row.contains("1:05"));
        assert!(row.contains("2:10"));
    }
}
