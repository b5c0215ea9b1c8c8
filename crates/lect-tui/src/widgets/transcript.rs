//! Transcript widget for displaying the question/answer exchange

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

/// A single rendered transcript entry
#[derive(Debug, Clone)]
pub struct TranscriptEntry {
    /// Display name of the speaker
    pub speaker: String,
    /// Message content (plain text)
    pub content: String,
    /// Whether this entry came from the local user
    pub is_user: bool,
    /// Whether this entry describes a failure
    pub is_error: bool,
}

impl TranscriptEntry {
    /// Create a user entry
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            speaker: "You".to_string(),
            content: content.into(),
            is_user: true,
            is_error: false,
        }
    }

    /// Create an assistant entry
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            speaker: "Assistant".to_string(),
            content: content.into(),
            is_user: false,
            is_error: false,
        }
    }

    /// Mark this entry as a failure description
    pub fn with_error(mut self) -> Self {
        self.is_error = true;
        self
    }
}

/// Widget for displaying the session transcript
pub struct Transcript<'a> {
    entries: &'a [TranscriptEntry],
    theme: &'a Theme,
    scroll: usize,
}

impl<'a> Transcript<'a> {
    /// Create a new transcript view
    pub fn new(entries: &'a [TranscriptEntry], theme: &'a Theme) -> Self {
        Self {
            entries,
            theme,
            scroll: 0,
        }
    }

    /// Set scroll offset (in rendered lines from the top)
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn render_entry(&self, entry: &TranscriptEntry, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let (prefix, header_style) = if entry.is_user {
            ("▶ ", self.theme.accent_bold())
        } else {
            ("◀ ", self.theme.success_style())
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", prefix, entry.speaker),
            header_style,
        )));

        let content_style = if entry.is_error {
            self.theme.error_style()
        } else {
            self.theme.base_style()
        };

        let content_width = width.saturating_sub(2).max(1);
        for wrapped in textwrap::wrap(&entry.content, content_width) {
            lines.push(Line::from(Span::styled(
                format!("  {}", wrapped),
                content_style,
            )));
        }

        // Blank line between entries
        lines.push(Line::from(""));

        lines
    }
}

impl Widget for Transcript<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        let mut all_lines: Vec<Line> = Vec::new();
        for entry in self.entries {
            all_lines.extend(self.render_entry(entry, width));
        }

        let visible: Vec<Line> = all_lines
            .into_iter()
            .skip(self.scroll)
            .take(area.height as usize)
            .collect();

        Paragraph::new(visible)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Total rendered height of the transcript at the given width, for scroll
/// bookkeeping. Must match the rendering logic above.
pub fn transcript_height(entries: &[TranscriptEntry], width: usize) -> usize {
    let content_width = width.saturating_sub(2).max(1);
    entries
        .iter()
        .map(|entry| 2 + textwrap::wrap(&entry.content, content_width).len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_height_counts_header_and_separator() {
        let entries = vec![TranscriptEntry::user("hi")];
        // header + one content line + blank separator
        assert_eq!(transcript_height(&entries, 40), 3);
    }

    #[test]
    fn test_transcript_height_wraps_long_content() {
        let entries = vec![TranscriptEntry::assistant("word ".repeat(20))];
        assert!(transcript_height(&entries, 20) > 3);
    }
}
