//! Text input widget

use crate::input::Action;
use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

/// Single-line text input widget
#[derive(Debug, Default)]
pub struct InputBox {
    /// Current input text
    content: String,
    /// Cursor position (character index, not byte index)
    cursor: usize,
    /// Horizontal scroll offset (in display width)
    scroll: usize,
    /// Placeholder text
    placeholder: String,
    /// Whether the input is focused
    focused: bool,
}

impl InputBox {
    /// Create a new input box
    pub fn new() -> Self {
        Self::default()
    }

    /// Set placeholder text
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Set focus state
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Replace the placeholder text
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) {
        self.placeholder = placeholder.into();
    }

    /// Get the current content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Clear the content
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Get the byte offset for the current cursor position
    fn cursor_byte_offset(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    /// Get the display width of text before the cursor
    fn cursor_display_width(&self) -> usize {
        self.content
            .chars()
            .take(self.cursor)
            .map(|c| c.to_string().width())
            .sum()
    }

    /// Delete the character right before the cursor
    fn delete_before_cursor(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let start = self.cursor_byte_offset();
        let end = self.content[start..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| start + i)
            .unwrap_or(self.content.len());
        self.content.drain(start..end);
        true
    }

    /// Handle an input action. Returns true if the widget consumed it.
    pub fn handle_action(&mut self, action: &Action, width: u16) -> bool {
        let char_count = self.content.chars().count();

        let consumed = match action {
            Action::Char(c) => {
                self.insert_char(*c);
                true
            }
            Action::Backspace => self.delete_before_cursor(),
            Action::Delete => {
                if self.cursor < char_count {
                    self.cursor += 1;
                    self.delete_before_cursor()
                } else {
                    false
                }
            }
            Action::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    true
                } else {
                    false
                }
            }
            Action::Right => {
                if self.cursor < char_count {
                    self.cursor += 1;
                    true
                } else {
                    false
                }
            }
            Action::Home => {
                self.cursor = 0;
                true
            }
            Action::End => {
                self.cursor = char_count;
                true
            }
            Action::ClearLine => {
                self.clear();
                true
            }
            Action::DeleteWord => {
                let chars: Vec<char> = self.content.chars().collect();
                let mut target = self.cursor;
                while target > 0 && chars.get(target - 1) == Some(&' ') {
                    target -= 1;
                }
                while target > 0 && chars.get(target - 1) != Some(&' ') {
                    target -= 1;
                }
                let start = self
                    .content
                    .char_indices()
                    .nth(target)
                    .map(|(i, _)| i)
                    .unwrap_or(self.content.len());
                let end = self.cursor_byte_offset();
                self.content.drain(start..end);
                self.cursor = target;
                true
            }
            Action::Paste(text) => {
                for c in text.chars() {
                    // Single-line input: newlines become spaces
                    if c == '\n' || c == '\r' {
                        if !self.content.ends_with(' ') && self.cursor > 0 {
                            self.insert_char(' ');
                        }
                    } else {
                        self.insert_char(c);
                    }
                }
                true
            }
            _ => false,
        };

        if consumed {
            self.update_scroll(width as usize);
        }
        consumed
    }

    fn insert_char(&mut self, c: char) {
        let byte_offset = self.cursor_byte_offset();
        self.content.insert(byte_offset, c);
        self.cursor += 1;
    }

    fn update_scroll(&mut self, width: usize) {
        let visible_width = width.saturating_sub(4); // Account for borders/padding
        let cursor_pos = self.cursor_display_width();

        if cursor_pos < self.scroll {
            self.scroll = cursor_pos;
        } else if cursor_pos >= self.scroll + visible_width {
            self.scroll = cursor_pos - visible_width + 1;
        }
    }

    /// Render the input box
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if self.focused {
                theme.accent_style()
            } else {
                theme.border_style()
            });

        let inner = block.inner(area);
        block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.content.is_empty() {
            let span = ratatui::text::Span::styled(self.placeholder.clone(), theme.dim_style());
            buf.set_span(inner.x, inner.y, &span, inner.width);
            return;
        }

        // Window the content to the visible width starting at the scroll
        // offset, measured in display columns.
        let visible_width = inner.width as usize;
        let mut skipped = 0;
        let mut visible = String::new();
        let mut used = 0;
        for c in self.content.chars() {
            let w = c.to_string().width();
            if skipped < self.scroll {
                skipped += w;
                continue;
            }
            if used + w > visible_width {
                break;
            }
            visible.push(c);
            used += w;
        }

        let span = ratatui::text::Span::styled(visible, theme.base_style());
        buf.set_span(inner.x, inner.y, &span, inner.width);

        // Cursor cell
        if self.focused {
            let cursor_col = self.cursor_display_width().saturating_sub(self.scroll);
            if (cursor_col as u16) < inner.width {
                let x = inner.x + cursor_col as u16;
                buf[(x, inner.y)].set_style(
                    ratatui::style::Style::default()
                        .add_modifier(ratatui::style::Modifier::REVERSED),
                );
            }
        }
    }
}
