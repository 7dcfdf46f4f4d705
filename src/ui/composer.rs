use crate::events::ChatMode;
use crate::ui::commands::{parse_slash_command, ParsedCommand};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};

/// Result returned when the user interacts with the composer
#[derive(Debug, PartialEq)]
pub enum ComposerResult {
    Submitted(String),
    Command(ParsedCommand),
    /// A slash-prefixed line that matched no command
    UnknownCommand(String),
    None,
}

/// Single-line input editor. The cursor is a char index, not a byte index.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    content: String,
    cursor: usize,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle key input
    pub fn handle_key(&mut self, key: KeyEvent) -> ComposerResult {
        if key.kind != KeyEventKind::Press {
            return ComposerResult::None;
        }

        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let at = self.byte_index(self.cursor);
                self.content.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.content.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.char_count() {
                    let at = self.byte_index(self.cursor);
                    self.content.remove(at);
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.char_count());
            }
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.char_count(),
            KeyCode::Esc => self.clear(),
            _ => {}
        }

        ComposerResult::None
    }

    fn submit(&mut self) -> ComposerResult {
        if self.content.trim().is_empty() {
            return ComposerResult::None;
        }

        let content = std::mem::take(&mut self.content);
        self.cursor = 0;

        if content.trim_start().starts_with('/') {
            return match parse_slash_command(&content) {
                Some(command) => ComposerResult::Command(command),
                None => ComposerResult::UnknownCommand(content.trim().to_string()),
            };
        }
        ComposerResult::Submitted(content)
    }

    fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }
}

/// Composer drawn with a mode-specific title and placeholder
pub struct ComposerView<'a> {
    pub composer: &'a Composer,
    pub mode: ChatMode,
}

impl Widget for ComposerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.mode {
            ChatMode::Reminder => "Reminders - Enter to send, /help for commands",
            ChatMode::GeneralChat => "General chat - Enter to send, /help for commands",
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(Color::Green));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let line = if self.composer.content().is_empty() {
            let placeholder = match self.mode {
                ChatMode::Reminder => "Remind me to call mom tomorrow...",
                ChatMode::GeneralChat => "Ask me anything...",
            };
            Line::from(vec![
                Span::styled("▌", Style::default().fg(Color::Yellow)),
                Span::styled(placeholder, Style::default().fg(Color::DarkGray)),
            ])
        } else {
            let at = self.composer.byte_index(self.composer.cursor);
            let (before, after) = self.composer.content().split_at(at);
            Line::from(vec![
                Span::raw(before.to_string()),
                Span::styled("▌", Style::default().fg(Color::Yellow)),
                Span::raw(after.to_string()),
            ])
        };
        buf.set_line(inner_area.x, inner_area.y, &line, inner_area.width);
    }
}
