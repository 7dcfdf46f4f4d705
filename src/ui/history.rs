//! Chat transcript model and its display widget

use crate::events::Sender;
use chrono::{DateTime, Local};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use std::collections::VecDeque;

pub const PLACEHOLDER_TEXT: &str = "Thinking...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Final,
    /// Stands in for an assistant reply that has not arrived yet
    Placeholder,
}

/// A single message in the transcript
#[derive(Debug, Clone)]
pub struct ChatMessage {
    id: u64,
    pub sender: Sender,
    pub text: String,
    pub kind: MessageKind,
    pub timestamp: DateTime<Local>,
}

/// Proof that a placeholder is on screen. Consumed by exactly one
/// [`Transcript::resolve`] call, which takes the placeholder down.
#[must_use = "a pending turn has to be resolved or its placeholder stays on screen"]
#[derive(Debug)]
pub struct PendingTurn {
    placeholder_id: u64,
}

/// Ordered, capped list of messages shown to the user
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: VecDeque<ChatMessage>,
    max_messages: usize,
    next_id: u64,
}

impl Transcript {
    pub fn new(max_messages: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            // a turn needs room for the user line and its placeholder
            max_messages: max_messages.max(2),
            next_id: 0,
        }
    }

    fn push(&mut self, sender: Sender, text: String, kind: MessageKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push_back(ChatMessage {
            id,
            sender,
            text,
            kind,
            timestamp: Local::now(),
        });

        while self.messages.len() > self.max_messages {
            self.messages.pop_front();
        }
        id
    }

    pub fn add_user_message(&mut self, text: String) {
        self.push(Sender::User, text, MessageKind::Final);
    }

    pub fn add_assistant_message(&mut self, text: String) {
        self.push(Sender::Assistant, text, MessageKind::Final);
    }

    pub fn add_system_message(&mut self, text: String) {
        self.push(Sender::System, text, MessageKind::Final);
    }

    /// Show the "Thinking..." placeholder for the turn that is about to go out
    pub fn begin_turn(&mut self) -> PendingTurn {
        debug_assert!(!self.has_placeholder(), "previous turn was never resolved");
        let placeholder_id = self.push(
            Sender::Assistant,
            PLACEHOLDER_TEXT.to_string(),
            MessageKind::Placeholder,
        );
        PendingTurn { placeholder_id }
    }

    /// Take the placeholder down and put the final assistant text in its place
    pub fn resolve(&mut self, turn: PendingTurn, text: String) {
        self.messages.retain(|m| m.id != turn.placeholder_id);
        self.add_assistant_message(text);
    }

    /// Replace everything with a single assistant greeting
    pub fn reset_with_greeting(&mut self, greeting: &str) {
        self.messages.clear();
        self.add_assistant_message(greeting.to_string());
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn has_placeholder(&self) -> bool {
        self.messages.iter().any(|m| m.kind == MessageKind::Placeholder)
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.back()
    }

    /// Render every message into display lines for the given width
    pub fn lines(&self, width: u16, show_timestamps: bool) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for message in &self.messages {
            lines.extend(render_message(message, width, show_timestamps));
            lines.push(Line::from(""));
        }
        lines
    }
}

fn render_message(message: &ChatMessage, width: u16, show_timestamps: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    let mut header = vec![Span::styled(
        message.sender.label().to_string(),
        header_style(message.sender),
    )];
    if show_timestamps {
        header.push(Span::styled(
            format!(" {}", message.timestamp.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(header));

    let body_style = match message.kind {
        MessageKind::Placeholder => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
        MessageKind::Final => content_style(message.sender),
    };

    for content_line in wrap_text(&message.text, width.saturating_sub(2) as usize) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(content_line, body_style),
        ]));
    }

    lines
}

/// Wrap text to fit within the given width, keeping explicit line breaks
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current_line = String::new();
        let mut current_width = 0;

        for word in paragraph.split_whitespace() {
            let word_width = word.chars().count();
            if current_width > 0 && current_width + 1 + word_width > width {
                lines.push(std::mem::take(&mut current_line));
                current_width = 0;
            }
            if current_width > 0 {
                current_line.push(' ');
                current_width += 1;
            }
            current_line.push_str(word);
            current_width += word_width;
        }

        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn header_style(sender: Sender) -> Style {
    let color = match sender {
        Sender::User => Color::Blue,
        Sender::Assistant => Color::Green,
        Sender::System => Color::Yellow,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn content_style(sender: Sender) -> Style {
    match sender {
        Sender::User => Style::default().fg(Color::White),
        Sender::Assistant => Style::default().fg(Color::Green),
        Sender::System => Style::default().fg(Color::Yellow),
    }
}

/// Transcript pane, pinned to the newest lines
pub struct TranscriptView<'a> {
    pub transcript: &'a Transcript,
    pub title: String,
    pub show_timestamps: bool,
}

impl Widget for TranscriptView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title(self.title);
        let inner_area = block.inner(area);
        block.render(area, buf);

        let all_lines = self.transcript.lines(inner_area.width, self.show_timestamps);
        let height = inner_area.height as usize;
        let start = all_lines.len().saturating_sub(height);

        for (i, line) in all_lines[start..].iter().enumerate() {
            buf.set_line(inner_area.x, inner_area.y + i as u16, line, inner_area.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_swaps_placeholder_for_reply() {
        let mut transcript = Transcript::new(10);
        transcript.add_user_message("hi".to_string());
        let turn = transcript.begin_turn();
        assert!(transcript.has_placeholder());
        assert_eq!(transcript.len(), 2);

        transcript.resolve(turn, "hello".to_string());
        assert!(!transcript.has_placeholder());
        assert_eq!(transcript.len(), 2);
        let last = transcript.last().unwrap();
        assert_eq!(last.sender, Sender::Assistant);
        assert_eq!(last.text, "hello");
    }

    #[test]
    fn cap_drops_oldest_messages() {
        let mut transcript = Transcript::new(3);
        for i in 0..5 {
            transcript.add_user_message(format!("m{}", i));
        }
        let texts: Vec<_> = transcript.messages().map(|m| m.text.clone()).collect();
        assert_eq!(texts, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn tiny_cap_still_fits_a_turn() {
        let mut transcript = Transcript::new(1);
        transcript.add_user_message("question".to_string());
        let turn = transcript.begin_turn();
        assert_eq!(transcript.messages().next().unwrap().text, "question");
        transcript.resolve(turn, "answer".to_string());
        assert!(!transcript.has_placeholder());
    }

    #[test]
    fn greeting_replaces_everything() {
        let mut transcript = Transcript::new(10);
        transcript.add_user_message("a".to_string());
        transcript.add_assistant_message("b".to_string());
        transcript.reset_with_greeting("welcome");
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.last().unwrap().text, "welcome");
    }

    #[test]
    fn wrap_text_respects_width_and_newlines() {
        assert_eq!(
            wrap_text("one two three\nfour", 7),
            vec!["one two", "three", "four"]
        );
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn placeholder_renders_thinking_text() {
        let mut transcript = Transcript::new(10);
        let _turn = transcript.begin_turn();
        let rendered: Vec<String> = transcript
            .lines(40, false)
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(rendered[0], "Assistant");
        assert_eq!(rendered[1], "  Thinking...");
    }
}
