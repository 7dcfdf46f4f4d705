//! Reminder, upcoming and conversation side panels

use crate::events::{ConversationSummary, Priority, Reminder};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub const NO_REMINDERS: &str = "No reminders found";
pub const NO_UPCOMING: &str = "No upcoming reminders";
pub const NO_CONVERSATION: &str = "No active conversation";

/// A list fetched from the service. `None` until the first successful load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderList {
    items: Option<Vec<Reminder>>,
}

impl ReminderList {
    /// Throw away whatever was shown and show `items` instead
    pub fn replace(&mut self, items: Vec<Reminder>) {
        self.items = Some(items);
    }

    pub fn items(&self) -> &[Reminder] {
        self.items.as_deref().unwrap_or(&[])
    }

    pub fn is_loaded(&self) -> bool {
        self.items.is_some()
    }
}

fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Normal => Style::default().fg(Color::White),
        Priority::Low | Priority::Unknown => Style::default().fg(Color::Gray),
    }
}

/// One row for the full reminder list
pub fn reminder_line(reminder: &Reminder) -> Line<'static> {
    let mut style = priority_style(reminder.priority);
    if reminder.completed {
        style = style.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
    }
    let marker = if reminder.completed { "✓ " } else { "  " };

    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Green)),
        Span::styled(format!("#{} ", reminder.id), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{} ", reminder.date), Style::default().fg(Color::Cyan)),
        Span::styled(format!("[{}] ", reminder.priority.as_str()), style),
        Span::styled(reminder.message.clone(), style),
    ])
}

/// One row for the upcoming list, which has no actions and so no id
pub fn upcoming_line(reminder: &Reminder) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{} ", reminder.date), Style::default().fg(Color::Cyan)),
        Span::styled(reminder.message.clone(), priority_style(reminder.priority)),
    ])
}

/// Lines for a loaded list, or the fixed empty-state text
pub fn list_lines(
    list: &ReminderList,
    empty_text: &str,
    row: fn(&Reminder) -> Line<'static>,
) -> Vec<Line<'static>> {
    if !list.is_loaded() {
        return vec![Line::from(Span::styled(
            "Loading...",
            Style::default().fg(Color::DarkGray),
        ))];
    }
    if list.items().is_empty() {
        return vec![Line::from(Span::styled(
            empty_text.to_string(),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        ))];
    }
    list.items().iter().map(row).collect()
}

pub fn conversation_lines(summary: Option<&ConversationSummary>) -> Vec<Line<'static>> {
    match summary {
        Some(summary) => vec![
            Line::from(Span::styled(
                summary.label(),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{} messages", summary.message_count)),
        ],
        None => vec![Line::from(Span::styled(
            NO_CONVERSATION,
            Style::default().fg(Color::DarkGray),
        ))],
    }
}

/// Bordered panel around pre-rendered lines
pub struct Panel {
    pub title: String,
    pub lines: Vec<Line<'static>>,
}

impl Widget for Panel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(self.lines)
            .block(Block::default().borders(Borders::ALL).title(self.title))
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
