use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Internal application events produced by the composer and consumed by the app loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Send a chat message to the backend
    SendMessage(String),

    /// Flip between reminder and general chat
    ToggleMode,

    /// Drop the conversation and show the greeting again
    NewChat,

    /// Re-fetch the filtered reminder list
    ReloadReminders,

    /// Re-fetch the upcoming reminders
    ReloadUpcoming,

    /// Mark a reminder as completed
    CompleteReminder(i64),

    /// Delete a reminder
    DeleteReminder(i64),

    /// Change the date filter (None clears it)
    SetDateFilter(Option<NaiveDate>),

    /// Show or hide completed reminders
    SetShowCompleted(bool),

    /// Show the slash command help
    ShowHelp,

    /// Show a local notice in the transcript
    Notice(String),

    /// Request to exit the application
    ExitRequest,
}

/// Which backend persona handles chat turns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChatMode {
    /// Reminder assistant, can create and list reminders
    #[default]
    Reminder,
    /// General purpose chat
    GeneralChat,
}

impl ChatMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            ChatMode::Reminder => "Reminders",
            ChatMode::GeneralChat => "General chat",
        }
    }

    /// Fixed greeting shown when a transcript is (re)started in this mode
    pub fn greeting(&self) -> &'static str {
        match self {
            ChatMode::Reminder => {
                "Hello! I'm your reminder assistant. Try saying:\n\
                 • \"Remind me to call mom tomorrow\"\n\
                 • \"Show me all my reminders\"\n\
                 • \"What do I have coming up?\""
            }
            ChatMode::GeneralChat => {
                "Hello! I'm in general chat mode. Ask me anything, for example:\n\
                 • \"What's the capital of France?\"\n\
                 • \"Tell me a joke\""
            }
        }
    }

    pub fn toggled(&self) -> ChatMode {
        match self {
            ChatMode::Reminder => ChatMode::GeneralChat,
            ChatMode::GeneralChat => ChatMode::Reminder,
        }
    }
}

/// Who wrote a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    User,
    Assistant,
    /// Local notices, never part of a chat turn
    System,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "Assistant",
            Sender::System => "System",
        }
    }
}

/// Reminder priority as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    Medium,
    High,
    #[serde(other)]
    Unknown,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Unknown => "?",
        }
    }
}

/// Server-owned reminder record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub date: String,
    pub message: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Filter applied when loading the reminder list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReminderFilter {
    pub date: Option<NaiveDate>,
    pub completed: bool,
}

impl ReminderFilter {
    pub fn describe(&self) -> String {
        let state = if self.completed { "completed" } else { "open" };
        match self.date {
            Some(date) => format!("{} on {}", state, date.format("%Y-%m-%d")),
            None => state.to_string(),
        }
    }
}

/// Metadata about the active backend conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub conversation_id: String,
    pub message_count: usize,
}

impl ConversationSummary {
    /// Short label used in the conversation panel
    pub fn label(&self) -> String {
        let short: String = self.conversation_id.chars().take(8).collect();
        format!("Conversation {}...", short)
    }
}
