//! Terminal presentation: transcript, side panels, composer and slash commands

pub mod commands;
pub mod composer;
pub mod history;
pub mod reminders;
pub mod terminal;

use anyhow::Result;

use crate::config::Config;
use crate::events::{ChatMode, ConversationSummary, ReminderFilter};
use history::Transcript;
use reminders::ReminderList;

pub use commands::get_help_text;
pub use composer::ComposerResult;
pub use terminal::TerminalView;

/// Everything a view needs to draw one frame
pub struct Screen<'a> {
    pub config: &'a Config,
    pub mode: ChatMode,
    pub conversation_id: Option<&'a str>,
    pub transcript: &'a Transcript,
    pub filter: ReminderFilter,
    pub reminders: &'a ReminderList,
    pub upcoming: &'a ReminderList,
    pub conversation: Option<&'a ConversationSummary>,
}

/// Output surface the client draws onto after every state change
pub trait View {
    fn render(&mut self, screen: &Screen<'_>) -> Result<()>;
}

/// View for one-shot commands, which print the final state themselves
pub struct NullView;

impl View for NullView {
    fn render(&mut self, _screen: &Screen<'_>) -> Result<()> {
        Ok(())
    }
}
