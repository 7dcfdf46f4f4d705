//! The conversational request client.
//!
//! Every operation is one self-contained round trip: mutate local state, draw,
//! call the service, fold the result back in, draw again. Operations take
//! `&mut self`, so a turn always finishes before the next one starts.

use anyhow::Result;
use tracing::{debug, error, info, warn};

use crate::api::{AssistantService, ChatRequest};
use crate::config::Config;
use crate::events::{ChatMode, ConversationSummary, ReminderFilter};
use crate::session::Session;
use crate::ui::history::Transcript;
use crate::ui::reminders::ReminderList;
use crate::ui::{Screen, View};

/// Shown in place of a reply when the chat call fails
pub const FALLBACK_REPLY: &str = "Oops! Something went wrong.";

pub struct ChatClient<S, V> {
    config: Config,
    service: S,
    view: V,
    session: Session,
    transcript: Transcript,
    filter: ReminderFilter,
    reminders: ReminderList,
    upcoming: ReminderList,
    conversation: Option<ConversationSummary>,
}

impl<S: AssistantService, V: View> ChatClient<S, V> {
    pub fn new(config: Config, service: S, view: V) -> Self {
        let session = Session::new(config.initial_mode());
        let transcript = Transcript::new(config.ui.max_messages);

        Self {
            config,
            service,
            view,
            session,
            transcript,
            filter: ReminderFilter::default(),
            reminders: ReminderList::default(),
            upcoming: ReminderList::default(),
            conversation: None,
        }
    }

    /// Redraw the view from current state
    pub fn render(&mut self) -> Result<()> {
        let screen = Screen {
            config: &self.config,
            mode: self.session.mode(),
            conversation_id: self.session.conversation_id(),
            transcript: &self.transcript,
            filter: self.filter,
            reminders: &self.reminders,
            upcoming: &self.upcoming,
            conversation: self.conversation.as_ref(),
        };
        self.view.render(&screen)
    }

    /// Initial load: side panels first, then a fresh greeting
    pub async fn start(&mut self) -> Result<()> {
        info!(endpoint = %self.config.base_url(), mode = ?self.session.mode(), "starting client");
        self.load_upcoming_reminders().await?;
        self.load_conversation().await?;
        self.load_reminders().await?;
        self.start_new_chat()
    }

    pub fn start_new_chat(&mut self) -> Result<()> {
        self.session.reset();
        self.conversation = None;
        self.transcript.reset_with_greeting(self.session.mode().greeting());
        self.render()
    }

    /// Send one chat turn. Blank input does nothing.
    pub async fn send_message(&mut self, text: &str) -> Result<()> {
        let message = text.trim();
        if message.is_empty() {
            return Ok(());
        }

        self.transcript.add_user_message(message.to_string());
        let turn = self.transcript.begin_turn();
        // the turn is resolved before a draw failure is reported
        let drawn = self.render();

        let mode = self.session.mode();
        let request = ChatRequest {
            message: message.to_string(),
            conversation_id: self.session.conversation_id().map(str::to_string),
        };
        debug!(?mode, conversation_id = ?request.conversation_id, "sending chat turn");

        let mut conversation_reported = false;
        let mut reminders_changed = false;
        match self.service.chat(mode, &request).await {
            Ok(reply) => {
                self.transcript.resolve(turn, reply.reply);
                // the panel's message count moves on every turn, even when the id does not
                conversation_reported = reply.conversation_id.as_deref().is_some_and(|id| !id.is_empty());
                if self.session.adopt_conversation(reply.conversation_id) {
                    debug!(conversation_id = ?self.session.conversation_id(), "conversation adopted");
                }
                reminders_changed = reply.reminders_changed;
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                self.transcript.resolve(turn, FALLBACK_REPLY.to_string());
            }
        }

        drawn?;
        self.render()?;

        if conversation_reported {
            self.load_conversation().await?;
        }
        if reminders_changed {
            self.load_reminders().await?;
            self.load_upcoming_reminders().await?;
        }
        Ok(())
    }

    /// Re-fetch the reminder list with the current filter and replace it wholesale
    pub async fn load_reminders(&mut self) -> Result<()> {
        if !self.config.supports_reminders {
            return Ok(());
        }

        match self.service.list_reminders(&self.filter).await {
            Ok(items) => {
                debug!(count = items.len(), filter = %self.filter.describe(), "reminders loaded");
                self.reminders.replace(items);
                self.render()
            }
            Err(e) => {
                error!(error = %e, "Error loading reminders");
                Ok(())
            }
        }
    }

    pub async fn set_filter(&mut self, filter: ReminderFilter) -> Result<()> {
        self.filter = filter;
        self.load_reminders().await
    }

    pub async fn load_upcoming_reminders(&mut self) -> Result<()> {
        if !self.config.supports_reminders {
            return Ok(());
        }

        match self.service.upcoming_reminders().await {
            Ok(items) => {
                debug!(count = items.len(), "upcoming reminders loaded");
                self.upcoming.replace(items);
                self.render()
            }
            Err(e) => {
                error!(error = %e, "Error loading upcoming reminders");
                Ok(())
            }
        }
    }

    /// Refresh the conversation panel for the active conversation, if any
    pub async fn load_conversation(&mut self) -> Result<()> {
        if !self.config.supports_conversations {
            return Ok(());
        }
        let Some(conversation_id) = self.session.conversation_id().map(str::to_string) else {
            return Ok(());
        };

        match self.service.conversation(&conversation_id).await {
            Ok(summary) => {
                self.conversation = Some(summary);
                self.render()
            }
            Err(e) => {
                error!(error = %e, conversation_id = %conversation_id, "Error fetching conversation");
                Ok(())
            }
        }
    }

    /// Mark a reminder done, then reload the list whatever the outcome
    pub async fn complete_reminder(&mut self, id: i64) -> Result<()> {
        if !self.config.supports_reminders {
            return Ok(());
        }
        match self.service.complete_reminder(id).await {
            Ok(()) => info!(id, "reminder completed"),
            Err(e) => error!(error = %e, id, "Error completing reminder"),
        }
        self.load_reminders().await
    }

    /// Delete a reminder, then reload the list whatever the outcome
    pub async fn delete_reminder(&mut self, id: i64) -> Result<()> {
        if !self.config.supports_reminders {
            return Ok(());
        }
        match self.service.delete_reminder(id).await {
            Ok(()) => info!(id, "reminder deleted"),
            Err(e) => error!(error = %e, id, "Error deleting reminder"),
        }
        self.load_reminders().await
    }

    /// Flip between reminder and general chat. Returns false when the backend
    /// has no general chat.
    pub async fn toggle_chat_mode(&mut self) -> Result<bool> {
        if !self.config.supports_general_chat {
            return Ok(false);
        }

        let mode = self.session.switch_mode();
        info!(?mode, "switched chat mode");
        self.conversation = None;
        self.transcript.reset_with_greeting(mode.greeting());
        self.render()?;

        if mode == ChatMode::Reminder {
            self.load_reminders().await?;
        }
        Ok(true)
    }

    /// Local notice, never sent to the service
    pub fn notice(&mut self, text: impl Into<String>) -> Result<()> {
        self.transcript.add_system_message(text.into());
        self.render()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn filter(&self) -> ReminderFilter {
        self.filter
    }

    pub fn reminders(&self) -> &ReminderList {
        &self.reminders
    }

    pub fn upcoming(&self) -> &ReminderList {
        &self.upcoming
    }

    #[allow(dead_code)]
    pub fn conversation(&self) -> Option<&ConversationSummary> {
        self.conversation.as_ref()
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    #[cfg(test)]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[cfg(test)]
    pub fn service(&self) -> &S {
        &self.service
    }
}
