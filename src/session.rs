use crate::events::ChatMode;

/// Client-side session state for the current chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    conversation_id: Option<String>,
    mode: ChatMode,
}

impl Session {
    pub fn new(mode: ChatMode) -> Self {
        Self {
            conversation_id: None,
            mode,
        }
    }

    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    /// Adopt the id the service assigned. Returns true when it changed.
    pub fn adopt_conversation(&mut self, conversation_id: Option<String>) -> bool {
        match conversation_id {
            Some(id) if !id.is_empty() && self.conversation_id.as_deref() != Some(id.as_str()) => {
                self.conversation_id = Some(id);
                true
            }
            _ => false,
        }
    }

    /// Forget the conversation and start over in the same mode
    pub fn reset(&mut self) {
        self.conversation_id = None;
    }

    /// Flip the mode; the conversation belongs to the old mode and is dropped
    pub fn switch_mode(&mut self) -> ChatMode {
        self.mode = self.mode.toggled();
        self.reset();
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adopts_first_conversation_id() {
        let mut session = Session::new(ChatMode::Reminder);
        assert!(session.adopt_conversation(Some("abc".to_string())));
        assert_eq!(session.conversation_id(), Some("abc"));
        assert!(!session.adopt_conversation(Some("abc".to_string())));
        assert!(!session.adopt_conversation(None));
        assert_eq!(session.conversation_id(), Some("abc"));
    }

    #[test]
    fn ignores_empty_conversation_id() {
        let mut session = Session::new(ChatMode::Reminder);
        assert!(!session.adopt_conversation(Some(String::new())));
        assert_eq!(session.conversation_id(), None);
    }

    #[test]
    fn switching_mode_clears_conversation() {
        let mut session = Session::new(ChatMode::Reminder);
        session.adopt_conversation(Some("abc".to_string()));
        assert_eq!(session.switch_mode(), ChatMode::GeneralChat);
        assert_eq!(session.conversation_id(), None);
    }
}
