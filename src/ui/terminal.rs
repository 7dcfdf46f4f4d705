//! Full-screen ratatui view

use anyhow::{Context, Result};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};

use crate::ui::composer::{Composer, ComposerView};
use crate::ui::history::TranscriptView;
use crate::ui::reminders::{
    conversation_lines, list_lines, reminder_line, upcoming_line, Panel, NO_REMINDERS, NO_UPCOMING,
};
use crate::ui::{Screen, View};

/// Draws the whole screen on every state change. Owns the composer so typed
/// text survives redraws triggered by the client.
pub struct TerminalView<B: Backend> {
    terminal: Terminal<B>,
    composer: Composer,
}

impl<B: Backend> TerminalView<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            composer: Composer::new(),
        }
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    /// Give the terminal back for teardown
    pub fn into_terminal(self) -> Terminal<B> {
        self.terminal
    }
}

impl<B: Backend> View for TerminalView<B> {
    fn render(&mut self, screen: &Screen<'_>) -> Result<()> {
        let composer = &self.composer;
        self.terminal
            .draw(|frame| draw(frame, screen, composer))
            .context("Failed to draw terminal")?;
        Ok(())
    }
}

fn draw(frame: &mut Frame, screen: &Screen<'_>, composer: &Composer) {
    let area = frame.size();
    let show_side = screen.config.supports_reminders || screen.config.supports_conversations;

    let columns = if show_side {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(area)
    };

    let chat = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(3)])
        .split(columns[0]);

    let mut title = format!("Assistant - {}", screen.mode.display_name());
    if screen.conversation_id.is_some() {
        title.push_str(" - Ongoing conversation");
    }

    frame.render_widget(
        TranscriptView {
            transcript: screen.transcript,
            title,
            show_timestamps: screen.config.ui.show_timestamps,
        },
        chat[0],
    );
    frame.render_widget(
        ComposerView {
            composer,
            mode: screen.mode,
        },
        chat[1],
    );

    if show_side {
        draw_side_panels(frame, screen, columns[1]);
    }
}

fn draw_side_panels(frame: &mut Frame, screen: &Screen<'_>, area: Rect) {
    let mut constraints = Vec::new();
    if screen.config.supports_reminders {
        constraints.push(Constraint::Percentage(30));
        constraints.push(Constraint::Min(5));
    }
    if screen.config.supports_conversations {
        constraints.push(Constraint::Length(4));
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = 0;
    if screen.config.supports_reminders {
        frame.render_widget(
            Panel {
                title: "Upcoming".to_string(),
                lines: list_lines(screen.upcoming, NO_UPCOMING, upcoming_line),
            },
            rows[next],
        );
        frame.render_widget(
            Panel {
                title: format!("Reminders ({})", screen.filter.describe()),
                lines: list_lines(screen.reminders, NO_REMINDERS, reminder_line),
            },
            rows[next + 1],
        );
        next += 2;
    }
    if screen.config.supports_conversations {
        frame.render_widget(
            Panel {
                title: "Conversation".to_string(),
                lines: conversation_lines(screen.conversation),
            },
            rows[next],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{reminder, reply, FakeService};
    use crate::client::ChatClient;
    use crate::config::{Config, Profile};
    use ratatui::backend::TestBackend;

    type TestClient = ChatClient<FakeService, TerminalView<TestBackend>>;

    fn client(config: Config) -> TestClient {
        let terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        ChatClient::new(config, FakeService::default(), TerminalView::new(terminal))
    }

    fn screen_text(client: &TestClient) -> String {
        let buffer = client.view().terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer.get(x, y).symbol());
            }
            text.push('\n');
        }
        text
    }

    #[tokio::test]
    async fn empty_lists_show_empty_text() {
        let mut client = client(Config::default());
        client.start().await.unwrap();
        let text = screen_text(&client);
        assert!(text.contains(NO_REMINDERS));
        assert!(text.contains(NO_UPCOMING));
        assert!(!text.contains("#1 "));
    }

    #[tokio::test]
    async fn reminders_render_as_rows() {
        let mut client = client(Config::default());
        client
            .service()
            .set_reminders(vec![reminder(1, "call mom"), reminder(2, "buy milk")]);
        client.start().await.unwrap();

        let text = screen_text(&client);
        assert!(text.contains("Reminders (open)"));
        assert!(text.contains("#1 2026-10-19"));
        assert!(text.contains("#2 2026-10-19"));
        assert!(!text.contains(NO_REMINDERS));
    }

    #[tokio::test]
    async fn ongoing_conversation_shows_in_title_and_panel() {
        let mut client = client(Config::default());
        client.start().await.unwrap();
        assert!(!screen_text(&client).contains("Ongoing conversation"));

        client
            .service()
            .push_reply(Some(reply("Hi!", Some("abcdef1234"), false)));
        client.send_message("hello").await.unwrap();

        let text = screen_text(&client);
        assert!(text.contains("Ongoing conversation"));
        assert!(text.contains("Conversation abcdef12..."));
    }

    #[tokio::test]
    async fn typed_text_survives_redraws() {
        let mut client = client(Config::default());
        for c in "draft".chars() {
            client.view_mut().composer_mut().handle_key(crossterm::event::KeyEvent::new(
                crossterm::event::KeyCode::Char(c),
                crossterm::event::KeyModifiers::NONE,
            ));
        }
        client.start().await.unwrap();
        assert!(screen_text(&client).contains("draft▌"));
    }

    #[tokio::test]
    async fn basic_profile_hides_side_panels() {
        let mut client = client(Profile::Basic.apply(Config::default()));
        client.start().await.unwrap();
        let text = screen_text(&client);
        assert!(!text.contains("Upcoming"));
        assert!(!text.contains("Conversation"));
        assert!(text.contains("Hello! I'm your reminder assistant."));
    }
}
