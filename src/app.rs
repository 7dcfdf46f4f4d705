//! Interactive terminal session

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tracing::{debug, info};

use crate::api::{AssistantService, HttpService};
use crate::client::ChatClient;
use crate::config::Config;
use crate::events::{AppEvent, ReminderFilter};
use crate::ui::{get_help_text, ComposerResult, TerminalView, View};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Run the full-screen client until the user quits
pub async fn run(config: Config) -> Result<()> {
    let service = HttpService::new(&config).context("Failed to create HTTP client")?;
    let terminal = setup_terminal()?;
    let mut client = ChatClient::new(config, service, TerminalView::new(terminal));

    let result = event_loop(&mut client).await;

    let view = client.into_view();
    restore_terminal(view.into_terminal())?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    Terminal::new(CrosstermBackend::new(stdout)).context("Failed to create terminal")
}

fn restore_terminal(mut terminal: Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

async fn event_loop<S: AssistantService>(
    client: &mut ChatClient<S, TerminalView<CrosstermBackend<Stdout>>>,
) -> Result<()> {
    client.start().await?;

    loop {
        if !event::poll(Duration::from_millis(250)).context("Failed to poll terminal events")? {
            continue;
        }

        match event::read().context("Failed to read terminal event")? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    info!("interrupted");
                    return Ok(());
                }

                let result = client.view_mut().composer_mut().handle_key(key);
                let app_event = match result {
                    ComposerResult::Submitted(text) => AppEvent::SendMessage(text),
                    ComposerResult::Command(command) => {
                        if command.command.needs_reminders() && !client.config().supports_reminders {
                            AppEvent::Notice("Reminders are not available with this backend.".to_string())
                        } else {
                            command.into_event(client.filter())
                        }
                    }
                    ComposerResult::UnknownCommand(input) => {
                        AppEvent::Notice(format!("Unknown command {}. Type /help for a list.", input))
                    }
                    ComposerResult::None => {
                        client.render()?;
                        continue;
                    }
                };

                if !handle_event(client, app_event).await? {
                    return Ok(());
                }
            }
            Event::Resize(_, _) => client.render()?,
            _ => {}
        }
    }
}

/// Apply one event to the client. Returns false when the app should exit.
pub async fn handle_event<S: AssistantService, V: View>(
    client: &mut ChatClient<S, V>,
    event: AppEvent,
) -> Result<bool> {
    debug!(?event, "handling event");

    match event {
        AppEvent::SendMessage(text) => client.send_message(&text).await?,
        AppEvent::ToggleMode => {
            if !client.toggle_chat_mode().await? {
                client.notice("General chat is not available with this backend.")?;
            }
        }
        AppEvent::NewChat => client.start_new_chat()?,
        AppEvent::ReloadReminders => client.load_reminders().await?,
        AppEvent::ReloadUpcoming => client.load_upcoming_reminders().await?,
        AppEvent::CompleteReminder(id) => client.complete_reminder(id).await?,
        AppEvent::DeleteReminder(id) => client.delete_reminder(id).await?,
        AppEvent::SetDateFilter(date) => {
            let filter = ReminderFilter {
                date,
                ..client.filter()
            };
            client.set_filter(filter).await?;
        }
        AppEvent::SetShowCompleted(completed) => {
            let filter = ReminderFilter {
                completed,
                ..client.filter()
            };
            client.set_filter(filter).await?;
        }
        AppEvent::ShowHelp => client.notice(get_help_text())?,
        AppEvent::Notice(text) => client.notice(text)?,
        AppEvent::ExitRequest => return Ok(false),
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{client, reply, Call};
    use crate::config::Profile;
    use crate::events::{ChatMode, Sender};
    use crate::ui::commands::parse_slash_command;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn exit_request_stops_the_loop() {
        let mut client = client(Config::default());
        assert!(!handle_event(&mut client, AppEvent::ExitRequest).await.unwrap());
        assert!(handle_event(&mut client, AppEvent::NewChat).await.unwrap());
    }

    #[tokio::test]
    async fn filter_events_merge_with_current_filter() {
        let mut client = client(Config::default());
        let date = NaiveDate::from_ymd_opt(2026, 10, 21);
        handle_event(&mut client, AppEvent::SetShowCompleted(true)).await.unwrap();
        handle_event(&mut client, AppEvent::SetDateFilter(date)).await.unwrap();

        assert_eq!(client.filter(), ReminderFilter { date, completed: true });
        assert_eq!(
            client.service().calls().last(),
            Some(&Call::ListReminders(ReminderFilter { date, completed: true }))
        );
    }

    #[tokio::test]
    async fn unsupported_toggle_leaves_a_notice() {
        let mut client = client(Profile::Reminders.apply(Config::default()));
        handle_event(&mut client, AppEvent::ToggleMode).await.unwrap();
        assert_eq!(client.session().mode(), ChatMode::Reminder);
        assert_eq!(client.transcript().last().unwrap().sender, Sender::System);
    }

    #[tokio::test]
    async fn slash_done_completes_and_reloads() {
        let mut client = client(Config::default());
        let event = parse_slash_command("/done 5")
            .unwrap()
            .into_event(client.filter());
        handle_event(&mut client, event).await.unwrap();
        assert_eq!(client.service().calls(), vec![
            Call::Complete(5),
            Call::ListReminders(ReminderFilter::default())
        ]);
    }

    #[tokio::test]
    async fn help_is_local() {
        let mut client = client(Config::default());
        handle_event(&mut client, AppEvent::ShowHelp).await.unwrap();
        assert!(client.service().calls().is_empty());
        assert!(client.transcript().last().unwrap().text.starts_with("Available commands"));
    }

    #[tokio::test]
    async fn typed_message_goes_out() {
        let mut client = client(Config::default());
        client.service().push_reply(Some(reply("ok", None, false)));
        handle_event(&mut client, AppEvent::SendMessage("ping".to_string()))
            .await
            .unwrap();
        assert_eq!(client.transcript().last().unwrap().text, "ok");
    }
}
