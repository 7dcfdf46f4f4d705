use std::str::FromStr;

use chrono::NaiveDate;
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::events::{AppEvent, ReminderFilter};

/// Commands that can be invoked by starting a message with a leading slash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, AsRefStr, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SlashCommand {
    /// Switch between reminder and general chat
    Mode,
    /// Start a new conversation
    New,
    /// Reload the reminder list
    Reminders,
    /// Reload upcoming reminders
    Upcoming,
    /// Mark a reminder as done
    Done,
    /// Delete a reminder
    Delete,
    /// Filter reminders by date
    Date,
    /// Show completed or open reminders
    Completed,
    /// Show help
    Help,
    /// Exit the application
    Bye,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: SlashCommand,
    pub argument: Option<String>,
}

impl ParsedCommand {
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    /// Turn the command into an app event. `filter` is the filter currently in effect.
    pub fn into_event(self, filter: ReminderFilter) -> AppEvent {
        match self.command {
            SlashCommand::Mode => AppEvent::ToggleMode,
            SlashCommand::New => AppEvent::NewChat,
            SlashCommand::Reminders => AppEvent::ReloadReminders,
            SlashCommand::Upcoming => AppEvent::ReloadUpcoming,
            SlashCommand::Done => match self.reminder_id() {
                Some(id) => AppEvent::CompleteReminder(id),
                None => AppEvent::Notice("Usage: /done <reminder id>".to_string()),
            },
            SlashCommand::Delete => match self.reminder_id() {
                Some(id) => AppEvent::DeleteReminder(id),
                None => AppEvent::Notice("Usage: /delete <reminder id>".to_string()),
            },
            SlashCommand::Date => match self.argument() {
                None | Some("clear") | Some("all") => AppEvent::SetDateFilter(None),
                Some(arg) => match NaiveDate::parse_from_str(arg, "%Y-%m-%d") {
                    Ok(date) => AppEvent::SetDateFilter(Some(date)),
                    Err(_) => AppEvent::Notice(format!(
                        "Invalid date '{}'. Use YYYY-MM-DD or 'clear'.",
                        arg
                    )),
                },
            },
            SlashCommand::Completed => match self.argument().map(str::to_lowercase).as_deref() {
                None => AppEvent::SetShowCompleted(!filter.completed),
                Some("on" | "yes" | "true") => AppEvent::SetShowCompleted(true),
                Some("off" | "no" | "false") => AppEvent::SetShowCompleted(false),
                Some(other) => AppEvent::Notice(format!("Expected on or off, got '{}'", other)),
            },
            SlashCommand::Help => AppEvent::ShowHelp,
            SlashCommand::Bye => AppEvent::ExitRequest,
        }
    }

    fn reminder_id(&self) -> Option<i64> {
        self.argument()?.trim_start_matches('#').parse().ok()
    }
}

impl SlashCommand {
    /// User-visible description shown in help.
    pub fn description(self) -> &'static str {
        match self {
            SlashCommand::Mode => "switch between reminder and general chat",
            SlashCommand::New => "start a new conversation",
            SlashCommand::Reminders => "reload the reminder list",
            SlashCommand::Upcoming => "reload upcoming reminders",
            SlashCommand::Done => "mark a reminder as done: /done <id>",
            SlashCommand::Delete => "delete a reminder: /delete <id>",
            SlashCommand::Date => "filter reminders by date: /date YYYY-MM-DD | clear",
            SlashCommand::Completed => "show completed reminders: /completed on | off",
            SlashCommand::Help => "show available commands",
            SlashCommand::Bye => "exit the application",
        }
    }

    /// Command string without the leading '/'.
    pub fn command(self) -> &'static str {
        self.into()
    }

    /// Whether the command needs the reminder endpoints
    pub fn needs_reminders(self) -> bool {
        matches!(
            self,
            SlashCommand::Reminders
                | SlashCommand::Upcoming
                | SlashCommand::Done
                | SlashCommand::Delete
                | SlashCommand::Date
                | SlashCommand::Completed
        )
    }
}

/// Parse a slash command from user input
pub fn parse_slash_command(input: &str) -> Option<ParsedCommand> {
    let input = input.trim();
    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].split_whitespace();
    let head = parts.next()?.to_lowercase();
    let rest: Vec<&str> = parts.collect();

    let command = SlashCommand::from_str(&head).ok().or_else(|| match head.as_str() {
        "q" | "quit" | "exit" => Some(SlashCommand::Bye),
        "m" | "switch" => Some(SlashCommand::Mode),
        "r" | "list" => Some(SlashCommand::Reminders),
        "complete" => Some(SlashCommand::Done),
        "rm" => Some(SlashCommand::Delete),
        _ => None,
    })?;

    let argument = if rest.is_empty() {
        None
    } else {
        Some(rest.join(" "))
    };

    Some(ParsedCommand { command, argument })
}

/// Get help text for all available commands
pub fn get_help_text() -> String {
    let mut help = String::from("Available commands:\n");
    for command in SlashCommand::iter() {
        help.push_str(&format!("/{} - {}\n", command.command(), command.description()));
    }
    help.push_str("Aliases: /q for /bye, /m for /mode, /r for /reminders, /complete for /done, /rm for /delete");
    help
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(input: &str) -> AppEvent {
        parse_slash_command(input)
            .unwrap()
            .into_event(ReminderFilter::default())
    }

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_slash_command("remind me at 5"), None);
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert_eq!(parse_slash_command("/frobnicate"), None);
    }

    #[test]
    fn aliases_resolve() {
        assert_eq!(event("/q"), AppEvent::ExitRequest);
        assert_eq!(event("/M"), AppEvent::ToggleMode);
        assert_eq!(event("/complete 4"), AppEvent::CompleteReminder(4));
        assert_eq!(event("/rm #12"), AppEvent::DeleteReminder(12));
    }

    #[test]
    fn done_without_id_explains_usage() {
        assert_eq!(
            event("/done"),
            AppEvent::Notice("Usage: /done <reminder id>".to_string())
        );
    }

    #[test]
    fn date_argument_parses_or_clears() {
        assert_eq!(
            event("/date 2026-10-19"),
            AppEvent::SetDateFilter(NaiveDate::from_ymd_opt(2026, 10, 19))
        );
        assert_eq!(event("/date clear"), AppEvent::SetDateFilter(None));
        assert!(matches!(event("/date tomorrow"), AppEvent::Notice(_)));
    }

    #[test]
    fn completed_toggles_without_argument() {
        let shown = ReminderFilter {
            date: None,
            completed: true,
        };
        let parsed = parse_slash_command("/completed").unwrap();
        assert_eq!(parsed.into_event(shown), AppEvent::SetShowCompleted(false));
        assert_eq!(event("/completed ON"), AppEvent::SetShowCompleted(true));
    }

    #[test]
    fn help_lists_every_command() {
        let help = get_help_text();
        for command in SlashCommand::iter() {
            assert!(help.contains(&format!("/{}", command.command())));
        }
    }
}
