//! One-shot subcommands that print to stdout instead of opening the TUI

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

use crate::api::{AssistantService, HttpService};
use crate::client::ChatClient;
use crate::config::Config;
use crate::events::{Reminder, ReminderFilter, Sender};
use crate::ui::history::Transcript;
use crate::ui::reminders::{NO_REMINDERS, NO_UPCOMING};
use crate::ui::NullView;

type OneShotClient = ChatClient<HttpService, NullView>;

fn one_shot_client(config: Config) -> Result<OneShotClient> {
    let service = HttpService::new(&config).context("Failed to create HTTP client")?;
    Ok(ChatClient::new(config, service, NullView))
}

fn require_reminders(config: &Config) -> bool {
    if !config.supports_reminders {
        println!("❌ Reminders are not available with this backend.");
        return false;
    }
    true
}

pub fn format_reminder(reminder: &Reminder) -> String {
    let marker = if reminder.completed { "✓" } else { "•" };
    let mut line = format!(
        "{} #{} {} [{}] {}",
        marker,
        reminder.id,
        reminder.date,
        reminder.priority.as_str(),
        reminder.message
    );
    if !reminder.tags.is_empty() {
        line.push_str(&format!(" ({})", reminder.tags.join(", ")));
    }
    line
}

fn print_list(heading: &str, items: &[Reminder], empty_text: &str) {
    println!("{}", heading);
    println!("{}", "=".repeat(50));
    if items.is_empty() {
        println!("{}", empty_text);
        return;
    }
    for reminder in items {
        println!("{}", format_reminder(reminder));
    }
}

pub async fn chat(config: Config, message: &str, general: bool) -> Result<()> {
    let mut client = one_shot_client(config)?;

    if general && !client.toggle_chat_mode().await? {
        println!("❌ General chat is not available with this backend.");
        return Ok(());
    }

    client.send_message(message).await?;

    let greeting = client.session().mode().greeting();
    for line in turn_lines(client.transcript(), greeting) {
        println!("{}", line);
    }
    if let Some(id) = client.session().conversation_id() {
        println!();
        println!("💬 Conversation: {}", id);
    }
    Ok(())
}

/// Transcript lines for printing, without the mode greeting. The greeting is
/// matched by content because the message cap may already have evicted it.
fn turn_lines(transcript: &Transcript, greeting: &str) -> Vec<String> {
    transcript
        .messages()
        .filter(|entry| !(entry.sender == Sender::Assistant && entry.text == greeting))
        .map(|entry| match entry.sender {
            Sender::User => format!("👤 {}", entry.text),
            Sender::Assistant => format!("🤖 {}", entry.text),
            Sender::System => format!("⚙️ {}", entry.text),
        })
        .collect()
}

pub async fn reminders(config: Config, date: Option<NaiveDate>, completed: bool) -> Result<()> {
    if !require_reminders(&config) {
        return Ok(());
    }
    let mut client = one_shot_client(config)?;
    client.set_filter(ReminderFilter { date, completed }).await?;
    print_reminders(&client);
    Ok(())
}

fn print_reminders(client: &OneShotClient) {
    if !client.reminders().is_loaded() {
        println!("❌ Could not load reminders. Check the log for details.");
        return;
    }
    print_list(
        &format!("📋 Reminders ({})", client.filter().describe()),
        client.reminders().items(),
        NO_REMINDERS,
    );
}

pub async fn upcoming(config: Config) -> Result<()> {
    if !require_reminders(&config) {
        return Ok(());
    }
    let mut client = one_shot_client(config)?;
    client.load_upcoming_reminders().await?;

    if !client.upcoming().is_loaded() {
        println!("❌ Could not load upcoming reminders. Check the log for details.");
        return Ok(());
    }
    print_list("⏰ Upcoming reminders", client.upcoming().items(), NO_UPCOMING);
    Ok(())
}

pub async fn complete(config: Config, id: i64) -> Result<()> {
    if !require_reminders(&config) {
        return Ok(());
    }
    let mut client = one_shot_client(config)?;
    println!("✅ Completing reminder #{}", id);
    client.complete_reminder(id).await?;
    print_reminders(&client);
    Ok(())
}

pub async fn delete(config: Config, id: i64) -> Result<()> {
    if !require_reminders(&config) {
        return Ok(());
    }
    let mut client = one_shot_client(config)?;
    println!("🗑️ Deleting reminder #{}", id);
    client.delete_reminder(id).await?;
    print_reminders(&client);
    Ok(())
}

pub async fn conversation(config: Config, conversation_id: &str) -> Result<()> {
    if !config.supports_conversations {
        println!("❌ Conversations are not available with this backend.");
        return Ok(());
    }
    let service = HttpService::new(&config).context("Failed to create HTTP client")?;
    let summary = service
        .conversation(conversation_id)
        .await
        .with_context(|| format!("Failed to fetch conversation {}", conversation_id))?;

    println!("💬 {}", summary.label());
    println!("   🆔 {}", summary.conversation_id);
    println!("   📨 {} messages", summary.message_count);
    Ok(())
}

pub fn config_init(force: bool) -> Result<()> {
    let path = Config::default_path()?;
    if write_default_config(&path, force)? {
        println!("📝 Wrote {}", path.display());
    } else {
        println!("⚠️ {} already exists. Use --force to overwrite it.", path.display());
    }
    Ok(())
}

/// Write the built-in defaults, ignoring env and CLI overrides. Returns false
/// when the file exists and `force` is off.
fn write_default_config(path: &Path, force: bool) -> Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    Config::default().save_to(path)?;
    Ok(true)
}

pub fn config_show(config: &Config) -> Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    println!("{}", content);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{ChatMode, Priority};

    #[test]
    fn reminder_line_includes_tags_and_state() {
        let reminder = Reminder {
            id: 12,
            date: "2026-10-20".to_string(),
            message: "pay rent".to_string(),
            priority: Priority::High,
            tags: vec!["home".to_string(), "money".to_string()],
            completed: true,
        };
        assert_eq!(
            format_reminder(&reminder),
            "✓ #12 2026-10-20 [high] pay rent (home, money)"
        );
    }

    #[test]
    fn turn_lines_drop_the_greeting_but_keep_the_user_line() {
        let greeting = ChatMode::GeneralChat.greeting();
        for cap in [2, 200] {
            let mut transcript = Transcript::new(cap);
            transcript.reset_with_greeting(greeting);
            transcript.add_user_message("hi".to_string());
            let turn = transcript.begin_turn();
            transcript.resolve(turn, "hello".to_string());

            assert_eq!(turn_lines(&transcript, greeting), vec!["👤 hi", "🤖 hello"]);
        }
    }

    #[test]
    fn config_init_writes_defaults_once_unless_forced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(write_default_config(&path, false).unwrap());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        std::fs::write(&path, "endpoint_base = \"http://remote:9000/api\"\n").unwrap();
        assert!(!write_default_config(&path, false).unwrap());
        assert_eq!(
            Config::load_from(&path).unwrap().endpoint_base,
            "http://remote:9000/api"
        );

        assert!(write_default_config(&path, true).unwrap());
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }
}
