//! Contract with the remote assistant service and its HTTP implementation.
//!
//! The client core only talks to [`AssistantService`], so tests can swap in an
//! in-memory fake while the binary uses [`HttpService`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::events::{ChatMode, ConversationSummary, Reminder, ReminderFilter};

/// Failures talking to the service. Status codes are not interpreted further.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Body of a chat turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub conversation_id: Option<String>,
}

/// Reply to a chat turn
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    pub reply: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    /// Set by the service when the turn created, changed or removed reminders
    #[serde(default)]
    pub reminders_changed: bool,
}

#[derive(Debug, Deserialize)]
struct ReminderList {
    #[serde(default)]
    reminders: Vec<Reminder>,
}

#[derive(Debug, Deserialize)]
struct ConversationResponse {
    conversation_id: String,
    #[serde(default)]
    messages: Vec<serde_json::Value>,
}

#[async_trait]
pub trait AssistantService: Send + Sync {
    async fn chat(&self, mode: ChatMode, request: &ChatRequest) -> ApiResult<ChatReply>;

    async fn list_reminders(&self, filter: &ReminderFilter) -> ApiResult<Vec<Reminder>>;

    async fn upcoming_reminders(&self) -> ApiResult<Vec<Reminder>>;

    async fn conversation(&self, conversation_id: &str) -> ApiResult<ConversationSummary>;

    async fn complete_reminder(&self, id: i64) -> ApiResult<()>;

    async fn delete_reminder(&self, id: i64) -> ApiResult<()>;
}

/// reqwest-backed service client
#[derive(Clone)]
pub struct HttpService {
    client: reqwest::Client,
    base: String,
}

impl HttpService {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base: config.base_url().to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> ApiResult<Url> {
        Ok(Url::parse(&format!("{}/{}", self.base, path))?)
    }

    pub fn chat_url(&self, mode: ChatMode) -> ApiResult<Url> {
        match mode {
            ChatMode::Reminder => self.endpoint("chat"),
            ChatMode::GeneralChat => self.endpoint("general-chat"),
        }
    }

    pub fn reminders_url(&self, filter: &ReminderFilter) -> ApiResult<Url> {
        let mut url = self.endpoint("reminders")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(date) = filter.date {
                query.append_pair("date", &date.format("%Y-%m-%d").to_string());
            }
            query.append_pair("completed", if filter.completed { "true" } else { "false" });
        }
        Ok(url)
    }

    pub fn upcoming_url(&self) -> ApiResult<Url> {
        self.endpoint("reminders/upcoming")
    }

    pub fn conversation_url(&self, conversation_id: &str) -> ApiResult<Url> {
        let mut url = self.endpoint("conversations")?;
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .push(conversation_id);
        Ok(url)
    }

    pub fn complete_url(&self, id: i64) -> ApiResult<Url> {
        self.endpoint(&format!("reminder/{}/complete", id))
    }

    pub fn delete_url(&self, id: i64) -> ApiResult<Url> {
        self.endpoint(&format!("reminder/{}", id))
    }

    async fn send(&self, request: reqwest::RequestBuilder, endpoint: &Url) -> ApiResult<reqwest::Response> {
        let response = request.send().await?;
        let status = response.status();
        debug!(endpoint = %endpoint, status = status.as_u16(), "service responded");

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint: endpoint.path().to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl AssistantService for HttpService {
    async fn chat(&self, mode: ChatMode, request: &ChatRequest) -> ApiResult<ChatReply> {
        let url = self.chat_url(mode)?;
        let response = self
            .send(self.client.post(url.clone()).json(request), &url)
            .await?;
        Ok(response.json::<ChatReply>().await?)
    }

    async fn list_reminders(&self, filter: &ReminderFilter) -> ApiResult<Vec<Reminder>> {
        let url = self.reminders_url(filter)?;
        let response = self.send(self.client.get(url.clone()), &url).await?;
        Ok(response.json::<ReminderList>().await?.reminders)
    }

    async fn upcoming_reminders(&self) -> ApiResult<Vec<Reminder>> {
        let url = self.upcoming_url()?;
        let response = self.send(self.client.get(url.clone()), &url).await?;
        Ok(response.json::<ReminderList>().await?.reminders)
    }

    async fn conversation(&self, conversation_id: &str) -> ApiResult<ConversationSummary> {
        let url = self.conversation_url(conversation_id)?;
        let response = self.send(self.client.get(url.clone()), &url).await?;
        let body = response.json::<ConversationResponse>().await?;
        Ok(ConversationSummary {
            conversation_id: body.conversation_id,
            message_count: body.messages.len(),
        })
    }

    async fn complete_reminder(&self, id: i64) -> ApiResult<()> {
        let url = self.complete_url(id)?;
        self.send(self.client.post(url.clone()), &url).await?;
        Ok(())
    }

    async fn delete_reminder(&self, id: i64) -> ApiResult<()> {
        let url = self.delete_url(id)?;
        self.send(self.client.delete(url.clone()), &url).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use chrono::NaiveDate;

    fn service(profile: Profile) -> HttpService {
        HttpService::new(&profile.apply(Config::default())).unwrap()
    }

    #[test]
    fn chat_url_follows_mode() {
        let service = service(Profile::Full);
        assert_eq!(
            service.chat_url(ChatMode::Reminder).unwrap().as_str(),
            "http://localhost:8000/api/chat"
        );
        assert_eq!(
            service.chat_url(ChatMode::GeneralChat).unwrap().as_str(),
            "http://localhost:8000/api/general-chat"
        );
    }

    #[test]
    fn basic_profile_chats_on_server_root() {
        let service = service(Profile::Basic);
        assert_eq!(
            service.chat_url(ChatMode::Reminder).unwrap().as_str(),
            "http://localhost:8000/chat"
        );
    }

    #[test]
    fn reminders_url_carries_filter() {
        let service = service(Profile::Full);
        let filter = ReminderFilter {
            date: NaiveDate::from_ymd_opt(2026, 10, 19),
            completed: true,
        };
        assert_eq!(
            service.reminders_url(&filter).unwrap().as_str(),
            "http://localhost:8000/api/reminders?date=2026-10-19&completed=true"
        );
        assert_eq!(
            service.reminders_url(&ReminderFilter::default()).unwrap().as_str(),
            "http://localhost:8000/api/reminders?completed=false"
        );
    }

    #[test]
    fn mutation_urls_embed_id() {
        let service = service(Profile::Full);
        assert_eq!(
            service.complete_url(42).unwrap().as_str(),
            "http://localhost:8000/api/reminder/42/complete"
        );
        assert_eq!(
            service.delete_url(42).unwrap().as_str(),
            "http://localhost:8000/api/reminder/42"
        );
    }

    #[test]
    fn conversation_id_is_path_escaped() {
        let service = service(Profile::Full);
        assert_eq!(
            service.conversation_url("a b/c").unwrap().as_str(),
            "http://localhost:8000/api/conversations/a%20b%2Fc"
        );
    }

    #[test]
    fn chat_request_sends_null_conversation_id() {
        let request = ChatRequest {
            message: "hi".to_string(),
            conversation_id: None,
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"message":"hi","conversation_id":null}"#
        );
    }

    #[test]
    fn legacy_reply_without_optional_fields_decodes() {
        let reply: ChatReply = serde_json::from_str(r#"{"reply": "hello"}"#).unwrap();
        assert_eq!(reply.reply, "hello");
        assert_eq!(reply.conversation_id, None);
        assert!(!reply.reminders_changed);
    }

    #[test]
    fn reminder_list_without_key_is_empty() {
        let list: ReminderList = serde_json::from_str(r#"{"success": true, "message": "No reminders found"}"#).unwrap();
        assert!(list.reminders.is_empty());
    }
}
