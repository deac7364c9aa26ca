use crate::error::RelayError;
use crate::github::models::WebhookPayload;

pub const EVENT_HEADER: &str = "X-GitHub-Event";

/// The parts of a webhook delivery the router looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundEvent {
    pub event_type: String,
    pub action: String,
    pub repository_full_name: Option<String>,
    pub issue_number: Option<u64>,
    pub issue_title: Option<String>,
    pub body: Option<String>,
    pub comment_body: Option<String>,
    pub installation_id: Option<u64>,
    /// Set when the sender or the comment author is a GitHub App / bot account.
    pub from_bot: bool,
}

impl InboundEvent {
    pub fn from_payload(event_type: &str, raw: &[u8]) -> Result<Self, RelayError> {
        let payload: WebhookPayload = serde_json::from_slice(raw)
            .map_err(|e| RelayError::InvalidPayload(e.to_string()))?;

        let (issue_number, issue_title, body) = match payload.issue {
            Some(issue) => (issue.number, issue.title, issue.body),
            None => (None, None, None),
        };

        let from_bot = payload.sender.as_ref().is_some_and(|u| u.is_bot())
            || payload
                .comment
                .as_ref()
                .and_then(|c| c.user.as_ref())
                .is_some_and(|u| u.is_bot());

        Ok(InboundEvent {
            event_type: event_type.to_string(),
            action: payload.action.unwrap_or_default(),
            repository_full_name: payload.repository.and_then(|r| r.full_name),
            issue_number,
            issue_title,
            body,
            comment_body: payload.comment.and_then(|c| c.body),
            installation_id: payload.installation.map(|i| i.id),
            from_bot,
        })
    }
}
