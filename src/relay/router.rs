//! Decides what, if anything, the relay does with an inbound event.
//!
//! Everything here is pure: no I/O, so the routing rules can be exercised
//! without a network.

use crate::error::RelayError;
use crate::relay::event::InboundEvent;

pub const TRIGGER_MARKER: &str = "@agent";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// Answer to an `@agent` mention in a comment.
    AgentResponse,
    /// First-look analysis of a newly opened issue.
    IssueAnalysis,
}

impl ReplyKind {
    pub fn render(self, text: &str) -> String {
        match self {
            ReplyKind::AgentResponse => format!("🤖 **Agent Response:**\n\n{}", text),
            ReplyKind::IssueAnalysis => format!("👋 **Automated Analysis:**\n\n{}", text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub repository_full_name: String,
    pub issue_number: u64,
    pub installation_id: Option<u64>,
    pub prompt: String,
    pub kind: ReplyKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Reply(Reply),
    Ignore,
}

pub fn route(event: &InboundEvent) -> Result<Route, RelayError> {
    match (event.event_type.as_str(), event.action.as_str()) {
        // The relay's own replies may quote the marker; answering them would loop.
        ("issue_comment", "created") if event.from_bot => Ok(Route::Ignore),
        ("issue_comment", "created") => {
            let Some(prompt) = event.comment_body.as_deref().and_then(extract_prompt) else {
                return Ok(Route::Ignore);
            };
            Ok(Route::Reply(Reply {
                repository_full_name: required_repo(event)?,
                issue_number: required_issue_number(event)?,
                installation_id: event.installation_id,
                prompt,
                kind: ReplyKind::AgentResponse,
            }))
        }
        ("issues", "opened") => {
            let title = event
                .issue_title
                .as_deref()
                .ok_or_else(|| RelayError::InvalidPayload("issue.title is missing".to_string()))?;
            Ok(Route::Reply(Reply {
                repository_full_name: required_repo(event)?,
                issue_number: required_issue_number(event)?,
                installation_id: event.installation_id,
                prompt: analysis_prompt(title, event.body.as_deref()),
                kind: ReplyKind::IssueAnalysis,
            }))
        }
        _ => Ok(Route::Ignore),
    }
}

/// Case-insensitive check for the trigger marker anywhere in `text`.
pub fn mentions_trigger(text: &str) -> bool {
    text.to_lowercase().contains(TRIGGER_MARKER)
}

/// Returns the trimmed text after the marker, or `None` when `text` does not
/// mention it.
///
/// The first exact-case `@agent` wins. When the marker only appears in another
/// casing (`@Agent`), the first case-insensitive occurrence is used instead.
/// A marker at the very end yields an empty prompt.
pub fn extract_prompt(text: &str) -> Option<String> {
    if !mentions_trigger(text) {
        return None;
    }
    // The marker is ASCII, so byte offsets in the ASCII-lowercased copy match `text`.
    let start = text
        .find(TRIGGER_MARKER)
        .or_else(|| text.to_ascii_lowercase().find(TRIGGER_MARKER))?;
    Some(text[start + TRIGGER_MARKER.len()..].trim().to_string())
}

pub fn analysis_prompt(title: &str, body: Option<&str>) -> String {
    format!(
        "Analyze this GitHub issue and provide helpful suggestions:\n\nTitle: {}\n\nBody: {}",
        title,
        body.unwrap_or("")
    )
}

fn required_repo(event: &InboundEvent) -> Result<String, RelayError> {
    event
        .repository_full_name
        .clone()
        .ok_or_else(|| RelayError::InvalidPayload("repository.full_name is missing".to_string()))
}

fn required_issue_number(event: &InboundEvent) -> Result<u64, RelayError> {
    event
        .issue_number
        .ok_or_else(|| RelayError::InvalidPayload("issue.number is missing".to_string()))
}
