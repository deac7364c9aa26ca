use serde::{Deserialize, Serialize};
use std::fmt;

/// Webhook envelope. Only the fields the relay reads are modelled and all of
/// them are optional, so events the relay ignores never fail to parse.
#[derive(Deserialize, Debug, Default)]
pub struct WebhookPayload {
    #[serde(default)]
    pub action: Option<String>,
    pub issue: Option<Issue>,
    pub comment: Option<Comment>,
    pub repository: Option<Repository>,
    pub installation: Option<Installation>,
    pub sender: Option<User>,
}

#[derive(Deserialize, Debug)]
pub struct Issue {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Comment {
    pub body: Option<String>,
    pub user: Option<User>,
}

#[derive(Deserialize, Debug)]
pub struct User {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl User {
    pub fn is_bot(&self) -> bool {
        self.kind.as_deref() == Some("Bot")
    }
}

#[derive(Deserialize, Debug)]
pub struct Repository {
    pub full_name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Installation {
    pub id: u64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Claims {
    pub iat: u64,
    pub exp: u64,
    pub iss: String,
}

#[derive(Deserialize)]
pub struct AccessTokenResponse {
    pub token: Option<String>,
}

/// Installation access token. The value is deliberately kept out of `Debug`.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

#[derive(Serialize)]
pub struct NewComment<'a> {
    pub body: &'a str,
}
