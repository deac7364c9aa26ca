use jsonwebtoken::EncodingKey;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::RelayError;
use crate::github::jwt::issue_assertion;
use crate::github::models::{AccessToken, AccessTokenResponse, NewComment};

pub const USER_AGENT: &str = "agent-relay";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";
/// Bound for each GitHub call (token exchange and comment creation).
pub const GITHUB_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// GitHub App identity: issues installation tokens and posts comments with them.
pub struct GitHubApp {
    client: Client,
    api_url: String,
    app_id: String,
    encoding_key: EncodingKey,
    call_timeout: Duration,
}

impl GitHubApp {
    pub fn new(client: Client, api_url: &str, app_id: &str, encoding_key: EncodingKey) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            app_id: app_id.to_string(),
            encoding_key,
            call_timeout: GITHUB_CALL_TIMEOUT,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Signs a fresh assertion and trades it for an installation token.
    pub async fn installation_token(&self, installation_id: u64) -> Result<AccessToken, RelayError> {
        let assertion = issue_assertion(&self.app_id, &self.encoding_key)?;

        let res = self
            .client
            .post(format!(
                "{}/app/installations/{}/access_tokens",
                self.api_url, installation_id
            ))
            .bearer_auth(&assertion.token)
            .header("Accept", GITHUB_ACCEPT)
            .header("User-Agent", USER_AGENT)
            .timeout(self.call_timeout)
            .send()
            .await
            .map_err(|e| RelayError::AuthExchange(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(RelayError::AuthExchange(format!(
                "installation {} answered {}",
                installation_id, status
            )));
        }

        let body: AccessTokenResponse = res
            .json()
            .await
            .map_err(|e| RelayError::AuthExchange(e.to_string()))?;

        let token = body.token.ok_or_else(|| {
            RelayError::AuthExchange("response did not contain a token".to_string())
        })?;

        debug!(installation_id, "obtained installation token");
        Ok(AccessToken::new(token))
    }

    /// Posts `body` on the issue or pull request thread. `Ok(true)` only for
    /// `201 Created`. Never retried: a retry would duplicate the comment.
    pub async fn publish_comment(
        &self,
        installation_id: u64,
        repo_full_name: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<bool, RelayError> {
        let token = self.installation_token(installation_id).await?;
        Ok(self
            .post_comment(&token, repo_full_name, issue_number, body)
            .await)
    }

    pub async fn post_comment(
        &self,
        token: &AccessToken,
        repo_full_name: &str,
        issue_number: u64,
        body: &str,
    ) -> bool {
        let url = format!(
            "{}/repos/{}/issues/{}/comments",
            self.api_url, repo_full_name, issue_number
        );

        let res = self
            .client
            .post(&url)
            .header("Authorization", format!("token {}", token.as_str()))
            .header("Accept", GITHUB_ACCEPT)
            .header("User-Agent", USER_AGENT)
            .timeout(self.call_timeout)
            .json(&NewComment { body })
            .send()
            .await;

        match res {
            Ok(res) if res.status() == StatusCode::CREATED => {
                info!(repo = repo_full_name, issue_number, "comment posted");
                true
            }
            Ok(res) => {
                warn!(
                    repo = repo_full_name,
                    issue_number,
                    status = %res.status(),
                    "comment was not created"
                );
                false
            }
            Err(e) => {
                warn!(repo = repo_full_name, issue_number, error = %e, "comment request failed");
                false
            }
        }
    }
}
