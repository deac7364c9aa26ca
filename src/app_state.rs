use reqwest::Client;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::github::app::GitHubApp;
use crate::github::jwt::{issue_assertion, load_encoding_key};
use crate::ollama::OllamaClient;

pub struct AppState {
    pub config: RelayConfig,
    pub github: GitHubApp,
    pub ollama: OllamaClient,
}

/// Loads the signing key and wires the outbound clients. Run this before
/// binding the listener so a bad key stops startup.
pub fn build_app_state(config: RelayConfig) -> Result<AppState, RelayError> {
    let encoding_key = load_encoding_key(&config.private_key_path)?;
    // Some malformed keys only fail once used.
    issue_assertion(&config.app_id, &encoding_key)?;
    let client = Client::new();

    Ok(AppState {
        github: GitHubApp::new(
            client.clone(),
            &config.github_api_url,
            &config.app_id,
            encoding_key,
        ),
        ollama: OllamaClient::new(client, &config.ollama_url),
        config,
    })
}
