use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(120);
const TAGS_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

pub struct OllamaClient {
    client: Client,
    base_url: String,
    generate_timeout: Duration,
}

impl OllamaClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            generate_timeout: GENERATE_TIMEOUT,
        }
    }

    pub fn with_generate_timeout(mut self, timeout: Duration) -> Self {
        self.generate_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Non-streaming generation. Failures come back as a readable message in
    /// `Err` so callers can hand it to the user instead of aborting.
    pub async fn generate(&self, prompt: &str, model: &str) -> Result<String, String> {
        self.try_generate(prompt, model).await.map_err(|e| {
            warn!(model, error = %e, "generation failed");
            format!("Error calling Ollama: {}", e)
        })
    }

    async fn try_generate(&self, prompt: &str, model: &str) -> Result<String, reqwest::Error> {
        let res = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .timeout(self.generate_timeout)
            .json(&GenerateRequest {
                model,
                prompt,
                stream: false,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: GenerateResponse = res.json().await?;
        Ok(body.response)
    }

    /// Names of the locally available models.
    pub async fn list_models(&self) -> Result<Vec<String>, String> {
        let res = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(TAGS_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| e.to_string())?;

        let tags: TagsResponse = res.json().await.map_err(|e| e.to_string())?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

/// True when `wanted` is listed verbatim, or when a listed model shares its
/// base name (the part before `:`).
pub fn model_available(wanted: &str, available: &[String]) -> bool {
    let base = wanted.split(':').next().unwrap_or(wanted);
    available
        .iter()
        .any(|name| name == wanted || name.contains(base))
}
