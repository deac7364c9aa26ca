//! Quick readiness check for a relay deployment: is Ollama up, is the model
//! pulled, can it generate, and is the environment filled in.

use agent_relay::config::RelayConfig;
use agent_relay::ollama::client::model_available;
use agent_relay::ollama::OllamaClient;

use std::process::ExitCode;
use std::time::Duration;

const SMOKE_GENERATE_TIMEOUT: Duration = Duration::from_secs(30);
const PREVIEW_CHARS: usize = 100;

const REQUIRED_VARS: &[&[&str]] = &[
    &["APP_ID", "GITHUB_APP_ID"],
    &["PRIVATE_KEY_PATH"],
    &["INSTALLATION_ID"],
    &["OLLAMA_URL"],
    &["OLLAMA_MODEL"],
];

#[derive(Default)]
struct Report {
    passed: usize,
    failed: usize,
}

impl Report {
    fn record(&mut self, name: &str, outcome: Result<String, String>) {
        match outcome {
            Ok(detail) => {
                self.passed += 1;
                println!("✅ {}: {}", name, detail);
            }
            Err(reason) => {
                self.failed += 1;
                println!("❌ {}: {}", name, reason);
            }
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match RelayConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            println!("❌ Configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ollama = OllamaClient::new(reqwest::Client::new(), &config.ollama_url)
        .with_generate_timeout(SMOKE_GENERATE_TIMEOUT);
    let mut report = Report::default();

    println!("🔍 Checking Ollama at {}", ollama.base_url());
    let models = ollama.list_models().await;
    report.record(
        "Ollama connection",
        models
            .as_ref()
            .map(|m| format!("found {} models", m.len()))
            .map_err(|e| e.clone()),
    );
    if let Ok(names) = &models {
        for name in names {
            println!("    • {}", name);
        }
    }

    report.record(
        "Model availability",
        match &models {
            Ok(m) if model_available(&config.ollama_model, m) => {
                Ok(format!("'{}' is available", config.ollama_model))
            }
            Ok(m) => Err(format!(
                "'{}' not found. Available: {}",
                config.ollama_model,
                m.join(", ")
            )),
            Err(_) => Err("skipped, Ollama unreachable".to_string()),
        },
    );

    let generated = ollama.generate("Say 'test'", &config.ollama_model).await;
    report.record(
        "Generation",
        generated
            .as_ref()
            .map(|text| format!("generated {} chars", text.chars().count()))
            .map_err(|e| e.clone()),
    );
    if let Ok(text) = &generated {
        println!("    {}", preview(text));
    }

    let missing: Vec<&str> = REQUIRED_VARS
        .iter()
        .filter(|names| {
            !names
                .iter()
                .any(|n| std::env::var(n).is_ok_and(|v| !v.trim().is_empty()))
        })
        .map(|names| names[0])
        .collect();
    report.record(
        "Environment variables",
        if missing.is_empty() {
            Ok("all required variables set".to_string())
        } else {
            Err(format!("missing: {}", missing.join(", ")))
        },
    );

    let total = report.passed + report.failed;
    println!(
        "\n{} checks, {} passed, {} failed",
        total, report.passed, report.failed
    );

    if report.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
