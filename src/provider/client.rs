//! HTTP client for the hosted generation API.

use super::{GeneratedApp, SimulationProvider};
use crate::config::ProviderSettings;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

const DEFAULT_PROMPT: &str = "Analyze the provided project files and simulate the app.";

/// JSON-over-HTTP provider client.
pub struct HttpProvider {
    settings: ProviderSettings,
    client: reqwest::Client,
}

impl HttpProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    fn api_key(&self) -> Result<Option<String>, ProviderError> {
        match &self.settings.api_key_env {
            Some(var) => std::env::var(var)
                .map(Some)
                .map_err(|_| ProviderError::MissingApiKey(var.clone())),
            None => Ok(None),
        }
    }

    pub(crate) fn request_body(&self, prompt: &str, file_context: Option<&str>) -> Value {
        let contents = if prompt.is_empty() { DEFAULT_PROMPT } else { prompt };
        json!({
            "model": self.settings.model,
            "contents": contents,
            "systemInstruction": system_instruction(prompt, file_context),
            "responseMimeType": "application/json",
        })
    }
}

fn system_instruction(prompt: &str, file_context: Option<&str>) -> String {
    match file_context {
        Some(context) => format!(
            "You are a professional web developer. I will provide you with the source code \
             of a local project. Your task is to analyze these files and simulate the UI in \
             a simplified, interactive React-like format.\n\nPROJECT FILES:\n{context}\n\n\
             Identify the entry point (index.html, index.tsx, etc.) and recreate its visual \
             structure. Break it down into interactive elements. For each element, provide a \
             realistic code snippet and an explanation."
        ),
        None => format!(
            "Simulate a web application based on this prompt: \"{prompt}\". Create a \
             functional React-like UI description. Break it down into interactive elements. \
             For each element, provide a realistic code snippet and a detailed explanation \
             of what that specific code does."
        ),
    }
}

#[async_trait]
impl SimulationProvider for HttpProvider {
    async fn generate(
        &self,
        prompt: &str,
        file_context: Option<&str>,
    ) -> Result<GeneratedApp, ProviderError> {
        let mut request = self
            .client
            .post(&self.settings.endpoint)
            .json(&self.request_body(prompt, file_context));
        if let Some(key) = self.api_key()? {
            request = request.bearer_auth(key);
        }

        debug!(endpoint = %self.settings.endpoint, model = %self.settings.model, "requesting simulation");
        let response = request.send().await?.error_for_status()?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
